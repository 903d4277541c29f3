//! html5ever-backed token source and entity decoding.
//!
//! html5ever's tokenizer is push-based: input is fed in and tokens are
//! delivered to a sink. [`HtmlTokenSource`] turns that around into the pull
//! model the extractor expects by reading the byte stream one chunk at a
//! time and queueing whatever tokens the chunk produced. Bytes pass through
//! tendril's lossy streaming decoder on the way in, so multi-byte sequences
//! split across reads and legacy charsets are handled there.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Read};
use std::rc::Rc;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use html5ever::tokenizer::states::{RawKind, State};
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use regex::Regex;
use tendril::stream::LossyDecoder;
use tendril::{ByteTendril, StrTendril, TendrilSink, fmt};
use tracing::{debug, trace};

use crate::token::{MarkupToken, TagName, TokenSource};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Bytes searched for a byte order mark or a `<meta>` charset declaration.
const PRESCAN_LEN: usize = 1024;

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*?charset\s*=\s*["']?\s*([a-z0-9_.:-]+)"#)
        .expect("static regex must compile")
});

type TokenBuffer = Rc<RefCell<VecDeque<MarkupToken>>>;

#[derive(Default)]
struct TokenQueue {
    tokens: TokenBuffer,
}

impl TokenQueue {
    /// Queues a token, appending text to a queued text token it follows.
    fn push(&self, token: MarkupToken) {
        let mut tokens = self.tokens.borrow_mut();
        if let (MarkupToken::Text(text), Some(MarkupToken::Text(last))) = (&token, tokens.back_mut())
        {
            last.push_str(text);
            return;
        }
        tokens.push_back(token);
    }
}

impl TokenSink for TokenQueue {
    type Handle = ();

    fn process_token(&self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        let mut next = TokenSinkResult::Continue;
        let mapped = match token {
            Token::CharacterTokens(text) => MarkupToken::Text(text.to_string()),
            Token::TagToken(tag) if tag.self_closing => MarkupToken::Other,
            Token::TagToken(tag) => {
                let name = TagName::from_name(&tag.name);
                match tag.kind {
                    TagKind::StartTag => {
                        if let Some(kind) = raw_text_kind(&tag.name) {
                            next = TokenSinkResult::RawData(kind);
                        }
                        MarkupToken::StartTag(name)
                    }
                    TagKind::EndTag => MarkupToken::EndTag(name),
                }
            }
            // The source tracks end of stream itself.
            Token::EOFToken => return next,
            Token::ParseError(reason) => {
                trace!(line = line_number, %reason, "tokenizer diagnostic");
                return next;
            }
            _ => MarkupToken::Other,
        };
        self.push(mapped);
        next
    }
}

/// Elements whose content is text, not markup.
fn raw_text_kind(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}

/// Receives decoded text and runs it through the tokenizer.
struct TokenizerFeed {
    tokenizer: Tokenizer<TokenQueue>,
    input: BufferQueue,
}

impl TendrilSink<fmt::UTF8> for TokenizerFeed {
    fn process(&mut self, text: StrTendril) {
        self.input.push_back(text);
        // The sink never suspends for scripts, so feeding always runs to
        // completion.
        let _ = self.tokenizer.feed(&self.input);
    }

    fn error(&mut self, desc: Cow<'static, str>) {
        trace!(%desc, "undecodable bytes replaced");
    }

    type Output = ();

    fn finish(self) {
        let _ = self.tokenizer.feed(&self.input);
        self.tokenizer.end();
    }
}

/// Byte-to-text stage. Holds bytes back until the encoding is known.
enum ByteDecoder {
    Sniffing { prefix: Vec<u8>, feed: TokenizerFeed },
    Streaming(LossyDecoder<TokenizerFeed>),
    Finished,
}

impl ByteDecoder {
    fn push(self, chunk: &[u8]) -> Self {
        match self {
            Self::Sniffing { mut prefix, feed } => {
                prefix.extend_from_slice(chunk);
                if prefix.len() < PRESCAN_LEN {
                    Self::Sniffing { prefix, feed }
                } else {
                    Self::Streaming(start_stream(sniff_encoding(&prefix), &prefix, feed))
                }
            }
            Self::Streaming(mut decoder) => {
                decoder.process(ByteTendril::from_slice(chunk));
                Self::Streaming(decoder)
            }
            Self::Finished => Self::Finished,
        }
    }

    fn finish(self) {
        match self {
            Self::Sniffing { prefix, feed } => {
                start_stream(sniff_encoding(&prefix), &prefix, feed).finish();
            }
            Self::Streaming(decoder) => decoder.finish(),
            Self::Finished => {}
        }
    }
}

fn start_stream(
    encoding: &'static Encoding,
    prefix: &[u8],
    feed: TokenizerFeed,
) -> LossyDecoder<TokenizerFeed> {
    debug!(encoding = encoding.name(), "decoding document");
    let mut decoder = LossyDecoder::new_encoding_rs(encoding, feed);
    if !prefix.is_empty() {
        decoder.process(ByteTendril::from_slice(prefix));
    }
    decoder
}

/// Picks the document encoding from a byte order mark, then from a `<meta>`
/// charset declaration, falling back to UTF-8.
fn sniff_encoding(prefix: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(prefix) {
        return encoding;
    }
    let head = String::from_utf8_lossy(prefix);
    META_CHARSET
        .captures(&head)
        .and_then(|caps| Encoding::for_label(caps[1].as_bytes()))
        .map_or(UTF_8, Encoding::output_encoding)
}

/// Token source over a byte stream containing one HTML document.
///
/// The encoding comes from a byte order mark or a `<meta>` charset
/// declaration near the start of the document, and defaults to UTF-8.
/// Undecodable bytes become U+FFFD. Text produced by one read is delivered
/// as a single [`MarkupToken::Text`], entities already decoded.
///
/// A read error ends the stream: [`current`](TokenSource::current) turns into
/// [`MarkupToken::End`] and [`take_error`](TokenSource::take_error) yields
/// the error.
///
/// # Examples
///
/// ```
/// use gene_parse::html::HtmlTokenSource;
/// use gene_parse::token::{MarkupToken, TagName, TokenSource};
///
/// let mut source = HtmlTokenSource::new("<td>a &amp; b</td>".as_bytes());
/// source.advance();
/// assert_eq!(source.current(), &MarkupToken::StartTag(TagName::Cell));
/// source.advance();
/// assert_eq!(source.current(), &MarkupToken::Text("a & b".into()));
/// ```
pub struct HtmlTokenSource<R> {
    reader: R,
    decoder: ByteDecoder,
    tokens: TokenBuffer,
    current: MarkupToken,
    error: Option<io::Error>,
    exhausted: bool,
}

impl<R: Read> HtmlTokenSource<R> {
    pub fn new(reader: R) -> Self {
        let (feed, tokens) = tokenizer_feed();
        Self::with_decoder(
            reader,
            ByteDecoder::Sniffing {
                prefix: Vec::new(),
                feed,
            },
            tokens,
        )
    }

    /// Source that decodes with `encoding` regardless of what the document
    /// declares.
    pub fn with_encoding(reader: R, encoding: &'static Encoding) -> Self {
        let (feed, tokens) = tokenizer_feed();
        let decoder = ByteDecoder::Streaming(start_stream(encoding, &[], feed));
        Self::with_decoder(reader, decoder, tokens)
    }

    fn with_decoder(reader: R, decoder: ByteDecoder, tokens: TokenBuffer) -> Self {
        Self {
            reader,
            decoder,
            tokens,
            current: MarkupToken::End,
            error: None,
            exhausted: false,
        }
    }

    /// Reads one chunk and feeds it to the tokenizer.
    fn fill(&mut self) {
        let mut buf = [0_u8; READ_CHUNK_SIZE];
        let count = loop {
            match self.reader.read(&mut buf) {
                Ok(count) => break count,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    debug!(error = %err, "read failed, ending token stream");
                    self.error = Some(err);
                    self.exhausted = true;
                    return;
                }
            }
        };

        let decoder = std::mem::replace(&mut self.decoder, ByteDecoder::Finished);
        if count == 0 {
            decoder.finish();
            self.exhausted = true;
        } else {
            self.decoder = decoder.push(&buf[..count]);
        }
    }
}

fn tokenizer_feed() -> (TokenizerFeed, TokenBuffer) {
    let queue = TokenQueue::default();
    let tokens = Rc::clone(&queue.tokens);
    let feed = TokenizerFeed {
        tokenizer: Tokenizer::new(queue, TokenizerOpts::default()),
        input: BufferQueue::default(),
    };
    (feed, tokens)
}

impl<R: Read> TokenSource for HtmlTokenSource<R> {
    fn advance(&mut self) {
        loop {
            if let Some(token) = self.tokens.borrow_mut().pop_front() {
                self.current = token;
                return;
            }
            if self.exhausted {
                self.current = MarkupToken::End;
                return;
            }
            self.fill();
        }
    }

    fn current(&self) -> &MarkupToken {
        &self.current
    }

    fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

/// Escapes text so that [`decode_entities`] gives it back unchanged.
///
/// # Examples
///
/// ```
/// use gene_parse::html::{decode_entities, escape_text};
///
/// assert_eq!(escape_text("AT&T <b>"), "AT&amp;T &lt;b&gt;");
/// assert_eq!(decode_entities(&escape_text("x &lt; y")), "x &lt; y");
/// ```
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Decodes named, decimal, and hexadecimal character references.
///
/// Everything else, including `<` and tag-like text, is kept as written.
///
/// # Examples
///
/// ```
/// use gene_parse::html::decode_entities;
///
/// assert_eq!(decode_entities("GTG&rarr;GGG"), "GTG\u{2192}GGG");
/// assert_eq!(decode_entities("a&nbsp;b"), "a\u{a0}b");
/// assert_eq!(decode_entities("&#1234;&#x41;"), "\u{4d2}A");
/// assert_eq!(decode_entities("<i>x</i>"), "<i>x</i>");
/// ```
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let opts = TokenizerOpts {
        initial_state: Some(State::RawData(RawKind::Rcdata)),
        ..TokenizerOpts::default()
    };
    let queue = TokenQueue::default();
    let tokens = Rc::clone(&queue.tokens);
    let tokenizer = Tokenizer::new(queue, opts);
    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(text));
    let _ = tokenizer.feed(&input);
    tokenizer.end();

    let decoded = tokens.take();
    decoded
        .into_iter()
        .filter_map(|token| match token {
            MarkupToken::Text(text) => Some(text),
            _ => None,
        })
        .collect()
}

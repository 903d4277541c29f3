//! Markup tokens and the token source abstraction the extractor pulls from.

use std::collections::VecDeque;
use std::fmt;
use std::io;

/// Identity of a tag as far as table extraction is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagName {
    /// `<table>`
    Table,
    /// `<tr>`
    Row,
    /// `<td>`
    Cell,
    /// `<th>`
    HeaderCell,
    /// Any other element, lowercased.
    Other(String),
}

impl TagName {
    /// Resolves an element name (case-insensitive).
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "table" => Self::Table,
            "tr" => Self::Row,
            "td" => Self::Cell,
            "th" => Self::HeaderCell,
            other => Self::Other(other.to_string()),
        }
    }

    /// Element name as written in markup.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Table => "table",
            Self::Row => "tr",
            Self::Cell => "td",
            Self::HeaderCell => "th",
            Self::Other(name) => name,
        }
    }

    /// Returns `true` for table, row, and (header) cell tags.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Returns `true` for `<td>` and `<th>`.
    pub fn is_cell(&self) -> bool {
        matches!(self, Self::Cell | Self::HeaderCell)
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The token currently under a [`TokenSource`] cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MarkupToken {
    /// End of stream, or a read failure when [`TokenSource::take_error`]
    /// returns one.
    #[default]
    End,
    /// Character data with entities already decoded.
    Text(String),
    /// Opening tag.
    StartTag(TagName),
    /// Closing tag.
    EndTag(TagName),
    /// Comments, doctypes, and self-closing tags.
    Other,
}

/// A pull-based stream of markup tokens.
///
/// The extractor calls [`advance`](Self::advance) once per step and inspects
/// [`current`](Self::current). Once [`MarkupToken::End`] is reached the
/// source stays there.
pub trait TokenSource {
    /// Moves the cursor to the next token.
    fn advance(&mut self);

    /// Token under the cursor. [`MarkupToken::End`] before the first
    /// [`advance`](Self::advance).
    fn current(&self) -> &MarkupToken;

    /// Takes the read error that ended the stream, if any. `None` at
    /// [`MarkupToken::End`] means the stream ended cleanly.
    fn take_error(&mut self) -> Option<io::Error>;
}

/// Replays a fixed token sequence, then reports end of stream.
///
/// # Examples
///
/// ```
/// use gene_parse::token::{MarkupToken, ReplaySource, TagName, TokenSource};
///
/// let mut source = ReplaySource::new(vec![MarkupToken::StartTag(TagName::Table)]);
/// source.advance();
/// assert_eq!(source.current(), &MarkupToken::StartTag(TagName::Table));
/// source.advance();
/// assert_eq!(source.current(), &MarkupToken::End);
/// ```
#[derive(Debug, Default)]
pub struct ReplaySource {
    pending: VecDeque<MarkupToken>,
    current: MarkupToken,
    failure: Option<io::Error>,
}

impl ReplaySource {
    pub fn new(tokens: impl IntoIterator<Item = MarkupToken>) -> Self {
        Self {
            pending: tokens.into_iter().collect(),
            current: MarkupToken::End,
            failure: None,
        }
    }

    /// Ends the replay with a read error instead of a clean end of stream.
    pub fn failing_with(mut self, err: io::Error) -> Self {
        self.failure = Some(err);
        self
    }
}

impl TokenSource for ReplaySource {
    fn advance(&mut self) {
        self.current = self.pending.pop_front().unwrap_or(MarkupToken::End);
    }

    fn current(&self) -> &MarkupToken {
        &self.current
    }

    fn take_error(&mut self) -> Option<io::Error> {
        if self.current == MarkupToken::End {
            self.failure.take()
        } else {
            None
        }
    }
}

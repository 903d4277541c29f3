//! Single-pass table extraction over a markup token stream.
//!
//! The extractor is a state machine driven one token at a time. An explicit
//! [`TagStack`] records the open table/row/cell tags so every closing tag can
//! be checked against the tag it closes, while [`TagCounters`] catch rows
//! inside rows and cells inside cells regardless of what the stack holds.
//!
//! Tables nested inside cells are supported: opening a `<table>` saves the
//! enclosing table's row/cell counters and working buffers, and closing it
//! restores them. Nested tables therefore appear in the result before the
//! table that contains them, and the outer table keeps accumulating its own
//! rows independently.

use std::io::Read;
use std::mem;

use tracing::{debug, trace};

use crate::error::{ExtractError, Result};
use crate::html::{HtmlTokenSource, escape_text};
use crate::stack::TagStack;
use crate::token::{MarkupToken, TagName, TokenSource};

/// Cell texts of one `<tr>`, in document order.
///
/// Cell text is stored markup-escaped (`&`, `<`, `>`, quotes), the way it
/// reads in the document source, so [`decode_entities`] recovers the
/// displayed text exactly once.
///
/// [`decode_entities`]: crate::html::decode_entities
pub type Row = Vec<String>;

/// Direct rows of one `<table>`, in document order.
pub type Table = Vec<Row>;

/// Running counts of open structural tags.
///
/// `tables` spans the whole document; `rows` and `cells` count within the
/// innermost open table. A count only goes negative when a closing tag has
/// no matching opening tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagCounters {
    pub tables: i64,
    pub rows: i64,
    pub cells: i64,
}

/// Row/cell state of a table suspended while a nested table is open.
#[derive(Debug, Default)]
struct EnclosingScope {
    rows: i64,
    cells: i64,
    table: Table,
    row: Row,
    cell: String,
}

/// Table extraction state machine.
///
/// # Examples
///
/// ```
/// use gene_parse::extractor::TableExtractor;
/// use gene_parse::html::HtmlTokenSource;
///
/// let html = "<table><tr><td>a <i>b</i></td></tr></table>";
/// let mut source = HtmlTokenSource::new(html.as_bytes());
/// let tables = TableExtractor::new().extract(&mut source).unwrap();
/// assert_eq!(tables, vec![vec![vec!["a b".to_string()]]]);
/// ```
#[derive(Debug)]
pub struct TableExtractor<S = Vec<TagName>> {
    stack: S,
    counters: TagCounters,
    cell: String,
    row: Row,
    table: Table,
    enclosing: Vec<EnclosingScope>,
    tables: Vec<Table>,
}

impl TableExtractor {
    pub fn new() -> Self {
        Self::with_stack(Vec::new())
    }
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TagStack> TableExtractor<S> {
    /// Creates an extractor over a caller-supplied tag stack.
    pub fn with_stack(stack: S) -> Self {
        Self {
            stack,
            counters: TagCounters::default(),
            cell: String::new(),
            row: Row::new(),
            table: Table::new(),
            enclosing: Vec::new(),
            tables: Vec::new(),
        }
    }

    /// Consumes `source` to exhaustion and returns every completed table in
    /// the order its closing tag was seen.
    ///
    /// A clean end of stream is success. Structural errors and read errors
    /// abort the pass with no partial result. Tables still open when the
    /// stream ends are dropped.
    pub fn extract<T: TokenSource + ?Sized>(mut self, source: &mut T) -> Result<Vec<Table>> {
        loop {
            source.advance();
            match source.current() {
                MarkupToken::End => {
                    if let Some(err) = source.take_error() {
                        debug!(error = %err, "token source failed");
                        return Err(ExtractError::Read(err));
                    }
                    if !self.stack.is_empty() {
                        debug!(
                            open_tags = self.stack.len(),
                            "document ended inside a table, dropping it"
                        );
                    }
                    debug!(tables = self.tables.len(), "extraction finished");
                    return Ok(self.tables);
                }
                MarkupToken::Text(text) => self.handle_text(text),
                MarkupToken::StartTag(tag) => self.handle_start_tag(tag),
                MarkupToken::EndTag(tag) => self.handle_end_tag(tag)?,
                MarkupToken::Other => trace!("skipping token"),
            }
        }
    }

    /// Appends `text`, escaped, to the working cell when the innermost open
    /// tag is a cell. Text anywhere else, including outside every table, is
    /// ignored.
    fn handle_text(&mut self, text: &str) {
        match self.stack.peek() {
            Some(tag) if tag.is_cell() => {
                trace!(text, "extracting text");
                self.cell.push_str(&escape_text(text));
            }
            _ => trace!(text, "ignoring text outside a cell"),
        }
    }

    /// Counts and pushes structural tags. Everything else is skipped so
    /// inline markup inside a cell does not interrupt its text.
    fn handle_start_tag(&mut self, tag: &TagName) {
        match tag {
            TagName::Table => {
                self.counters.tables += 1;
                self.enclosing.push(EnclosingScope {
                    rows: mem::take(&mut self.counters.rows),
                    cells: mem::take(&mut self.counters.cells),
                    table: mem::take(&mut self.table),
                    row: mem::take(&mut self.row),
                    cell: mem::take(&mut self.cell),
                });
            }
            TagName::Row => self.counters.rows += 1,
            TagName::Cell | TagName::HeaderCell => self.counters.cells += 1,
            TagName::Other(_) => {
                trace!(%tag, "skipping start tag");
                return;
            }
        }
        trace!(%tag, counters = ?self.counters, "pushing start tag");
        self.stack.push(tag.clone());
    }

    /// Closes the structure opened by the matching start tag.
    ///
    /// The popped tag must equal `tag`; the counters and remaining stack
    /// depth must then describe a legal position for the closed structure.
    fn handle_end_tag(&mut self, tag: &TagName) -> Result<()> {
        if !tag.is_structural() {
            trace!(%tag, "skipping end tag");
            return Ok(());
        }

        let Some(open) = self.stack.pop() else {
            return Err(ExtractError::UnexpectedStackState(format!(
                "</{tag}> closes nothing, the tag stack is empty"
            )));
        };
        if open != *tag {
            debug!(expected = %open, found = %tag, "mismatched closing tag");
            return Err(ExtractError::MismatchedTag {
                expected: open,
                found: tag.clone(),
            });
        }

        match tag {
            TagName::Table => self.close_table(),
            TagName::Row => self.close_row(),
            TagName::Cell | TagName::HeaderCell => self.close_cell(),
            TagName::Other(name) => Err(ExtractError::UnexpectedStackState(format!(
                "<{name}> is not a structural tag"
            ))),
        }
    }

    fn close_table(&mut self) -> Result<()> {
        self.counters.tables -= 1;
        let depth = self.stack.len();
        let excess_tags = self.counters.tables == 0 && depth > 0;
        let missing_tags = self.counters.tables > 0 && depth == 0;
        if excess_tags || missing_tags || self.counters.tables < 0 {
            debug!(counters = ?self.counters, depth, "malformed table");
            return Err(ExtractError::MalformedTable);
        }

        let completed = mem::take(&mut self.table);
        if let Some(scope) = self.enclosing.pop() {
            self.counters.rows = scope.rows;
            self.counters.cells = scope.cells;
            self.table = scope.table;
            self.row = scope.row;
            self.cell = scope.cell;
        }
        debug!(
            rows = completed.len(),
            nested = self.counters.tables > 0,
            "adding table to results"
        );
        self.tables.push(completed);
        Ok(())
    }

    fn close_row(&mut self) -> Result<()> {
        self.counters.rows -= 1;
        let nested = self.counters.rows != 0;
        let outside_table = self.stack.is_empty();
        if nested || outside_table {
            debug!(counters = ?self.counters, "malformed row");
            return Err(ExtractError::MalformedRow);
        }

        trace!(cells = self.row.len(), "adding row to table");
        self.table.push(mem::take(&mut self.row));
        Ok(())
    }

    fn close_cell(&mut self) -> Result<()> {
        self.counters.cells -= 1;
        let nested = self.counters.cells != 0;
        let outside_row = self.stack.len() < 2;
        if nested || outside_row {
            debug!(counters = ?self.counters, "malformed cell");
            return Err(ExtractError::MalformedCell);
        }

        trace!(text = %self.cell, "adding cell to row");
        self.row.push(mem::take(&mut self.cell));
        Ok(())
    }
}

/// Extracts every table from a token source using a fresh extractor.
pub fn extract_tables<T: TokenSource + ?Sized>(source: &mut T) -> Result<Vec<Table>> {
    TableExtractor::new().extract(source)
}

/// Extracts every table from an HTML byte stream.
pub fn extract_html_tables<R: Read>(reader: R) -> Result<Vec<Table>> {
    extract_tables(&mut HtmlTokenSource::new(reader))
}

//! Error types for table extraction and report format configuration.

use thiserror::Error;

use crate::token::TagName;

/// Errors that abort a table extraction pass.
///
/// Every variant is fatal for the document being extracted; no partial
/// result is returned alongside it.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A `</table>` left the table counter and tag stack disagreeing.
    #[error("parsing malformed table")]
    MalformedTable,

    /// A `</tr>` closed a nested row or a row outside any table.
    #[error("parsing malformed row")]
    MalformedRow,

    /// A `</td>`/`</th>` closed a nested cell or a cell outside a row.
    #[error("parsing malformed cell")]
    MalformedCell,

    /// Structural tags closed out of order.
    #[error("parsing a mismatched tag: expected </{expected}>, found </{found}>")]
    MismatchedTag { expected: TagName, found: TagName },

    /// The tag stack could not account for a closing tag.
    #[error("unexpected tag stack state: {0}")]
    UnexpectedStackState(String),

    /// The underlying byte stream failed.
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),
}

/// Convenience alias for results with [`ExtractError`].
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while loading or selecting report formats.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A configured format can never match a document.
    #[error("invalid report format: {0}")]
    InvalidFormat(#[from] gene_core::ValidationError),

    /// No registered format matches the request.
    #[error("unsupported report: file type '{file_type}', application '{application}', version '{version}'")]
    UnsupportedFormat {
        file_type: String,
        application: String,
        version: String,
    },
}

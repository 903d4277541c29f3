//! Report format validation.
//!
//! Catches format descriptions that could never match a document, such as an
//! empty header list or a version that is not `major.minor`, before they are
//! handed to the classifier.
//!
//! # Examples
//!
//! ```
//! use gene_core::*;
//!
//! assert!(validate_format(&ReportFormat::breseq_0_27()).is_empty());
//!
//! let bad = ReportFormat::new("breseq", "0.27.1", ["gene"]);
//! assert_eq!(
//!     validate_format(&bad),
//!     vec![ValidationError::InvalidVersion("0.27.1".into())]
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{ReportFormat, major_minor};

/// Report format validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Application name is empty or whitespace-only.
    #[error("report application cannot be empty")]
    EmptyApplication,
    /// File type is empty or whitespace-only.
    #[error("report file type cannot be empty")]
    EmptyFileType,
    /// Version is not exactly `major.minor`.
    #[error("report version must be major.minor: {0}")]
    InvalidVersion(String),
    /// The data table header list is empty.
    #[error("report headers cannot be empty")]
    EmptyHeaders,
    /// A header cell is empty or whitespace-only.
    #[error("report header {0} is empty")]
    EmptyHeader(usize),
    /// Two formats share the same file type, application, and version.
    #[error("duplicate report format: {0}")]
    DuplicateFormat(String),
}

/// Validates a single report format.
///
/// Returns every problem found; an empty vector means the format is usable.
pub fn validate_format(format: &ReportFormat) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if format.file_type.trim().is_empty() {
        errors.push(ValidationError::EmptyFileType);
    }
    if format.application.trim().is_empty() {
        errors.push(ValidationError::EmptyApplication);
    }
    if major_minor(&format.version) != Some(format.version.as_str()) {
        errors.push(ValidationError::InvalidVersion(format.version.clone()));
    }
    if format.headers.is_empty() {
        errors.push(ValidationError::EmptyHeaders);
    }
    for (idx, header) in format.headers.iter().enumerate() {
        if header.trim().is_empty() {
            errors.push(ValidationError::EmptyHeader(idx));
        }
    }

    errors
}

/// Validates a list of formats, stopping at the first broken entry.
///
/// # Examples
///
/// ```
/// use gene_core::*;
///
/// let formats = vec![ReportFormat::breseq_0_27(), ReportFormat::breseq_0_27()];
/// let errors = validate_formats(&formats);
/// assert!(matches!(errors[0], ValidationError::DuplicateFormat(_)));
/// ```
pub fn validate_formats(formats: &[ReportFormat]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for format in formats {
        errors.extend(validate_format(format));
        if !errors.is_empty() {
            return errors;
        }

        let key = format!(
            "{}/{}/{}",
            format.file_type.to_ascii_lowercase(),
            format.application.to_ascii_lowercase(),
            format.version
        );
        if !seen.insert(key.clone()) {
            errors.push(ValidationError::DuplicateFormat(key));
            return errors;
        }
    }

    errors
}

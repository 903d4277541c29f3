//! Core record and report format types.
//!
//! This crate defines the data shared by the extraction pipeline and its
//! callers:
//!
//! - [`SequenceAnnotation`] — the canonical record produced for every data
//!   row of a recognized report table.
//! - [`ReportFormat`] — one supported report layout (application, `major.minor`
//!   version, and the literal data-table header cells).
//!
//! Validation ([`validate_format`], [`validate_formats`]) catches format
//! descriptions that could never match a document.
//!
//! # Example
//!
//! ```
//! use gene_core::*;
//!
//! let format = ReportFormat::breseq_0_27();
//! assert!(validate_format(&format).is_empty());
//!
//! let mut record = SequenceAnnotation::new(&format.application, &format.version);
//! record.sequence_id = "NC_012345".into();
//! record.assign_unique_id();
//! assert!(!record.unique_id.is_empty());
//! ```

mod format;
mod types;
mod validate;

pub use format::{BRESEQ, BRESEQ_0_27_HEADERS, BRESEQ_VERSION_0_27, ReportFormat, major_minor};
pub use types::*;
pub use validate::{ValidationError, validate_format, validate_formats};

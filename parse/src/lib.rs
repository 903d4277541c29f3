//! Table extraction and record conversion for sequence annotation reports.
//!
//! A report is read once as a stream of markup tokens. Every `<table>` in it
//! is extracted into rows of cell text, the tables are scanned for a version
//! table followed by a data table of a supported [`ReportFormat`], and each
//! qualifying data table becomes one collection of [`SequenceAnnotation`]
//! records.
//!
//! # Main entry points
//!
//! - [`parse_report`] / [`parse_report_path`] — full document to record
//!   collections.
//! - [`extract_html_tables`] — markup to tables, without classification.
//! - [`classify`] and [`convert`] — the per-table predicates and conversion.
//! - [`FormatRegistry`] — the supported formats, optionally loaded from YAML.
//!
//! # Example
//!
//! ```
//! use gene_parse::{FormatRegistry, parse_report};
//!
//! let registry = FormatRegistry::builtin();
//! let format = registry.select("html", "breseq", "0.27.*").unwrap();
//!
//! let html = "<table><tr><td></td><td>breseq&nbsp;&nbsp;version 0.27.1</td></tr></table>\
//!     <table><tr><th>Predicted mutations</th></tr>\
//!     <tr><th>evidence</th><th>seq&nbsp;id</th><th>position</th><th>mutation</th>\
//!     <th>freq</th><th>annotation</th><th>gene</th><th>description</th></tr>\
//!     <tr><td>RA</td><td>NC_000913</td><td>1,234</td><td>+A</td><td>100%</td>\
//!     <td>intergenic</td><td><i>thrL</i></td><td>leader peptide</td></tr></table>";
//!
//! let collections = parse_report(html.as_bytes(), format).unwrap();
//! assert_eq!(collections.len(), 1);
//! assert_eq!(collections[0][0].sequence_id, "NC_000913");
//! assert_eq!(collections[0][0].gene, "thrL");
//! ```
//!
//! Logging goes through [`tracing`]; nothing is printed unless the caller
//! installs a subscriber.
//!
//! [`ReportFormat`]: gene_core::ReportFormat
//! [`SequenceAnnotation`]: gene_core::SequenceAnnotation

pub mod classify;
pub mod config;
pub mod convert;
pub mod error;
pub mod extractor;
pub mod html;
pub mod output;
pub mod report;
pub mod stack;
pub mod token;

pub use config::FormatRegistry;
pub use error::{ConfigError, ExtractError, Result};
pub use extractor::{Row, Table, TableExtractor, extract_html_tables, extract_tables};
pub use output::{OutputFormat, format_collections};
pub use report::{parse_report, parse_report_path, qualifying_data_tables};

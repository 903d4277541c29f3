//! Whole-document parsing: extraction, classification, and conversion.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use gene_core::{ReportFormat, SequenceAnnotation};
use tracing::{debug, info};

use crate::classify::{is_data_table, is_version_table};
use crate::convert::convert_table;
use crate::error::Result;
use crate::extractor::{Table, extract_html_tables};

/// Returns the data tables of `tables` that follow a version table, in
/// document order.
pub fn qualifying_data_tables<'a>(tables: &'a [Table], format: &ReportFormat) -> Vec<&'a Table> {
    let mut version_seen = false;
    let mut qualifying = Vec::new();
    for (index, table) in tables.iter().enumerate() {
        if version_seen && is_data_table(table, format) {
            debug!(table = index, "found data table");
            qualifying.push(table);
        } else if is_version_table(table, format) {
            debug!(table = index, "found version table");
            version_seen = true;
        }
    }
    qualifying
}

/// Parses one HTML report into record collections, one per qualifying data
/// table.
///
/// A document without a recognizable report yields an empty list. Only
/// extraction and read failures are errors.
///
/// # Examples
///
/// ```
/// use gene_core::ReportFormat;
/// use gene_parse::report::parse_report;
///
/// let html = "<html><body><p>no tables here</p></body></html>";
/// let collections = parse_report(html.as_bytes(), &ReportFormat::breseq_0_27()).unwrap();
/// assert!(collections.is_empty());
/// ```
pub fn parse_report<R: Read>(
    reader: R,
    format: &ReportFormat,
) -> Result<Vec<Vec<SequenceAnnotation>>> {
    let tables = extract_html_tables(reader)?;
    info!(tables = tables.len(), "extracted tables");

    let collections: Vec<_> = qualifying_data_tables(&tables, format)
        .into_iter()
        .map(|table| convert_table(table, format))
        .filter(|records| !records.is_empty())
        .collect();
    info!(
        collections = collections.len(),
        records = collections.iter().map(Vec::len).sum::<usize>(),
        application = %format.application,
        version = %format.version,
        "converted report tables"
    );
    Ok(collections)
}

/// Opens `path` and parses it with [`parse_report`].
pub fn parse_report_path(
    path: impl AsRef<Path>,
    format: &ReportFormat,
) -> Result<Vec<Vec<SequenceAnnotation>>> {
    let path = path.as_ref();
    info!(path = %path.display(), "parsing report");
    let file = File::open(path)?;
    parse_report(BufReader::new(file), format)
}

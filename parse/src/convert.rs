//! Conversion of data tables into sequence annotation records.

use gene_core::{ReportFormat, SequenceAnnotation};
use tracing::{debug, warn};

use crate::classify::is_data_table;
use crate::extractor::{Row, Table};
use crate::html::decode_entities;

/// Number of leading cells a data row must carry.
const DATA_COLUMNS: usize = 8;

/// Rows above the first data row: the table title and the header row.
const LEADING_ROWS: usize = 2;

/// Converts every data row of `table` into a record stamped with `format`'s
/// application and version.
///
/// Returns an empty list when the table's second row is not `format`'s
/// header. Cells are mapped by position: evidence (ignored), sequence id,
/// position, mutation, frequency, annotation, gene, description. Each field
/// is entity-decoded once, so cells stored escaped by the extractor come out
/// as displayed. Rows with fewer cells are skipped.
///
/// # Examples
///
/// ```
/// use gene_core::ReportFormat;
/// use gene_parse::convert::convert_table;
///
/// let format = ReportFormat::breseq_0_27();
/// let table = vec![
///     vec!["Predicted mutations".to_string()],
///     format.headers.clone(),
///     ["RA", "NC_000913", "12,345", "+G", "100%", "intergenic", "<i>thrL</i>", "leader"]
///         .map(String::from)
///         .to_vec(),
/// ];
/// let records = convert_table(&table, &format);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].gene, "thrL");
/// ```
pub fn convert_table(table: &Table, format: &ReportFormat) -> Vec<SequenceAnnotation> {
    if !is_data_table(table, format) {
        debug!(rows = table.len(), "table header does not match, skipping");
        return Vec::new();
    }

    table
        .iter()
        .enumerate()
        .skip(LEADING_ROWS)
        .filter_map(|(index, row)| {
            let record = convert_row(row, format);
            if record.is_none() {
                warn!(
                    row = index,
                    cells = row.len(),
                    expected = DATA_COLUMNS,
                    "skipping short data row"
                );
            }
            record
        })
        .collect()
}

fn convert_row(row: &Row, format: &ReportFormat) -> Option<SequenceAnnotation> {
    if row.len() < DATA_COLUMNS {
        return None;
    }

    let mut record = SequenceAnnotation::new(&format.application, &format.version);
    record.sequence_id = decode_entities(&row[1]);
    record.position = decode_entities(&row[2]);
    record.mutation = decode_entities(&row[3]);
    record.frequency = decode_entities(&row[4]);
    record.annotation = decode_entities(&row[5]);
    record.gene = decode_entities(&strip_italics(&row[6]));
    record.description = decode_entities(&row[7]);
    Some(record)
}

/// Removes literal `<i>` and `</i>` markers left in gene cells.
fn strip_italics(text: &str) -> String {
    text.replace("<i>", "").replace("</i>", "")
}

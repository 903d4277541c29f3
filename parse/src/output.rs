//! Output formatting for parsed record collections.

use gene_core::SequenceAnnotation;

/// Column names of delimited output, in order.
pub const COLUMNS: [&str; 11] = [
    "collection",
    "index",
    "seq_id",
    "position",
    "mutation",
    "freq",
    "annotation",
    "gene",
    "description",
    "generation",
    "unique_id",
];

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Comma-separated values.
    #[default]
    Csv,
    /// Tab-separated values.
    Tsv,
    /// Pretty-printed JSON array of collections.
    Json,
}

impl OutputFormat {
    fn delimiter(self) -> Option<u8> {
        match self {
            Self::Csv => Some(b','),
            Self::Tsv => Some(b'\t'),
            Self::Json => None,
        }
    }
}

/// Formats record collections in the requested output format.
///
/// Delimited output carries a header row and one line per record; the
/// `collection` and `index` columns count from zero.
///
/// # Examples
///
/// ```
/// use gene_core::SequenceAnnotation;
/// use gene_parse::output::{OutputFormat, format_collections};
///
/// let mut record = SequenceAnnotation::new("breseq", "0.27");
/// record.position = "12,345".into();
/// let csv = format_collections(&[vec![record]], OutputFormat::Csv).unwrap();
/// assert!(csv.lines().nth(1).unwrap().starts_with("0,0,,\"12,345\","));
/// ```
pub fn format_collections(
    collections: &[Vec<SequenceAnnotation>],
    format: OutputFormat,
) -> Result<String, String> {
    match format.delimiter() {
        Some(delimiter) => to_delimited(collections, delimiter),
        None => serde_json::to_string_pretty(collections)
            .map_err(|e| format!("JSON serialization failed: {e}")),
    }
}

fn to_delimited(collections: &[Vec<SequenceAnnotation>], delimiter: u8) -> Result<String, String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    let write_err = |e: csv::Error| format!("delimited output failed: {e}");

    writer.write_record(COLUMNS).map_err(write_err)?;
    for (collection, records) in collections.iter().enumerate() {
        for (index, record) in records.iter().enumerate() {
            let collection = collection.to_string();
            let index = index.to_string();
            writer
                .write_record([
                    collection.as_str(),
                    index.as_str(),
                    record.sequence_id.as_str(),
                    record.position.as_str(),
                    record.mutation.as_str(),
                    record.frequency.as_str(),
                    record.annotation.as_str(),
                    record.gene.as_str(),
                    record.description.as_str(),
                    record.generation.as_str(),
                    record.unique_id.as_str(),
                ])
                .map_err(write_err)?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| format!("delimited output failed: {e}"))?;
    String::from_utf8(bytes).map_err(|e| format!("delimited output is not UTF-8: {e}"))
}

//! Recognition of report version and data tables.
//!
//! A supported report declares its producer in a small version table near
//! the top of the document and then lists predictions in a data table whose
//! second row is a fixed header. Both checks are pure functions over
//! extracted tables, and both compare cell text after entity decoding.

use std::sync::LazyLock;

use gene_core::ReportFormat;
use regex::Regex;

use crate::extractor::Table;
use crate::html::decode_entities;

/// Runs of regular spaces, non-breaking spaces, and newlines.
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \u{a0}\n]+").expect("static regex must compile"));

/// Collapses spaces, non-breaking spaces, and newlines into single spaces and
/// trims the result.
///
/// # Examples
///
/// ```
/// use gene_parse::classify::normalize_whitespace;
///
/// assert_eq!(
///     normalize_whitespace("\nbreseq\u{a0}\u{a0}version\n0.27.1 "),
///     "breseq version 0.27.1"
/// );
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Returns `true` when some row's second cell announces `format`'s
/// application and `major.minor` version.
///
/// The normalized cell must start with `"<application> version <major.minor>"`
/// and continue, if at all, with anything but an ASCII digit, so `0.27.1`,
/// `0.27-rc1` and `0.27 revision abc` match while `0.270` does not.
pub fn is_version_table(table: &Table, format: &ReportFormat) -> bool {
    let marker = format.version_marker();
    table.iter().any(|row| {
        let Some(cell) = row.get(1) else {
            return false;
        };
        let normalized = normalize_whitespace(&decode_entities(cell));
        match normalized.strip_prefix(marker.as_str()) {
            Some(rest) => rest.chars().next().is_none_or(|next| !next.is_ascii_digit()),
            None => false,
        }
    })
}

/// Returns `true` when the table's second row equals `format`'s header
/// cells exactly.
pub fn is_data_table(table: &Table, format: &ReportFormat) -> bool {
    let Some(header) = table.get(1) else {
        return false;
    };
    header.len() == format.headers.len()
        && header
            .iter()
            .zip(&format.headers)
            .all(|(cell, expected)| decode_entities(cell) == *expected)
}

/// Returns `true` when a version table appears before some data table.
pub fn identify_report_tables(tables: &[Table], format: &ReportFormat) -> bool {
    match tables.iter().position(|table| is_version_table(table, format)) {
        Some(first) => tables[first + 1..]
            .iter()
            .any(|table| is_data_table(table, format)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLANK_COL: &str = "blank col";

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn headers() -> Vec<String> {
        ReportFormat::breseq_0_27().headers
    }

    fn version_table(cell: &str) -> Table {
        vec![row(&[BLANK_COL, cell])]
    }

    fn data_table() -> Table {
        vec![row(&["throw away row"]), headers(), row(&["test row"])]
    }

    #[test]
    fn test_version_table_variants_match() {
        let format = ReportFormat::breseq_0_27();
        let cases = [
            ("appended patch", "breseq version 0.27.1"),
            ("non-breaking spaces", "breseq\u{a0}\u{a0}version\u{a0}\u{a0}0.27"),
            ("newlines", "breseq\nversion\n0.27"),
            ("space before patch", "breseq version 0.27 .1"),
            ("combined", "breseq\u{a0}\n\u{a0} version\u{a0}\u{a0}\n 0.27.1"),
            ("trailing revision", "\nbreseq\u{a0}\u{a0}version 0.27.1\u{a0}\u{a0}revision 87c22d663cc3\n"),
            ("release candidate", "breseq version 0.27-rc1"),
            ("trailing comma", "breseq version 0.27, built today"),
            ("escaped spaces", "breseq&nbsp;&nbsp;version&nbsp;0.27.1"),
        ];
        for (name, cell) in cases {
            assert!(is_version_table(&version_table(cell), &format), "{name}");
        }
    }

    #[test]
    fn test_version_table_rejections() {
        let format = ReportFormat::breseq_0_27();
        let cases: [(&str, Table); 7] = [
            ("empty", vec![]),
            ("different version", version_table("breseq version 0.28")),
            ("longer minor", version_table("breseq version 0.270")),
            ("longer minor with patch", version_table("breseq version 0.271.1")),
            ("invalid", version_table("invalid version")),
            ("no blank column", vec![row(&["breseq version 0.27"])]),
            ("blank column only", vec![row(&[BLANK_COL])]),
        ];
        for (name, table) in cases {
            assert!(!is_version_table(&table, &format), "{name}");
        }
    }

    #[test]
    fn test_version_table_uses_any_row() {
        let format = ReportFormat::breseq_0_27();
        let table = vec![row(&["a", "b"]), row(&[BLANK_COL, "breseq version 0.27.3"])];
        assert!(is_version_table(&table, &format));
    }

    #[test]
    fn test_version_marker_follows_format() {
        let format = ReportFormat::new("gdtools", "1.4", ["x"]);
        assert!(is_version_table(&version_table("gdtools version 1.4.2"), &format));
        assert!(!is_version_table(&version_table("breseq version 0.27.1"), &format));
    }

    #[test]
    fn test_data_table_matches_header_row() {
        let format = ReportFormat::breseq_0_27();
        assert!(is_data_table(&data_table(), &format));
        assert!(is_data_table(&vec![row(&["title"]), headers()], &format));
    }

    #[test]
    fn test_data_table_rejections() {
        let format = ReportFormat::breseq_0_27();
        let mut shifted = headers()[3..].to_vec();
        shifted.extend_from_slice(&headers()[..3]);
        let cases: [(&str, Table); 6] = [
            ("empty", vec![]),
            ("invalid header", vec![row(&["throw away row"]), row(&["invalid header"]), row(&["data"])]),
            ("single row", vec![row(&["random row"])]),
            ("shifted headers", vec![row(&["throw away row"]), shifted, row(&["data"])]),
            ("short headers", vec![row(&["throw away row"]), headers()[..4].to_vec(), row(&["data"])]),
            ("empty headers", vec![row(&["throw away row"]), vec![], row(&["data"])]),
        ];
        for (name, table) in cases {
            assert!(!is_data_table(&table, &format), "{name}");
        }
    }

    #[test]
    fn test_data_table_compares_decoded_headers() {
        let format = ReportFormat::breseq_0_27();
        let mut escaped = headers();
        escaped[1] = "seq&nbsp;id".to_string();
        assert!(is_data_table(&vec![row(&["title"]), escaped], &format));

        let format = ReportFormat::new("tool", "1.0", ["a & b", "<c>"]);
        assert!(is_data_table(&vec![row(&["title"]), row(&["a &amp; b", "&lt;c&gt;"])], &format));
        assert!(!is_data_table(&vec![row(&["title"]), row(&["a &amp;amp; b", "&lt;c&gt;"])], &format));
    }

    #[test]
    fn test_header_in_first_row_is_not_data_table() {
        let format = ReportFormat::breseq_0_27();
        assert!(!is_data_table(&vec![headers(), row(&["data"])], &format));
    }

    #[test]
    fn test_report_requires_version_before_data() {
        let format = ReportFormat::breseq_0_27();
        let version = version_table("breseq version 0.27.12345");
        let data = vec![row(&["throw away row"]), headers()];

        assert!(identify_report_tables(&[version.clone(), data.clone()], &format));
        assert!(identify_report_tables(
            &[version.clone(), vec![row(&["unrelated"])], data.clone()],
            &format
        ));
        assert!(!identify_report_tables(&[version.clone()], &format));
        assert!(!identify_report_tables(&[data.clone(), version.clone()], &format));
        assert!(!identify_report_tables(&[], &format));
    }

    #[test]
    fn test_classification_is_repeatable() {
        let format = ReportFormat::breseq_0_27();
        let tables = vec![version_table("breseq version 0.27"), data_table()];
        let snapshot = tables.clone();
        assert!(identify_report_tables(&tables, &format));
        assert!(identify_report_tables(&tables, &format));
        assert_eq!(tables, snapshot);
    }
}

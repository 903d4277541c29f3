use serde::{Deserialize, Serialize};

/// Application name of the shipped report format.
pub const BRESEQ: &str = "breseq";

/// `major.minor` version of the shipped report format.
pub const BRESEQ_VERSION_0_27: &str = "0.27";

/// Data-table header cells of a breseq 0.27 HTML mutation report.
///
/// The report writes `seq&nbsp;id`, so the decoded cell carries a
/// non-breaking space.
pub const BRESEQ_0_27_HEADERS: [&str; 8] = [
    "evidence",
    "seq\u{a0}id",
    "position",
    "mutation",
    "freq",
    "annotation",
    "gene",
    "description",
];

/// Description of one supported report layout.
///
/// A report is recognized by a version table whose second cell reads
/// `"<application> version <major.minor>"` followed, later in the document,
/// by a data table whose second row equals [`headers`](Self::headers).
///
/// Only the breseq 0.27 layout ships, but formats are plain data and can be
/// loaded from configuration.
///
/// # Examples
///
/// ```
/// use gene_core::ReportFormat;
///
/// let format = ReportFormat::breseq_0_27();
/// assert_eq!(format.version_marker(), "breseq version 0.27");
/// assert!(format.matches_version("0.27.1"));
/// assert!(format.matches_version("0.27.*"));
/// assert!(!format.matches_version("0.28"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFormat {
    /// Markup flavor of the document (only `html` is understood).
    #[serde(default = "default_file_type")]
    pub file_type: String,
    /// Application that produced the report.
    pub application: String,
    /// `major.minor` version of the application.
    pub version: String,
    /// Literal header cells of the data table, in order.
    pub headers: Vec<String>,
}

fn default_file_type() -> String {
    "html".to_string()
}

impl ReportFormat {
    /// Creates an HTML report format.
    pub fn new(
        application: impl Into<String>,
        version: impl Into<String>,
        headers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            file_type: default_file_type(),
            application: application.into(),
            version: version.into(),
            headers: headers.into_iter().map(Into::into).collect(),
        }
    }

    /// The breseq 0.27 HTML mutation prediction report.
    pub fn breseq_0_27() -> Self {
        Self::new(BRESEQ, BRESEQ_VERSION_0_27, BRESEQ_0_27_HEADERS)
    }

    /// Text a version table cell must start with, after whitespace
    /// normalization.
    pub fn version_marker(&self) -> String {
        format!("{} version {}", self.application, self.version)
    }

    /// Returns `true` when `requested` names this format's `major.minor`
    /// version.
    ///
    /// Accepts `major.minor`, `major.minor.patch`, and `major.minor.*`.
    pub fn matches_version(&self, requested: &str) -> bool {
        major_minor(requested) == Some(self.version.as_str())
    }

    /// Returns `true` when this format was produced by `application` in the
    /// `file_type` markup flavor. Comparison is case-insensitive.
    pub fn matches_source(&self, file_type: &str, application: &str) -> bool {
        self.file_type.eq_ignore_ascii_case(file_type)
            && self.application.eq_ignore_ascii_case(application)
    }
}

/// Returns the `major.minor` prefix of a dotted version string.
///
/// # Examples
///
/// ```
/// use gene_core::major_minor;
///
/// assert_eq!(major_minor("0.27.1"), Some("0.27"));
/// assert_eq!(major_minor("0.27.*"), Some("0.27"));
/// assert_eq!(major_minor("0.27"), Some("0.27"));
/// assert_eq!(major_minor("0"), None);
/// assert_eq!(major_minor("a.b"), None);
/// ```
pub fn major_minor(version: &str) -> Option<&str> {
    let version = version.trim();
    let mut parts = version.splitn(3, '.');
    let major = parts.next()?;
    let minor = parts.next()?;
    let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !numeric(major) || !numeric(minor) {
        return None;
    }
    Some(&version[..major.len() + 1 + minor.len()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breseq_headers_are_eight_columns() {
        let format = ReportFormat::breseq_0_27();
        assert_eq!(format.headers.len(), 8);
        assert_eq!(format.headers[1], "seq\u{a0}id");
        assert_eq!(format.file_type, "html");
    }

    #[test]
    fn test_matches_source_ignores_case() {
        let format = ReportFormat::breseq_0_27();
        assert!(format.matches_source("HTML", "Breseq"));
        assert!(!format.matches_source("pdf", "breseq"));
        assert!(!format.matches_source("html", "gatk"));
    }

    #[test]
    fn test_matches_version_rejects_other_minor() {
        let format = ReportFormat::breseq_0_27();
        assert!(format.matches_version("0.27"));
        assert!(!format.matches_version("0.2"));
        assert!(!format.matches_version("0.270"));
        assert!(!format.matches_version("1.27"));
        assert!(!format.matches_version(""));
    }

    #[test]
    fn test_deserialize_defaults_file_type() {
        let json = r#"{"application":"breseq","version":"0.27","headers":["a","b"]}"#;
        let format: ReportFormat = serde_json::from_str(json).unwrap();
        assert_eq!(format.file_type, "html");
        assert_eq!(format.headers, vec!["a", "b"]);
    }
}

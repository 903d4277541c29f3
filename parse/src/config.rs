//! Registry of supported report formats.
//!
//! Only the breseq 0.27 layout ships, but the registry can be loaded from a
//! YAML file so further layouts can be described without code changes.
//!
//! # Example YAML
//!
//! ```yaml
//! formats:
//!   - file_type: html
//!     application: breseq
//!     version: "0.27"
//!     headers:
//!       - evidence
//!       - "seq\u00a0id"
//!       - position
//!       - mutation
//!       - freq
//!       - annotation
//!       - gene
//!       - description
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use gene_core::{ReportFormat, validate_formats};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// The set of report formats a parse may be run against.
///
/// # Examples
///
/// ```
/// use gene_parse::config::FormatRegistry;
///
/// let registry = FormatRegistry::builtin();
/// let format = registry.select("html", "breseq", "0.27.*").unwrap();
/// assert_eq!(format.version, "0.27");
/// assert!(registry.select("html", "breseq", "0.28.0").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatRegistry {
    pub formats: Vec<ReportFormat>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FormatRegistry {
    /// Registry holding only the shipped breseq 0.27 format.
    pub fn builtin() -> Self {
        Self {
            formats: vec![ReportFormat::breseq_0_27()],
        }
    }

    /// Loads and validates a registry from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be read,
    /// [`YamlError`](ConfigError::YamlError) if parsing fails, or
    /// [`InvalidFormat`](ConfigError::InvalidFormat) for the first unusable
    /// entry.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let registry: Self = serde_yaml::from_reader(reader)?;
        registry.validate()?;
        debug!(formats = registry.formats.len(), "loaded report formats");
        Ok(registry)
    }

    /// Saves the registry as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match validate_formats(&self.formats).into_iter().next() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Resolves a requested file type, application, and version.
    ///
    /// `version` may be `major.minor`, `major.minor.patch`, or
    /// `major.minor.*`. File type and application compare case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](ConfigError::UnsupportedFormat) when no
    /// registered format matches.
    pub fn select(
        &self,
        file_type: &str,
        application: &str,
        version: &str,
    ) -> Result<&ReportFormat, ConfigError> {
        let found = self.formats.iter().find(|format| {
            format.matches_source(file_type, application) && format.matches_version(version)
        });
        found.ok_or_else(|| ConfigError::UnsupportedFormat {
            file_type: file_type.to_string(),
            application: application.to_string(),
            version: version.to_string(),
        })
    }
}

//! Sequence annotation record definitions.
//!
//! This module defines the canonical output entity produced from report
//! tables. The type is designed for serialization with [`serde`] and can
//! round-trip through JSON, CSV, and other storage backends.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single mutation of a specific nucleotide sequence.
///
/// One record is produced for every data row of a recognized report table.
/// A typical row from a breseq 0.27 mutation prediction report looks like:
///
/// ```text
/// seq_id    | position | mutation | freq | annotation            | gene     | description
/// NC_012345 | 12,345   | +G       | 100% | intergenic (-123/+12) | ABC01234 | lipoprotein
/// NC_012345 | 65,431   | +A       | 6.0% | V12A (GTG→GGG)        | ABC05678 | hypothetical protein
/// ```
///
/// Every field is kept as text exactly as the report renders it; positions
/// keep their thousands separators and frequencies keep their `%` suffix.
///
/// # Examples
///
/// ```
/// use gene_core::SequenceAnnotation;
///
/// let record = SequenceAnnotation::new("breseq", "0.27");
/// assert_eq!(record.application, "breseq");
/// assert_eq!(record.app_version, "0.27");
/// assert!(record.generation.is_empty());
/// assert!(record.unique_id.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceAnnotation {
    /// Identifier that uniquely names this annotation. Assigned by the
    /// caller, never by table conversion.
    #[serde(default)]
    pub unique_id: String,
    /// Identifier of the reference sequence carrying the mutation.
    pub sequence_id: String,
    /// Position of the mutation in the reference sequence.
    pub position: String,
    /// Groups annotations by generation and separates annotations that share
    /// a sequence id and position. Populated downstream.
    #[serde(default)]
    pub generation: String,
    /// Name of the application that produced the report.
    pub application: String,
    /// Version of the application that produced the report.
    pub app_version: String,
    /// How nucleotides were added, substituted, or deleted.
    pub mutation: String,
    /// Percentage of reads showing this mutation.
    pub frequency: String,
    /// Detailed description of the mutation.
    pub annotation: String,
    /// Space-delimited list of affected genes.
    pub gene: String,
    /// Qualitative description of the affected genes.
    pub description: String,
}

impl SequenceAnnotation {
    /// Creates an empty record stamped with the producing application.
    pub fn new(application: impl Into<String>, app_version: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            app_version: app_version.into(),
            ..Default::default()
        }
    }

    /// Sets the generation label.
    ///
    /// # Examples
    ///
    /// ```
    /// use gene_core::SequenceAnnotation;
    ///
    /// let record = SequenceAnnotation::new("breseq", "0.27").with_generation("g42");
    /// assert_eq!(record.generation, "g42");
    /// ```
    pub fn with_generation(mut self, generation: impl Into<String>) -> Self {
        self.generation = generation.into();
        self
    }

    /// Derives a stable identifier from the fields that describe the
    /// mutation itself.
    ///
    /// The digest covers application, version, sequence id, position,
    /// mutation, annotation, and gene, so the same mutation reported twice
    /// yields the same identifier while [`generation`](Self::generation)
    /// and [`unique_id`](Self::unique_id) do not participate.
    ///
    /// # Examples
    ///
    /// ```
    /// use gene_core::SequenceAnnotation;
    ///
    /// let mut a = SequenceAnnotation::new("breseq", "0.27");
    /// a.sequence_id = "NC_012345".into();
    /// a.position = "12,345".into();
    ///
    /// let b = a.clone().with_generation("later");
    /// assert_eq!(a.fingerprint(), b.fingerprint());
    /// assert_eq!(a.fingerprint().len(), 64);
    /// ```
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for field in [
            &self.application,
            &self.app_version,
            &self.sequence_id,
            &self.position,
            &self.mutation,
            &self.annotation,
            &self.gene,
        ] {
            hasher.update(field.as_bytes());
            // Field separator keeps ("ab", "c") distinct from ("a", "bc").
            hasher.update([0x1f]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// Stores [`fingerprint`](Self::fingerprint) into `unique_id`.
    pub fn assign_unique_id(&mut self) {
        self.unique_id = self.fingerprint();
    }
}

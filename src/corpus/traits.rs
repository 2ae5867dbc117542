//! Corpus storage trait definitions

use crate::analysis::{Dimension, LabelDistribution};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One raw text item awaiting or having received analysis.
///
/// Owned by the harvesting collaborator; immutable once created and
/// read-only to the analysis core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    /// Stable identifier assigned by the harvester.
    pub id: String,
    pub text: String,
    /// Creation time, epoch seconds.
    pub created_at: i64,
}

impl RawItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            created_at,
        }
    }
}

/// The persisted analysis output for one item, keyed by item id.
///
/// At most one record exists per item; it is written only after all
/// dimensions scored successfully, and not mutated afterwards (a manual
/// re-trigger overwrites it wholesale via upsert).
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    pub item_id: String,
    pub clean_text: String,
    pub lemma_text: String,
    pub char_count: usize,
    pub word_count: usize,
    pub raw_sentiment: LabelDistribution,
    pub raw_emotion: LabelDistribution,
    pub raw_risk: LabelDistribution,
    pub normalized_sentiment: LabelDistribution,
    pub normalized_emotion: LabelDistribution,
    pub normalized_risk: LabelDistribution,
    pub top_sentiment: String,
    pub top_emotion: String,
    pub top_risk: String,
    /// Copied from the item.
    pub created_at: i64,
    /// Wall-clock at analysis time, epoch seconds.
    pub analyzed_at: i64,
}

impl AnalysisRecord {
    /// The raw distribution for a dimension.
    pub fn raw(&self, dimension: Dimension) -> &LabelDistribution {
        match dimension {
            Dimension::Sentiment => &self.raw_sentiment,
            Dimension::Emotion => &self.raw_emotion,
            Dimension::Risk => &self.raw_risk,
        }
    }

    /// The length-normalized distribution for a dimension.
    pub fn normalized(&self, dimension: Dimension) -> &LabelDistribution {
        match dimension {
            Dimension::Sentiment => &self.normalized_sentiment,
            Dimension::Emotion => &self.normalized_emotion,
            Dimension::Risk => &self.normalized_risk,
        }
    }

    /// The winning label for a dimension.
    pub fn top(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Sentiment => &self.top_sentiment,
            Dimension::Emotion => &self.top_emotion,
            Dimension::Risk => &self.top_risk,
        }
    }
}

/// Trait for corpus storage backends
///
/// Implementations must be thread-safe (Send + Sync). The analysis core
/// reads items and writes records; item rows themselves are written by
/// the harvesting collaborator (and by tests).
pub trait CorpusStore: Send + Sync {
    // === Item Operations ===

    /// Insert a raw item (harvester-side write).
    fn insert_item(&self, item: &RawItem) -> StorageResult<()>;

    /// Total number of items.
    fn count_items(&self) -> StorageResult<u64>;

    // === Analysis Operations ===

    /// Number of items with no analysis record.
    fn count_unanalyzed(&self) -> StorageResult<u64>;

    /// One page of items lacking a record, most recent first.
    ///
    /// Implemented as an anti-join against the records table, so an item
    /// drops out of this query the moment its record commits.
    fn fetch_unanalyzed_page(&self, limit: u32, offset: u64) -> StorageResult<Vec<RawItem>>;

    /// Upsert a page of records inside a single transaction.
    ///
    /// All-or-nothing: if the commit fails no record from the page is
    /// durably written and every item in it remains unanalyzed.
    fn commit_page(&self, records: &[AnalysisRecord]) -> StorageResult<()>;

    /// Total number of analysis records.
    fn count_records(&self) -> StorageResult<u64>;

    /// Load the record for an item, if one exists.
    fn record_for(&self, item_id: &str) -> StorageResult<Option<AnalysisRecord>>;

    // === Summary Operations ===

    /// How many records carry each winning label, for one dimension.
    fn label_counts(&self, dimension: Dimension) -> StorageResult<Vec<(String, u64)>>;

    /// Per-label mean of the raw distributions across all records.
    fn mean_distribution(&self, dimension: Dimension) -> StorageResult<LabelDistribution>;

    /// The highest-scoring clean texts for one label, best first.
    fn top_examples(
        &self,
        dimension: Dimension,
        label: &str,
        limit: u32,
    ) -> StorageResult<Vec<(String, f64)>>;
}

/// Extension trait for opening stores from paths
pub trait OpenCorpus: CorpusStore + Sized {
    /// Open or create a corpus at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory corpus (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}

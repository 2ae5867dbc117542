//! Undertone: incremental multi-dimensional text analysis
//!
//! An engine that enriches a growing corpus of short social-media texts
//! with sentiment, emotion, and category-risk classification, producing
//! raw and length-normalized distributions plus a winning label per
//! dimension.
//!
//! # Core Concepts
//!
//! - **Normalization**: raw text → clean form + lemma form + size metrics
//! - **Scoring**: pluggable per-dimension scorers behind one trait
//! - **Aggregation**: length normalization and deterministic top-label
//!   selection
//! - **Backfill**: a crash-tolerant, idempotent page loop that analyzes
//!   only items without a record
//!
//! # Example
//!
//! ```
//! use undertone::{AnalysisPipeline, Dimension};
//!
//! let pipeline = AnalysisPipeline::standard();
//! let analysis = pipeline.analyze_text("I love this!").unwrap();
//! assert_eq!(analysis.top_label(Dimension::Sentiment), "positive");
//! ```

pub mod analysis;
pub mod backfill;
pub mod corpus;
pub mod text;

pub use analysis::{
    AnalysisPipeline, Dimension, ItemOutcome, LabelDistribution, ScoreError, ScoreProvider,
    ScoreResult, ScorerRegistry, TextAnalysis,
};
pub use backfill::{Backfill, BackfillConfig, BackfillError, BackfillReport, ItemFailure};
pub use corpus::{
    AnalysisRecord, CorpusStore, OpenCorpus, RawItem, SqliteCorpus, StorageError, StorageResult,
};
pub use text::{CleanedText, TextNormalizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

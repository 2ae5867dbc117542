//! Multi-dimensional scoring pipeline
//!
//! This module turns cleaned text into per-dimension label distributions
//! and aggregates them into the final analysis for one item.
//!
//! # Architecture
//!
//! - **ScoreProvider trait**: one scorer per dimension, mapping cleaned
//!   text to a label→score distribution
//! - **ScorerRegistry**: the set of scorers a pipeline runs, iterated
//!   generically (nothing hardcodes the dimension count)
//! - **ScoreAggregator**: length-normalizes distributions and picks the
//!   winning label per dimension
//! - **AnalysisPipeline**: normalize → score → aggregate for one item,
//!   with all-or-nothing failure semantics
//!
//! # Built-in scorers
//!
//! - **SentimentModel**: linear classification head with softmax output
//!   (sentiment dimension)
//! - **EmotionLexicon**: keyword counting tilted by text polarity
//!   (emotion dimension)
//! - **RiskLexicon**: keyword counting amplified by negativity
//!   (risk dimension)
//!
//! All scorers share one [`ValenceLexicon`] polarity signal, built once
//! at process start.
//!
//! # Example
//!
//! ```
//! use undertone::analysis::{AnalysisPipeline, Dimension};
//!
//! let pipeline = AnalysisPipeline::standard();
//! let analysis = pipeline.analyze_text("what a great day").unwrap();
//! assert_eq!(analysis.top_label(Dimension::Sentiment), "positive");
//! ```

mod aggregate;
mod pipeline;
pub mod scorers;
mod traits;
mod types;
mod valence;

pub use aggregate::{AggregateResult, ScoreAggregator};
pub use pipeline::{AnalysisPipeline, ItemOutcome, ScorerFailure, TextAnalysis};
pub use traits::{ScoreProvider, ScorerRegistry};
pub use types::{
    Dimension, DimensionScores, LabelDistribution, ScoreError, ScoreResult, UNKNOWN_LABEL,
};
pub use valence::{Valence, ValenceLexicon};

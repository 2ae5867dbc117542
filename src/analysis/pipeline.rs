//! Per-item analysis pipeline
//!
//! Drives one text through normalize → score (every registered
//! dimension) → aggregate, producing either a complete analysis or a
//! structured failure. Persistence is all-or-nothing per item: a record
//! is built only when every dimension scored successfully.

use super::aggregate::{AggregateResult, ScoreAggregator};
use super::scorers::standard_registry;
use super::traits::ScorerRegistry;
use super::types::{Dimension, DimensionScores, ScoreError};
use crate::corpus::{AnalysisRecord, RawItem};
use crate::text::{CleanedText, TextNormalizer};
use serde_json::json;

/// One scorer's failure on one text, attributed to its dimension.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{dimension} scorer failed: {error}")]
pub struct ScorerFailure {
    pub dimension: Dimension,
    #[source]
    pub error: ScoreError,
}

/// Outcome of analyzing one corpus item.
///
/// The orchestrator collects these instead of catching exceptions:
/// failures carry their cause, skips stay visible, and only `Analyzed`
/// produces a staged record.
#[derive(Debug)]
pub enum ItemOutcome {
    /// All dimensions scored; the record is ready to stage.
    Analyzed(Box<AnalysisRecord>),
    /// Cleaning left no words to score. No record: empty text carries no
    /// signal, and the item intentionally stays unanalyzed.
    SkippedEmpty,
    /// A scorer failed; nothing persisted for this item.
    Failed(ScorerFailure),
}

/// Full analysis of one text, before any item bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct TextAnalysis {
    pub cleaned: CleanedText,
    /// Raw distribution per dimension, in scorer registration order.
    pub raw: DimensionScores,
    pub aggregate: AggregateResult,
}

impl TextAnalysis {
    pub fn top_label(&self, dimension: Dimension) -> &str {
        self.aggregate.top_label(dimension)
    }

    /// Attach item identity and timestamps to produce the persistable
    /// record.
    fn into_record(self, item: &RawItem, analyzed_at: i64) -> AnalysisRecord {
        let dist = |scores: &DimensionScores, d| scores.get(d).cloned().unwrap_or_default();

        AnalysisRecord {
            item_id: item.id.clone(),
            top_sentiment: self.top_label(Dimension::Sentiment).to_string(),
            top_emotion: self.top_label(Dimension::Emotion).to_string(),
            top_risk: self.top_label(Dimension::Risk).to_string(),
            raw_sentiment: dist(&self.raw, Dimension::Sentiment),
            raw_emotion: dist(&self.raw, Dimension::Emotion),
            raw_risk: dist(&self.raw, Dimension::Risk),
            normalized_sentiment: dist(&self.aggregate.normalized, Dimension::Sentiment),
            normalized_emotion: dist(&self.aggregate.normalized, Dimension::Emotion),
            normalized_risk: dist(&self.aggregate.normalized, Dimension::Risk),
            clean_text: self.cleaned.clean,
            lemma_text: self.cleaned.lemma,
            char_count: self.cleaned.char_count,
            word_count: self.cleaned.word_count,
            created_at: item.created_at,
            analyzed_at,
        }
    }

    /// JSON view for ad-hoc output (the CLI's `analyze` command).
    pub fn to_json(&self) -> serde_json::Value {
        let mut out = serde_json::Map::new();
        out.insert("cleaned".into(), json!(self.cleaned));
        for dimension in Dimension::ALL {
            let raw = self.raw.get(dimension).cloned().unwrap_or_default();
            let normalized = self
                .aggregate
                .normalized
                .get(dimension)
                .cloned()
                .unwrap_or_default();
            out.insert(dimension.to_string(), json!(raw));
            out.insert(format!("normalized_{}", dimension), json!(normalized));
            out.insert(
                format!("top_{}", dimension),
                json!(self.top_label(dimension)),
            );
        }
        serde_json::Value::Object(out)
    }
}

/// The per-item pipeline: one normalizer, one scorer registry, one
/// aggregator, all built once and shared read-only across a run.
pub struct AnalysisPipeline {
    normalizer: TextNormalizer,
    registry: ScorerRegistry,
    aggregator: ScoreAggregator,
}

impl AnalysisPipeline {
    /// Pipeline with the standard scorers.
    pub fn standard() -> Self {
        Self::with_registry(standard_registry())
    }

    /// Pipeline with a caller-provided registry.
    pub fn with_registry(registry: ScorerRegistry) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            registry,
            aggregator: ScoreAggregator::new(),
        }
    }

    pub fn registry(&self) -> &ScorerRegistry {
        &self.registry
    }

    /// Analyze one text.
    ///
    /// Empty (or empty-after-cleaning) input returns a zeroed analysis
    /// without invoking any scorer. The first scorer failure aborts the
    /// whole text; there are no partial analyses.
    pub fn analyze_text(&self, text: &str) -> Result<TextAnalysis, ScorerFailure> {
        let cleaned = self.normalizer.normalize(text);
        if cleaned.is_empty() {
            return Ok(TextAnalysis {
                cleaned,
                ..TextAnalysis::default()
            });
        }

        let mut raw = DimensionScores::new();
        for scorer in self.registry.scorers() {
            match scorer.score(&cleaned.clean) {
                Ok(dist) => raw.insert(scorer.dimension(), dist),
                Err(error) => {
                    return Err(ScorerFailure {
                        dimension: scorer.dimension(),
                        error,
                    })
                }
            }
        }

        // A record must cover every dimension; a registry gap is a
        // failure, not a half-filled analysis.
        for dimension in Dimension::ALL {
            if raw.get(dimension).is_none() {
                return Err(ScorerFailure {
                    dimension,
                    error: ScoreError::Internal("no scorer registered".to_string()),
                });
            }
        }

        let aggregate = self.aggregator.aggregate(&raw, cleaned.word_count);
        Ok(TextAnalysis {
            cleaned,
            raw,
            aggregate,
        })
    }

    /// Analyze one corpus item into a stageable outcome.
    pub fn analyze_item(&self, item: &RawItem, analyzed_at: i64) -> ItemOutcome {
        match self.analyze_text(&item.text) {
            Ok(analysis) if analysis.cleaned.is_empty() => ItemOutcome::SkippedEmpty,
            Ok(analysis) => ItemOutcome::Analyzed(Box::new(analysis.into_record(item, analyzed_at))),
            Err(failure) => ItemOutcome::Failed(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::traits::ScoreProvider;
    use crate::analysis::types::{LabelDistribution, ScoreResult};

    struct FailingScorer {
        dimension: Dimension,
    }

    impl ScoreProvider for FailingScorer {
        fn id(&self) -> &str {
            "failing"
        }
        fn dimension(&self) -> Dimension {
            self.dimension
        }
        fn labels(&self) -> &[&str] {
            &[]
        }
        fn score(&self, _text: &str) -> ScoreResult<LabelDistribution> {
            Err(ScoreError::Inference("model exploded".to_string()))
        }
    }

    fn item(text: &str) -> RawItem {
        RawItem::new("item-1", text, 1_700_000_000)
    }

    #[test]
    fn analyzed_record_is_internally_consistent() {
        let pipeline = AnalysisPipeline::standard();
        let outcome = pipeline.analyze_item(&item("I love this, it's amazing and wonderful"), 42);

        let ItemOutcome::Analyzed(record) = outcome else {
            panic!("expected analyzed outcome");
        };

        assert_eq!(record.item_id, "item-1");
        assert_eq!(record.created_at, 1_700_000_000);
        assert_eq!(record.analyzed_at, 42);
        assert_eq!(record.top_sentiment, "positive");
        assert_eq!(record.top_emotion, "joy");
        assert_eq!(record.top_risk, "none");

        // Normalization law: normalized == raw / word_count, per key.
        let wc = record.word_count as f64;
        for (label, score) in record.raw_emotion.iter() {
            let normalized = record.normalized_emotion.get(label).unwrap();
            assert!((normalized - score / wc).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_text_is_skipped_without_scoring() {
        let pipeline = AnalysisPipeline::standard();
        assert!(matches!(
            pipeline.analyze_item(&item(""), 0),
            ItemOutcome::SkippedEmpty
        ));
        assert!(matches!(
            pipeline.analyze_item(&item("   "), 0),
            ItemOutcome::SkippedEmpty
        ));
        // Emoji-only input cleans down to nothing as well.
        assert!(matches!(
            pipeline.analyze_item(&item("\u{1F600}\u{1F680}"), 0),
            ItemOutcome::SkippedEmpty
        ));
    }

    #[test]
    fn empty_text_analysis_has_no_distributions() {
        let pipeline = AnalysisPipeline::standard();
        let analysis = pipeline.analyze_text("").unwrap();
        assert!(analysis.cleaned.is_empty());
        assert!(analysis.raw.is_empty());
        assert_eq!(analysis.top_label(Dimension::Sentiment), "unknown");
    }

    #[test]
    fn scorer_failure_fails_the_item_atomically() {
        let valence = std::sync::Arc::new(crate::analysis::ValenceLexicon::new());
        let mut registry = ScorerRegistry::new();
        registry.register(crate::analysis::scorers::SentimentModel::new(valence.clone()));
        registry.register(FailingScorer {
            dimension: Dimension::Emotion,
        });
        registry.register(crate::analysis::scorers::RiskLexicon::new(valence));

        let pipeline = AnalysisPipeline::with_registry(registry);
        let outcome = pipeline.analyze_item(&item("perfectly fine text"), 0);

        let ItemOutcome::Failed(failure) = outcome else {
            panic!("expected failed outcome");
        };
        assert_eq!(failure.dimension, Dimension::Emotion);
    }

    #[test]
    fn missing_dimension_is_a_failure_not_a_partial_record() {
        let mut registry = ScorerRegistry::new();
        let valence = std::sync::Arc::new(crate::analysis::ValenceLexicon::new());
        registry.register(crate::analysis::scorers::SentimentModel::new(valence));

        let pipeline = AnalysisPipeline::with_registry(registry);
        let outcome = pipeline.analyze_item(&item("some text"), 0);
        assert!(matches!(outcome, ItemOutcome::Failed(_)));
    }

    #[test]
    fn json_view_carries_all_dimensions() {
        let pipeline = AnalysisPipeline::standard();
        let analysis = pipeline.analyze_text("a perfectly normal tuesday").unwrap();
        let value = analysis.to_json();

        for key in [
            "cleaned",
            "sentiment",
            "emotion",
            "risk",
            "normalized_sentiment",
            "normalized_emotion",
            "normalized_risk",
            "top_sentiment",
            "top_emotion",
            "top_risk",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
    }
}

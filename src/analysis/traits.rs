//! Scorer traits defining the classification interface

use super::types::{Dimension, LabelDistribution, ScoreResult};

/// Trait for per-dimension text scorers
///
/// A scorer maps cleaned text to a label→score distribution over its
/// dimension's fixed label set. Implementations are stateless per call:
/// any model weights or lexicon tables are built once at construction and
/// shared read-only afterwards.
///
/// # Example
///
/// ```ignore
/// struct CoinFlipScorer;
///
/// impl ScoreProvider for CoinFlipScorer {
///     fn id(&self) -> &str { "coin-flip" }
///     fn dimension(&self) -> Dimension { Dimension::Sentiment }
///     fn labels(&self) -> &[&str] { &["heads", "tails"] }
///
///     fn score(&self, text: &str) -> ScoreResult<LabelDistribution> {
///         Ok(LabelDistribution::from_pairs([("heads", 0.5), ("tails", 0.5)]))
///     }
/// }
/// ```
pub trait ScoreProvider: Send + Sync {
    /// Unique identifier for this scorer
    fn id(&self) -> &str;

    /// The dimension this scorer populates
    fn dimension(&self) -> Dimension;

    /// The fixed label set, in the order the scorer emits it
    ///
    /// This order is the tie-break order for top-label selection.
    fn labels(&self) -> &[&str];

    /// Score the text.
    ///
    /// Returned scores are non-negative and sum to 1 (modulo floating
    /// error). Callers pass the *clean* form of the text, never raw input.
    fn score(&self, text: &str) -> ScoreResult<LabelDistribution>;
}

/// Registry of available scorers
///
/// The pipeline iterates the registry generically; nothing downstream
/// hardcodes the number of dimensions or a call site per scorer.
pub struct ScorerRegistry {
    scorers: Vec<Box<dyn ScoreProvider>>,
}

impl Default for ScorerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScorerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            scorers: Vec::new(),
        }
    }

    /// Register a scorer. Registration order is the order the pipeline
    /// runs scorers in.
    pub fn register<S: ScoreProvider + 'static>(&mut self, scorer: S) {
        self.scorers.push(Box::new(scorer));
    }

    /// All registered scorers, in registration order
    pub fn scorers(&self) -> impl Iterator<Item = &dyn ScoreProvider> {
        self.scorers.iter().map(|s| s.as_ref())
    }

    /// The scorer registered for a dimension, if any
    pub fn for_dimension(&self, dimension: Dimension) -> Option<&dyn ScoreProvider> {
        self.scorers()
            .find(|s| s.dimension() == dimension)
    }

    /// Number of registered scorers
    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScorer {
        id: &'static str,
        dimension: Dimension,
    }

    impl ScoreProvider for FixedScorer {
        fn id(&self) -> &str {
            self.id
        }
        fn dimension(&self) -> Dimension {
            self.dimension
        }
        fn labels(&self) -> &[&str] {
            &["a", "b"]
        }
        fn score(&self, _text: &str) -> ScoreResult<LabelDistribution> {
            Ok(LabelDistribution::from_pairs([("a", 1.0), ("b", 0.0)]))
        }
    }

    #[test]
    fn registry_preserves_registration_order() {
        let mut registry = ScorerRegistry::new();
        registry.register(FixedScorer {
            id: "first",
            dimension: Dimension::Sentiment,
        });
        registry.register(FixedScorer {
            id: "second",
            dimension: Dimension::Emotion,
        });

        let ids: Vec<&str> = registry.scorers().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn registry_dimension_lookup() {
        let mut registry = ScorerRegistry::new();
        registry.register(FixedScorer {
            id: "emotion",
            dimension: Dimension::Emotion,
        });

        assert!(registry.for_dimension(Dimension::Emotion).is_some());
        assert!(registry.for_dimension(Dimension::Risk).is_none());
    }
}

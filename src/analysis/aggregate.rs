//! Score aggregation: length normalization and top-label selection

use super::types::{Dimension, DimensionScores, LabelDistribution, UNKNOWN_LABEL};

/// Aggregated view over one item's raw distributions.
#[derive(Debug, Clone, Default)]
pub struct AggregateResult {
    /// Length-normalized distributions, one per scored dimension. Empty
    /// distributions when the word count was zero.
    pub normalized: DimensionScores,
    /// Winning label per scored dimension.
    top: Vec<(Dimension, String)>,
}

impl AggregateResult {
    /// The winning label for a dimension. [`UNKNOWN_LABEL`] when the
    /// dimension was not scored.
    pub fn top_label(&self, dimension: Dimension) -> &str {
        self.top
            .iter()
            .find(|(d, _)| *d == dimension)
            .map(|(_, label)| label.as_str())
            .unwrap_or(UNKNOWN_LABEL)
    }

    pub fn top_labels(&self) -> impl Iterator<Item = (Dimension, &str)> {
        self.top.iter().map(|(d, l)| (*d, l.as_str()))
    }
}

/// Combines per-dimension raw scores into normalized distributions and
/// winning labels.
pub struct ScoreAggregator;

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate raw distributions.
    ///
    /// Normalization divides every score by the word count. With a zero
    /// word count the normalized distribution is left empty rather than
    /// computed — that case is filtered upstream (empty text never
    /// reaches scoring), but the guard stands on its own.
    ///
    /// Top-label selection is argmax with first-entry-wins tie-break
    /// (see [`LabelDistribution::top`]); an empty distribution yields
    /// [`UNKNOWN_LABEL`].
    pub fn aggregate(&self, raw: &DimensionScores, word_count: usize) -> AggregateResult {
        let mut normalized = DimensionScores::new();
        let mut top = Vec::with_capacity(raw.len());

        for (dimension, dist) in raw.iter() {
            let scaled = if word_count > 0 {
                dist.scaled(1.0 / word_count as f64)
            } else {
                LabelDistribution::new()
            };
            normalized.insert(dimension, scaled);

            let label = dist
                .top()
                .map(|(label, _)| label.to_string())
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
            top.push((dimension, label));
        }

        AggregateResult { normalized, top }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with(dimension: Dimension, dist: LabelDistribution) -> DimensionScores {
        let mut scores = DimensionScores::new();
        scores.insert(dimension, dist);
        scores
    }

    #[test]
    fn normalization_divides_by_word_count() {
        let raw = raw_with(
            Dimension::Sentiment,
            LabelDistribution::from_pairs([("positive", 0.8), ("negative", 0.2)]),
        );
        let result = ScoreAggregator::new().aggregate(&raw, 4);

        let normalized = result.normalized.get(Dimension::Sentiment).unwrap();
        assert_eq!(normalized.get("positive"), Some(0.2));
        assert_eq!(normalized.get("negative"), Some(0.05));
    }

    #[test]
    fn zero_word_count_leaves_normalized_empty() {
        let raw = raw_with(
            Dimension::Emotion,
            LabelDistribution::from_pairs([("joy", 1.0)]),
        );
        let result = ScoreAggregator::new().aggregate(&raw, 0);

        assert!(result.normalized.get(Dimension::Emotion).unwrap().is_empty());
        // Top selection still works on the raw distribution.
        assert_eq!(result.top_label(Dimension::Emotion), "joy");
    }

    #[test]
    fn tie_break_follows_insertion_order() {
        let first = raw_with(
            Dimension::Risk,
            LabelDistribution::from_pairs([("a", 0.5), ("b", 0.5)]),
        );
        let result = ScoreAggregator::new().aggregate(&first, 1);
        assert_eq!(result.top_label(Dimension::Risk), "a");

        let reversed = raw_with(
            Dimension::Risk,
            LabelDistribution::from_pairs([("b", 0.5), ("a", 0.5)]),
        );
        let result = ScoreAggregator::new().aggregate(&reversed, 1);
        assert_eq!(result.top_label(Dimension::Risk), "b");
    }

    #[test]
    fn empty_distribution_yields_unknown() {
        let raw = raw_with(Dimension::Sentiment, LabelDistribution::new());
        let result = ScoreAggregator::new().aggregate(&raw, 3);
        assert_eq!(result.top_label(Dimension::Sentiment), UNKNOWN_LABEL);
    }

    #[test]
    fn unscored_dimension_yields_unknown() {
        let raw = DimensionScores::new();
        let result = ScoreAggregator::new().aggregate(&raw, 3);
        assert_eq!(result.top_label(Dimension::Emotion), UNKNOWN_LABEL);
    }
}

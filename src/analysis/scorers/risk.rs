//! Lexicon-based category-risk scorer

use super::KeywordSet;
use crate::analysis::traits::ScoreProvider;
use crate::analysis::types::{Dimension, LabelDistribution, ScoreResult};
use crate::analysis::valence::ValenceLexicon;
use std::sync::Arc;

/// Below this total adjusted mass the text counts as clean and the full
/// weight goes to `none`.
const MIN_DETECTED: f64 = 0.5;

const LABELS: [&str; 4] = ["hateful", "offensive", "targeted", "none"];

const HATEFUL: usize = 0;
const OFFENSIVE: usize = 1;
const TARGETED: usize = 2;
const NONE: usize = 3;

/// Keyword lists per category, aligned with [`LABELS`].
const KEYWORDS: [&[&str]; 4] = [
    &["hate", "despise", "loathe", "detest", "abhor"],
    &["offensive", "insult", "rude", "vulgar", "crude", "profane"],
    &["racist", "sexist", "bigot", "discriminate", "prejudice"],
    &["respectful", "polite", "civil", "friendly", "kind", "nice"],
];

/// Risk scorer: keyword counts amplified by the text's negativity.
///
/// The three risk categories scale with `1 + negative`; `none` scales
/// with `1 + positive` and additionally earns the text's non-negativity
/// (`1 - negative`), so clean text carries mass even with zero keyword
/// hits. If the total adjusted mass stays below [`MIN_DETECTED`], nothing
/// was detected and `none` is forced to 1.
pub struct RiskLexicon {
    valence: Arc<ValenceLexicon>,
    keywords: Vec<KeywordSet>,
}

impl RiskLexicon {
    pub fn new(valence: Arc<ValenceLexicon>) -> Self {
        Self {
            valence,
            keywords: KEYWORDS.iter().map(|list| KeywordSet::new(list)).collect(),
        }
    }
}

impl ScoreProvider for RiskLexicon {
    fn id(&self) -> &str {
        "risk-lexicon"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Risk
    }

    fn labels(&self) -> &[&str] {
        &LABELS
    }

    fn score(&self, text: &str) -> ScoreResult<LabelDistribution> {
        let mut counts = [0.0f64; 4];
        for (count, set) in counts.iter_mut().zip(self.keywords.iter()) {
            *count = set.hits(text) as f64;
        }

        let v = self.valence.assess(text);
        for idx in [HATEFUL, OFFENSIVE, TARGETED] {
            counts[idx] *= 1.0 + v.negative;
        }
        counts[NONE] = counts[NONE] * (1.0 + v.positive) + (1.0 - v.negative);

        if counts.iter().sum::<f64>() < MIN_DETECTED {
            counts[NONE] = 1.0;
        }

        let total = counts.iter().sum::<f64>();
        let total = if total == 0.0 { 1.0 } else { total };

        Ok(LabelDistribution::from_pairs(
            LABELS.iter().copied().zip(counts.map(|c| c / total)),
        ))
    }
}

//! Lexicon-based emotion scorer

use super::KeywordSet;
use crate::analysis::traits::ScoreProvider;
use crate::analysis::types::{Dimension, LabelDistribution, ScoreResult};
use crate::analysis::valence::ValenceLexicon;
use std::sync::Arc;

/// Damping applied to categories that run against the text's polarity.
const DAMPING: f64 = 0.8;

const LABELS: [&str; 6] = ["joy", "sadness", "anger", "fear", "surprise", "other"];

const JOY: usize = 0;
const SADNESS: usize = 1;
const ANGER: usize = 2;
const FEAR: usize = 3;
const OTHER: usize = 5;

/// Keyword lists per category, aligned with [`LABELS`].
const KEYWORDS: [&[&str]; 6] = [
    &[
        "happy", "joy", "delighted", "thrilled", "excited", "glad", "pleased", "satisfied",
        "great", "amazing", "awesome", "excellent", "love", "wonderful", "fantastic",
    ],
    &[
        "sad", "unhappy", "depressed", "miserable", "gloomy", "disappointed", "upset",
        "distressed", "sorry", "regret", "grief", "heartbroken", "lonely", "tragic", "cry",
    ],
    &[
        "angry", "mad", "furious", "outraged", "irritated", "annoyed", "frustrated", "rage",
        "hate", "hostile", "bitter", "resentful", "infuriated", "threatened", "offensive",
    ],
    &[
        "afraid", "scared", "frightened", "terrified", "nervous", "anxious", "worried",
        "panic", "horror", "shock", "alarmed", "dread", "terror", "apprehensive", "concern",
    ],
    &[
        "surprised", "amazed", "astonished", "shocked", "stunned", "startled", "unexpected",
        "wow", "incredible", "unbelievable", "remarkable", "extraordinary", "strange",
    ],
    &[
        "neutral", "calm", "balanced", "okay", "fine", "normal", "standard", "regular",
        "typical", "common", "usual", "routine", "everyday",
    ],
];

/// Emotion scorer: whole-word keyword counts per category, tilted by the
/// text's overall polarity.
///
/// Positive text boosts joy (floored to 1 before scaling by
/// `1 + positive`) and damps the negative emotions; negative text does
/// the symmetric thing for sadness/anger/fear; neutral text boosts the
/// catch-all. Counts are then rescaled to sum to 1.
pub struct EmotionLexicon {
    valence: Arc<ValenceLexicon>,
    keywords: Vec<KeywordSet>,
}

impl EmotionLexicon {
    pub fn new(valence: Arc<ValenceLexicon>) -> Self {
        Self {
            valence,
            keywords: KEYWORDS.iter().map(|list| KeywordSet::new(list)).collect(),
        }
    }
}

impl ScoreProvider for EmotionLexicon {
    fn id(&self) -> &str {
        "emotion-lexicon"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Emotion
    }

    fn labels(&self) -> &[&str] {
        &LABELS
    }

    fn score(&self, text: &str) -> ScoreResult<LabelDistribution> {
        let mut counts = [0.0f64; 6];
        for (count, set) in counts.iter_mut().zip(self.keywords.iter()) {
            *count = set.hits(text) as f64;
        }

        let v = self.valence.assess(text);
        if v.is_positive() {
            counts[JOY] = counts[JOY].max(1.0) * (1.0 + v.positive);
            for idx in [SADNESS, ANGER, FEAR] {
                counts[idx] *= DAMPING;
            }
        } else if v.is_negative() {
            for idx in [SADNESS, ANGER, FEAR] {
                counts[idx] = counts[idx].max(1.0) * (1.0 + v.negative);
            }
            counts[JOY] *= DAMPING;
        } else {
            counts[OTHER] = counts[OTHER].max(1.0) * (1.0 + v.neutral);
        }

        // Zero total cannot arise (every branch floors a category to at
        // least 1), but the guard keeps the division safe regardless.
        let total = counts.iter().sum::<f64>();
        let total = if total == 0.0 { 1.0 } else { total };

        Ok(LabelDistribution::from_pairs(
            LABELS.iter().copied().zip(counts.map(|c| c / total)),
        ))
    }
}

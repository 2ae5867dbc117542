//! Model-backed sentiment scorer
//!
//! A compact linear classification head over polarity features, with a
//! softmax output layer. Labels follow the class-index order of the
//! conventional three-way social-media sentiment models:
//! 0 = negative, 1 = neutral, 2 = positive.

use crate::analysis::traits::ScoreProvider;
use crate::analysis::types::{Dimension, LabelDistribution, ScoreError, ScoreResult};
use crate::analysis::valence::ValenceLexicon;
use std::sync::Arc;

/// Maximum input the model scores; longer text is truncated, never rejected.
const MAX_INPUT_CHARS: usize = 512;

/// Class labels in index order. The output distribution is built in this
/// order, so index order is also the tie-break order.
const LABELS: [&str; 3] = ["negative", "neutral", "positive"];

/// Feature order: [compound, positive, negative, neutral].
const WEIGHTS: [[f64; 4]; 3] = [
    [-3.2, -1.5, 4.0, -0.4], // negative
    [0.0, -2.0, -2.0, 2.5],  // neutral
    [3.2, 4.0, -1.5, -0.4],  // positive
];
const BIAS: [f64; 3] = [-0.3, 0.2, -0.3];

/// Linear sentiment classifier over the shared valence signal.
pub struct SentimentModel {
    valence: Arc<ValenceLexicon>,
}

impl SentimentModel {
    pub fn new(valence: Arc<ValenceLexicon>) -> Self {
        Self { valence }
    }

    /// Truncate to the model window on a character boundary.
    fn truncate(text: &str) -> &str {
        match text.char_indices().nth(MAX_INPUT_CHARS) {
            Some((idx, _)) => &text[..idx],
            None => text,
        }
    }

    fn logits(&self, text: &str) -> [f64; 3] {
        let v = self.valence.assess(text);
        let features = [v.compound, v.positive, v.negative, v.neutral];

        let mut logits = [0.0; 3];
        for (i, weights) in WEIGHTS.iter().enumerate() {
            logits[i] = weights
                .iter()
                .zip(features.iter())
                .map(|(w, x)| w * x)
                .sum::<f64>()
                + BIAS[i];
        }
        logits
    }
}

impl ScoreProvider for SentimentModel {
    fn id(&self) -> &str {
        "sentiment-linear"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Sentiment
    }

    fn labels(&self) -> &[&str] {
        &LABELS
    }

    fn score(&self, text: &str) -> ScoreResult<LabelDistribution> {
        let logits = self.logits(Self::truncate(text));

        if logits.iter().any(|l| !l.is_finite()) {
            return Err(ScoreError::Inference(format!(
                "non-finite logits: {:?}",
                logits
            )));
        }

        Ok(LabelDistribution::from_pairs(
            LABELS.iter().copied().zip(softmax(logits)),
        ))
    }
}

/// Numerically stable softmax.
fn softmax(logits: [f64; 3]) -> [f64; 3] {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps = logits.map(|l| (l - max).exp());
    let total: f64 = exps.iter().sum();
    exps.map(|e| e / total)
}

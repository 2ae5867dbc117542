//! Core types for the scoring pipeline

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Label reported when a distribution has no entries to select from.
pub const UNKNOWN_LABEL: &str = "unknown";

/// The classification dimensions every item is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Sentiment,
    Emotion,
    Risk,
}

impl Dimension {
    /// All dimensions, in the order records store them.
    pub const ALL: [Dimension; 3] = [Dimension::Sentiment, Dimension::Emotion, Dimension::Risk];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Sentiment => "sentiment",
            Dimension::Emotion => "emotion",
            Dimension::Risk => "risk",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A label→score mapping that preserves insertion order.
///
/// Iteration order is a property of how the distribution was constructed
/// (lexicon declaration order, or a model's class-index order). Top-label
/// selection breaks ties in favor of the first entry encountered, so the
/// construction order is part of the contract and must survive round-trips.
/// Serializes as a JSON object with keys in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelDistribution(Vec<(String, f64)>);

impl LabelDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (label, score) pairs, keeping their order.
    pub fn from_pairs<I, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, f64)>,
        L: Into<String>,
    {
        let mut dist = Self::new();
        for (label, score) in pairs {
            dist.insert(label, score);
        }
        dist
    }

    /// Insert or update a label's score. An existing label keeps its position.
    pub fn insert(&mut self, label: impl Into<String>, score: f64) {
        let label = label.into();
        match self.0.iter_mut().find(|(l, _)| *l == label) {
            Some((_, s)) => *s = score,
            None => self.0.push((label, score)),
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, s)| *s)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(l, s)| (l.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().map(|(_, s)| s).sum()
    }

    /// A new distribution with every score multiplied by `factor`,
    /// preserving entry order.
    pub fn scaled(&self, factor: f64) -> LabelDistribution {
        LabelDistribution(
            self.0
                .iter()
                .map(|(l, s)| (l.clone(), s * factor))
                .collect(),
        )
    }

    /// The entry with the highest score.
    ///
    /// Ties go to the first entry encountered in insertion order: the
    /// comparison is strictly-greater, so a later equal score never
    /// displaces an earlier one. Empty distributions return `None`.
    pub fn top(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (label, score) in self.iter() {
            match best {
                Some((_, s)) if score > s => best = Some((label, score)),
                None => best = Some((label, score)),
                _ => {}
            }
        }
        best
    }
}

impl Serialize for LabelDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, score) in &self.0 {
            map.serialize_entry(label, score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LabelDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DistVisitor;

        impl<'de> Visitor<'de> for DistVisitor {
            type Value = LabelDistribution;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of label to score")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut dist = LabelDistribution::new();
                while let Some((label, score)) = access.next_entry::<String, f64>()? {
                    dist.insert(label, score);
                }
                Ok(dist)
            }
        }

        deserializer.deserialize_map(DistVisitor)
    }
}

/// Per-dimension distributions, in the order the scorers produced them.
#[derive(Debug, Clone, Default)]
pub struct DimensionScores(Vec<(Dimension, LabelDistribution)>);

impl DimensionScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dimension: Dimension, dist: LabelDistribution) {
        match self.0.iter_mut().find(|(d, _)| *d == dimension) {
            Some((_, existing)) => *existing = dist,
            None => self.0.push((dimension, dist)),
        }
    }

    pub fn get(&self, dimension: Dimension) -> Option<&LabelDistribution> {
        self.0
            .iter()
            .find(|(d, _)| *d == dimension)
            .map(|(_, dist)| dist)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, &LabelDistribution)> {
        self.0.iter().map(|(d, dist)| (*d, dist))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Errors from a single scorer on a single text.
///
/// Never fatal to a batch run: the orchestrator records the failure and
/// moves on to the next item.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScoreError {
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for scoring operations
pub type ScoreResult<T> = Result<T, ScoreError>;

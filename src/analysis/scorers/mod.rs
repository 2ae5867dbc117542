//! Built-in scorers
//!
//! One scorer per dimension: a model-backed sentiment classifier and two
//! lexicon-based scorers for emotion and category risk. The lexicon
//! scorers share the [`ValenceLexicon`](crate::analysis::ValenceLexicon)
//! polarity signal; the registry builder wires one shared instance into
//! all of them.

mod emotion;
mod risk;
mod sentiment;

pub use emotion::EmotionLexicon;
pub use risk::RiskLexicon;
pub use sentiment::SentimentModel;

use super::traits::ScorerRegistry;
use super::valence::ValenceLexicon;
use regex::Regex;
use std::sync::Arc;

/// Build the standard registry: sentiment, emotion, and risk scorers
/// backed by a single shared valence lexicon.
pub fn standard_registry() -> ScorerRegistry {
    let valence = Arc::new(ValenceLexicon::new());
    let mut registry = ScorerRegistry::new();
    registry.register(SentimentModel::new(valence.clone()));
    registry.register(EmotionLexicon::new(valence.clone()));
    registry.register(RiskLexicon::new(valence));
    registry
}

/// A set of keywords matched case-insensitively on whole-word boundaries.
///
/// Compiled once into a single alternation; `hits` counts every match in
/// the text.
pub(crate) struct KeywordSet {
    re: Regex,
}

impl KeywordSet {
    pub(crate) fn new(keywords: &[&str]) -> Self {
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"(?i)\b(?:{})\b", alternation);
        Self {
            re: Regex::new(&pattern).expect("keyword pattern is valid"),
        }
    }

    pub(crate) fn hits(&self, text: &str) -> usize {
        self.re.find_iter(text).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Dimension;
    use crate::analysis::ScoreProvider;

    #[test]
    fn keyword_set_matches_whole_words_only() {
        let set = KeywordSet::new(&["mad", "sad"]);
        assert_eq!(set.hits("mad and sad"), 2);
        assert_eq!(set.hits("Madrid is nomadic"), 0);
        assert_eq!(set.hits("MAD"), 1);
    }

    #[test]
    fn standard_registry_covers_all_dimensions() {
        let registry = standard_registry();
        assert_eq!(registry.len(), 3);
        for dimension in Dimension::ALL {
            let scorer = registry.for_dimension(dimension).unwrap();
            assert!(!scorer.labels().is_empty());
        }
    }
}

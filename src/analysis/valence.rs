//! Rule-based polarity signal shared by the lexicon scorers
//!
//! A compact re-implementation of the classic social-media valence model:
//! a word→valence table, negation flipping, degree boosters, and
//! exclamation emphasis, folded into a normalized compound score plus
//! positive/negative/neutral proportions. Built once at process start and
//! shared read-only across all scoring calls.

use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Sign damping applied when a valence-bearing word is negated.
const NEGATION_SCALAR: f64 = -0.74;

/// Denominator constant for compound-score normalization.
const NORMALIZATION: f64 = 15.0;

/// Emphasis added per exclamation mark, capped at [`MAX_EXCLAMATIONS`].
const EXCLAMATION_BOOST: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;

/// Booster influence decays with distance from the word it modifies.
const BOOSTER_DAMPING: [f64; 3] = [1.0, 0.95, 0.9];

/// Polarity summary for one text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valence {
    /// Overall polarity in [-1, 1]. Values at or above 0.05 read as
    /// positive, at or below -0.05 as negative, in between as neutral.
    pub compound: f64,
    /// Proportion of the text's valence mass that is positive.
    pub positive: f64,
    /// Proportion that is negative.
    pub negative: f64,
    /// Proportion carried by words with no valence entry.
    pub neutral: f64,
}

impl Valence {
    fn zero() -> Self {
        Self {
            compound: 0.0,
            positive: 0.0,
            negative: 0.0,
            neutral: 0.0,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.compound >= 0.05
    }

    pub fn is_negative(&self) -> bool {
        self.compound <= -0.05
    }
}

/// Word-level polarity lexicon with negation and booster handling.
pub struct ValenceLexicon {
    weights: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
    boosters: HashMap<&'static str, f64>,
    token_re: Regex,
}

impl Default for ValenceLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl ValenceLexicon {
    pub fn new() -> Self {
        Self {
            weights: WEIGHTS.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
            boosters: BOOSTERS.iter().copied().collect(),
            token_re: Regex::new(r"[a-z']+").expect("valence token pattern is valid"),
        }
    }

    /// Assess the polarity of a text.
    ///
    /// Every token contributes one entry: its lexicon valence (adjusted
    /// for preceding negations and boosters within a three-token window)
    /// or zero if the word carries none. The compound score is the damped
    /// sum `s / sqrt(s^2 + 15)`; the proportions split the same entries
    /// into positive/negative/neutral mass.
    pub fn assess(&self, text: &str) -> Valence {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = self
            .token_re
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();

        if tokens.is_empty() {
            return Valence::zero();
        }

        let mut sentiments = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let Some(&weight) = self.weights.get(token) else {
                sentiments.push(0.0);
                continue;
            };

            let mut valence = weight;
            // Look back up to three tokens for boosters and negations.
            for (back, damping) in BOOSTER_DAMPING.iter().enumerate() {
                let Some(j) = i.checked_sub(back + 1) else {
                    break;
                };
                let prior = tokens[j];
                if let Some(&boost) = self.boosters.get(prior) {
                    valence += valence.signum() * boost * damping;
                }
                if self.negations.contains(prior) {
                    valence *= NEGATION_SCALAR;
                }
            }
            sentiments.push(valence);
        }

        let mut sum: f64 = sentiments.iter().sum();

        let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
        let emphasis = exclamations as f64 * EXCLAMATION_BOOST;
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }

        let compound = (sum / (sum * sum + NORMALIZATION).sqrt()).clamp(-1.0, 1.0);

        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neu_count = 0.0;
        for &v in &sentiments {
            if v > 0.0 {
                pos_sum += v + 1.0;
            } else if v < 0.0 {
                neg_sum += v - 1.0;
            } else {
                neu_count += 1.0;
            }
        }

        let total = pos_sum + neg_sum.abs() + neu_count;
        if total == 0.0 {
            return Valence::zero();
        }

        Valence {
            compound,
            positive: pos_sum / total,
            negative: neg_sum.abs() / total,
            neutral: neu_count / total,
        }
    }
}

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "cannot", "can't", "don't", "won't", "isn't",
    "wasn't", "aren't", "weren't", "doesn't", "didn't", "couldn't", "shouldn't", "wouldn't",
    "ain't", "without", "hardly", "barely",
];

const BOOSTERS: &[(&str, f64)] = &[
    ("very", 0.293),
    ("really", 0.293),
    ("extremely", 0.293),
    ("absolutely", 0.293),
    ("totally", 0.293),
    ("incredibly", 0.293),
    ("utterly", 0.293),
    ("so", 0.293),
    ("deeply", 0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
    ("marginally", -0.293),
];

/// Word valences on the conventional [-4, 4] scale.
const WEIGHTS: &[(&str, f64)] = &[
    // positive
    ("good", 1.9),
    ("nice", 1.8),
    ("great", 3.1),
    ("best", 3.2),
    ("better", 1.9),
    ("love", 3.2),
    ("loved", 2.9),
    ("like", 1.5),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("excellent", 2.7),
    ("wonderful", 2.7),
    ("fantastic", 2.6),
    ("beautiful", 2.9),
    ("perfect", 2.7),
    ("happy", 2.7),
    ("happiness", 2.7),
    ("joy", 2.8),
    ("delighted", 2.9),
    ("thrilled", 3.0),
    ("excited", 2.4),
    ("glad", 2.0),
    ("pleased", 2.0),
    ("satisfied", 1.8),
    ("fun", 2.3),
    ("cool", 1.3),
    ("win", 2.8),
    ("won", 2.7),
    ("winning", 2.4),
    ("success", 2.7),
    ("successful", 2.4),
    ("smile", 2.0),
    ("laugh", 2.2),
    ("celebrate", 2.7),
    ("hope", 1.9),
    ("hopeful", 2.0),
    ("kind", 2.4),
    ("friendly", 2.2),
    ("polite", 2.0),
    ("respectful", 2.1),
    ("civil", 1.4),
    ("calm", 1.3),
    ("safe", 1.8),
    ("amazed", 2.4),
    ("incredible", 2.6),
    ("remarkable", 2.1),
    ("extraordinary", 2.3),
    ("wow", 2.8),
    ("thanks", 1.9),
    ("thank", 1.8),
    ("welcome", 1.6),
    ("helpful", 1.9),
    ("interesting", 1.7),
    ("impressive", 2.2),
    ("brilliant", 2.8),
    // negative
    ("bad", -2.5),
    ("worse", -2.1),
    ("worst", -3.1),
    ("terrible", -2.1),
    ("awful", -2.0),
    ("horrible", -2.5),
    ("sad", -2.1),
    ("unhappy", -1.8),
    ("depressed", -2.3),
    ("miserable", -2.5),
    ("misery", -2.7),
    ("gloomy", -1.5),
    ("disappointed", -2.0),
    ("disappointing", -2.1),
    ("upset", -1.6),
    ("distressed", -1.9),
    ("grief", -2.2),
    ("heartbroken", -2.8),
    ("lonely", -1.5),
    ("tragic", -2.3),
    ("cry", -1.9),
    ("crying", -1.9),
    ("angry", -2.3),
    ("mad", -2.2),
    ("furious", -2.7),
    ("outraged", -2.5),
    ("irritated", -1.8),
    ("annoyed", -1.7),
    ("annoying", -1.8),
    ("frustrated", -2.0),
    ("frustrating", -2.1),
    ("rage", -2.6),
    ("hate", -2.7),
    ("hated", -2.6),
    ("hateful", -2.8),
    ("hostile", -2.1),
    ("bitter", -1.8),
    ("resentful", -1.7),
    ("afraid", -1.9),
    ("scared", -1.9),
    ("frightened", -2.0),
    ("terrified", -2.7),
    ("nervous", -1.2),
    ("anxious", -1.5),
    ("worried", -1.4),
    ("worry", -1.4),
    ("panic", -2.2),
    ("horror", -2.6),
    ("shocked", -1.3),
    ("alarmed", -1.4),
    ("dread", -2.1),
    ("terror", -2.9),
    ("threat", -2.2),
    ("threatened", -2.0),
    ("problem", -1.7),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.4),
    ("broken", -1.6),
    ("stupid", -2.4),
    ("dumb", -2.3),
    ("ugly", -2.6),
    ("disgusting", -2.9),
    ("insult", -2.2),
    ("insulting", -2.3),
    ("rude", -2.0),
    ("vulgar", -2.1),
    ("crude", -1.4),
    ("profane", -1.9),
    ("offensive", -2.2),
    ("despise", -2.9),
    ("loathe", -2.9),
    ("detest", -2.8),
    ("abhor", -2.8),
    ("racist", -3.2),
    ("sexist", -3.0),
    ("bigot", -2.8),
    ("discriminate", -2.3),
    ("prejudice", -2.2),
    ("pain", -2.2),
    ("hurt", -2.0),
    ("scam", -2.6),
    ("fraud", -2.8),
    ("crash", -1.7),
    ("lost", -1.6),
    ("lose", -1.7),
    ("losing", -1.8),
    ("wrong", -1.6),
    ("strange", -0.6),
    ("boring", -1.6),
    ("useless", -2.0),
    ("pathetic", -2.4),
    // mild / context words
    ("surprise", 1.1),
    ("surprised", 1.2),
    ("astonished", 1.6),
    ("unexpected", 0.4),
    ("okay", 0.9),
    ("fine", 0.8),
];

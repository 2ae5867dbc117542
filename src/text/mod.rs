//! Text normalization for raw social-media input
//!
//! Turns raw post/comment text into a canonical clean form, a
//! linguistically reduced lemma form, and basic size metrics. Cleaning is
//! best-effort and never fails: malformed input degrades, it does not
//! error.

mod lemma;
mod normalizer;

pub use normalizer::{CleanedText, TextNormalizer, MENTION_PLACEHOLDER, URL_PLACEHOLDER};

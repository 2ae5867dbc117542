//! Raw-text cleaning and size metrics

use super::lemma;
use regex::Regex;
use serde::Serialize;

/// Token substituted for `@mention`s in the clean form.
pub const MENTION_PLACEHOLDER: &str = "@user";

/// Token substituted for URLs in the clean form.
pub const URL_PLACEHOLDER: &str = "http";

/// Canonical forms and size metrics derived from one raw text.
///
/// Ephemeral: computed fresh per analysis call, never stored on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanedText {
    /// Cleaned text: emoji stripped, hashtags dropped, mentions and URLs
    /// replaced by placeholders, whitespace collapsed.
    pub clean: String,
    /// Lemmatized text with mentions removed entirely.
    pub lemma: String,
    /// Character count of the clean form.
    pub char_count: usize,
    /// Whitespace-separated token count of the clean form.
    pub word_count: usize,
}

impl CleanedText {
    /// The zeroed result for empty input. Callers must treat this as
    /// "nothing to score" and skip the scorers entirely.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }
}

/// Cleans raw text into [`CleanedText`].
///
/// Patterns are compiled once at construction; `normalize` is read-only
/// and safe to share across the whole run.
pub struct TextNormalizer {
    hashtag: Regex,
    mention: Regex,
    url: Regex,
    spaces: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            hashtag: Regex::new(r"#\S+").expect("hashtag pattern is valid"),
            mention: Regex::new(r"@\S+").expect("mention pattern is valid"),
            url: Regex::new(r"http\S+").expect("url pattern is valid"),
            spaces: Regex::new(r"\s+").expect("whitespace pattern is valid"),
        }
    }

    /// Normalize raw text.
    ///
    /// Empty or whitespace-only input returns the zeroed [`CleanedText`].
    /// Everything else is best-effort: no input errors.
    pub fn normalize(&self, text: &str) -> CleanedText {
        if text.trim().is_empty() {
            return CleanedText::empty();
        }

        let stripped = strip_emoji(text);
        let no_tags = self.hashtag.replace_all(&stripped, "");
        let placeheld = self.mention.replace_all(&no_tags, MENTION_PLACEHOLDER);
        let collapsed_urls = self.url.replace_all(&placeheld, URL_PLACEHOLDER);
        let clean = self
            .spaces
            .replace_all(&collapsed_urls, " ")
            .trim()
            .to_string();

        // The lemma form drops mentions entirely instead of placeholding.
        let lemma_source = self.mention.replace_all(&clean, "");
        let lemma = lemma::lemmatize_text(&lemma_source);

        let char_count = clean.chars().count();
        let word_count = clean.split_whitespace().count();

        CleanedText {
            clean,
            lemma,
            char_count,
            word_count,
        }
    }
}

fn strip_emoji(text: &str) -> String {
    text.chars().filter(|c| !is_emoji(*c)).collect()
}

/// Emoji ranges stripped from input: emoticons, symbols & pictographs,
/// transport & map symbols, regional-indicator flags.
fn is_emoji(c: char) -> bool {
    matches!(
        c,
        '\u{1F600}'..='\u{1F64F}'
            | '\u{1F300}'..='\u{1F5FF}'
            | '\u{1F680}'..='\u{1F6FF}'
            | '\u{1F1E0}'..='\u{1F1FF}'
    )
}

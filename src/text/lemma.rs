//! Rule-based English lemmatization
//!
//! A small irregular-form table plus ordered suffix rules. Deliberately
//! heuristic: it reduces the common inflections (plurals, -ing, -ed)
//! well enough for normalized text comparison, and leaves everything
//! else untouched.

/// Lemmatize whitespace-separated tokens, dropping punctuation-only
/// tokens, and join the surviving lemmas with single spaces.
pub(crate) fn lemmatize_text(text: &str) -> String {
    text.split_whitespace()
        .filter_map(lemmatize_token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn lemmatize_token(token: &str) -> Option<String> {
    let stripped = token.trim_matches(|c: char| !c.is_alphanumeric());
    if stripped.is_empty() {
        return None;
    }
    let lowered = stripped.to_lowercase();
    let base = lowered.strip_suffix("'s").unwrap_or(&lowered);
    Some(lemma_of(base))
}

fn lemma_of(word: &str) -> String {
    if let Some((_, base)) = IRREGULAR.iter().find(|(form, _)| *form == word) {
        return (*base).to_string();
    }

    let len = word.len();

    if len > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..len - 3]);
    }

    if len > 4 && word.ends_with("es") {
        let stem = &word[..len - 2];
        if stem.ends_with('s')
            || stem.ends_with('x')
            || stem.ends_with('z')
            || stem.ends_with("ch")
            || stem.ends_with("sh")
        {
            return stem.to_string();
        }
    }

    if len > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
    {
        return word[..len - 1].to_string();
    }

    if len > 5 && word.ends_with("ing") {
        return restore_stem(&word[..len - 3]);
    }

    if len > 4 && word.ends_with("ed") {
        return restore_stem(&word[..len - 2]);
    }

    word.to_string()
}

/// Undo the spelling changes inflection introduced: collapse a doubled
/// final consonant (stopp → stop) or restore a dropped final e after a
/// consonant-vowel-consonant ending (mak → make).
fn restore_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();

    if n >= 2
        && chars[n - 1] == chars[n - 2]
        && chars[n - 1].is_ascii_alphabetic()
        && !matches!(chars[n - 1], 'l' | 's' | 'z')
    {
        return stem[..stem.len() - 1].to_string();
    }

    if n >= 3
        && !is_vowel(chars[n - 1])
        && is_vowel(chars[n - 2])
        && !is_vowel(chars[n - 3])
        && chars[n - 1] != 'w'
        && chars[n - 1] != 'y'
    {
        return format!("{}e", stem);
    }

    stem.to_string()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

const IRREGULAR: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("goes", "go"),
    ("went", "go"),
    ("gone", "go"),
    ("said", "say"),
    ("made", "make"),
    ("got", "get"),
    ("gotten", "get"),
    ("took", "take"),
    ("taken", "take"),
    ("saw", "see"),
    ("seen", "see"),
    ("came", "come"),
    ("knew", "know"),
    ("known", "know"),
    ("thought", "think"),
    ("felt", "feel"),
    ("found", "find"),
    ("told", "tell"),
    ("left", "leave"),
    ("kept", "keep"),
    ("ran", "run"),
    ("wrote", "write"),
    ("written", "write"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("people", "person"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
];

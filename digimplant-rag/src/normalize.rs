//! Text normalization shared by the matcher and the classifiers.

/// Lowercase `text` for matching.
///
/// The Turkish dotted capital `İ` is folded to a plain `i`; Unicode
/// lowercasing would otherwise produce `i` followed by a combining dot, which
/// never matches the synonym table.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == 'İ' {
            out.push('i');
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Split normalized text into alphanumeric words.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty())
}

/// Whether `needle` occurs in `text` starting at a word boundary.
///
/// Multi-word needles such as `treatment plan` are matched as phrases.
pub fn contains_at_word_start(text: &str, needle: &str) -> bool {
    text.match_indices(needle).any(|(index, _)| {
        text[..index].chars().next_back().is_none_or(|c| !c.is_alphanumeric())
    })
}

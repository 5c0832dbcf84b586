//! Detection of replies that decline to answer.

use digimplant_rag::normalize::normalize;

/// Phrases, already normalized, that mark a reply as a refusal.
pub const REFUSAL_PHRASES: &[&str] = &[
    "insufficient information",
    "not enough information",
    "don't have enough information",
    "do not have enough information",
    "no relevant information",
    "no information available",
    "unable to answer",
    "cannot answer",
    "can't answer",
    "yeterli bilgi bulunmamaktadır",
    "yeterli bilgi bulunmuyor",
    "yeterli bilgi yok",
    "arşivimizde yeterli bilgi",
    "bilgi bulunmamaktadır",
    "yanıt veremiyorum",
    "cevap veremiyorum",
];

/// Whether `text` claims there is not enough information to answer.
pub fn is_refusal(text: &str) -> bool {
    let normalized = normalize(text).replace('\u{2019}', "'");
    REFUSAL_PHRASES.iter().any(|phrase| normalized.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_english_refusals() {
        assert!(is_refusal("I'm sorry, there is insufficient information in the archive."));
        assert!(is_refusal("I don’t have enough information to answer that."));
    }

    #[test]
    fn detects_turkish_refusals() {
        assert!(is_refusal("Arşivimizde yeterli bilgi bulunmamaktadır."));
        assert!(is_refusal("Üzgünüm, yanıt veremiyorum."));
        assert!(is_refusal("YETERLİ BİLGİ YOK"));
    }

    #[test]
    fn ordinary_answers_pass() {
        assert!(!is_refusal(
            "Remove the fragment with a reverse-torque instrument.\n\nSource:\nMisch 2008"
        ));
        assert!(!is_refusal(""));
    }
}

//! Per-turn response-mode classification.
//!
//! No conversation state is kept between requests. Whether the clinician
//! already answered a clarifying question is read off the incoming text:
//! a complication report that names where or when the problem occurred is
//! answered directly, a bare one gets a clarifying question first.

use digimplant_rag::QueryAnalysis;
use digimplant_rag::normalize::words;
use serde::{Deserialize, Serialize};

/// Word prefixes that locate a complication on the implant or in time.
///
/// Matched against word starts so Turkish suffixes (`gövdesinden`,
/// `boyunda`) still count.
pub const DISAMBIGUATORS: &[&str] = &[
    "neck", "boyun", "body", "gövde", "govde", "apex", "apical", "apikal", "early", "erken",
    "platform", "crestal", "kret", "coronal", "koronal",
];

/// Disambiguators that only count as whole words: `lateral` is not `late`
/// and `geçici` (temporary) is not `geç`.
pub const WHOLE_WORD_DISAMBIGUATORS: &[&str] = &["late", "geç", "gec"];

/// How the generator is asked to respond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// Reply with a single clarifying question and nothing else.
    AwaitingClarification,
    /// Reply with a solution, a `Source:` section and a `Warning:` section.
    Answering,
}

impl ResponseMode {
    /// Classify a raw question.
    pub fn classify(question: &str) -> Self {
        Self::from_analysis(&QueryAnalysis::new(question))
    }

    /// Classify an already analyzed question.
    pub fn from_analysis(analysis: &QueryAnalysis) -> Self {
        if analysis.is_complication() && !has_disambiguator(&analysis.normalized) {
            ResponseMode::AwaitingClarification
        } else {
            ResponseMode::Answering
        }
    }
}

/// Whether a normalized question already says where or when the problem occurred.
pub fn has_disambiguator(normalized: &str) -> bool {
    words(normalized).any(|word| {
        WHOLE_WORD_DISAMBIGUATORS.contains(&word)
            || DISAMBIGUATORS.iter().any(|prefix| word.starts_with(prefix))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_complication_awaits_clarification() {
        assert_eq!(ResponseMode::classify("implant kırıldı"), ResponseMode::AwaitingClarification);
        assert_eq!(ResponseMode::classify("Implant is stuck"), ResponseMode::AwaitingClarification);
    }

    #[test]
    fn located_complication_is_answered() {
        assert_eq!(ResponseMode::classify("implant boyundan kırıldı"), ResponseMode::Answering);
        assert_eq!(ResponseMode::classify("late failure after loading"), ResponseMode::Answering);
    }

    #[test]
    fn clarifying_reply_is_answered() {
        assert_eq!(ResponseMode::classify("gövde"), ResponseMode::Answering);
        assert_eq!(ResponseMode::classify("Gövdesinden"), ResponseMode::Answering);
    }

    #[test]
    fn technical_question_is_answered() {
        assert_eq!(ResponseMode::classify("sterilization protocol"), ResponseMode::Answering);
    }

    #[test]
    fn template_is_not_late() {
        assert!(!has_disambiguator("surgical template"));
        assert_eq!(
            ResponseMode::classify("the template broke"),
            ResponseMode::AwaitingClarification
        );
    }

    #[test]
    fn words_containing_a_disambiguator_do_not_count() {
        assert!(!has_disambiguator("lateral incisor"));
        assert_eq!(
            ResponseMode::classify("lateral incisor implant fractured"),
            ResponseMode::AwaitingClarification
        );
        assert_eq!(
            ResponseMode::classify("geçici protez takılıyken implant kırıldı"),
            ResponseMode::AwaitingClarification
        );
        assert_eq!(ResponseMode::classify("geç dönemde kırıldı"), ResponseMode::Answering);
    }

    #[test]
    fn questions_without_complications_are_answered() {
        assert_eq!(
            ResponseMode::classify("Sizin sterilizasyon protokolünüz nedir?"),
            ResponseMode::Answering
        );
        assert_eq!(
            ResponseMode::classify("How is the abutment attached to the implant?"),
            ResponseMode::Answering
        );
        assert_eq!(
            ResponseMode::classify("We reached the planned depth, what next?"),
            ResponseMode::Answering
        );
    }
}

//! The answer generator adapter.
//!
//! Wraps a [`TextGenerator`] with the two-mode response protocol, one
//! bounded retry when the model refuses, and post-processing that keeps the
//! reply in the shape the chat client expects.

use std::sync::Arc;

use digimplant_model::{GenerationConfig, GenerationRequest, TextGenerator, TokenUsage};
use digimplant_rag::normalize::normalize;
use digimplant_rag::{AssembledContext, CaseRecord, QueryAnalysis};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ChatError, Result};
use crate::prompt::{
    self, GENERAL_PRACTICE_SOURCE, SOURCE_HEADING, WARNING_HEADING, WARNING_TEXT,
};
use crate::protocol::ResponseMode;
use crate::refusal::is_refusal;

const SOURCE_LABELS: &[&str] = &["source", "sources", "kaynak", "kaynaklar"];
const WARNING_LABELS: &[&str] = &["warning", "uyarı", "uyari"];

const DEFAULT_QUESTION_EN: &str = "Did the problem occur at the neck or the body of the implant, \
     and was it early or late after placement?";
const DEFAULT_QUESTION_TR: &str = "Sorun implantın boyun bölgesinde mi yoksa gövdesinde mi oluştu, \
     erken mi yoksa geç dönemde mi?";

/// Words that identify the responsibility disclaimer inside a warning section.
const DISCLAIMER_MARKERS: &[&str] = &["responsibility", "responsible", "sorumluluk"];

/// Configuration for [`AnswerGenerator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerConfig {
    /// Sampling parameters for both attempts.
    pub generation: GenerationConfig,
    /// Character cap on the context sent with the retry.
    pub retry_context_chars: usize,
    /// Whether a refusal triggers the simplified retry.
    pub retry_on_refusal: bool,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            retry_context_chars: 2000,
            retry_on_refusal: true,
        }
    }
}

impl AnswerConfig {
    pub fn builder() -> AnswerConfigBuilder {
        AnswerConfigBuilder::default()
    }
}

/// Builder for a validated [`AnswerConfig`].
#[derive(Debug, Clone, Default)]
pub struct AnswerConfigBuilder {
    config: AnswerConfig,
}

impl AnswerConfigBuilder {
    pub fn generation(mut self, generation: GenerationConfig) -> Self {
        self.config.generation = generation;
        self
    }

    pub fn retry_context_chars(mut self, chars: usize) -> Self {
        self.config.retry_context_chars = chars;
        self
    }

    pub fn retry_on_refusal(mut self, enabled: bool) -> Self {
        self.config.retry_on_refusal = enabled;
        self
    }

    /// # Errors
    ///
    /// Returns [`ChatError::ConfigError`] if `retry_context_chars` is zero,
    /// the temperature lies outside `0.0..=2.0`, `top_p` outside `0.0..=1.0`,
    /// or the output-token cap is zero.
    pub fn build(self) -> Result<AnswerConfig> {
        let config = self.config;
        if config.retry_context_chars == 0 {
            return Err(ChatError::ConfigError(
                "retry_context_chars must be greater than zero".to_string(),
            ));
        }
        if let Some(temperature) = config.generation.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ChatError::ConfigError(format!(
                    "temperature must be within 0.0..=2.0, got {temperature}"
                )));
            }
        }
        if let Some(top_p) = config.generation.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(ChatError::ConfigError(format!(
                    "top_p must be within 0.0..=1.0, got {top_p}"
                )));
            }
        }
        if config.generation.max_output_tokens == Some(0) {
            return Err(ChatError::ConfigError(
                "max_output_tokens must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }
}

/// The post-processed reply for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub mode: ResponseMode,
    /// Whether the simplified retry was sent.
    pub retried: bool,
    /// Whether the returned text is still a refusal.
    pub refused: bool,
    /// Token usage summed over every call, when the backend reports it.
    pub usage: Option<TokenUsage>,
}

/// Turns a question and its context into an [`Answer`].
pub struct AnswerGenerator {
    generator: Arc<dyn TextGenerator>,
    config: AnswerConfig,
}

impl AnswerGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, config: AnswerConfig) -> Self {
        Self { generator, config }
    }

    /// Generate the reply for `question`.
    ///
    /// # Errors
    ///
    /// Generator failures on either attempt are returned as
    /// [`ChatError::Generation`]; they are never retried here.
    pub async fn generate(
        &self,
        question: &str,
        context: &AssembledContext,
        case_record: Option<&CaseRecord>,
    ) -> Result<Answer> {
        let analysis = QueryAnalysis::new(question);
        let mode = ResponseMode::from_analysis(&analysis);
        debug!(?mode, generator = self.generator.name(), "generating answer");

        let request = GenerationRequest::new(
            prompt::system_instruction(mode),
            prompt::task_prompt(question, context, case_record),
        )
        .with_config(self.config.generation);
        let first = self.generator.generate(request).await?;
        let mut usage = first.usage;
        let mut text = first.text;
        let mut retried = false;
        let mut refused = is_refusal(&text);

        if refused && self.config.retry_on_refusal {
            warn!(?mode, "generator refused; retrying with a simplified instruction");
            let trimmed = context.trimmed(self.config.retry_context_chars);
            let request = GenerationRequest::new(
                prompt::retry_system_instruction(mode),
                prompt::retry_prompt(question, &trimmed),
            )
            .with_config(self.config.generation);
            let second = self.generator.generate(request).await?;
            retried = true;
            usage = sum_usage(usage, second.usage);

            if is_refusal(&second.text) {
                warn!("retry also refused; returning the original reply");
            } else {
                text = second.text;
                refused = false;
            }
        }

        let text = match mode {
            ResponseMode::AwaitingClarification => finish_clarification(&text, analysis.turkish),
            ResponseMode::Answering => finish_answer(&text, &context.sources),
        };

        Ok(Answer { text, mode, retried, refused, usage })
    }
}

fn sum_usage(a: Option<TokenUsage>, b: Option<TokenUsage>) -> Option<TokenUsage> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        (a, b) => a.or(b),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Source,
    Warning,
}

/// Recognize a section heading line, tolerating markdown emphasis and the
/// Turkish labels. Returns the heading and any text after the colon.
fn parse_heading(line: &str) -> Option<(Heading, String)> {
    let unstyled = line.replace('*', "");
    let unstyled = unstyled.trim().trim_start_matches('#').trim();
    let (label, rest) = unstyled.split_once(':')?;
    let label = normalize(label.trim());
    let heading = if SOURCE_LABELS.contains(&label.as_str()) {
        Heading::Source
    } else if WARNING_LABELS.contains(&label.as_str()) {
        Heading::Warning
    } else {
        return None;
    };
    Some((heading, rest.trim().to_string()))
}

/// Canonicalize section headings and append any section the model left out.
///
/// The responsibility disclaimer is always present: when the model wrote
/// its own warning section without it, the disclaimer is added to that
/// section.
fn finish_answer(text: &str, sources: &[String]) -> String {
    let mut lines = Vec::new();
    let mut section = None;
    let mut has_source = false;
    let mut has_disclaimer = false;
    // Index just past the last non-blank line of a warning section.
    let mut warning_end = None;

    for line in text.trim().lines() {
        match parse_heading(line) {
            Some((heading, rest)) => {
                section = Some(heading);
                match heading {
                    Heading::Source => {
                        has_source = true;
                        lines.push(SOURCE_HEADING.to_string());
                    }
                    Heading::Warning => {
                        lines.push(WARNING_HEADING.to_string());
                        warning_end = Some(lines.len());
                    }
                }
                if !rest.is_empty() {
                    if heading == Heading::Warning {
                        has_disclaimer |= is_disclaimer(&rest);
                    }
                    lines.push(rest);
                    if heading == Heading::Warning {
                        warning_end = Some(lines.len());
                    }
                }
            }
            None => {
                lines.push(line.trim_end().to_string());
                if section == Some(Heading::Warning) && !line.trim().is_empty() {
                    has_disclaimer |= is_disclaimer(line);
                    warning_end = Some(lines.len());
                }
            }
        }
    }

    if !has_disclaimer {
        if let Some(index) = warning_end {
            lines.insert(index, WARNING_TEXT.to_string());
        }
    }

    let mut answer = lines.join("\n");
    if !has_source {
        let source = if sources.is_empty() {
            GENERAL_PRACTICE_SOURCE.to_string()
        } else {
            sources.join("; ")
        };
        answer.push_str(&format!("\n\n{SOURCE_HEADING}\n{source}"));
    }
    if warning_end.is_none() {
        answer.push_str(&format!("\n\n{WARNING_HEADING}\n{WARNING_TEXT}"));
    }
    answer.trim_start().to_string()
}

fn is_disclaimer(line: &str) -> bool {
    let line = normalize(line);
    DISCLAIMER_MARKERS.iter().any(|marker| line.contains(marker))
}

/// Keep only the first question, dropping any section material.
fn finish_clarification(text: &str, turkish: bool) -> String {
    let body = text
        .trim()
        .lines()
        .take_while(|line| parse_heading(line).is_none())
        .collect::<Vec<_>>()
        .join("\n");
    let body = body.trim();

    let reply = match body.find('?') {
        Some(end) => &body[..end + 1],
        None => body,
    };

    if reply.is_empty() {
        default_question(turkish).to_string()
    } else {
        reply.to_string()
    }
}

fn default_question(turkish: bool) -> &'static str {
    if turkish {
        DEFAULT_QUESTION_TR
    } else {
        DEFAULT_QUESTION_EN
    }
}

#[cfg(test)]
mod tests {
    use digimplant_model::MockGenerator;

    use super::*;

    fn context() -> AssembledContext {
        AssembledContext {
            text: "title: Neck fracture\nbody: explantation may be required".to_string(),
            sources: vec!["Neck fracture".to_string()],
            truncated: false,
        }
    }

    fn adapter(mock: Arc<MockGenerator>) -> AnswerGenerator {
        AnswerGenerator::new(mock, AnswerConfig::default())
    }

    #[test]
    fn config_builder_validates() {
        assert!(AnswerConfig::builder().retry_context_chars(0).build().is_err());
        let hot = GenerationConfig { temperature: Some(3.0), ..GenerationConfig::default() };
        assert!(AnswerConfig::builder().generation(hot).build().is_err());
        let config = AnswerConfig::builder().retry_context_chars(500).build().unwrap();
        assert_eq!(config.retry_context_chars, 500);
    }

    #[test]
    fn missing_sections_are_appended() {
        let answer = finish_answer("Torque the screw to 35 Ncm.", &["Straumann manual".into()]);
        assert_eq!(
            answer,
            format!(
                "Torque the screw to 35 Ncm.\n\nSource:\nStraumann manual\n\n\
                 Warning:\n{WARNING_TEXT}"
            )
        );
    }

    #[test]
    fn clinical_warning_keeps_the_disclaimer() {
        let answer = finish_answer(
            "Remove the fragment with a trephine.\n\nSource: Misch 2008\n\n\
             Warning: Check the inferior alveolar nerve position on CBCT first.",
            &[],
        );
        assert!(answer.contains("Check the inferior alveolar nerve position on CBCT first."));
        assert!(answer.ends_with(WARNING_TEXT));
        assert_eq!(answer.matches("Warning:").count(), 1);
    }

    #[test]
    fn disclaimer_joins_a_warning_section_placed_before_sources() {
        let answer = finish_answer("Answer.\n\nWarning:\nAvoid overheating.\n\nSource:\nx", &[]);
        assert_eq!(
            answer,
            format!("Answer.\n\nWarning:\nAvoid overheating.\n{WARNING_TEXT}\n\nSource:\nx")
        );
    }

    #[test]
    fn model_disclaimer_is_not_repeated() {
        let text = format!("Answer.\n\nSource:\nx\n\nWarning:\n{WARNING_TEXT}");
        assert_eq!(finish_answer(&text, &[]), text);
        let turkish = "Cevap.\n\nKaynak: x\n\nUyarı: Klinik sorumluluk hekime aittir.";
        assert_eq!(finish_answer(turkish, &[]).matches(WARNING_TEXT).count(), 0);
    }

    #[test]
    fn styled_and_turkish_headings_are_canonicalized() {
        let answer = finish_answer("Çözüm.\n\n**Kaynak:** Misch 2008\n\n### Uyarı:\nDikkat.", &[]);
        let lines = answer.lines().collect::<Vec<_>>();
        assert!(lines.contains(&"Source:"));
        assert!(lines.contains(&"Misch 2008"));
        assert!(lines.contains(&"Warning:"));
        assert_eq!(answer.matches("Source:").count(), 1);
    }

    #[test]
    fn empty_sources_fall_back_to_general_practice() {
        let answer = finish_answer("Answer.", &[]);
        assert!(answer.contains(GENERAL_PRACTICE_SOURCE));
    }

    #[test]
    fn clarification_keeps_only_the_first_question() {
        let reply = finish_clarification(
            "Was it at the neck or the body? Also, when?\n\nSource:\nx\n\nWarning:\ny",
            false,
        );
        assert_eq!(reply, "Was it at the neck or the body?");
    }

    #[test]
    fn empty_clarification_uses_default_question() {
        assert_eq!(finish_clarification("Source: x", true), DEFAULT_QUESTION_TR);
        assert_eq!(finish_clarification("", false), DEFAULT_QUESTION_EN);
    }

    #[tokio::test]
    async fn turkish_without_diacritics_gets_the_turkish_default_question() {
        let mock = Arc::new(MockGenerator::default().with_reply(""));
        let answer = adapter(mock).generate("implant kirildi", &context(), None).await.unwrap();
        assert_eq!(answer.mode, ResponseMode::AwaitingClarification);
        assert_eq!(answer.text, DEFAULT_QUESTION_TR);
    }

    #[tokio::test]
    async fn refusal_is_retried_with_trimmed_context() {
        let mock = Arc::new(
            MockGenerator::default()
                .with_reply("Arşivimizde yeterli bilgi bulunmamaktadır.")
                .with_reply("Sterilize in an autoclave at 134°C."),
        );
        let config = AnswerConfig::builder().retry_context_chars(10).build().unwrap();
        let answer = AnswerGenerator::new(mock.clone(), config)
            .generate("sterilization protocol", &context(), None)
            .await
            .unwrap();

        assert!(answer.retried);
        assert!(!answer.refused);
        assert!(answer.text.starts_with("Sterilize in an autoclave"));
        assert_eq!(answer.usage, Some(TokenUsage::new(200, 40)));

        let requests = mock.requests().await;
        assert_eq!(requests.len(), 2);
        assert!(requests[1].prompt.ends_with("title: Nec..."));
    }

    #[tokio::test]
    async fn double_refusal_returns_original() {
        let mock = Arc::new(
            MockGenerator::default()
                .with_reply("There is insufficient information.")
                .with_reply("Not enough information, sorry."),
        );
        let answer =
            adapter(mock).generate("sterilization protocol", &context(), None).await.unwrap();

        assert!(answer.retried);
        assert!(answer.refused);
        assert!(answer.text.starts_with("There is insufficient information."));
    }

    #[tokio::test]
    async fn retry_failure_propagates() {
        let mock = Arc::new(
            MockGenerator::default().with_reply("insufficient information").with_failure("timeout"),
        );
        let result = adapter(mock).generate("sterilization protocol", &context(), None).await;
        assert!(matches!(result, Err(ChatError::Generation(_))));
    }

    #[tokio::test]
    async fn clarification_mode_strips_sections() {
        let mock = Arc::new(MockGenerator::default().with_reply(
            "İmplant boyun bölgesinden mi yoksa gövdeden mi kırıldı?\n\n\
             Kaynak: arşiv\n\nUyarı: ...",
        ));
        let answer =
            adapter(mock.clone()).generate("implant kırıldı", &context(), None).await.unwrap();

        assert_eq!(answer.mode, ResponseMode::AwaitingClarification);
        assert_eq!(answer.text, "İmplant boyun bölgesinden mi yoksa gövdeden mi kırıldı?");
        assert!(!mock.requests().await[0].system.contains(SOURCE_HEADING));
    }
}

//! The per-request chat pipeline.
//!
//! [`ChatPipeline`] runs load → match → assemble → generate for one
//! question. Nothing is cached between calls: the corpus is re-read on every
//! request so edits to the data directory take effect immediately.
//!
//! ```rust,ignore
//! let pipeline = ChatPipeline::builder()
//!     .corpus(Arc::new(DirectoryCorpus::with_default_candidates(".")))
//!     .generator(Arc::new(OpenAIClient::new(OpenAIConfig::from_env()?)?))
//!     .build()?;
//!
//! let outcome = pipeline.answer("implant kırıldı", None).await?;
//! ```

use std::sync::Arc;

use digimplant_model::{ModelTier, TextGenerator};
use digimplant_rag::{
    CaseRecord, ContextAssembler, CorpusSource, Document, MatchTier, RagConfig, RelevanceMatcher,
};
use tracing::{info, warn};

use crate::adapter::{Answer, AnswerConfig, AnswerGenerator};
use crate::error::{ChatError, Result};

/// What one pipeline run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub answer: Answer,
    /// Documents in the corpus at request time.
    pub corpus_size: usize,
    pub match_count: usize,
    pub match_tier: MatchTier,
    /// Estimated USD cost, when the model is priced and usage was reported.
    pub cost_usd: Option<f64>,
}

/// Answers clinician questions against the document corpus.
pub struct ChatPipeline {
    corpus: Arc<dyn CorpusSource>,
    matcher: RelevanceMatcher,
    assembler: ContextAssembler,
    answerer: AnswerGenerator,
    tier: Option<ModelTier>,
}

impl ChatPipeline {
    pub fn builder() -> ChatPipelineBuilder {
        ChatPipelineBuilder::default()
    }

    /// Pricing tier of the configured model, if it is a priced one.
    pub fn model_tier(&self) -> Option<ModelTier> {
        self.tier
    }

    /// Answer `question`, optionally in the context of a planned case.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Generation`] when the generator fails. Corpus
    /// problems never fail a request; they only shrink the corpus.
    pub async fn answer(
        &self,
        question: &str,
        case_record: Option<&CaseRecord>,
    ) -> Result<ChatOutcome> {
        let corpus = self.load_corpus().await;
        let matches = self.matcher.find(question, &corpus);
        let context = self.assembler.assemble(&matches.documents, case_record);

        info!(
            corpus_size = corpus.len(),
            match_count = matches.len(),
            match_tier = ?matches.tier,
            exact = matches.exact_count,
            expanded = matches.expanded_count,
            context_chars = context.text.chars().count(),
            "context assembled"
        );

        let answer = self.answerer.generate(question, &context, case_record).await?;

        let cost_usd = match (self.tier, answer.usage) {
            (Some(tier), Some(usage)) => {
                let cost = usage.cost(tier);
                info!(
                    question,
                    input_tokens = usage.input_tokens,
                    output_tokens = usage.output_tokens,
                    cost_usd = cost,
                    model = tier.as_str(),
                    "chat cost"
                );
                Some(cost)
            }
            _ => None,
        };

        Ok(ChatOutcome {
            answer,
            corpus_size: corpus.len(),
            match_count: matches.len(),
            match_tier: matches.tier,
            cost_usd,
        })
    }

    async fn load_corpus(&self) -> Vec<Document> {
        let corpus = Arc::clone(&self.corpus);
        match tokio::task::spawn_blocking(move || corpus.load()).await {
            Ok(documents) => documents,
            Err(e) => {
                warn!(error = %e, "corpus load task failed; continuing with an empty corpus");
                Vec::new()
            }
        }
    }
}

/// Builder for [`ChatPipeline`].
///
/// `corpus` and `generator` are required; the configs default.
#[derive(Default)]
pub struct ChatPipelineBuilder {
    rag_config: Option<RagConfig>,
    answer_config: Option<AnswerConfig>,
    corpus: Option<Arc<dyn CorpusSource>>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl ChatPipelineBuilder {
    pub fn rag_config(mut self, config: RagConfig) -> Self {
        self.rag_config = Some(config);
        self
    }

    pub fn answer_config(mut self, config: AnswerConfig) -> Self {
        self.answer_config = Some(config);
        self
    }

    pub fn corpus(mut self, corpus: Arc<dyn CorpusSource>) -> Self {
        self.corpus = Some(corpus);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// # Errors
    ///
    /// Returns [`ChatError::ConfigError`] if `corpus` or `generator` is missing.
    pub fn build(self) -> Result<ChatPipeline> {
        let corpus =
            self.corpus.ok_or_else(|| ChatError::ConfigError("corpus is required".to_string()))?;
        let generator = self
            .generator
            .ok_or_else(|| ChatError::ConfigError("generator is required".to_string()))?;
        let rag_config = self.rag_config.unwrap_or_default();

        let tier = ModelTier::from_model_name(generator.name());
        if tier.is_none() {
            warn!(model = generator.name(), "model has no price entry; cost logging disabled");
        }

        Ok(ChatPipeline {
            corpus,
            matcher: RelevanceMatcher::new(&rag_config),
            assembler: ContextAssembler::new(&rag_config),
            answerer: AnswerGenerator::new(generator, self.answer_config.unwrap_or_default()),
            tier,
        })
    }
}

//! # digimplant-rag
//!
//! Retrieval for the Digimplant clinical chat: a small JSON corpus is read
//! from disk on every request, matched against the question with a
//! bilingual (English / Turkish) keyword table, and serialized into a
//! size-bounded prompt context.
//!
//! ```rust,ignore
//! use digimplant_rag::{
//!     ContextAssembler, CorpusSource, DirectoryCorpus, RagConfig, RelevanceMatcher,
//! };
//!
//! let config = RagConfig::default();
//! let corpus = DirectoryCorpus::with_default_candidates(std::env::current_dir()?).load();
//! let matches = RelevanceMatcher::new(&config).find("implant kırıldı", &corpus);
//! let context = ContextAssembler::new(&config).assemble(&matches.documents, None);
//! ```

pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod loader;
pub mod matcher;
pub mod normalize;
pub mod synonyms;

pub use config::{RagConfig, RagConfigBuilder};
pub use context::{AssembledContext, ContextAssembler, NO_DATA_PLACEHOLDER};
pub use document::{CaseRecord, Document, ImplantDetails, SurgicalPlan, ToothPlan};
pub use error::{RagError, Result};
pub use loader::{CorpusSource, DirectoryCorpus, StaticCorpus};
pub use matcher::{MatchSet, MatchTier, QueryAnalysis, RelevanceMatcher, match_documents};
pub use synonyms::{Concept, KeywordFamily, Specificity};

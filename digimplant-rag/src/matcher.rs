//! Keyword relevance matching over an unindexed corpus.
//!
//! Matching is tiered:
//!
//! 1. documents containing the whole query verbatim (case-insensitive),
//! 2. documents containing any expansion term of the query's active concepts,
//! 3. when neither tier finds anything, a prefix of the corpus.
//!
//! Corpus order is kept within each tier and the result is cut to the limit.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RagConfig;
use crate::document::Document;
use crate::normalize::normalize;
use crate::synonyms::{self, Concept, KeywordFamily};

const TURKISH_LETTERS: &[char] = &['ç', 'ğ', 'ı', 'ö', 'ş', 'ü'];

/// How a query was read before matching.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAnalysis {
    /// The lowercased query, used verbatim as the highest-priority term.
    pub normalized: String,
    /// Families whose generic concepts the query mentions.
    pub families: Vec<KeywordFamily>,
    /// Concepts contributing expansion terms.
    pub concepts: Vec<&'static Concept>,
    /// Expansion terms, deduplicated, in table order.
    pub expansions: Vec<&'static str>,
    /// Whether the query reads as Turkish: Turkish letters or Turkish table terms.
    pub turkish: bool,
}

impl QueryAnalysis {
    /// Analyze a raw query.
    pub fn new(query: &str) -> Self {
        let normalized = normalize(query);
        let families = synonyms::classify(&normalized);
        let concepts = synonyms::active_concepts(&normalized);

        let mut expansions: Vec<&'static str> = Vec::new();
        for concept in &concepts {
            for term in concept.expansions {
                if !expansions.contains(term) {
                    expansions.push(term);
                }
            }
        }

        let turkish =
            normalized.contains(TURKISH_LETTERS) || synonyms::mentions_turkish(&normalized);

        Self { normalized, families, concepts, expansions, turkish }
    }

    /// Whether the query mentions a complication.
    pub fn is_complication(&self) -> bool {
        self.families.contains(&KeywordFamily::Complication)
    }

    /// Whether the query mentions a technical topic.
    pub fn is_technical(&self) -> bool {
        self.families.contains(&KeywordFamily::Technical)
    }
}

/// Which tier produced a match set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// At least one document matched the query or its expansions.
    Keyword,
    /// Nothing matched; the leading corpus documents were used.
    Fallback,
}

/// The bounded, ordered documents judged relevant to a query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSet {
    pub documents: Vec<Document>,
    pub tier: MatchTier,
    /// Documents that contained the query verbatim, before truncation.
    pub exact_count: usize,
    /// Documents that only contained an expansion term, before truncation.
    pub expanded_count: usize,
}

impl MatchSet {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Selects relevant documents for a query.
#[derive(Debug, Clone)]
pub struct RelevanceMatcher {
    limit: usize,
    fallback_count: usize,
}

impl Default for RelevanceMatcher {
    fn default() -> Self {
        Self::new(&RagConfig::default())
    }
}

impl RelevanceMatcher {
    /// Create a matcher from the retrieval configuration.
    pub fn new(config: &RagConfig) -> Self {
        Self { limit: config.match_limit, fallback_count: config.fallback_count }
    }

    /// Match with the configured limit.
    pub fn find(&self, query: &str, corpus: &[Document]) -> MatchSet {
        self.find_with_limit(query, corpus, self.limit)
    }

    /// Match and keep at most `limit` documents.
    pub fn find_with_limit(&self, query: &str, corpus: &[Document], limit: usize) -> MatchSet {
        let analysis = QueryAnalysis::new(query);

        let mut exact = Vec::new();
        let mut expanded = Vec::new();
        for (index, document) in corpus.iter().enumerate() {
            let text = document.searchable_text();
            if text.contains(analysis.normalized.as_str()) {
                exact.push(index);
            } else if analysis.expansions.iter().any(|term| text.contains(term)) {
                expanded.push(index);
            }
        }

        let (exact_count, expanded_count) = (exact.len(), expanded.len());
        let (indices, tier) = if exact_count + expanded_count == 0 {
            let prefix = self.fallback_count.min(corpus.len());
            ((0..prefix).collect::<Vec<_>>(), MatchTier::Fallback)
        } else {
            exact.extend(expanded);
            (exact, MatchTier::Keyword)
        };

        let documents: Vec<Document> =
            indices.into_iter().take(limit).map(|index| corpus[index].clone()).collect();

        debug!(
            families = ?analysis.families,
            expansion_count = analysis.expansions.len(),
            exact_count,
            expanded_count,
            ?tier,
            returned = documents.len(),
            "matched query against corpus"
        );

        MatchSet { documents, tier, exact_count, expanded_count }
    }
}

/// Match `query` against `corpus`, returning at most `limit` documents.
pub fn match_documents(query: &str, corpus: &[Document], limit: usize) -> Vec<Document> {
    RelevanceMatcher::default().find_with_limit(query, corpus, limit).documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(body: &str) -> Document {
        Document::new("corpus.json", json!({ "body": body }))
    }

    #[test]
    fn bilingual_expansion_finds_english_document() {
        let corpus = vec![
            doc("sinus lift with lateral window"),
            doc("implant fracture at the neck region may require explantation"),
        ];
        let set = RelevanceMatcher::default().find("implant kırıldı", &corpus);
        assert_eq!(set.tier, MatchTier::Keyword);
        assert_eq!(set.documents, vec![corpus[1].clone()]);
        assert_eq!(set.exact_count, 0);
        assert_eq!(set.expanded_count, 1);
    }

    #[test]
    fn exact_matches_come_first() {
        let corpus = vec![
            doc("bone quality D3 drilling protocol"),
            doc("sterilization protocol for surgical guides"),
        ];
        let set = RelevanceMatcher::default().find("Sterilization Protocol", &corpus);
        assert_eq!(set.documents[0], corpus[1]);
        assert_eq!(set.documents[1], corpus[0]);
        assert_eq!(set.exact_count, 1);
    }

    #[test]
    fn falls_back_to_corpus_prefix() {
        let corpus: Vec<Document> = (0..12).map(|i| doc(&format!("entry {i}"))).collect();
        let set = RelevanceMatcher::default().find("zygomatic", &corpus);
        assert_eq!(set.tier, MatchTier::Fallback);
        assert_eq!(set.documents, corpus[..5].to_vec());
    }

    #[test]
    fn empty_corpus_gives_empty_set() {
        let set = RelevanceMatcher::default().find("sterilization protocol", &[]);
        assert!(set.is_empty());
        assert_eq!(set.tier, MatchTier::Fallback);
    }

    #[test]
    fn whitespace_query_is_literal() {
        let corpus = vec![doc("single spaced text")];
        let analysis = QueryAnalysis::new("   ");
        assert!(analysis.expansions.is_empty());
        let set = RelevanceMatcher::default().find("   ", &corpus);
        assert_eq!(set.tier, MatchTier::Fallback);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn respects_explicit_limit() {
        let corpus: Vec<Document> = (0..8).map(|i| doc(&format!("bone graft {i}"))).collect();
        assert_eq!(match_documents("bone", &corpus, 3).len(), 3);
    }

    #[test]
    fn analysis_detects_turkish() {
        assert!(QueryAnalysis::new("implant kirildi").turkish);
        assert!(QueryAnalysis::new("Gövde").turkish);
        assert!(!QueryAnalysis::new("implant fractured at the neck").turkish);
    }

    #[test]
    fn pain_terms_inside_other_words_add_no_expansions() {
        let analysis = QueryAnalysis::new("How is the abutment attached to the implant?");
        assert!(analysis.concepts.is_empty());
        assert!(!analysis.expansions.contains(&"analgesic"));
    }

    #[test]
    fn analysis_flags_families() {
        let analysis = QueryAnalysis::new("Kemik yetersiz");
        assert!(analysis.is_complication());
        assert!(analysis.is_technical());
        assert!(analysis.expansions.contains(&"augmentation"));
    }
}

//! Prompt context assembly.
//!
//! Documents are flattened into `key: value` lines so the generator reads
//! prose rather than JSON punctuation, then cut at a character budget.

use std::fmt::Write as _;

use serde_json::Value;
use tracing::debug;

use crate::config::RagConfig;
use crate::document::{CaseRecord, Document};

/// Stands in for an empty document section.
pub const NO_DATA_PLACEHOLDER: &str = "No data available";

/// Appended where the budget cut the text.
pub const TRUNCATION_MARKER: &str = "...";

/// The text block handed to the generator alongside the question.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledContext {
    /// Case summary (if any) followed by the document section. Never empty.
    pub text: String,
    /// One label per matched document, in match order.
    pub sources: Vec<String>,
    /// Whether the case summary or the document section was cut at the budget.
    pub truncated: bool,
}

impl AssembledContext {
    /// A copy of this context cut to `max_chars`, used for the simplified retry.
    pub fn trimmed(&self, max_chars: usize) -> Self {
        let (text, cut) = truncate_chars(&self.text, max_chars);
        Self { text, sources: self.sources.clone(), truncated: self.truncated || cut }
    }
}

/// Builds [`AssembledContext`] values under a character budget.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    char_budget: usize,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(&RagConfig::default())
    }
}

impl ContextAssembler {
    pub fn new(config: &RagConfig) -> Self {
        Self { char_budget: config.context_char_budget }
    }

    /// Combine matched documents and an optional case record.
    ///
    /// The case summary takes at most half of the budget; the documents get
    /// what remains.
    pub fn assemble(
        &self,
        matches: &[Document],
        case_record: Option<&CaseRecord>,
    ) -> AssembledContext {
        let documents = matches
            .iter()
            .map(flatten_document)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>();

        let (summary, summary_cut) = match case_record {
            Some(record) => {
                let (summary, cut) = truncate_chars(&summarize_case(record), self.char_budget / 2);
                (Some(summary), cut)
            }
            None => (None, false),
        };
        let document_budget = match &summary {
            Some(summary) => self.char_budget.saturating_sub(summary.chars().count() + 2).max(1),
            None => self.char_budget,
        };

        let (document_section, documents_cut) = if documents.is_empty() {
            (NO_DATA_PLACEHOLDER.to_string(), false)
        } else {
            truncate_chars(&documents.join("\n\n"), document_budget)
        };
        let truncated = summary_cut || documents_cut;

        let text = match summary {
            Some(summary) => format!("{summary}\n\n{document_section}"),
            None => document_section,
        };

        debug!(
            document_count = matches.len(),
            context_chars = text.chars().count(),
            truncated,
            has_case_record = case_record.is_some(),
            "assembled context"
        );

        AssembledContext { text, sources: matches.iter().map(Document::label).collect(), truncated }
    }
}

/// Flatten a document into `key: value` lines.
///
/// Nested objects produce dotted keys, arrays of scalars are joined with
/// `, `, arrays of objects are indexed (`steps.0.name: ...`). Null fields are
/// dropped.
pub fn flatten_document(document: &Document) -> String {
    let mut lines = Vec::new();
    flatten_value(None, &document.fields, &mut lines);
    lines.join("\n")
}

fn flatten_value(prefix: Option<&str>, value: &Value, lines: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, child) in map {
                let key = match prefix {
                    Some(prefix) => format!("{prefix}.{key}"),
                    None => key.clone(),
                };
                flatten_value(Some(&key), child, lines);
            }
        }
        Value::Array(items) if items.iter().all(is_scalar) => {
            let joined = items.iter().filter_map(scalar_text).collect::<Vec<_>>().join(", ");
            push_line(prefix, &joined, lines);
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let key = match prefix {
                    Some(prefix) => format!("{prefix}.{index}"),
                    None => index.to_string(),
                };
                flatten_value(Some(&key), child, lines);
            }
        }
        scalar => {
            if let Some(text) = scalar_text(scalar) {
                push_line(prefix, &text, lines);
            }
        }
    }
}

fn push_line(prefix: Option<&str>, text: &str, lines: &mut Vec<String>) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    match prefix {
        Some(key) => lines.push(format!("{key}: {text}")),
        None => lines.push(text.to_string()),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Compact summary of a case record, placed ahead of the documents.
pub fn summarize_case(record: &CaseRecord) -> String {
    let mut out = String::from("Case record:\n");
    let details = &record.implant_details;
    let plan = &record.surgical_plan;

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Patient: {}", record.patient_name);
    let _ = writeln!(
        out,
        "Implants: {} {} x{} at positions {}",
        details.brand,
        details.model,
        details.count,
        if details.positions.is_empty() { "-".to_string() } else { details.positions.join(", ") }
    );
    if !record.prosthesis_type.is_empty() {
        let _ = writeln!(out, "Prosthesis: {}", record.prosthesis_type);
    }
    let _ = writeln!(out, "Surgical approach: {}", plan.approach);
    let _ = writeln!(out, "Bone quality: {}", plan.bone_quality);
    if !plan.recommendations.is_empty() {
        let _ = writeln!(out, "Recommendations: {}", plan.recommendations.join(", "));
    }
    for tooth in &record.teeth_data {
        let _ = writeln!(
            out,
            "Tooth {}: {} {} {}x{} mm, expected bone {}, drill protocol {}",
            tooth.tooth_number,
            tooth.implant_brand,
            tooth.implant_model,
            tooth.implant_diameter,
            tooth.implant_length,
            tooth.expected_bone_quality,
            tooth.recommended_drill_protocol
        );
    }
    if let Some(notes) = record.clinical_notes.as_deref().filter(|n| !n.trim().is_empty()) {
        let _ = writeln!(out, "Clinical notes: {}", notes.trim());
    }

    out.trim_end().to_string()
}

/// Cut `text` to `max_chars` characters, appending [`TRUNCATION_MARKER`] when cut.
fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (format!("{}{TRUNCATION_MARKER}", &text[..byte_index]), true),
        None => (text.to_string(), false),
    }
}

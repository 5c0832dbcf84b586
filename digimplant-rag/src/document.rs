//! Data types for corpus documents and case records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::normalize;

/// Field names checked, in order, when labelling a document as a source.
const LABEL_FIELDS: &[&str] = &["title", "baslik", "başlık", "source", "kaynak", "name"];

/// A loosely structured entry of the clinical corpus.
///
/// No schema is enforced: `fields` holds whatever JSON value the corpus file
/// contained (typically an object with a title, body text, authorship and
/// domain fields such as a drilling protocol or bone-quality class).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// File name the document was loaded from.
    pub origin: String,
    /// The document content.
    pub fields: Value,
}

impl Document {
    /// Create a document from its origin and content.
    pub fn new(origin: impl Into<String>, fields: Value) -> Self {
        Self { origin: origin.into(), fields }
    }

    /// Compact JSON rendering of the fields.
    pub fn to_json(&self) -> String {
        // Serializing a `Value` cannot fail: all map keys are strings.
        serde_json::to_string(&self.fields).unwrap_or_default()
    }

    /// Normalized (lowercased) JSON rendering used for substring matching.
    pub fn searchable_text(&self) -> String {
        normalize(&self.to_json())
    }

    /// Human-readable label used in the `Source:` section of an answer.
    pub fn label(&self) -> String {
        if let Value::Object(map) = &self.fields {
            for key in LABEL_FIELDS {
                if let Some(Value::String(text)) = map.get(*key) {
                    let text = text.trim();
                    if !text.is_empty() {
                        return text.to_string();
                    }
                }
            }
        }
        self.origin.clone()
    }
}

/// Implant details of a planned case.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImplantDetails {
    pub brand: String,
    pub model: String,
    pub count: u32,
    #[serde(default)]
    pub positions: Vec<String>,
}

/// Surgical plan fields of a planned case.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurgicalPlan {
    pub approach: String,
    pub bone_quality: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Per-tooth planning data filled in by the planning team.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ToothPlan {
    pub tooth_number: String,
    pub implant_brand: String,
    pub implant_model: String,
    pub implant_diameter: String,
    pub implant_length: String,
    pub expected_bone_quality: String,
    pub recommended_drill_protocol: String,
}

/// An order/report describing a specific patient's planned implant case.
///
/// Owned by the ordering system; the chat only reads it to enrich context.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub patient_name: String,
    pub implant_details: ImplantDetails,
    #[serde(default)]
    pub prosthesis_type: String,
    pub surgical_plan: SurgicalPlan,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teeth_data: Vec<ToothPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn label_prefers_title() {
        let doc = Document::new("a.json", json!({"title": "Neck fracture", "source": "Misch"}));
        assert_eq!(doc.label(), "Neck fracture");
    }

    #[test]
    fn label_falls_back_to_origin() {
        let doc = Document::new("protocols.json", json!(["drill", 2.0]));
        assert_eq!(doc.label(), "protocols.json");
    }

    #[test]
    fn searchable_text_is_lowercase_and_keeps_turkish() {
        let doc = Document::new("a.json", json!({"Başlık": "Kırık İmplant"}));
        let text = doc.searchable_text();
        assert!(text.contains("kırık implant"));
        assert!(text.contains("başlık"));
    }

    #[test]
    fn case_record_reads_camel_case_report() {
        let record: CaseRecord = serde_json::from_value(json!({
            "patientName": "Ayşe Demir",
            "implantDetails": {
                "brand": "Straumann",
                "model": "BLT",
                "count": 1,
                "positions": ["36"]
            },
            "prosthesisType": "Köprü",
            "surgicalPlan": {"approach": "Flapsız cerrahi", "boneQuality": "D2"},
            "teethData": [{"toothNumber": "36", "recommendedDrillProtocol": "2.2 / 2.8 / 3.5"}],
            "status": "approved"
        }))
        .unwrap();

        assert_eq!(record.implant_details.positions, vec!["36"]);
        assert_eq!(record.surgical_plan.bone_quality, "D2");
        assert!(record.surgical_plan.recommendations.is_empty());
        assert_eq!(record.teeth_data[0].recommended_drill_protocol, "2.2 / 2.8 / 3.5");
        assert_eq!(record.clinical_notes, None);
    }
}

//! Bilingual (English / Turkish) keyword table.
//!
//! Every concept lists the surface forms that reveal it in a question and
//! the terms searched for in the corpus once it is active (`expansions`).
//! Triggers match at word starts of the normalized query, so stems such as
//! `kırıl` cover their Turkish inflections while `ache` stays out of
//! `attached`. English and Turkish triggers are kept apart so the reply
//! language can be guessed; Turkish ones are also listed without diacritics
//! because clinicians often type on keyboards without them.

use serde::{Deserialize, Serialize};

use crate::normalize::contains_at_word_start;

/// The keyword family a concept belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordFamily {
    /// Intra- or post-operative problems; these trigger the clarification protocol.
    Complication,
    /// Procedural and planning questions.
    Technical,
}

/// Whether a concept names a general topic or a specific brand or device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specificity {
    /// A general topic. Generic concepts decide which families a query belongs to.
    Generic,
    /// A brand or device part. Refines a family the query already belongs to
    /// and suppresses that family's generic expansions.
    Specific,
}


/// One entry of the synonym table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Concept {
    pub family: KeywordFamily,
    pub name: &'static str,
    pub specificity: Specificity,
    /// English word stems.
    pub triggers: &'static [&'static str],
    /// Turkish word stems, with and without diacritics.
    pub turkish: &'static [&'static str],
    pub expansions: &'static [&'static str],
}

impl Concept {
    /// Whether the normalized query mentions this concept in either language.
    pub fn is_mentioned_in(&self, normalized_query: &str) -> bool {
        self.triggers
            .iter()
            .chain(self.turkish)
            .any(|trigger| contains_at_word_start(normalized_query, trigger))
    }

    /// Whether the normalized query mentions this concept in Turkish.
    pub fn is_mentioned_in_turkish(&self, normalized_query: &str) -> bool {
        self.turkish.iter().any(|trigger| contains_at_word_start(normalized_query, trigger))
    }
}

const fn generic(
    family: KeywordFamily,
    name: &'static str,
    triggers: &'static [&'static str],
    turkish: &'static [&'static str],
    expansions: &'static [&'static str],
) -> Concept {
    Concept { family, name, specificity: Specificity::Generic, triggers, turkish, expansions }
}

const fn specific(
    family: KeywordFamily,
    name: &'static str,
    triggers: &'static [&'static str],
    turkish: &'static [&'static str],
    expansions: &'static [&'static str],
) -> Concept {
    Concept { family, name, specificity: Specificity::Specific, triggers, turkish, expansions }
}

use KeywordFamily::{Complication, Technical};

/// The synonym table consumed by the matcher and the response-mode classifier.
pub static CONCEPTS: &[Concept] = &[
    // Complications
    generic(
        Complication,
        "fracture",
        &["fracture", "broke", "break", "crack"],
        &["kırık", "kırıl", "kirik", "kiril", "çatla", "catla"],
        &["fracture", "fractured", "broken", "crack", "kırık", "kırılma", "kırıl", "çatlak"],
    ),
    generic(
        Complication,
        "stuck",
        &["stuck", "jammed", "seized"],
        &["sıkış", "sikis", "takıl", "takil", "çıkmıyor", "cikmiyor"],
        &["stuck", "jammed", "seized", "removal", "sıkışma", "sıkıştı", "takıldı", "çıkarma"],
    ),
    generic(
        Complication,
        "bleeding",
        &["bleed", "hemorrhage", "haemorrhage"],
        &["kanama", "kanıyor", "kaniyor"],
        &["bleeding", "hemorrhage", "hemostasis", "kanama", "hemostaz"],
    ),
    generic(
        Complication,
        "insufficient",
        &["insufficient", "inadequate", "deficien"],
        &["yetersiz"],
        &["insufficient", "inadequate", "deficiency", "augmentation", "yetersiz", "greft"],
    ),
    generic(
        Complication,
        "failure",
        &["failure", "failed"],
        &["başarısız", "basarisiz", "tutmadı", "tutmadi"],
        &[
            "failure",
            "failed",
            "osseointegration",
            "başarısız",
            "başarısızlık",
            "osseointegrasyon",
        ],
    ),
    generic(
        Complication,
        "pain",
        &["pain", "ache", "aching", "sore"],
        &["ağrı", "agri", "sızı"],
        &["pain", "analgesic", "ağrı", "analjezik"],
    ),
    generic(
        Complication,
        "inflammation",
        &["inflam", "infection", "implantitis", "periimplantitis", "swelling"],
        &["iltihap", "enflamasyon", "enfeksiyon", "şişlik", "sislik"],
        &[
            "inflammation",
            "infection",
            "peri-implantitis",
            "iltihap",
            "enflamasyon",
            "enfeksiyon",
        ],
    ),
    generic(
        Complication,
        "mobility",
        &["mobility", "loose", "wobbl"],
        &["mobilite", "sallan", "oynuyor", "gevşe", "gevse"],
        &["mobility", "loosening", "loose", "mobilite", "sallanma", "gevşeme"],
    ),
    specific(
        Complication,
        "abutment_screw",
        &["screw"],
        &["vida"],
        &["abutment screw", "screw", "vida", "abutment vidası"],
    ),
    specific(
        Complication,
        "drill",
        &["drill"],
        &["frez"],
        &["drill", "frez", "drill fracture", "frez kırığı"],
    ),
    specific(
        Complication,
        "guide_sleeve",
        &["sleeve"],
        &["kovan", "burç", "burc"],
        &["sleeve", "guide sleeve", "kovan", "burç"],
    ),
    specific(
        Complication,
        "implant_driver",
        &["driver", "mount"],
        &["taşıyıcı", "tasiyici"],
        &["implant driver", "mount", "taşıyıcı"],
    ),
    // Technical topics
    generic(
        Technical,
        "protocol",
        &["protocol", "procedure"],
        &["protokol", "prosedür", "prosedur"],
        &["protocol", "procedure", "protokol", "prosedür"],
    ),
    generic(
        Technical,
        "drilling",
        &["drilling", "osteotomy"],
        &["frezleme", "oyma"],
        &["drilling", "drill", "osteotomy", "frezleme", "frez"],
    ),
    generic(
        Technical,
        "placement",
        &["placement", "insertion"],
        &["yerleştir", "yerlestir"],
        &["placement", "insertion", "torque", "yerleştirme", "tork"],
    ),
    generic(
        Technical,
        "bone",
        &["bone"],
        &["kemik"],
        &["bone", "bone quality", "density", "kemik", "kemik kalitesi", "yoğunluk"],
    ),
    generic(
        Technical,
        "anesthesia",
        &["anesthe", "anaesthe"],
        &["anestez", "uyuşturma", "uyusturma"],
        &["anesthesia", "anesthetic", "articaine", "lidocaine", "anestezi"],
    ),
    generic(
        Technical,
        "suturing",
        &["sutur", "stitch"],
        &["dikiş", "dikis"],
        &["suture", "suturing", "sütur", "dikiş"],
    ),
    generic(
        Technical,
        "planning",
        &["planning", "treatment plan"],
        &["planlama", "planla"],
        &["planning", "treatment plan", "cbct", "planlama", "tedavi planı"],
    ),
    generic(
        Technical,
        "measurement",
        &["measure"],
        &["ölçü", "olcu", "olcum"],
        &["measurement", "length", "diameter", "ölçüm", "uzunluk", "çap"],
    ),
    generic(
        Technical,
        "template",
        &["template", "guide"],
        &["şablon", "sablon", "rehber"],
        &["template", "surgical guide", "guide", "şablon", "cerrahi rehber"],
    ),
    generic(
        Technical,
        "sterilization",
        &["steril", "autoclave", "disinfect"],
        &["otoklav", "dezenfeksiyon", "sterilizasyon"],
        &["sterilization", "sterile", "autoclave", "sterilizasyon", "otoklav"],
    ),
    specific(
        Technical,
        "nobel_biocare",
        &["nobel"],
        &[],
        &["nobel biocare", "nobelactive", "nobelreplace", "nobel"],
    ),
    specific(
        Technical,
        "straumann",
        &["straumann", "roxolid"],
        &[],
        &["straumann", "bone level", "blt", "roxolid"],
    ),
    specific(Technical, "osstem", &["osstem"], &[], &["osstem", "tsiii"]),
    specific(Technical, "megagen", &["megagen", "anyridge"], &[], &["megagen", "anyridge"]),
    specific(Technical, "zimmer", &["zimmer"], &[], &["zimmer", "screw-vent"]),
    specific(Technical, "astra_tech", &["astra"], &[], &["astra tech", "osseospeed"]),
    specific(Technical, "dentium", &["dentium", "superline"], &[], &["dentium", "superline"]),
    specific(Technical, "neodent", &["neodent"], &[], &["neodent"]),
];

/// Whether `normalized_query` uses a Turkish term from the table.
pub fn mentions_turkish(normalized_query: &str) -> bool {
    CONCEPTS.iter().any(|concept| concept.is_mentioned_in_turkish(normalized_query))
}

/// Families whose generic concepts are mentioned in `normalized_query`.
pub fn classify(normalized_query: &str) -> Vec<KeywordFamily> {
    let mut families = Vec::new();
    for concept in CONCEPTS {
        if concept.specificity == Specificity::Generic
            && !families.contains(&concept.family)
            && concept.is_mentioned_in(normalized_query)
        {
            families.push(concept.family);
        }
    }
    families
}

/// Concepts whose expansions apply to `normalized_query`.
///
/// Only families the query belongs to contribute. Within a family, a
/// mentioned specific concept (brand or device) replaces the family's
/// generic concepts.
pub fn active_concepts(normalized_query: &str) -> Vec<&'static Concept> {
    let mut active = Vec::new();
    for family in classify(normalized_query) {
        let mentioned: Vec<&'static Concept> = CONCEPTS
            .iter()
            .filter(|c| c.family == family && c.is_mentioned_in(normalized_query))
            .collect();
        let has_specific = mentioned.iter().any(|c| c.specificity == Specificity::Specific);
        active.extend(
            mentioned
                .into_iter()
                .filter(|c| !has_specific || c.specificity == Specificity::Specific),
        );
    }
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn names(query: &str) -> Vec<&'static str> {
        active_concepts(&normalize(query)).into_iter().map(|c| c.name).collect()
    }

    #[test]
    fn turkish_inflection_hits_fracture() {
        assert_eq!(classify(&normalize("implant kırıldı")), vec![KeywordFamily::Complication]);
        assert_eq!(names("implant kırıldı"), vec!["fracture"]);
    }

    #[test]
    fn implant_alone_is_not_technical() {
        assert!(classify("implant").is_empty());
    }

    #[test]
    fn technical_query_is_classified() {
        assert_eq!(classify("sterilization protocol"), vec![KeywordFamily::Technical]);
        assert_eq!(names("sterilization protocol"), vec!["protocol", "sterilization"]);
    }

    #[test]
    fn device_term_suppresses_generic_expansions() {
        assert_eq!(names("abutment vidası kırıldı"), vec!["abutment_screw"]);
    }

    #[test]
    fn brand_alone_does_not_classify() {
        assert!(classify("straumann").is_empty());
        assert!(names("straumann").is_empty());
    }

    #[test]
    fn brand_refines_technical_family() {
        assert_eq!(names("straumann drilling protocol"), vec!["straumann"]);
    }

    #[test]
    fn families_are_independent() {
        let active = names("kemik yetersiz, frez kırıldı");
        // Complication narrows to the drill, technical keeps its generic bone concept.
        assert_eq!(active, vec!["drill", "bone"]);
    }

    #[test]
    fn triggers_match_at_word_starts_only() {
        assert!(classify("how is the abutment attached to the implant?").is_empty());
        assert!(classify("we reached the planned depth, what next?").is_empty());
        assert!(!classify(&normalize("Sizin sterilizasyon protokolünüz nedir?"))
            .contains(&KeywordFamily::Complication));
        assert_eq!(classify("peri-implantitis around 36"), vec![KeywordFamily::Complication]);
        assert_eq!(names("my tooth aches"), vec!["pain"]);
    }

    #[test]
    fn turkish_terms_are_detected_without_diacritics() {
        assert!(mentions_turkish("implant kirildi"));
        assert!(mentions_turkish(&normalize("İmplant kırıldı")));
        assert!(!mentions_turkish("implant fractured"));
    }

    #[test]
    fn every_concept_has_terms() {
        for concept in CONCEPTS {
            assert!(!concept.triggers.is_empty(), "{} has no triggers", concept.name);
            for term in concept.turkish {
                assert!(!concept.triggers.contains(term), "{} lists {term} twice", concept.name);
            }
            assert!(!concept.expansions.is_empty(), "{} has no expansions", concept.name);
            for term in concept.triggers.iter().chain(concept.turkish).chain(concept.expansions) {
                let name = concept.name;
                assert_eq!(*term, normalize(term), "{name} term {term} is not normalized");
            }
        }
    }
}

//! Instruction text sent to the generator.

use digimplant_rag::{AssembledContext, CaseRecord};

use crate::protocol::ResponseMode;

/// Heading of the section naming where the answer came from.
pub const SOURCE_HEADING: &str = "Source:";

/// Heading of the liability disclaimer.
pub const WARNING_HEADING: &str = "Warning:";

/// Disclaimer placed under [`WARNING_HEADING`] in every full answer.
pub const WARNING_TEXT: &str = "This is only a suggestion; clinical and legal responsibility \
     rests with the treating clinician.";

/// Source line used when no document was matched.
pub const GENERAL_PRACTICE_SOURCE: &str = "Generally accepted clinical practice";

const PERSONA: &str = "\
You are a dental implant specialist assisting clinicians who order surgical guides \
from Digimplant Solutions.

Rules:
- Always base your answer on the reference information supplied with the question.
- Never say that there is insufficient information or that the archive has nothing on the topic. \
If nothing matches exactly, adapt the closest information; \
if there is none, give the generally accepted clinical protocol.
- Reply in the language the question is written in.";

const CLARIFICATION_RULES: &str = "\
Response mode: CLARIFICATION.
The clinician reports a complication without saying where or when it occurred.
Reply with exactly one short clarifying question, \
for example whether the problem is at the neck or the body of the implant, \
or whether it happened early or late after placement.
Do not propose a solution yet and do not add source or disclaimer sections.";

fn answer_rules() -> String {
    format!(
        "Response mode: ANSWER.\n\
         Use this format, with each heading on its own line:\n\
         [Solution]\n\n\
         {SOURCE_HEADING}\n\
         [Where the information comes from]\n\n\
         {WARNING_HEADING}\n\
         {WARNING_TEXT}"
    )
}

fn mode_rules(mode: ResponseMode) -> String {
    match mode {
        ResponseMode::AwaitingClarification => CLARIFICATION_RULES.to_string(),
        ResponseMode::Answering => answer_rules(),
    }
}

/// Persona, rules and response format for the first attempt.
pub fn system_instruction(mode: ResponseMode) -> String {
    format!("{PERSONA}\n\n{}", mode_rules(mode))
}

/// Context block plus the literal question for the first attempt.
pub fn task_prompt(
    question: &str,
    context: &AssembledContext,
    case_record: Option<&CaseRecord>,
) -> String {
    let mut prompt = String::new();
    if let Some(record) = case_record {
        prompt.push_str(&case_line(record));
        prompt.push_str("\n\n");
    }
    prompt.push_str(&format!(
        "QUESTION: {question}\n\n\
         Use the following information to answer the question:\n\n\
         {}\n\n\
         Answer using this information. Never say that the information is insufficient.",
        context.text
    ));
    if !context.sources.is_empty() {
        prompt.push_str(&format!("\nAvailable sources: {}", context.sources.join("; ")));
    }
    prompt
}

/// Shorter instruction used once when the first reply was a refusal.
pub fn retry_system_instruction(mode: ResponseMode) -> String {
    format!(
        "You are a dental implant specialist. Answer the clinician directly from the notes below, \
         or from generally accepted clinical practice when the notes do not cover the question. \
         Do not mention missing information. Reply in the language of the question.\n\n{}",
        mode_rules(mode)
    )
}

/// Question plus the trimmed context for the retry.
pub fn retry_prompt(question: &str, context: &AssembledContext) -> String {
    format!("QUESTION: {question}\n\nNOTES:\n{}", context.text)
}

fn case_line(record: &CaseRecord) -> String {
    let implant = &record.implant_details;
    format!(
        "The question concerns the planned case of {} ({} {}, {} implant(s)).",
        record.patient_name, implant.brand, implant.model, implant.count
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(text: &str) -> AssembledContext {
        AssembledContext {
            text: text.to_string(),
            sources: vec!["misch.json".into()],
            truncated: false,
        }
    }

    #[test]
    fn clarification_instruction_omits_sections() {
        let system = system_instruction(ResponseMode::AwaitingClarification);
        assert!(system.contains("exactly one short clarifying question"));
        assert!(!system.contains(SOURCE_HEADING));
        assert!(!system.contains(WARNING_HEADING));
    }

    #[test]
    fn answer_instruction_lists_sections() {
        let system = system_instruction(ResponseMode::Answering);
        assert!(system.lines().any(|line| line == SOURCE_HEADING));
        assert!(system.lines().any(|line| line == WARNING_HEADING));
        assert!(system.contains(WARNING_TEXT));
    }

    #[test]
    fn task_prompt_embeds_question_and_context() {
        let prompt = task_prompt("implant kırıldı", &context("title: Fracture"), None);
        assert!(prompt.contains("QUESTION: implant kırıldı"));
        assert!(prompt.contains("title: Fracture"));
        assert!(prompt.contains("misch.json"));
    }

    #[test]
    fn task_prompt_names_case_patient() {
        let record = CaseRecord { patient_name: "Ayşe Demir".into(), ..Default::default() };
        let prompt = task_prompt("q", &context("c"), Some(&record));
        assert!(prompt.starts_with("The question concerns the planned case of Ayşe Demir"));
    }
}

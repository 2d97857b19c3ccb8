use crate::section::Section;
use crate::state::{AttachmentThumb, ControlState};
use forms_protocol::{display_value, file_name_from_path, is_image_filename, AnswerRecord, PartKind};
use std::collections::HashMap;

/// Merge previously saved answers into per-control state, keyed by control
/// id. Controls with no prior answers are omitted entirely rather than
/// zero-filled.
pub fn hydrate_answers(
    sections: &[Section],
    answers: &[AnswerRecord],
) -> HashMap<i64, ControlState> {
    let by_question: HashMap<i64, &AnswerRecord> =
        answers.iter().map(|answer| (answer.question, answer)).collect();

    let mut states = HashMap::new();

    for section in sections {
        for control in &section.controls {
            let mut state = ControlState::default();

            if let Some(record) = lookup(&by_question, control.parts.get(PartKind::Policy)) {
                state.policy = Some(display_value(&record.value));
                state.ids.policy = Some(record.id);
            }
            if let Some(record) = lookup(&by_question, control.parts.get(PartKind::Practice)) {
                state.practice = Some(display_value(&record.value));
                state.ids.practice = Some(record.id);
            }
            if let Some(record) = lookup(&by_question, control.parts.get(PartKind::Info)) {
                // Older records kept the note in `evidence` instead of `value`.
                let mut text = display_value(&record.value);
                if text.is_empty() {
                    if let Some(evidence) = &record.evidence {
                        text = evidence.clone();
                    }
                }
                state.info = Some(text);
                state.ids.info = Some(record.id);
            }
            if let Some(record) = lookup(&by_question, control.parts.get(PartKind::Attachment)) {
                if let Some(stored) = record.attachment.as_deref().filter(|s| !s.is_empty()) {
                    let name = file_name_from_path(stored).to_string();
                    state.attachments.push(AttachmentThumb {
                        is_image: is_image_filename(&name),
                        name,
                        url: Some(stored.to_string()),
                        pending: false,
                    });
                    state.ids.attachment = Some(record.id);
                }
            }

            if !state.is_blank() {
                states.insert(control.id, state);
            }
        }
    }

    states
}

fn lookup<'a>(
    by_question: &HashMap<i64, &'a AnswerRecord>,
    question: Option<i64>,
) -> Option<&'a AnswerRecord> {
    question.and_then(|id| by_question.get(&id).copied())
}

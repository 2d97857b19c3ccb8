use crate::backend::FormsBackend;
use crate::error::{EngineError, Result};
use forms_protocol::{AnswerPayload, AnswerRecord};

/// Partial edit of a control's text fields. `Some("")` clears a field;
/// `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub policy: Option<String>,
    pub practice: Option<String>,
    pub info: Option<String>,
}

impl FieldPatch {
    pub fn policy(value: impl Into<String>) -> Self {
        Self {
            policy: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn practice(value: impl Into<String>) -> Self {
        Self {
            practice: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn info(value: impl Into<String>) -> Self {
        Self {
            info: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.policy.is_none() && self.practice.is_none() && self.info.is_none()
    }
}

/// Write one answer with create-or-update semantics. Three tiers, in order:
/// the dedicated upsert endpoint, a plain create, then fetch-and-patch of an
/// existing (submission, question) record. This is the only resilience
/// mechanism in the system and compensates for backend endpoint variability.
/// When no existing record is found in the last tier, the create error
/// propagates.
pub async fn ensure_answer<B>(backend: &B, payload: &AnswerPayload) -> Result<AnswerRecord>
where
    B: FormsBackend + ?Sized,
{
    match backend.upsert_answer(payload).await {
        Ok(saved) => return Ok(saved),
        Err(err) => log::debug!(
            "upsert endpoint failed for question {}: {err}",
            payload.question
        ),
    }

    match backend.create_answer(payload).await {
        Ok(saved) => Ok(saved),
        Err(create_err) => {
            let existing = backend
                .find_answers(payload.submission, payload.question)
                .await?;
            match existing.first() {
                Some(found) => Ok(backend.patch_answer(found.id, payload).await?),
                None => Err(EngineError::Backend(create_err)),
            }
        }
    }
}

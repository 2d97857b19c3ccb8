use async_trait::async_trait;
use forms_protocol::{
    AnswerPayload, AnswerRecord, DashboardEnvelope, DomainNode, SubmissionItem, TemplateDetail,
};
use thiserror::Error;

/// Opaque failure from a backend implementation. The engine never inspects
/// backend errors beyond logging and fallback sequencing.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct BackendError(#[from] anyhow::Error);

impl BackendError {
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(anyhow::Error::new(err))
    }

    pub fn msg(message: impl Into<String>) -> Self {
        Self(anyhow::anyhow!(message.into()))
    }
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Everything the questionnaire engine needs from the REST backend. The
/// production implementation wraps `forms_client::ApiClient`; tests use an
/// in-memory store.
#[async_trait]
pub trait FormsBackend: Send + Sync {
    async fn ensure_submission(
        &self,
        client_id: i64,
        template_slug: &str,
    ) -> BackendResult<DashboardEnvelope>;

    async fn template_detail(&self, id: i64) -> BackendResult<TemplateDetail>;

    async fn domains_by_framework(&self, framework_id: i64) -> BackendResult<Vec<DomainNode>>;

    async fn list_answers(&self, submission: i64) -> BackendResult<Vec<AnswerRecord>>;

    async fn find_answers(&self, submission: i64, question: i64)
        -> BackendResult<Vec<AnswerRecord>>;

    async fn upsert_answer(&self, payload: &AnswerPayload) -> BackendResult<AnswerRecord>;

    async fn create_answer(&self, payload: &AnswerPayload) -> BackendResult<AnswerRecord>;

    async fn patch_answer(&self, id: i64, payload: &AnswerPayload) -> BackendResult<AnswerRecord>;

    async fn attach_file(
        &self,
        answer_id: i64,
        filename: &str,
        bytes: Vec<u8>,
    ) -> BackendResult<AnswerRecord>;

    async fn start_review(&self, submission: i64) -> BackendResult<SubmissionItem>;

    async fn submit(&self, submission: i64) -> BackendResult<SubmissionItem>;
}

use async_trait::async_trait;
use forms_client::ApiClient;
use forms_engine::{BackendError, BackendResult, FormsBackend};
use forms_protocol::{
    AnswerPayload, AnswerRecord, DashboardEnvelope, DomainNode, SubmissionItem, TemplateDetail,
};

/// Adapts the REST client to the engine's backend seam.
pub struct HttpBackend {
    api: ApiClient,
}

impl HttpBackend {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl FormsBackend for HttpBackend {
    async fn ensure_submission(
        &self,
        client_id: i64,
        template_slug: &str,
    ) -> BackendResult<DashboardEnvelope> {
        self.api
            .ensure_submission(client_id, template_slug)
            .await
            .map_err(BackendError::new)
    }

    async fn template_detail(&self, id: i64) -> BackendResult<TemplateDetail> {
        self.api.template_detail(id).await.map_err(BackendError::new)
    }

    async fn domains_by_framework(&self, framework_id: i64) -> BackendResult<Vec<DomainNode>> {
        self.api
            .domains_by_framework(framework_id)
            .await
            .map_err(BackendError::new)
    }

    async fn list_answers(&self, submission: i64) -> BackendResult<Vec<AnswerRecord>> {
        self.api.list_answers(submission).await.map_err(BackendError::new)
    }

    async fn find_answers(
        &self,
        submission: i64,
        question: i64,
    ) -> BackendResult<Vec<AnswerRecord>> {
        self.api
            .find_answers(submission, question)
            .await
            .map_err(BackendError::new)
    }

    async fn upsert_answer(&self, payload: &AnswerPayload) -> BackendResult<AnswerRecord> {
        self.api.upsert_answer(payload).await.map_err(BackendError::new)
    }

    async fn create_answer(&self, payload: &AnswerPayload) -> BackendResult<AnswerRecord> {
        self.api.create_answer(payload).await.map_err(BackendError::new)
    }

    async fn patch_answer(&self, id: i64, payload: &AnswerPayload) -> BackendResult<AnswerRecord> {
        self.api.patch_answer(id, payload).await.map_err(BackendError::new)
    }

    async fn attach_file(
        &self,
        answer_id: i64,
        filename: &str,
        bytes: Vec<u8>,
    ) -> BackendResult<AnswerRecord> {
        self.api
            .patch_answer_attachment(answer_id, filename, &bytes)
            .await
            .map_err(BackendError::new)
    }

    async fn start_review(&self, submission: i64) -> BackendResult<SubmissionItem> {
        self.api.start_review(submission).await.map_err(BackendError::new)
    }

    async fn submit(&self, submission: i64) -> BackendResult<SubmissionItem> {
        self.api.submit(submission).await.map_err(BackendError::new)
    }
}

use crate::error::Result;
use crate::http::{ApiClient, MaybePaged};
use forms_protocol::{AnswerPayload, AnswerRecord};

impl ApiClient {
    pub async fn list_answers(&self, submission: i64) -> Result<Vec<AnswerRecord>> {
        let listed: MaybePaged<AnswerRecord> = self
            .get_json("/responses/answers/", &[("submission", submission.to_string())])
            .await?;
        Ok(listed.into_vec())
    }

    /// Existing records for one (submission, question) pair, used by the
    /// persister's last-resort patch tier.
    pub async fn find_answers(&self, submission: i64, question: i64) -> Result<Vec<AnswerRecord>> {
        let listed: MaybePaged<AnswerRecord> = self
            .get_json(
                "/responses/answers/",
                &[
                    ("submission", submission.to_string()),
                    ("question", question.to_string()),
                ],
            )
            .await?;
        Ok(listed.into_vec())
    }

    /// Dedicated upsert endpoint. Not all backend deployments expose it; the
    /// persister falls back to create/patch when this call fails.
    pub async fn upsert_answer(&self, payload: &AnswerPayload) -> Result<AnswerRecord> {
        self.post_json("/responses/answers/upsert/", payload).await
    }

    pub async fn create_answer(&self, payload: &AnswerPayload) -> Result<AnswerRecord> {
        self.post_json("/responses/answers/", payload).await
    }

    pub async fn patch_answer(&self, id: i64, payload: &AnswerPayload) -> Result<AnswerRecord> {
        self.patch_json(&format!("/responses/answers/{id}/"), payload).await
    }

    /// Attach one file to an existing answer record via multipart PATCH.
    pub async fn patch_answer_attachment(
        &self,
        id: i64,
        filename: &str,
        bytes: &[u8],
    ) -> Result<AnswerRecord> {
        self.patch_file(&format!("/responses/answers/{id}/"), "attachment", filename, bytes)
            .await
    }
}

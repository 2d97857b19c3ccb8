use crate::catalog::{FrameworkRef, TemplateRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Draft,
    InReview,
    Pending,
    Submitted,
    Archived,
}

impl SubmissionStatus {
    /// Field inputs and the attachment picker lock once the submission leaves
    /// the customer's hands; navigation stays available.
    pub const fn is_read_only(self) -> bool {
        matches!(
            self,
            SubmissionStatus::InReview | SubmissionStatus::Submitted | SubmissionStatus::Archived
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Draft => "draft",
            SubmissionStatus::InReview => "in_review",
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The backend serializes `progress` as either a number or a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgressValue {
    Number(f64),
    Text(String),
}

impl ProgressValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            ProgressValue::Number(n) => *n,
            ProgressValue::Text(s) => s.trim().parse().unwrap_or(0.0),
        }
    }
}

impl Default for ProgressValue {
    fn default() -> Self {
        ProgressValue::Number(0.0)
    }
}

/// Submission as the list/detail endpoints return it: flat foreign keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRead {
    pub id: i64,
    #[serde(default)]
    pub customer: i64,
    pub template: i64,
    pub framework: i64,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub progress: ProgressValue,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Submission hydrated with template and framework descriptors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionItem {
    pub id: i64,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub progress: ProgressValue,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub template: TemplateRef,
    pub framework: FrameworkRef,
}

/// Envelope of the ensure-or-create dashboard endpoint. `submission` is null
/// when the customer has no form for the requested template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardEnvelope {
    pub client_id: i64,
    pub submission: Option<SubmissionItem>,
    #[serde(default)]
    pub retrieved_at: String,
}

/// Stored value for one (submission, question) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub id: i64,
    pub submission: i64,
    pub question: i64,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub evidence: Option<String>,
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of an answer write. One payload per changed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub submission: i64,
    pub question: i64,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

impl AnswerPayload {
    pub fn text(submission: i64, question: i64, value: &str) -> Self {
        Self {
            submission,
            question,
            value: Value::String(value.to_string()),
            evidence: None,
        }
    }
}

use crate::backend::BackendError;
use forms_protocol::SubmissionStatus;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Catalog or answer load failed at boot. Surfaced as a single
    /// page-level message; there is no partial render.
    #[error("failed to load the form: {0}")]
    Boot(#[source] BackendError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("no submission available for this template")]
    NoSubmission,

    #[error("submission is read-only (status: {0})")]
    ReadOnly(SubmissionStatus),

    #[error("unknown control id {0}")]
    UnknownControl(i64),

    #[error("control {0} has no attachment question")]
    NoAttachmentPart(i64),
}

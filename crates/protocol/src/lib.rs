mod catalog;
mod part;
mod role;
mod submission;
mod user;
mod value;

pub use catalog::{
    ControlNode, DomainNode, Framework, FrameworkRef, QuestionNode, TemplateDetail, TemplateRef,
};
pub use part::PartKind;
pub use role::Role;
pub use submission::{
    AnswerPayload, AnswerRecord, DashboardEnvelope, ProgressValue, SubmissionItem, SubmissionRead,
    SubmissionStatus,
};
pub use user::{UserListItem, UserPayload, UserProfile, UserWire};
pub use value::{display_value, file_name_from_path, is_image_filename};

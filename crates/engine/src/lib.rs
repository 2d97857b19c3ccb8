mod backend;
mod error;
mod form;
mod hydrate;
mod persist;
mod progress;
mod section;
mod state;
mod upload;

pub use backend::{BackendError, BackendResult, FormsBackend};
pub use error::{EngineError, Result};
pub use form::FormEngine;
pub use hydrate::hydrate_answers;
pub use persist::{ensure_answer, FieldPatch};
pub use progress::{next_cursor, prev_cursor, Cursor, ProgressSummary};
pub use section::{build_sections, PartsMap, Section, UiControl, DOMAIN_ORDER};
pub use state::{AttachmentThumb, ControlState, PartIds};
pub use upload::LocalFile;

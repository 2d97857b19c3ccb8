mod answers;
mod auth;
mod catalog;
mod error;
mod http;
mod session;
mod submissions;
mod tokens;
mod users;

pub use error::{ApiError, Result};
pub use http::ApiClient;
pub use session::{Session, SessionState};
pub use tokens::{TokenPair, TokenStore};
pub use users::ListUsersQuery;

pub mod auth;
pub mod response;

pub use auth::{require_session, LOGIN_PATH};
pub use response::ActionResult;

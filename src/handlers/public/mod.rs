// handlers/public - no session required
//
// Login/logout and the read-only public project listing. Handlers that
// care about the viewer read the session cookie themselves.

pub mod auth;
pub mod projects;

pub use auth::{login_get, login_post, logout_post};
pub use projects::{public_detail, public_list};

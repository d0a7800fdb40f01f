pub mod gate;
pub mod session;

pub use gate::{current_principal, require_authenticated, require_ownership, Principal};
pub use session::{cookie_value, SessionClaims, SessionCodec, SessionError};

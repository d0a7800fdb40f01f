// handlers/protected - session required (/app/*)
//
// Mounted behind `middleware::require_session`, so every handler here can
// take the `Principal` from request extensions.

pub mod projects;

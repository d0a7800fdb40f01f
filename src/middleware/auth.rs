use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::state::SharedState;

pub const LOGIN_PATH: &str = "/login";

/// Route protection for `/app/*`.
///
/// Requests without a valid session cookie are redirected (303) to the login
/// page before any handler runs. Otherwise the [`Principal`](crate::auth::Principal)
/// is inserted into the request extensions.
pub async fn require_session(State(state): State<SharedState>, mut request: Request, next: Next) -> Response {
    match state.principal(request.headers()) {
        Some(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        None => {
            tracing::debug!("No session for {}, redirecting to login", request.uri().path());
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}

// Login and logout. The session is a signed cookie; there is no password,
// the email alone identifies the user.

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::middleware::{ActionResult, LOGIN_PATH};
use crate::state::SharedState;
use crate::validation::validate_email;

pub const AFTER_LOGIN_PATH: &str = "/app/projects";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
}

/// GET /login - send signed-in users on, describe the form to everyone else
pub async fn login_get(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if state.principal(&headers).is_some() {
        return Redirect::to(AFTER_LOGIN_PATH).into_response();
    }

    Json(json!({
        "success": true,
        "data": {
            "action": LOGIN_PATH,
            "method": "POST",
            "fields": [
                { "name": "email", "type": "email", "required": true }
            ]
        }
    }))
    .into_response()
}

/// POST /login - validate the email, set the session cookie and redirect
pub async fn login_post(State(state): State<SharedState>, body: Result<Form<LoginForm>, FormRejection>) -> Response {
    let form = match body {
        Ok(Form(form)) => form,
        Err(rejection) => return ActionResult::<()>::invalid_body(rejection).into_response(),
    };

    let email = match validate_email(form.email.as_deref()) {
        Ok(email) => email,
        Err(errors) => {
            return ActionResult::<()>::failure(errors.first_message(), StatusCode::BAD_REQUEST).into_response();
        }
    };

    let token = match state.sessions.issue(&email) {
        Ok(token) => token,
        Err(e) => {
            warn!("Failed to issue session for {}: {}", email, e);
            return ActionResult::<()>::failure("Failed to sign in", StatusCode::INTERNAL_SERVER_ERROR)
                .into_response();
        }
    };

    info!("User signed in: {}", email);
    (
        [(header::SET_COOKIE, state.sessions.set_cookie(&token))],
        Redirect::to(AFTER_LOGIN_PATH),
    )
        .into_response()
}

/// POST /logout - drop the session cookie
pub async fn logout_post(State(state): State<SharedState>) -> Response {
    (
        [(header::SET_COOKIE, state.sessions.clear_cookie())],
        Redirect::to(LOGIN_PATH),
    )
        .into_response()
}

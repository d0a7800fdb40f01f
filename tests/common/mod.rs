#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{header, redirect, Client, Response};
use serde_json::{json, Value};

use project_tracker::config::AppConfig;
use project_tracker::state::{AppState, SharedState};

pub const SESSION_COOKIE: &str = "user-session";

/// The real router on an ephemeral port, backed by the in-memory repository
pub struct TestServer {
    pub base_url: String,
    pub state: SharedState,
    client: Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let mut config = AppConfig::development();
        config.session.secret = "integration-test-secret".to_string();
        let state = Arc::new(AppState::in_memory(config).context("failed to build state")?);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let addr = listener.local_addr()?;
        let app = project_tracker::app::app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        // Redirects are part of what the tests check
        let client = Client::builder().redirect(redirect::Policy::none()).build()?;

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", addr.port()),
            state,
            client,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// POST /login and return the `user-session=<token>` pair
    pub async fn login(&self, email: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/login"))
            .form(&[("email", email)])
            .send()
            .await?;
        session_cookie(&res).context("login did not set a session cookie")
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Result<Response> {
        let mut req = self.client.get(self.url(path));
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        Ok(req.send().await?)
    }

    pub async fn create_project(&self, cookie: &str, body: &Value) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/app/projects"))
            .header(header::COOKIE, cookie)
            .json(body)
            .send()
            .await?)
    }

    pub async fn update_project(&self, cookie: &str, id: &str, body: &Value) -> Result<Response> {
        Ok(self
            .client
            .put(self.url(&format!("/app/projects/{}", id)))
            .header(header::COOKIE, cookie)
            .json(body)
            .send()
            .await?)
    }

    pub async fn delete_project(&self, cookie: &str, id: &str) -> Result<Response> {
        Ok(self
            .client
            .delete(self.url(&format!("/app/projects/{}", id)))
            .header(header::COOKIE, cookie)
            .send()
            .await?)
    }

    /// Create a project and return its id
    pub async fn seed_project(&self, cookie: &str, name: &str, status: &str, is_public: bool) -> Result<String> {
        let res = self.create_project(cookie, &project_body(name, status, is_public)).await?;
        let body: Value = res.json().await?;
        body["data"]["id"]
            .as_str()
            .map(str::to_string)
            .with_context(|| format!("create failed: {}", body))
    }
}

pub fn project_body(name: &str, status: &str, is_public: bool) -> Value {
    json!({
        "name": name,
        "description": "",
        "status": status,
        "isPublic": is_public,
    })
}

/// `user-session=<token>` from a response's Set-Cookie headers
pub fn session_cookie(res: &Response) -> Option<String> {
    set_cookie_header(res).and_then(|cookie| cookie.split(';').next().map(|pair| pair.trim().to_string()))
}

pub fn set_cookie_header(res: &Response) -> Option<String> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&format!("{}=", SESSION_COOKIE)))
        .map(str::to_string)
}

pub fn location(res: &Response) -> Option<String> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

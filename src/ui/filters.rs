use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::form_urlencoded;

use crate::config::FilterConfig;
use crate::database::models::project::ProjectStatus;

pub const PROJECTS_PATH: &str = "/app/projects";
pub const ALL_STATUSES: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
struct FilterState {
    search: String,
    status: String,
}

impl FilterState {
    /// `/app/projects` with only the non-default parameters
    fn path(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if !self.search.is_empty() {
            query.append_pair("search", &self.search);
        }
        if !self.status.is_empty() && self.status != ALL_STATUSES {
            query.append_pair("status", &self.status);
        }
        let query = query.finish();

        if query.is_empty() {
            PROJECTS_PATH.to_string()
        } else {
            format!("{}?{}", PROJECTS_PATH, query)
        }
    }
}

/// Search and status filters for the owner's project list.
///
/// Every change is reflected as a navigable path on the channel returned by
/// [`FilterBar::new`]. Status changes and `clear` reflect at once; search
/// edits reflect only after the debounce window passes with no further edit.
/// Must be used inside a tokio runtime.
pub struct FilterBar {
    state: Arc<Mutex<FilterState>>,
    reflect: mpsc::UnboundedSender<String>,
    debounce: Duration,
    pending: Option<JoinHandle<()>>,
}

impl FilterBar {
    /// Seed from the current query string values. Construction never reflects.
    pub fn new(search: &str, status: &str, debounce: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (reflect, receiver) = mpsc::unbounded_channel();
        let status = if status.is_empty() { ALL_STATUSES } else { status };
        let bar = Self {
            state: Arc::new(Mutex::new(FilterState {
                search: search.to_string(),
                status: status.to_string(),
            })),
            reflect,
            debounce,
            pending: None,
        };
        (bar, receiver)
    }

    /// Same as [`FilterBar::new`] with the configured debounce window
    pub fn from_config(search: &str, status: &str, config: &FilterConfig) -> (Self, mpsc::UnboundedReceiver<String>) {
        Self::new(search, status, config.debounce())
    }

    pub fn search(&self) -> String {
        self.snapshot().search
    }

    pub fn status(&self) -> String {
        self.snapshot().status
    }

    /// Status as a typed filter; `None` for "all" or unknown values
    pub fn status_filter(&self) -> Option<ProjectStatus> {
        ProjectStatus::parse_loose(&self.status())
    }

    pub fn has_active_filters(&self) -> bool {
        let state = self.snapshot();
        !state.search.is_empty() || state.status != ALL_STATUSES
    }

    pub fn path(&self) -> String {
        self.snapshot().path()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Record a search edit and restart the quiet-period timer
    pub fn set_search(&mut self, search: &str) {
        self.lock().search = search.to_string();
        self.cancel_pending();

        let state = Arc::clone(&self.state);
        let reflect = self.reflect.clone();
        let debounce = self.debounce;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let path = state.lock().unwrap_or_else(|p| p.into_inner()).path();
            let _ = reflect.send(path);
        }));
    }

    /// Record a status choice and reflect immediately
    pub fn set_status(&mut self, status: &str) {
        self.cancel_pending();
        let path = {
            let mut state = self.lock();
            state.status = if status.is_empty() { ALL_STATUSES.to_string() } else { status.to_string() };
            state.path()
        };
        self.emit(path);
    }

    /// Reset both filters and reflect the bare list path
    pub fn clear(&mut self) {
        self.cancel_pending();
        {
            let mut state = self.lock();
            state.search.clear();
            state.status = ALL_STATUSES.to_string();
        }
        self.emit(PROJECTS_PATH.to_string());
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    fn emit(&self, path: String) {
        tracing::trace!(%path, "filters reflected");
        let _ = self.reflect.send(path);
    }

    fn snapshot(&self) -> FilterState {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FilterState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Drop for FilterBar {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

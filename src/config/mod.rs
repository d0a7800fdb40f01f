use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub cache: CacheConfig,
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// When unset the service falls back to the in-memory repository.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    #[serde(skip_serializing)]
    pub secret: String,
    pub max_age_days: i64,
    /// Adds the `Secure` attribute to the session cookie.
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub debounce_ms: u64,
}

/// Longest session lifetime accepted; browsers cap cookie Max-Age at 400 days
pub const MAX_SESSION_DAYS: i64 = 400;

impl SessionConfig {
    /// Session lifetime in days, held to `1..=MAX_SESSION_DAYS`
    pub fn max_age_days(&self) -> i64 {
        self.max_age_days.clamp(1, MAX_SESSION_DAYS)
    }

    pub fn max_age_secs(&self) -> i64 {
        self.max_age_days() * 24 * 60 * 60
    }
}

/// `SESSION_MAX_AGE_DAYS` value, or `None` when it is not a day count in range
fn parse_session_days(raw: &str) -> Option<i64> {
    raw.trim().parse().ok().filter(|days| (1..=MAX_SESSION_DAYS).contains(days))
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl FilterConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment presets first, individual variables win
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(port) = env::var("TRACKER_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|v| v.parse().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("SERVER_ENABLE_CORS") {
            self.server.enable_cors = v.parse().unwrap_or(self.server.enable_cors);
        }
        if let Ok(v) = env::var("SERVER_CORS_ORIGINS") {
            self.server.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = if v.trim().is_empty() { None } else { Some(v) };
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Session overrides
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.session.secret = v;
        }
        if let Ok(v) = env::var("SESSION_COOKIE_NAME") {
            self.session.cookie_name = v;
        }
        if let Ok(v) = env::var("SESSION_MAX_AGE_DAYS") {
            self.session.max_age_days = parse_session_days(&v).unwrap_or(self.session.max_age_days);
        }

        // Cache overrides
        if let Ok(v) = env::var("CACHE_ENABLED") {
            self.cache.enabled = v.parse().unwrap_or(self.cache.enabled);
        }
        if let Ok(v) = env::var("CACHE_TTL_SECS") {
            self.cache.ttl_secs = v.parse().unwrap_or(self.cache.ttl_secs);
        }

        // Filter overrides
        if let Ok(v) = env::var("FILTER_DEBOUNCE_MS") {
            self.filter.debounce_ms = v.parse().unwrap_or(self.filter.debounce_ms);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string()],
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                connection_timeout: 15,
            },
            session: SessionConfig {
                cookie_name: "user-session".to_string(),
                secret: "development-session-secret".to_string(),
                max_age_days: 7,
                secure_cookie: false,
            },
            cache: CacheConfig {
                enabled: true,
                ttl_secs: 60,
            },
            filter: FilterConfig { debounce_ms: 500 },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                enable_cors: true,
                cors_origins: vec!["https://tracker-staging.example.com".to_string()],
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 10,
            },
            session: SessionConfig {
                cookie_name: "user-session".to_string(),
                secret: String::new(),
                max_age_days: 7,
                secure_cookie: true,
            },
            cache: CacheConfig {
                enabled: true,
                ttl_secs: 60,
            },
            filter: FilterConfig { debounce_ms: 500 },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                enable_cors: false,
                cors_origins: vec!["https://tracker.example.com".to_string()],
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 5,
            },
            session: SessionConfig {
                cookie_name: "user-session".to_string(),
                secret: String::new(),
                max_age_days: 7,
                secure_cookie: true,
            },
            cache: CacheConfig {
                enabled: true,
                ttl_secs: 60,
            },
            filter: FilterConfig { debounce_ms: 500 },
        }
    }
}

/// Process-wide configuration, read from the environment on first use
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

//! # Client configuration: `campus.toml`
//!
//! Defines the TOML configuration the client reads at start-up (filename:
//! [`ClientConfig::filename`] = `"campus.toml"`). It names the backend the
//! client talks to, the two route targets the route guard redirects to, and
//! an optional override for where the session tokens are persisted.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "http://127.0.0.1:8000/api/v1/"
//!
//! [routes]
//! sign_in = "/auth/signin"
//! landing = "/tabs/home"
//!
//! [storage]
//! dir = "/var/lib/campus-stream"   # optional
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`ClientConfig`] | Top-level config. TOML (de)serialisation, env override, canonical filename. |
//! | [`ApiConfig`] | Backend base URL plus the per-service URL helpers. |
//! | [`RouteConfig`] | Sign-in and authenticated landing paths. |
//! | [`StorageConfig`] | Optional token storage directory. |
//!
//! All structs derive or implement `Default` so that a missing or empty
//! config file is equivalent to the default configuration.

use serde::{Deserialize, Serialize};

/// Environment variable that overrides [`ApiConfig::base_url`].
pub const API_URL_ENV: &str = "CAMPUS_API_URL";

/// Top-level configuration stored in `campus.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub routes: RouteConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Backend location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root of the versioned REST API. Service prefixes are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api/v1/".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Backend service a request belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Service {
    Auth,
    Threads,
    Community,
    Notifications,
}

impl Service {
    pub fn prefix(self) -> &'static str {
        match self {
            Service::Auth => "auth/",
            Service::Threads => "threads/",
            Service::Community => "community/",
            Service::Notifications => "notifications/",
        }
    }
}

impl ApiConfig {
    /// Full URL for `path` under `service`, e.g. `.../auth/follow/alice/`.
    pub fn url(&self, service: Service, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{}{path}", service.prefix())
    }
}

/// Route targets used by the route guard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    #[serde(default = "default_sign_in")]
    pub sign_in: String,
    #[serde(default = "default_landing")]
    pub landing: String,
}

fn default_sign_in() -> String {
    "/auth/signin".to_string()
}

fn default_landing() -> String {
    "/tabs/home".to_string()
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            sign_in: default_sign_in(),
            landing: default_landing(),
        }
    }
}

/// Token storage location.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for persisted tokens. `None` uses the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl ClientConfig {
    /// Create a config pointing at the given backend.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
            },
            ..Self::default()
        }
    }

    /// Builder method to set the route targets.
    pub fn with_routes(mut self, sign_in: impl Into<String>, landing: impl Into<String>) -> Self {
        self.routes = RouteConfig {
            sign_in: sign_in.into(),
            landing: landing.into(),
        };
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "campus.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Default config with the base URL taken from `CAMPUS_API_URL` when set
    /// (a `.env` file is honoured).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = ClientConfig::from_toml("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.routes.sign_in, "/auth/signin");
        assert_eq!(config.routes.landing, "/tabs/home");
        assert!(config.storage.dir.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = ClientConfig::from_toml(
            r#"
            [api]
            base_url = "https://campus.example/api/v1"

            [routes]
            landing = "/home"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://campus.example/api/v1");
        assert_eq!(config.routes.landing, "/home");
        assert_eq!(config.routes.sign_in, "/auth/signin");
    }

    #[test]
    fn test_service_urls() {
        let api = ApiConfig {
            base_url: "http://host:8000/api/v1/".to_string(),
        };
        assert_eq!(
            api.url(Service::Auth, "follow/alice/"),
            "http://host:8000/api/v1/auth/follow/alice/"
        );
        assert_eq!(
            api.url(Service::Notifications, "/content/3/delete"),
            "http://host:8000/api/v1/notifications/content/3/delete"
        );

        let no_slash = ApiConfig {
            base_url: "http://host/api/v1".to_string(),
        };
        assert_eq!(
            no_slash.url(Service::Community, "groups/"),
            "http://host/api/v1/community/groups/"
        );
    }

    #[test]
    fn test_toml_roundtrip_keeps_routes() {
        let config = ClientConfig::new("http://localhost:9000/api/v1/")
            .with_routes("/login", "/feed");
        let text = config.to_toml().unwrap();
        assert_eq!(ClientConfig::from_toml(&text).unwrap(), config);
    }
}

//! Session context and hooks for the UI.

use api::ApiClient;
use dioxus::prelude::*;
use store::config::RouteConfig;
use store::{ClientConfig, SessionStore};

use crate::guard::{protected, public_only, RouteDecision};
use crate::notice::{use_notices, Notices};

/// Token storage used by the running app.
#[cfg(not(target_arch = "wasm32"))]
pub type AppStorage = store::FileStorage;
#[cfg(target_arch = "wasm32")]
pub type AppStorage = store::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
fn open_storage(config: &ClientConfig) -> AppStorage {
    let dir = config
        .storage
        .dir
        .as_ref()
        .map(std::path::PathBuf::from)
        .unwrap_or_else(store::FileStorage::default_dir);
    store::FileStorage::new(dir)
}

#[cfg(target_arch = "wasm32")]
fn open_storage(_config: &ClientConfig) -> AppStorage {
    store::MemoryStorage::new()
}

/// Session state for the application.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub client: Option<ApiClient<AppStorage>>,
    /// True until the persisted session has been read.
    pub loading: bool,
    /// Sign-in and landing paths from the provider's config.
    pub routes: RouteConfig,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            client: None,
            loading: true,
            routes: RouteConfig::default(),
        }
    }
}

impl SessionState {
    pub fn session(&self) -> Option<&SessionStore<AppStorage>> {
        self.client.as_ref().map(ApiClient::session)
    }

    /// Re-read on each call; never cached.
    pub fn is_authenticated(&self) -> bool {
        self.session().is_some_and(SessionStore::is_authenticated)
    }

    /// Decision for a route that requires a session.
    pub fn protected(&self) -> RouteDecision {
        protected(self.is_authenticated(), &self.routes)
    }

    /// Decision for a route only shown to signed-out visitors.
    pub fn public_only(&self) -> RouteDecision {
        public_only(self.is_authenticated(), &self.routes)
    }
}

/// Get the current session state.
/// Returns a signal that updates when the session is restored or cleared.
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

/// Provider component that restores the persisted session and exposes the
/// API client. Wrap the router with this component.
#[component]
pub fn SessionProvider(
    children: Element,
    #[props(default = ClientConfig::from_env())] config: ClientConfig,
) -> Element {
    let mut state = use_signal({
        let routes = config.routes.clone();
        move || SessionState {
            routes,
            ..SessionState::default()
        }
    });
    use_context_provider(Notices::new);

    let _ = use_resource(move || {
        let config = config.clone();
        async move {
            let session = SessionStore::load(open_storage(&config)).await;
            tracing::info!(authenticated = session.is_authenticated(), "session restored");
            state.set(SessionState {
                client: Some(ApiClient::new(&config, session)),
                loading: false,
                routes: config.routes.clone(),
            });
        }
    });

    use_context_provider(|| state);

    rsx! {
        {children}
    }
}

/// Button that clears the session and returns to the configured sign-in
/// route.
#[component]
pub fn SignOutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let mut state = use_session();
    let notices = use_notices();
    let nav = use_navigator();

    let onclick = move |_| {
        let notices = notices.clone();
        async move {
            let SessionState { client, routes, .. } = state();
            let Some(client) = client else {
                return;
            };
            match client.logout().await {
                Ok(()) => {
                    tracing::info!("signed out");
                    // Session is shared; touch the signal so guards re-render.
                    state.write().loading = false;
                    nav.replace(routes.sign_in);
                }
                Err(err) => {
                    notices.error(err.message());
                }
            }
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decisions_use_configured_routes() {
        let state = SessionState {
            client: None,
            loading: false,
            routes: RouteConfig {
                sign_in: "/login".to_string(),
                landing: "/feed".to_string(),
            },
        };
        assert_eq!(state.protected(), RouteDecision::Redirect("/login".to_string()));
        assert_eq!(state.public_only(), RouteDecision::Render);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_signed_in_state_redirects_to_configured_landing() {
        let config = ClientConfig {
            routes: RouteConfig {
                sign_in: "/login".to_string(),
                landing: "/feed".to_string(),
            },
            ..ClientConfig::default()
        };
        let dir = std::env::temp_dir().join(format!("campus_stream_ui_routes_{}", std::process::id()));
        let session = SessionStore::load(AppStorage::new(dir.clone())).await;
        session
            .set_session(store::TokenPair::new("acc", "ref"))
            .await
            .unwrap();
        let state = SessionState {
            client: Some(ApiClient::new(&config, session.clone())),
            loading: false,
            routes: config.routes.clone(),
        };

        assert_eq!(state.protected(), RouteDecision::Render);
        assert_eq!(state.public_only(), RouteDecision::Redirect("/feed".to_string()));
        session.clear_session().await.unwrap();
        assert_eq!(state.protected(), RouteDecision::Redirect("/login".to_string()));
        let _ = std::fs::remove_dir_all(&dir);
    }
}

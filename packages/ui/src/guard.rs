//! # Route guard
//!
//! Two wrappers decide, on every navigation, whether a route renders or
//! redirects. The decision is a pure function of whether the session holds an
//! access token; nothing is cached between navigations.
//!
//! | Wrapper | Signed in | Signed out |
//! |---------|-----------|------------|
//! | [`Protected`] | render | redirect to sign-in |
//! | [`PublicOnly`] | redirect to landing | render |

use dioxus::prelude::*;
use store::config::RouteConfig;
use store::{SessionStore, TokenStorage};

use crate::session::use_session;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Render,
    Redirect(String),
}

/// Decision for a route that requires a session.
pub fn protected(authenticated: bool, routes: &RouteConfig) -> RouteDecision {
    if authenticated {
        RouteDecision::Render
    } else {
        RouteDecision::Redirect(routes.sign_in.clone())
    }
}

/// Decision for a route only shown to signed-out visitors (sign-in, sign-up).
pub fn public_only(authenticated: bool, routes: &RouteConfig) -> RouteDecision {
    if authenticated {
        RouteDecision::Redirect(routes.landing.clone())
    } else {
        RouteDecision::Render
    }
}

/// Guard bound to a session store. Re-reads the store on every call.
#[derive(Clone, Debug)]
pub struct RouteGuard<S: TokenStorage> {
    session: SessionStore<S>,
    routes: RouteConfig,
}

impl<S: TokenStorage> RouteGuard<S> {
    pub fn new(session: SessionStore<S>, routes: RouteConfig) -> Self {
        Self { session, routes }
    }

    pub fn protected(&self) -> RouteDecision {
        protected(self.session.is_authenticated(), &self.routes)
    }

    pub fn public_only(&self) -> RouteDecision {
        public_only(self.session.is_authenticated(), &self.routes)
    }
}

fn render_or_redirect(nav: Navigator, decision: RouteDecision, children: Element) -> Element {
    match decision {
        RouteDecision::Render => rsx! { {children} },
        RouteDecision::Redirect(path) => {
            tracing::debug!(%path, "route guard redirect");
            nav.replace(path);
            rsx! {}
        }
    }
}

/// Renders `children` only with a session; otherwise replaces the route with
/// the configured sign-in path.
#[component]
pub fn Protected(children: Element) -> Element {
    let session = use_session();
    let nav = use_navigator();
    let state = session();
    if state.loading {
        return rsx! {};
    }
    render_or_redirect(nav, state.protected(), children)
}

/// Renders `children` only without a session; otherwise replaces the route
/// with the configured landing path.
#[component]
pub fn PublicOnly(children: Element) -> Element {
    let session = use_session();
    let nav = use_navigator();
    let state = session();
    if state.loading {
        return rsx! {};
    }
    render_or_redirect(nav, state.public_only(), children)
}

#[cfg(test)]
mod tests {
    use store::{MemoryStorage, TokenPair};

    use super::*;

    #[test]
    fn test_protected_redirects_signed_out_visitors() {
        let routes = RouteConfig::default();
        assert_eq!(
            protected(false, &routes),
            RouteDecision::Redirect("/auth/signin".to_string())
        );
        assert_eq!(protected(true, &routes), RouteDecision::Render);
    }

    #[test]
    fn test_public_only_redirects_signed_in_users() {
        let routes = RouteConfig {
            sign_in: "/login".to_string(),
            landing: "/feed".to_string(),
        };
        assert_eq!(
            public_only(true, &routes),
            RouteDecision::Redirect("/feed".to_string())
        );
        assert_eq!(public_only(false, &routes), RouteDecision::Render);
    }

    #[tokio::test]
    async fn test_guard_follows_session_changes() {
        let session = SessionStore::load(MemoryStorage::new()).await;
        let guard = RouteGuard::new(session.clone(), RouteConfig::default());
        assert_eq!(
            guard.protected(),
            RouteDecision::Redirect("/auth/signin".to_string())
        );

        session
            .set_session(TokenPair::new("access", "refresh"))
            .await
            .unwrap();
        assert_eq!(guard.protected(), RouteDecision::Render);
        assert_eq!(
            guard.public_only(),
            RouteDecision::Redirect("/tabs/home".to_string())
        );

        session.clear_session().await.unwrap();
        assert_eq!(guard.public_only(), RouteDecision::Render);
    }
}

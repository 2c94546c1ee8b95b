//! # ApiClient: the shared HTTP plumbing
//!
//! Holds the `reqwest` client, the backend location, and the
//! [`SessionStore`] the bearer token is read from. Resource modules
//! ([`crate::auth`], [`crate::threads`], [`crate::communities`],
//! [`crate::notifications`]) build requests and hand them to
//! [`ApiClient::send`], [`ApiClient::send_or_default`] or
//! [`ApiClient::send_unit`], which perform the call and
//! normalize failures. There is no retry and no timeout: a failed call
//! surfaces immediately and a stalled one waits on the transport.

use reqwest::multipart::Part;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use store::config::ApiConfig;
use store::models::Upload;
use store::{ClientConfig, Service, SessionStore, TokenStorage};

use crate::error::ApiError;

/// Whether an operation requires the caller's identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Auth {
    Required,
    Anonymous,
}

/// Client for the campus REST API.
#[derive(Clone, Debug)]
pub struct ApiClient<S: TokenStorage> {
    http: reqwest::Client,
    api: ApiConfig,
    session: SessionStore<S>,
}

impl<S: TokenStorage> ApiClient<S> {
    pub fn new(config: &ClientConfig, session: SessionStore<S>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api: config.api.clone(),
            session,
        }
    }

    /// The session store this client reads tokens from and writes at sign-in.
    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    /// Start a request, attaching the bearer token when identity is required
    /// and a token is held.
    pub(crate) fn request(
        &self,
        method: Method,
        service: Service,
        path: &str,
        auth: Auth,
    ) -> RequestBuilder {
        let url = self.api.url(service, path);
        tracing::debug!(%method, %url, "api request");
        let builder = self.http.request(method, url);
        match (auth, self.session.access_token()) {
            (Auth::Required, Some(token)) => builder.bearer_auth(token),
            _ => builder,
        }
    }

    /// Perform the request and decode a JSON body.
    pub(crate) async fn send<R: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        fallback: &str,
    ) -> Result<R, ApiError> {
        let resp = self.dispatch(req, fallback).await?;
        resp.json::<R>().await.map_err(|e| {
            tracing::debug!(error = %e, "undecodable response body");
            ApiError::Unavailable(fallback.to_string())
        })
    }

    /// Perform the request and decode a JSON body, treating an empty 2xx body
    /// (e.g. `204 No Content`) as `R::default()`.
    pub(crate) async fn send_or_default<R: DeserializeOwned + Default>(
        &self,
        req: RequestBuilder,
        fallback: &str,
    ) -> Result<R, ApiError> {
        let resp = self.dispatch(req, fallback).await?;
        let body = resp.bytes().await.map_err(|e| {
            tracing::debug!(error = %e, "unreadable response body");
            ApiError::Unavailable(fallback.to_string())
        })?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(R::default());
        }
        serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!(error = %e, "undecodable response body");
            ApiError::Unavailable(fallback.to_string())
        })
    }

    /// Perform the request and ignore any body.
    pub(crate) async fn send_unit(&self, req: RequestBuilder, fallback: &str) -> Result<(), ApiError> {
        self.dispatch(req, fallback).await.map(|_| ())
    }

    async fn dispatch(
        &self,
        req: RequestBuilder,
        fallback: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let resp = req.send().await.map_err(|e| {
            tracing::debug!(error = %e, "transport failure");
            ApiError::Unavailable(fallback.to_string())
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.bytes().await.unwrap_or_default();
        let err = ApiError::from_response(status.as_u16(), &body, fallback);
        tracing::warn!(status = status.as_u16(), error = %err, "api call failed");

        if err.is_auth_failure() && self.session.is_authenticated() {
            if let Err(e) = self.session.clear_session().await {
                tracing::warn!(error = %e, "failed to clear rejected session");
            }
        }
        Err(err)
    }
}

/// Multipart file part for an upload.
pub(crate) fn file_part(upload: Upload) -> Result<Part, ApiError> {
    let mime = upload.mime.clone();
    Part::bytes(upload.bytes)
        .file_name(upload.file_name)
        .mime_str(&mime)
        .map_err(|_| ApiError::Message(format!("Unsupported file type: {mime}")))
}

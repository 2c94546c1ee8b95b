//! # API crate: the remote resource client for the campus backend
//!
//! Every screen reaches the backend through [`ApiClient`]. It attaches the
//! session's bearer token to operations that need identity, normalizes every
//! failure into an [`ApiError`], and returns decoded bodies unchanged on
//! success. Sign-in is the only operation that writes the session; a 401
//! from any authenticated call clears it.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | `reqwest` plumbing: URL building, bearer header, send + normalize |
//! | [`error`] | [`ApiError`] and [`FieldErrors`], the uniform failure shapes |
//! | [`auth`] | sign in/up/out, profile, password, follow graph, users |
//! | [`threads`] | thread posts, likes, comments |
//! | [`communities`] | groups, membership, group posts |
//! | [`notifications`] | notification feed and read/delete acknowledgements |
//! | [`seams`] | [`SocialApi`] / [`ProfileApi`] traits the UI coordinators are generic over |

pub mod auth;
pub mod client;
pub mod communities;
pub mod error;
pub mod notifications;
pub mod seams;
pub mod threads;

pub use client::ApiClient;
pub use error::{ApiError, FieldErrors};
pub use seams::{ProfileApi, SocialApi};

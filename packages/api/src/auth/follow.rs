//! Follow graph endpoints.

use reqwest::Method;
use store::models::{FollowEdge, FollowersPage, FollowingPage, UserSummary};
use store::{Service, TokenStorage};

use crate::client::{ApiClient, Auth};
use crate::error::ApiError;

impl<S: TokenStorage> ApiClient<S> {
    pub async fn follow(&self, username: &str) -> Result<FollowEdge, ApiError> {
        let req = self.request(
            Method::POST,
            Service::Auth,
            &format!("follow/{username}/"),
            Auth::Required,
        );
        self.send_or_default(req, "Failed to update follow status").await
    }

    pub async fn unfollow(&self, username: &str) -> Result<FollowEdge, ApiError> {
        let req = self.request(
            Method::DELETE,
            Service::Auth,
            &format!("follow/{username}/"),
            Auth::Required,
        );
        self.send_or_default(req, "Failed to update follow status").await
    }

    pub async fn followers(&self, username: &str) -> Result<FollowersPage, ApiError> {
        let req = self.request(
            Method::GET,
            Service::Auth,
            &format!("followers/{username}/"),
            Auth::Required,
        );
        self.send(req, "Failed to load followers").await
    }

    pub async fn following(&self, username: &str) -> Result<FollowingPage, ApiError> {
        let req = self.request(
            Method::GET,
            Service::Auth,
            &format!("following/{username}/"),
            Auth::Required,
        );
        self.send(req, "Failed to load following").await
    }

    pub async fn users(&self) -> Result<Vec<UserSummary>, ApiError> {
        let req = self.request(Method::GET, Service::Auth, "users/", Auth::Required);
        self.send(req, "Failed to load users").await
    }
}

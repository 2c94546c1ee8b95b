//! Traits over the remote operations that local-state coordinators drive.
//!
//! Coordinators are generic over these rather than over [`ApiClient`], so a
//! screen's state logic can run against a scripted backend in tests.

use std::future::Future;

use store::models::{
    Acknowledgement, FollowEdge, LikeResponse, MembershipResponse, NotificationFeed,
    NotificationSummary, Profile,
};
use store::TokenStorage;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Social toggles and notification acknowledgements.
pub trait SocialApi {
    fn follow(&self, username: &str) -> impl Future<Output = Result<FollowEdge, ApiError>>;
    fn unfollow(&self, username: &str) -> impl Future<Output = Result<FollowEdge, ApiError>>;
    fn toggle_like(&self, thread_id: u64) -> impl Future<Output = Result<LikeResponse, ApiError>>;
    fn join(&self, community_id: u64) -> impl Future<Output = Result<MembershipResponse, ApiError>>;
    fn leave(&self, community_id: u64) -> impl Future<Output = Result<MembershipResponse, ApiError>>;
    fn fetch_notifications(&self) -> impl Future<Output = Result<NotificationFeed, ApiError>>;
    fn mark_read(&self, id: u64) -> impl Future<Output = Result<NotificationSummary, ApiError>>;
    fn mark_all_read(&self) -> impl Future<Output = Result<Acknowledgement, ApiError>>;
    fn delete_notification(&self, id: u64) -> impl Future<Output = Result<(), ApiError>>;
}

/// Profile reads used by eligibility checks.
pub trait ProfileApi {
    fn fetch_profile(&self) -> impl Future<Output = Result<Profile, ApiError>>;
}

impl<S: TokenStorage> SocialApi for ApiClient<S> {
    async fn follow(&self, username: &str) -> Result<FollowEdge, ApiError> {
        ApiClient::follow(self, username).await
    }

    async fn unfollow(&self, username: &str) -> Result<FollowEdge, ApiError> {
        ApiClient::unfollow(self, username).await
    }

    async fn toggle_like(&self, thread_id: u64) -> Result<LikeResponse, ApiError> {
        ApiClient::toggle_like(self, thread_id).await
    }

    async fn join(&self, community_id: u64) -> Result<MembershipResponse, ApiError> {
        ApiClient::join(self, community_id).await
    }

    async fn leave(&self, community_id: u64) -> Result<MembershipResponse, ApiError> {
        ApiClient::leave(self, community_id).await
    }

    async fn fetch_notifications(&self) -> Result<NotificationFeed, ApiError> {
        self.notifications().await
    }

    async fn mark_read(&self, id: u64) -> Result<NotificationSummary, ApiError> {
        self.mark_notification_read(id).await
    }

    async fn mark_all_read(&self) -> Result<Acknowledgement, ApiError> {
        self.mark_all_notifications_read().await
    }

    async fn delete_notification(&self, id: u64) -> Result<(), ApiError> {
        ApiClient::delete_notification(self, id).await
    }
}

impl<S: TokenStorage> ProfileApi for ApiClient<S> {
    async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        ApiClient::fetch_profile(self).await
    }
}

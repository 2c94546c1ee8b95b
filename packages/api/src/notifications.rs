//! Notification endpoints (`notifications/` service).

use reqwest::Method;
use store::models::{Acknowledgement, NotificationFeed, NotificationSummary};
use store::{Service, TokenStorage};

use crate::client::{ApiClient, Auth};
use crate::error::ApiError;

impl<S: TokenStorage> ApiClient<S> {
    pub async fn notifications(&self) -> Result<NotificationFeed, ApiError> {
        let req = self.request(Method::GET, Service::Notifications, "content/", Auth::Required);
        self.send(req, "Failed to fetch notifications").await
    }

    pub async fn mark_notification_read(&self, id: u64) -> Result<NotificationSummary, ApiError> {
        let req = self
            .request(
                Method::PATCH,
                Service::Notifications,
                &format!("content/{id}/read/"),
                Auth::Required,
            )
            .json(&serde_json::json!({}));
        self.send(req, "Failed to mark notification as read").await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<Acknowledgement, ApiError> {
        let req = self
            .request(
                Method::PATCH,
                Service::Notifications,
                "content/read-all/",
                Auth::Required,
            )
            .json(&serde_json::json!({}));
        self.send(req, "Failed to mark all notifications as read").await
    }

    pub async fn delete_notification(&self, id: u64) -> Result<(), ApiError> {
        let req = self.request(
            Method::DELETE,
            Service::Notifications,
            &format!("content/{id}/delete"),
            Auth::Required,
        );
        self.send_unit(req, "Failed to delete notification").await
    }
}

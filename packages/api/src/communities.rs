//! Community group endpoints (`community/` service).

use reqwest::multipart::Form;
use reqwest::Method;
use store::models::{
    CommunityDraft, CommunityMember, CommunityPost, CommunitySummary, MembershipResponse, PostDraft,
};
use store::{Service, TokenStorage};

use crate::client::{file_part, ApiClient, Auth};
use crate::error::ApiError;

impl<S: TokenStorage> ApiClient<S> {
    pub async fn communities(&self) -> Result<Vec<CommunitySummary>, ApiError> {
        let req = self.request(Method::GET, Service::Community, "groups/", Auth::Required);
        self.send(req, "Failed to fetch communities").await
    }

    pub async fn my_communities(&self) -> Result<Vec<CommunitySummary>, ApiError> {
        let req = self.request(
            Method::GET,
            Service::Community,
            "groups/my-communities/",
            Auth::Required,
        );
        self.send(req, "Failed to fetch user community group").await
    }

    pub async fn community(&self, id: u64) -> Result<CommunitySummary, ApiError> {
        let req = self.request(
            Method::GET,
            Service::Community,
            &format!("groups/{id}/"),
            Auth::Required,
        );
        self.send(req, "Failed to fetch communities").await
    }

    pub async fn create_community(&self, draft: CommunityDraft) -> Result<CommunitySummary, ApiError> {
        let mut form = Form::new()
            .text("name", draft.name)
            .text("description", draft.description)
            .text("is_private", draft.is_private.to_string());
        if let Some(image) = draft.image {
            form = form.part("image", file_part(image)?);
        }
        let req = self
            .request(Method::POST, Service::Community, "groups/create/", Auth::Required)
            .multipart(form);
        self.send(req, "Failed to create community group").await
    }

    /// Current membership state without changing it.
    pub async fn membership(&self, id: u64) -> Result<MembershipResponse, ApiError> {
        let req = self.request(
            Method::GET,
            Service::Community,
            &format!("groups/{id}/join/"),
            Auth::Required,
        );
        self.send(req, "Failed to fetch membership").await
    }

    pub async fn join(&self, id: u64) -> Result<MembershipResponse, ApiError> {
        let req = self
            .request(
                Method::POST,
                Service::Community,
                &format!("groups/{id}/join/"),
                Auth::Required,
            )
            .json(&serde_json::json!({}));
        self.send_or_default(req, "Failed to join community group").await
    }

    pub async fn leave(&self, id: u64) -> Result<MembershipResponse, ApiError> {
        let req = self.request(
            Method::DELETE,
            Service::Community,
            &format!("groups/{id}/join/"),
            Auth::Required,
        );
        self.send_or_default(req, "Failed to leave community group").await
    }

    pub async fn members(&self, id: u64) -> Result<Vec<CommunityMember>, ApiError> {
        let req = self.request(
            Method::GET,
            Service::Community,
            &format!("groups/{id}/members/"),
            Auth::Required,
        );
        self.send(req, "Failed to fetch members").await
    }

    pub async fn community_posts(&self, id: u64) -> Result<Vec<CommunityPost>, ApiError> {
        let req = self.request(
            Method::GET,
            Service::Community,
            &format!("groups/{id}/posts/"),
            Auth::Required,
        );
        self.send(req, "Failed to fetch community group posts").await
    }

    pub async fn create_community_post(
        &self,
        community_id: u64,
        draft: PostDraft,
    ) -> Result<CommunityPost, ApiError> {
        let mut form = Form::new()
            .text("community", community_id.to_string())
            .text("title", draft.title)
            .text("content", draft.content);
        if let Some(image) = draft.image {
            form = form.part("image", file_part(image)?);
        }
        let req = self
            .request(Method::POST, Service::Community, "posts/create/", Auth::Required)
            .multipart(form);
        self.send(req, "Failed to create post").await
    }

    pub async fn update_community_post(
        &self,
        post_id: u64,
        draft: PostDraft,
    ) -> Result<CommunityPost, ApiError> {
        let mut form = Form::new()
            .text("title", draft.title)
            .text("content", draft.content);
        if let Some(image) = draft.image {
            form = form.part("image", file_part(image)?);
        }
        let req = self
            .request(
                Method::PUT,
                Service::Community,
                &format!("posts/{post_id}/"),
                Auth::Required,
            )
            .multipart(form);
        self.send(req, "Failed to update post").await
    }

    pub async fn delete_community_post(&self, post_id: u64) -> Result<(), ApiError> {
        let req = self.request(
            Method::DELETE,
            Service::Community,
            &format!("posts/{post_id}/"),
            Auth::Required,
        );
        self.send_unit(req, "Failed to delete post").await
    }
}

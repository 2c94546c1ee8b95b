//! Thread post endpoints (`threads/` service).

use reqwest::multipart::Form;
use reqwest::Method;
use store::models::{Comment, LikeResponse, PostDraft, ThreadSummary};
use store::{Service, TokenStorage};

use crate::client::{file_part, ApiClient, Auth};
use crate::error::ApiError;

#[derive(serde::Serialize)]
struct NewComment<'a> {
    content: &'a str,
    thread: u64,
}

fn draft_form(draft: PostDraft) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("title", draft.title)
        .text("content", draft.content);
    if let Some(image) = draft.image {
        form = form.part("image", file_part(image)?);
    }
    Ok(form)
}

impl<S: TokenStorage> ApiClient<S> {
    pub async fn threads(&self) -> Result<Vec<ThreadSummary>, ApiError> {
        let req = self.request(Method::GET, Service::Threads, "posts/", Auth::Required);
        self.send(req, "Failed to fetch thread posts").await
    }

    pub async fn my_threads(&self) -> Result<Vec<ThreadSummary>, ApiError> {
        let req = self.request(Method::GET, Service::Threads, "my-posts/", Auth::Required);
        self.send(req, "Failed to fetch user thread posts").await
    }

    /// A single post. Readable without a session.
    pub async fn thread(&self, id: u64) -> Result<ThreadSummary, ApiError> {
        let req = self.request(
            Method::GET,
            Service::Threads,
            &format!("posts/{id}/"),
            Auth::Anonymous,
        );
        self.send(req, "Failed to fetch thread post").await
    }

    pub async fn create_thread(&self, draft: PostDraft) -> Result<ThreadSummary, ApiError> {
        let req = self
            .request(Method::POST, Service::Threads, "create/", Auth::Required)
            .multipart(draft_form(draft)?);
        self.send(req, "Failed to create thread").await
    }

    pub async fn update_thread(&self, id: u64, draft: PostDraft) -> Result<ThreadSummary, ApiError> {
        let req = self
            .request(
                Method::PUT,
                Service::Threads,
                &format!("posts/{id}/"),
                Auth::Required,
            )
            .multipart(draft_form(draft)?);
        self.send(req, "Failed to update thread post").await
    }

    pub async fn delete_thread(&self, id: u64) -> Result<(), ApiError> {
        let req = self.request(
            Method::DELETE,
            Service::Threads,
            &format!("posts/{id}/"),
            Auth::Required,
        );
        self.send_unit(req, "Failed to delete thread post").await
    }

    /// Toggle the caller's like. The backend decides the direction and
    /// returns the fresh count.
    pub async fn toggle_like(&self, thread_id: u64) -> Result<LikeResponse, ApiError> {
        let req = self
            .request(
                Method::POST,
                Service::Threads,
                &format!("posts/{thread_id}/like/"),
                Auth::Required,
            )
            .json(&serde_json::json!({}));
        self.send(req, "Failed to like thread post").await
    }

    pub async fn comments(&self, thread_id: u64) -> Result<Vec<Comment>, ApiError> {
        let req = self.request(
            Method::GET,
            Service::Threads,
            &format!("posts/{thread_id}/comments/"),
            Auth::Required,
        );
        self.send(req, "Failed to fetch comments").await
    }

    pub async fn create_comment(&self, thread_id: u64, content: &str) -> Result<Comment, ApiError> {
        let req = self
            .request(
                Method::POST,
                Service::Threads,
                &format!("posts/{thread_id}/comments/"),
                Auth::Required,
            )
            .json(&NewComment {
                content,
                thread: thread_id,
            });
        self.send(req, "Failed to create comment").await
    }
}

//! # Resource payloads exchanged with the backend
//!
//! Typed counterparts of the JSON bodies the REST API returns and accepts.
//! Fields the backend omits on some endpoints are `Option` or carry a
//! `#[serde(default)]`, so one struct can decode every variant of a resource
//! that the screens consume.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`TokenPair`] | `signin/` response: access + refresh token. |
//! | [`UserSummary`] | One row of the users list, with follow flag and counters. |
//! | [`Profile`] | The signed-in user's profile, including cooldown eligibility fields. |
//! | [`ProfileDetails`] | Editable profile fields sent to `profile/details/` and embedded in sign-up. |
//! | [`FollowEdge`] | Follow/unfollow response with the server's counters. |
//! | [`FollowerEntry`] / [`FollowingEntry`] | Rows of the followers / following lists. |
//! | [`ThreadSummary`] | A thread post with like state. |
//! | [`CommunitySummary`] | A community group with membership state. |
//! | [`NotificationSummary`] | A notification with its read flag. |
//! | [`CooldownWindow`] | Eligibility snapshot for a rate-limited mutation. |
//! | [`Upload`] | A file attached to a multipart request. |
//!
//! Every entity that lives in a [`SharedList`](crate::SharedList) implements
//! [`Keyed`].

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Entity with a stable identity inside a local collection.
pub trait Keyed {
    type Key: Clone + Eq + Hash + Debug;

    fn key(&self) -> Self::Key;
}

/// Access/refresh token pair issued at sign-in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

/// Bare `{"message": ...}` acknowledgement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}

/// Sign-in request body.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// A user as listed by `users/`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(default)]
    pub id: Option<u64>,
    pub username: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub is_following: bool,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
}

impl UserSummary {
    /// "First Last", falling back to the username when both are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.firstname, self.lastname);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

impl Keyed for UserSummary {
    type Key = String;

    fn key(&self) -> String {
        self.username.clone()
    }
}

/// Editable profile fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub firstname: String,
    pub lastname: String,
    pub birth_date: String,
    pub gender: String,
    pub role: String,
    pub department: String,
    pub course: String,
}

impl ProfileDetails {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.username.as_deref().is_some_and(|u| u.trim().is_empty()) {
            missing.push("username");
        }
        let required = [
            ("firstname", &self.firstname),
            ("lastname", &self.lastname),
            ("birth_date", &self.birth_date),
            ("gender", &self.gender),
            ("role", &self.role),
            ("department", &self.department),
            ("course", &self.course),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        missing
    }
}

/// The signed-in user's profile as returned by `profile/`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub followers_count: Option<u64>,
    #[serde(default)]
    pub following_count: Option<u64>,
    #[serde(default)]
    pub can_update_profile: Option<bool>,
    #[serde(default)]
    pub days_until_next_update: Option<u32>,
    #[serde(default)]
    pub can_change_password: Option<bool>,
    #[serde(default)]
    pub days_until_password_change: Option<u32>,
}

/// `profile/details/` and `profile/image/` response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub message: Option<String>,
    pub profile: Profile,
}

/// Password change request body.
#[derive(Clone, Debug, Serialize)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Sign-up form; sent as multipart with `profile` as a JSON string.
#[derive(Clone, Debug, Default)]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub profile: ProfileDetails,
    pub profile_image: Option<Upload>,
}

/// `signup/` response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignUpReceipt {
    #[serde(default)]
    pub message: Option<String>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Follow/unfollow response. Every field is optional: the backend may send
/// only a message, or no body at all. Counts are authoritative when present.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowEdge {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub is_following: Option<bool>,
    #[serde(default)]
    pub followers_count: Option<u64>,
    #[serde(default)]
    pub following_count: Option<u64>,
}

/// Profile fragment embedded in follower/following rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowProfile {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub is_following: Option<bool>,
}

/// A row of `followers/{username}/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FollowerEntry {
    pub id: u64,
    pub follower_username: String,
    #[serde(default)]
    pub follower_profile: FollowProfile,
}

impl Keyed for FollowerEntry {
    type Key = String;

    fn key(&self) -> String {
        self.follower_username.clone()
    }
}

/// A row of `following/{username}/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FollowingEntry {
    pub id: u64,
    pub following_username: String,
    #[serde(default)]
    pub following_profile: FollowProfile,
}

impl Keyed for FollowingEntry {
    type Key = String;

    fn key(&self) -> String {
        self.following_username.clone()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowersPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub followers: Vec<FollowerEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowingPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub following: Vec<FollowingEntry>,
}

/// Author fragment embedded in thread posts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorProfile {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// A thread post.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub id: u64,
    #[serde(default)]
    pub author: Option<u64>,
    #[serde(default)]
    pub author_username: String,
    #[serde(default)]
    pub author_profile: Option<AuthorProfile>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default)]
    pub is_liked: bool,
}

impl Keyed for ThreadSummary {
    type Key = u64;

    fn key(&self) -> u64 {
        self.id
    }
}

/// Title/content/image for creating or updating a post.
#[derive(Clone, Debug, Default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub image: Option<Upload>,
}

/// `posts/{id}/like/` response. The backend toggles the like server-side.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LikeResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub likes_count: u64,
    #[serde(default)]
    pub is_liked: Option<bool>,
}

/// A comment on a thread.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub thread: Option<u64>,
    #[serde(default)]
    pub author_username: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A community group.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunitySummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub member_count: u64,
    #[serde(default)]
    pub is_member: bool,
}

impl Keyed for CommunitySummary {
    type Key = u64;

    fn key(&self) -> u64 {
        self.id
    }
}

/// Fields for creating a community group.
#[derive(Clone, Debug, Default)]
pub struct CommunityDraft {
    pub name: String,
    pub description: String,
    pub is_private: bool,
    pub image: Option<Upload>,
}

/// `groups/{id}/join/` response for GET, POST and DELETE.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MembershipResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub is_member: Option<bool>,
    #[serde(default)]
    pub member_count: Option<u64>,
}

/// A member row of `groups/{id}/members/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommunityMember {
    pub username: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// A post inside a community group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommunityPost {
    pub id: u64,
    pub community: u64,
    #[serde(default)]
    pub author_username: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Keyed for CommunityPost {
    type Key = u64;

    fn key(&self) -> u64 {
        self.id
    }
}

/// What a notification is about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    NewPost,
    #[default]
    #[serde(other)]
    Other,
}

/// A notification as returned by `content/`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationSummary {
    pub id: u64,
    #[serde(default)]
    pub sender_username: String,
    #[serde(default)]
    pub sender_first_name: Option<String>,
    #[serde(default)]
    pub sender_last_name: Option<String>,
    #[serde(default)]
    pub sender_profile_image: Option<String>,
    #[serde(default)]
    pub notification_type: NotificationKind,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub thread_id: Option<u64>,
    #[serde(default)]
    pub thread_title: Option<String>,
}

impl Keyed for NotificationSummary {
    type Key = u64;

    fn key(&self) -> u64 {
        self.id
    }
}

/// `content/` response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationFeed {
    #[serde(default)]
    pub notifications: Vec<NotificationSummary>,
    #[serde(default)]
    pub unread_count: u64,
}

/// Eligibility snapshot for a rate-limited mutation. Only ever replaced by a
/// fresh server value, never computed locally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownWindow {
    pub can_act: bool,
    pub days_remaining: u32,
}

impl CooldownWindow {
    pub fn open() -> Self {
        Self {
            can_act: true,
            days_remaining: 0,
        }
    }

    pub fn closed(days_remaining: u32) -> Self {
        Self {
            can_act: false,
            days_remaining,
        }
    }
}

impl Default for CooldownWindow {
    fn default() -> Self {
        Self::open()
    }
}

/// A file attached to a multipart form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

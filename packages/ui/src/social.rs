//! # Social toggles over local lists
//!
//! [`ToggleCoordinator`] binds a screen's [`SharedList`] to a
//! [`MutationCoordinator`] and applies settled follow/like/join responses to
//! the listed entity. Server-provided counts and flags replace local values;
//! when the server omits a count the local one moves by one.
//!
//! | Adapter | Entity | Calls |
//! |---------|--------|-------|
//! | [`follow`] | [`UserSummary`], [`FollowerEntry`] | `follow` / `unfollow` |
//! | [`like`] | [`ThreadSummary`] | `toggle_like` |
//! | [`membership`] | [`CommunitySummary`] | `join` / `leave` |
//!
//! [`FollowingList`] is the following screen, where unfollowing removes the
//! row instead of clearing a flag.

use std::future::Future;

use api::{ApiError, SocialApi};
use store::models::{
    CommunitySummary, FollowEdge, FollowerEntry, FollowingEntry, LikeResponse,
    MembershipResponse, ThreadSummary, UserSummary,
};
use store::{Keyed, SharedList};

use crate::mutation::{MutationCoordinator, Phase, Settlement, ToggleOp};
use crate::notice::Notices;

/// Entity with a binary relationship flag and an optional counter.
pub trait Toggleable: Keyed + Clone {
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
    /// Counter that moves with the flag, if the entity carries one.
    fn count(&self) -> Option<u64>;
    fn set_count(&mut self, count: u64);
}

/// Settled response of a toggle call.
pub trait ToggleReply {
    /// Flag the server reports, if any.
    fn active(&self) -> Option<bool>;
    /// Authoritative counter, if any.
    fn count(&self) -> Option<u64>;
}

impl Toggleable for UserSummary {
    fn is_active(&self) -> bool {
        self.is_following
    }

    fn set_active(&mut self, active: bool) {
        self.is_following = active;
    }

    fn count(&self) -> Option<u64> {
        Some(self.followers_count)
    }

    fn set_count(&mut self, count: u64) {
        self.followers_count = count;
    }
}

impl Toggleable for FollowerEntry {
    fn is_active(&self) -> bool {
        self.follower_profile.is_following.unwrap_or(false)
    }

    fn set_active(&mut self, active: bool) {
        self.follower_profile.is_following = Some(active);
    }

    fn count(&self) -> Option<u64> {
        None
    }

    fn set_count(&mut self, _count: u64) {}
}

impl Toggleable for ThreadSummary {
    fn is_active(&self) -> bool {
        self.is_liked
    }

    fn set_active(&mut self, active: bool) {
        self.is_liked = active;
    }

    fn count(&self) -> Option<u64> {
        Some(self.likes_count)
    }

    fn set_count(&mut self, count: u64) {
        self.likes_count = count;
    }
}

impl Toggleable for CommunitySummary {
    fn is_active(&self) -> bool {
        self.is_member
    }

    fn set_active(&mut self, active: bool) {
        self.is_member = active;
    }

    fn count(&self) -> Option<u64> {
        Some(self.member_count)
    }

    fn set_count(&mut self, count: u64) {
        self.member_count = count;
    }
}

impl ToggleReply for FollowEdge {
    fn active(&self) -> Option<bool> {
        self.is_following
    }

    fn count(&self) -> Option<u64> {
        self.followers_count
    }
}

impl ToggleReply for LikeResponse {
    fn active(&self) -> Option<bool> {
        self.is_liked
    }

    fn count(&self) -> Option<u64> {
        Some(self.likes_count)
    }
}

impl ToggleReply for MembershipResponse {
    fn active(&self) -> Option<bool> {
        self.is_member
    }

    fn count(&self) -> Option<u64> {
        self.member_count
    }
}

fn apply<T: Toggleable, R: ToggleReply>(item: &mut T, op: ToggleOp, reply: &R) {
    let active = reply.active().unwrap_or(op.target());
    let count = reply.count().or_else(|| {
        item.count().map(|c| {
            if active {
                c.saturating_add(1)
            } else {
                c.saturating_sub(1)
            }
        })
    });
    item.set_active(active);
    if let Some(count) = count {
        item.set_count(count);
    }
}

fn failure_message(err: &ApiError, fallback: &str) -> String {
    let message = err.message();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Toggle state for one screen's list.
#[derive(Clone, Debug)]
pub struct ToggleCoordinator<T: Toggleable> {
    items: SharedList<T>,
    mutations: MutationCoordinator<T::Key, ToggleOp>,
    notices: Notices,
    fallback: &'static str,
}

impl<T: Toggleable> ToggleCoordinator<T> {
    /// `fallback` is shown when a failure carries no message of its own.
    pub fn new(items: SharedList<T>, notices: Notices, fallback: &'static str) -> Self {
        Self {
            items,
            mutations: MutationCoordinator::new(),
            notices,
            fallback,
        }
    }

    pub fn items(&self) -> &SharedList<T> {
        &self.items
    }

    pub fn phase(&self, key: &T::Key) -> Phase<ToggleOp> {
        self.mutations.phase(key)
    }

    /// Flip the relationship for `key` through `call`.
    ///
    /// The op passed to `call` is derived from the entity's flag at the time
    /// of the request. A key that is not in the list is skipped.
    pub async fn toggle<R, F, Fut>(&self, key: &T::Key, call: F) -> Settlement<R>
    where
        R: ToggleReply,
        F: FnOnce(ToggleOp) -> Fut,
        Fut: Future<Output = Result<R, ApiError>>,
    {
        let Some(current) = self.items.get(key) else {
            tracing::debug!(?key, "toggle on unknown entity");
            return Settlement::Skipped;
        };
        let op = ToggleOp::from_current(current.is_active());

        let settlement = self.mutations.run(key.clone(), op, call).await;
        match &settlement {
            Settlement::Settled(reply) => {
                self.items.update(key, |item| apply(item, op, reply));
            }
            Settlement::Failed(err) => {
                self.notices.error(failure_message(err, self.fallback));
            }
            Settlement::Skipped => {}
        }
        settlement
    }
}

/// Follow or unfollow the user listed under `username`.
pub async fn follow<A, T>(
    coordinator: &ToggleCoordinator<T>,
    api: &A,
    username: &str,
) -> Settlement<FollowEdge>
where
    A: SocialApi,
    T: Toggleable<Key = String>,
{
    coordinator
        .toggle(&username.to_string(), |op| async move {
            match op {
                ToggleOp::Activate => api.follow(username).await,
                ToggleOp::Deactivate => api.unfollow(username).await,
            }
        })
        .await
}

/// Like or unlike a thread. The backend toggles server-side.
pub async fn like<A: SocialApi>(
    coordinator: &ToggleCoordinator<ThreadSummary>,
    api: &A,
    thread_id: u64,
) -> Settlement<LikeResponse> {
    coordinator
        .toggle(&thread_id, |_| api.toggle_like(thread_id))
        .await
}

/// Join or leave a community group.
pub async fn membership<A: SocialApi>(
    coordinator: &ToggleCoordinator<CommunitySummary>,
    api: &A,
    community_id: u64,
) -> Settlement<MembershipResponse> {
    coordinator
        .toggle(&community_id, |op| async move {
            match op {
                ToggleOp::Activate => api.join(community_id).await,
                ToggleOp::Deactivate => api.leave(community_id).await,
            }
        })
        .await
}

/// The following screen. Unfollowing removes the row.
#[derive(Clone, Debug)]
pub struct FollowingList {
    items: SharedList<FollowingEntry>,
    mutations: MutationCoordinator<String, ToggleOp>,
    notices: Notices,
}

impl FollowingList {
    pub fn new(items: SharedList<FollowingEntry>, notices: Notices) -> Self {
        Self {
            items,
            mutations: MutationCoordinator::new(),
            notices,
        }
    }

    pub fn items(&self) -> &SharedList<FollowingEntry> {
        &self.items
    }

    pub fn phase(&self, username: &str) -> Phase<ToggleOp> {
        self.mutations.phase(&username.to_string())
    }

    pub async fn unfollow<A: SocialApi>(&self, api: &A, username: &str) -> Settlement<FollowEdge> {
        let key = username.to_string();
        if !self.items.contains(&key) {
            return Settlement::Skipped;
        }
        let settlement = self
            .mutations
            .run(key.clone(), ToggleOp::Deactivate, |_| api.unfollow(username))
            .await;
        match &settlement {
            Settlement::Settled(_) => {
                self.items.remove(&key);
            }
            Settlement::Failed(err) => {
                self.notices.error(failure_message(err, "Failed to unfollow user"));
            }
            Settlement::Skipped => {}
        }
        settlement
    }
}

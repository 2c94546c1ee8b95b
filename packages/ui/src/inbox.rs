//! Notification list with its unread counter.
//!
//! Opening an unread notification sends one read acknowledgement; the local
//! flag flips and the counter drops by exactly one only after the server
//! confirms. Reads and deletes of the same notification are
//! serialized through one [`MutationCoordinator`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use api::{ApiError, SocialApi};
use store::models::{NotificationFeed, NotificationSummary};
use store::{ChangeListeners, SharedList};

use crate::mutation::{MutationCoordinator, Settlement};
use crate::notice::Notices;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InboxOp {
    MarkRead,
    Delete,
}

/// Outcome of opening a notification.
#[derive(Clone, Debug, PartialEq)]
pub enum Opened {
    /// Was unread and the server acknowledged the read.
    MarkedRead(NotificationSummary),
    /// Already read; no call was made.
    AlreadyRead(NotificationSummary),
    NotFound,
    /// A call for this notification was still in flight.
    Busy,
    Failed(ApiError),
}

impl Opened {
    /// The notification to navigate from, when there is one.
    pub fn notification(&self) -> Option<&NotificationSummary> {
        match self {
            Opened::MarkedRead(n) | Opened::AlreadyRead(n) => Some(n),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct NotificationInbox {
    items: SharedList<NotificationSummary>,
    unread: Arc<AtomicU64>,
    mutations: MutationCoordinator<u64, InboxOp>,
    notices: Notices,
}

impl NotificationInbox {
    pub fn new(notices: Notices) -> Self {
        Self {
            notices,
            ..Self::default()
        }
    }

    pub fn from_feed(feed: NotificationFeed, notices: Notices) -> Self {
        let inbox = Self::new(notices);
        inbox.replace(feed);
        inbox
    }

    pub fn items(&self) -> &SharedList<NotificationSummary> {
        &self.items
    }

    /// Called after any change to the list or the unread counter.
    pub fn listeners(&self) -> &ChangeListeners {
        self.items.listeners()
    }

    pub fn unread_count(&self) -> u64 {
        self.unread.load(Ordering::SeqCst)
    }

    pub fn is_pending(&self, id: u64) -> bool {
        self.mutations.is_pending(&id)
    }

    fn replace(&self, feed: NotificationFeed) {
        self.unread.store(feed.unread_count, Ordering::SeqCst);
        self.items.replace_all(feed.notifications);
    }

    fn decrement_unread(&self) {
        let _ = self
            .unread
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_sub(1)));
        self.items.listeners().notify();
    }

    /// Reload the list and counter from the server.
    pub async fn refresh<A: SocialApi>(&self, api: &A) -> Result<(), ApiError> {
        match api.fetch_notifications().await {
            Ok(feed) => {
                tracing::debug!(count = feed.notifications.len(), unread = feed.unread_count, "inbox refreshed");
                self.replace(feed);
                Ok(())
            }
            Err(err) => {
                self.notices.error(err.message());
                Err(err)
            }
        }
    }

    /// Open a notification, acknowledging the read if it was unread.
    pub async fn open<A: SocialApi>(&self, api: &A, id: u64) -> Opened {
        let Some(current) = self.items.get(&id) else {
            return Opened::NotFound;
        };
        if current.is_read {
            return Opened::AlreadyRead(current);
        }

        match self.mutations.run(id, InboxOp::MarkRead, |_| api.mark_read(id)).await {
            Settlement::Settled(_) => {
                let mut flipped = false;
                self.items.update(&id, |n| {
                    flipped = !n.is_read;
                    n.is_read = true;
                });
                if flipped {
                    self.decrement_unread();
                }
                match self.items.get(&id) {
                    Some(n) => Opened::MarkedRead(n),
                    None => Opened::NotFound,
                }
            }
            Settlement::Failed(err) => {
                self.notices.error(err.message());
                Opened::Failed(err)
            }
            Settlement::Skipped => Opened::Busy,
        }
    }

    /// Mark everything read once the server acknowledges.
    pub async fn mark_all_read<A: SocialApi>(&self, api: &A) -> Result<(), ApiError> {
        match api.mark_all_read().await {
            Ok(ack) => {
                self.unread.store(0, Ordering::SeqCst);
                self.items.update_all(|n| n.is_read = true);
                if let Some(message) = ack.message {
                    self.notices.success(message);
                }
                Ok(())
            }
            Err(err) => {
                self.notices.error(err.message());
                Err(err)
            }
        }
    }

    /// Delete a notification. Returns whether it was removed.
    pub async fn delete<A: SocialApi>(&self, api: &A, id: u64) -> bool {
        if !self.items.contains(&id) {
            return false;
        }
        match self
            .mutations
            .run(id, InboxOp::Delete, |_| api.delete_notification(id))
            .await
        {
            Settlement::Settled(()) => {
                if let Some(removed) = self.items.remove(&id) {
                    if !removed.is_read {
                        self.decrement_unread();
                    }
                }
                true
            }
            Settlement::Failed(err) => {
                self.notices.error(err.message());
                false
            }
            Settlement::Skipped => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use store::models::{Acknowledgement, FollowEdge, LikeResponse, MembershipResponse};

    use super::*;

    #[derive(Default)]
    struct FakeInbox {
        feed: RefCell<NotificationFeed>,
        fail: Cell<bool>,
        reads: RefCell<Vec<u64>>,
        deletes: RefCell<Vec<u64>>,
    }

    impl FakeInbox {
        fn check(&self) -> Result<(), ApiError> {
            if self.fail.get() {
                Err(ApiError::Unavailable("Failed to mark notification as read".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl SocialApi for FakeInbox {
        async fn follow(&self, _: &str) -> Result<FollowEdge, ApiError> {
            unreachable!()
        }

        async fn unfollow(&self, _: &str) -> Result<FollowEdge, ApiError> {
            unreachable!()
        }

        async fn toggle_like(&self, _: u64) -> Result<LikeResponse, ApiError> {
            unreachable!()
        }

        async fn join(&self, _: u64) -> Result<MembershipResponse, ApiError> {
            unreachable!()
        }

        async fn leave(&self, _: u64) -> Result<MembershipResponse, ApiError> {
            unreachable!()
        }

        async fn fetch_notifications(&self) -> Result<NotificationFeed, ApiError> {
            self.check()?;
            Ok(self.feed.borrow().clone())
        }

        async fn mark_read(&self, id: u64) -> Result<NotificationSummary, ApiError> {
            self.check()?;
            self.reads.borrow_mut().push(id);
            Ok(note(id, true))
        }

        async fn mark_all_read(&self) -> Result<Acknowledgement, ApiError> {
            self.check()?;
            Ok(Acknowledgement {
                message: Some("All notifications marked as read".to_string()),
            })
        }

        async fn delete_notification(&self, id: u64) -> Result<(), ApiError> {
            self.check()?;
            self.deletes.borrow_mut().push(id);
            Ok(())
        }
    }

    fn note(id: u64, is_read: bool) -> NotificationSummary {
        NotificationSummary {
            id,
            sender_username: "ben".to_string(),
            message: format!("notification {id}"),
            is_read,
            ..Default::default()
        }
    }

    fn feed() -> NotificationFeed {
        NotificationFeed {
            notifications: vec![note(1, false), note(2, true), note(3, false)],
            unread_count: 2,
        }
    }

    #[tokio::test]
    async fn test_opening_unread_decrements_by_one() {
        let api = FakeInbox::default();
        let inbox = NotificationInbox::from_feed(feed(), Notices::new());

        let opened = inbox.open(&api, 1).await;
        assert!(opened.notification().unwrap().is_read);
        assert_eq!(inbox.unread_count(), 1);
        assert_eq!(*api.reads.borrow(), vec![1]);

        // Second open is local only.
        assert!(matches!(inbox.open(&api, 1).await, Opened::AlreadyRead(_)));
        assert_eq!(inbox.unread_count(), 1);
        assert_eq!(api.reads.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_opening_read_makes_no_call() {
        let api = FakeInbox::default();
        let inbox = NotificationInbox::from_feed(feed(), Notices::new());

        assert!(matches!(inbox.open(&api, 2).await, Opened::AlreadyRead(_)));
        assert!(api.reads.borrow().is_empty());
        assert_eq!(inbox.open(&api, 99).await, Opened::NotFound);
    }

    #[tokio::test]
    async fn test_failed_read_keeps_state() {
        let api = FakeInbox::default();
        api.fail.set(true);
        let notices = Notices::new();
        let inbox = NotificationInbox::from_feed(feed(), notices.clone());

        assert!(matches!(inbox.open(&api, 3).await, Opened::Failed(_)));
        assert!(!inbox.items().get(&3).unwrap().is_read);
        assert_eq!(inbox.unread_count(), 2);
        assert!(!inbox.is_pending(3));
        assert_eq!(
            notices.latest().unwrap().message,
            "Failed to mark notification as read"
        );
    }

    #[tokio::test]
    async fn test_mark_all_read_zeroes_counter() {
        let api = FakeInbox::default();
        let notices = Notices::new();
        let inbox = NotificationInbox::from_feed(feed(), notices.clone());

        inbox.mark_all_read(&api).await.unwrap();
        assert_eq!(inbox.unread_count(), 0);
        assert!(inbox.items().snapshot().iter().all(|n| n.is_read));
        assert_eq!(
            notices.latest().unwrap().message,
            "All notifications marked as read"
        );
    }

    #[tokio::test]
    async fn test_delete_adjusts_unread_only_for_unread_entries() {
        let api = FakeInbox::default();
        let inbox = NotificationInbox::from_feed(feed(), Notices::new());

        assert!(inbox.delete(&api, 2).await);
        assert_eq!(inbox.unread_count(), 2);
        assert!(inbox.delete(&api, 3).await);
        assert_eq!(inbox.unread_count(), 1);
        assert!(!inbox.delete(&api, 3).await);

        let ids: Vec<u64> = inbox.items().snapshot().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(*api.deletes.borrow(), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_refresh_replaces_list_and_counter() {
        let api = FakeInbox::default();
        *api.feed.borrow_mut() = feed();
        let inbox = NotificationInbox::new(Notices::new());
        assert!(inbox.items().is_empty());

        inbox.refresh(&api).await.unwrap();
        assert_eq!(inbox.items().len(), 3);
        assert_eq!(inbox.unread_count(), 2);
    }

    #[tokio::test]
    async fn test_listeners_observe_settled_counter() {
        let api = FakeInbox::default();
        let inbox = NotificationInbox::from_feed(feed(), Notices::new());
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let id = inbox.listeners().subscribe({
            let inbox = inbox.clone();
            let seen = Arc::clone(&seen);
            move || seen.lock().unwrap().push(inbox.unread_count())
        });

        inbox.open(&api, 1).await;
        assert_eq!(seen.lock().unwrap().last(), Some(&1));

        inbox.delete(&api, 3).await;
        assert_eq!(seen.lock().unwrap().last(), Some(&0));
        inbox.listeners().unsubscribe(id);
    }
}

//! # Shared local collections
//!
//! [`SharedList`] is the ordered, clone-shared list a screen keeps for the
//! entities it displays (users, threads, communities, notifications). Every
//! clone observes the same contents, so a mutation that settles after the
//! screen re-rendered still lands in the list the screen reads.
//!
//! The lock is never held across an `.await`; callers read a value, release,
//! and come back to write once the remote call settles.
//!
//! A view that renders a list subscribes through [`SharedList::listeners`]
//! and is called back after every change, outside the list's lock.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::Keyed;

type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Clone-shared set of change callbacks.
#[derive(Clone, Default)]
pub struct ChangeListeners {
    registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for ChangeListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeListeners")
            .field("count", &self.lock().listeners.len())
            .finish()
    }
}

impl ChangeListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` and return the id to unsubscribe it with.
    pub fn subscribe(&self, f: impl Fn() + Send + Sync + 'static) -> u64 {
        let mut registry = self.lock();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.listeners.push((id, Arc::new(f)));
        id
    }

    pub fn unsubscribe(&self, id: u64) {
        self.lock().listeners.retain(|(other, _)| *other != id);
    }

    /// Call every listener. Listeners may subscribe or unsubscribe.
    pub fn notify(&self) {
        let listeners: Vec<Listener> = self
            .lock()
            .listeners
            .iter()
            .map(|(_, f)| Arc::clone(f))
            .collect();
        for f in listeners {
            f();
        }
    }

    pub fn len(&self) -> usize {
        self.lock().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().listeners.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clone-shared ordered list of keyed entities.
#[derive(Debug)]
pub struct SharedList<T> {
    items: Arc<Mutex<Vec<T>>>,
    listeners: ChangeListeners,
}

impl<T> Clone for SharedList<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            listeners: self.listeners.clone(),
        }
    }
}

impl<T> Default for SharedList<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
            listeners: ChangeListeners::new(),
        }
    }
}

impl<T: Keyed + Clone> SharedList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(Mutex::new(items)),
            listeners: ChangeListeners::new(),
        }
    }

    /// Callbacks run after every change to the contents.
    pub fn listeners(&self) -> &ChangeListeners {
        &self.listeners
    }

    /// Replace the whole contents, e.g. after a fresh fetch.
    pub fn replace_all(&self, items: Vec<T>) {
        *self.lock() = items;
        self.listeners.notify();
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.lock().clone()
    }

    pub fn get(&self, key: &T::Key) -> Option<T> {
        self.lock().iter().find(|item| &item.key() == key).cloned()
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.lock().iter().any(|item| &item.key() == key)
    }

    /// Apply `f` to the entity with `key`. Returns false when it is absent.
    pub fn update(&self, key: &T::Key, f: impl FnOnce(&mut T)) -> bool {
        let found = {
            let mut items = self.lock();
            match items.iter_mut().find(|item| &item.key() == key) {
                Some(item) => {
                    f(item);
                    true
                }
                None => false,
            }
        };
        if found {
            self.listeners.notify();
        }
        found
    }

    pub fn update_all(&self, mut f: impl FnMut(&mut T)) {
        for item in self.lock().iter_mut() {
            f(item);
        }
        self.listeners.notify();
    }

    /// Remove the entity with `key`, keeping the order of the rest.
    pub fn remove(&self, key: &T::Key) -> Option<T> {
        let removed = {
            let mut items = self.lock();
            let index = items.iter().position(|item| &item.key() == key)?;
            items.remove(index)
        };
        self.listeners.notify();
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::models::ThreadSummary;

    fn counter(listeners: &ChangeListeners) -> (Arc<AtomicUsize>, u64) {
        let calls = Arc::new(AtomicUsize::new(0));
        let id = listeners.subscribe({
            let calls = Arc::clone(&calls);
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        });
        (calls, id)
    }

    fn thread(id: u64) -> ThreadSummary {
        ThreadSummary {
            id,
            title: format!("t{id}"),
            ..ThreadSummary::default()
        }
    }

    #[test]
    fn test_update_and_get() {
        let list = SharedList::new(vec![thread(1), thread(2)]);
        assert!(list.update(&2, |t| t.likes_count = 7));
        assert_eq!(list.get(&2).unwrap().likes_count, 7);
        assert!(!list.update(&3, |t| t.likes_count = 1));
    }

    #[test]
    fn test_remove_keeps_order() {
        let list = SharedList::new(vec![thread(1), thread(2), thread(3)]);
        let removed = list.remove(&2).unwrap();
        assert_eq!(removed.id, 2);
        let ids: Vec<u64> = list.snapshot().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(list.remove(&2).is_none());
    }

    #[test]
    fn test_clones_share_contents() {
        let list = SharedList::new(vec![thread(1)]);
        let view = list.clone();
        list.replace_all(vec![thread(5), thread(6)]);
        assert_eq!(view.len(), 2);
        assert!(view.contains(&6));
        view.update_all(|t| t.is_liked = true);
        assert!(list.snapshot().iter().all(|t| t.is_liked));
    }

    #[test]
    fn test_changes_notify_listeners() {
        let list = SharedList::new(vec![thread(1), thread(2)]);
        let (calls, _) = counter(list.listeners());

        assert!(list.update(&1, |t| t.is_liked = true));
        assert!(list.remove(&2).is_some());
        list.replace_all(vec![thread(3)]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_misses_do_not_notify() {
        let list = SharedList::new(vec![thread(1)]);
        let (calls, _) = counter(list.listeners());

        assert!(!list.update(&9, |t| t.is_liked = true));
        assert!(list.remove(&9).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe_stops_calls() {
        let listeners = ChangeListeners::new();
        let (calls, id) = counter(&listeners);
        listeners.notify();
        listeners.unsubscribe(id);
        listeners.notify();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_listener_may_unsubscribe_itself() {
        let listeners = ChangeListeners::new();
        let id = Arc::new(AtomicUsize::new(0));
        let subscribed = listeners.subscribe({
            let listeners = listeners.clone();
            let id = Arc::clone(&id);
            move || listeners.unsubscribe(id.load(Ordering::SeqCst) as u64)
        });
        id.store(subscribed as usize, Ordering::SeqCst);

        listeners.notify();
        assert!(listeners.is_empty());
    }
}

//! Hooks that re-render a component when clone-shared state changes.
//!
//! [`SharedList`], [`Notices`](crate::Notices) and the coordinators built on
//! them live outside Dioxus signals. A component that renders one of them
//! watches its [`ChangeListeners`] and is scheduled again on every change.

use dioxus::prelude::*;
use store::{ChangeListeners, Keyed, SharedList};

/// Subscribe the calling component to `listeners` and return the number of
/// changes seen so far. The subscription is made on first render and removed
/// when the component unmounts.
pub fn use_revision(listeners: &ChangeListeners) -> u64 {
    let revision = use_signal_sync(|| 0u64);
    let id = use_hook({
        let listeners = listeners.clone();
        move || {
            listeners.subscribe(move || {
                let mut revision = revision;
                // Fails only once the owning scope is gone.
                if let Ok(mut value) = revision.try_write() {
                    *value += 1;
                };
            })
        }
    });
    let listeners = listeners.clone();
    use_drop(move || listeners.unsubscribe(id));
    let current = *revision.read();
    current
}

/// Current contents of `list`, re-read whenever it changes.
pub fn use_shared_list<T: Keyed + Clone>(list: &SharedList<T>) -> Vec<T> {
    use_revision(list.listeners());
    list.snapshot()
}

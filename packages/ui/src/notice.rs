//! Transient, dismissible notices raised by screen-level state logic.
//!
//! [`Notices`] is a clone-shared queue. Every push, dismiss and drain is
//! announced through [`Notices::listeners`], which [`NoticeStack`] watches, so
//! a notice raised from a settled remote call is drawn right away.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dioxus::prelude::*;
use store::ChangeListeners;

use crate::watch::use_revision;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    fn class(self) -> &'static str {
        match self {
            NoticeLevel::Info => "notice notice--info",
            NoticeLevel::Success => "notice notice--success",
            NoticeLevel::Warning => "notice notice--warning",
            NoticeLevel::Error => "notice notice--error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub timestamp: String,
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Default)]
struct Queue {
    next_id: u64,
    entries: Vec<Notice>,
}

/// Clone-shared notice queue. Every clone pushes into the same queue.
#[derive(Clone, Debug, Default)]
pub struct Notices {
    queue: Arc<Mutex<Queue>>,
    listeners: ChangeListeners,
}

impl PartialEq for Notices {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.queue, &other.queue)
    }
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Called after every push, dismiss and drain.
    pub fn listeners(&self) -> &ChangeListeners {
        &self.listeners
    }

    /// Append a notice and return its id.
    pub fn push(&self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        let message = message.into();
        tracing::debug!(?level, %message, "notice");
        let id = {
            let mut queue = self.lock();
            queue.next_id += 1;
            let id = queue.next_id;
            queue.entries.push(Notice {
                id,
                timestamp: current_time(),
                level,
                message,
            });
            id
        };
        self.listeners.notify();
        id
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Info, message)
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Success, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Error, message)
    }

    pub fn latest(&self) -> Option<Notice> {
        self.lock().entries.last().cloned()
    }

    pub fn snapshot(&self) -> Vec<Notice> {
        self.lock().entries.clone()
    }

    /// Remove one notice. Returns false if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let removed = {
            let mut queue = self.lock();
            let before = queue.entries.len();
            queue.entries.retain(|n| n.id != id);
            queue.entries.len() != before
        };
        if removed {
            self.listeners.notify();
        }
        removed
    }

    /// Take every pending notice, leaving the queue empty.
    pub fn drain(&self) -> Vec<Notice> {
        let drained = std::mem::take(&mut self.lock().entries);
        if !drained.is_empty() {
            self.listeners.notify();
        }
        drained
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}

pub fn use_notices() -> Notices {
    use_context::<Notices>()
}

/// Renders pending notices, each with a dismiss button.
#[component]
pub fn NoticeStack() -> Element {
    let notices = use_notices();
    use_revision(notices.listeners());

    rsx! {
        div { class: "notice-stack",
            for notice in notices.snapshot() {
                div {
                    key: "{notice.id}",
                    class: notice.level.class(),
                    span { class: "notice__time", "{notice.timestamp}" }
                    span { class: "notice__message", "{notice.message}" }
                    button {
                        class: "notice__dismiss",
                        onclick: {
                            let notices = notices.clone();
                            move |_| {
                                notices.dismiss(notice.id);
                            }
                        },
                        "×"
                    }
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn current_time() -> String {
    let date = js_sys::Date::new_0();
    let h = date.get_hours();
    let m = date.get_minutes();
    let s = date.get_seconds();
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(not(target_arch = "wasm32"))]
fn current_time() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        % 86_400;
    format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

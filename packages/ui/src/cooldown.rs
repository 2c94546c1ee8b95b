//! # Cooldown gate for rate-limited profile mutations
//!
//! Password changes and profile-detail updates are allowed once per server
//! window. A [`CooldownGate`] holds the last eligibility snapshot fetched
//! from `profile/` and keeps the action disabled while it is closed.
//!
//! The snapshot is only ever replaced by server data: a fresh profile fetch,
//! or a rejection that carries a remaining-days value. It is never computed
//! from timestamps on the client.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use api::{ApiError, ProfileApi};
use store::models::Profile;
use store::CooldownWindow;

use crate::notice::Notices;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CooldownKind {
    PasswordChange,
    ProfileUpdate,
}

impl CooldownKind {
    /// Eligibility for this kind as reported in a profile.
    ///
    /// A profile that does not report the flag leaves the window open.
    pub fn window(self, profile: &Profile) -> CooldownWindow {
        let (can_act, days) = match self {
            CooldownKind::PasswordChange => {
                (profile.can_change_password, profile.days_until_password_change)
            }
            CooldownKind::ProfileUpdate => {
                (profile.can_update_profile, profile.days_until_next_update)
            }
        };
        match can_act {
            Some(false) => CooldownWindow::closed(days.unwrap_or(0)),
            _ => CooldownWindow::open(),
        }
    }

    fn action(self) -> &'static str {
        match self {
            CooldownKind::PasswordChange => "change your password",
            CooldownKind::ProfileUpdate => "update your profile",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CooldownOutcome<T> {
    Done(T),
    /// Not sent: the window is closed.
    Blocked { days_remaining: u32 },
    Failed(ApiError),
}

/// Eligibility gate for one rate-limited action.
#[derive(Clone, Debug)]
pub struct CooldownGate {
    kind: CooldownKind,
    window: Arc<Mutex<CooldownWindow>>,
    notices: Notices,
}

impl CooldownGate {
    /// A gate that starts open until the first refresh.
    pub fn new(kind: CooldownKind, notices: Notices) -> Self {
        Self {
            kind,
            window: Arc::new(Mutex::new(CooldownWindow::open())),
            notices,
        }
    }

    pub fn kind(&self) -> CooldownKind {
        self.kind
    }

    pub fn window(&self) -> CooldownWindow {
        *self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_window(&self, window: CooldownWindow) {
        *self.window.lock().unwrap_or_else(PoisonError::into_inner) = window;
    }

    /// Whether the action control should be enabled.
    pub fn is_enabled(&self) -> bool {
        self.window().can_act
    }

    pub fn days_remaining(&self) -> u32 {
        self.window().days_remaining
    }

    /// Text shown next to a disabled control.
    pub fn status(&self) -> Option<String> {
        let window = self.window();
        if window.can_act {
            None
        } else {
            Some(format!(
                "You can {} again in {} day(s).",
                self.kind.action(),
                window.days_remaining
            ))
        }
    }

    /// Fetch the snapshot. A failed fetch leaves the action allowed; the
    /// server still rejects it if the window is closed.
    pub async fn refresh<P: ProfileApi>(&self, api: &P) -> CooldownWindow {
        let window = match api.fetch_profile().await {
            Ok(profile) => self.kind.window(&profile),
            Err(err) => {
                tracing::warn!(kind = ?self.kind, error = %err, "eligibility fetch failed");
                CooldownWindow::open()
            }
        };
        self.set_window(window);
        window
    }

    /// Run the gated mutation unless the window is closed.
    pub async fn submit<T, F, Fut>(&self, call: F) -> CooldownOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let window = self.window();
        if !window.can_act {
            if let Some(status) = self.status() {
                self.notices.warning(status);
            }
            return CooldownOutcome::Blocked {
                days_remaining: window.days_remaining,
            };
        }

        match call().await {
            Ok(value) => CooldownOutcome::Done(value),
            Err(err) => {
                if let Some(days) = err.days_remaining() {
                    self.set_window(CooldownWindow::closed(days));
                }
                self.notices.error(err.message());
                CooldownOutcome::Failed(err)
            }
        }
    }
}

//! Screen-level state logic shared by every platform shell.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`guard`] | Protected / public-only route wrappers |
//! | [`mutation`] | Per-key in-flight coordination for remote mutations |
//! | [`social`] | Follow, like and membership toggles over local lists |
//! | [`inbox`] | Notification list and unread counter |
//! | [`cooldown`] | Eligibility gate for password and profile changes |
//! | [`notice`] | Transient, dismissible notices |
//! | [`session`] | Session context provider and hooks |
//! | [`watch`] | Re-render hooks for clone-shared lists and queues |

pub mod cooldown;
pub use cooldown::{CooldownGate, CooldownKind, CooldownOutcome};

pub mod guard;
pub use guard::{Protected, PublicOnly, RouteDecision, RouteGuard};

pub mod inbox;
pub use inbox::{NotificationInbox, Opened};

pub mod mutation;
pub use mutation::{MutationCoordinator, Phase, Settlement, ToggleOp};

pub mod notice;
pub use notice::{use_notices, Notice, NoticeLevel, NoticeStack, Notices};

pub mod session;
pub use session::{use_session, AppStorage, SessionProvider, SessionState, SignOutButton};

pub mod social;
pub use social::{follow, like, membership, FollowingList, ToggleCoordinator, Toggleable};

pub mod watch;
pub use watch::{use_revision, use_shared_list};

pub mod collection;
pub mod config;
pub mod models;
pub mod session;
pub mod storage;

mod memory;
pub use memory::MemoryStorage;

mod file_store;
pub use file_store::FileStorage;

pub use collection::{ChangeListeners, SharedList};
pub use config::{ClientConfig, Service};
pub use models::{CooldownWindow, Keyed, TokenPair};
pub use session::{Session, SessionStore};
pub use storage::{StorageError, TokenStorage};

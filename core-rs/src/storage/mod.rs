//! Storage module for the credential record
//!
//! Provides the abstract key-value interface (KeyValueStore trait), its
//! backends, and the typed CredentialStore built on top:
//! - MemoryStore: process-local storage
//! - FileStore: single JSON file on disk
//! - StoreWatcher: cross-process change announcements for FileStore

mod traits;
mod memory;
mod filesystem;
mod custom_roles;
mod credential_store;
mod watcher;

pub use traits::KeyValueStore;
pub use memory::MemoryStore;
pub use filesystem::{FileStore, CREDENTIALS_FILE};
pub use custom_roles::CustomRoles;
pub use credential_store::{
    validate_code, CredentialStore, StoreChange, Subscription, ADMIN_CODE_KEY,
    CURRENT_ROLE_KEY, CUSTOM_ROLES_KEY, OWNER_CODE_KEY,
};
pub use watcher::StoreWatcher;

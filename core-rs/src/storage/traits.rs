//! Key-value storage trait for RoleGuard
//!
//! Defines the abstract interface for credential storage backends.
//! Implementations include:
//! - MemoryStore (process-local, used by tests and ephemeral sessions)
//! - FileStore (single JSON file on disk)

use crate::errors::Result;

/// Storage backend trait
///
/// Every value is a plain string under a string key. Backends must make each
/// single-key write atomic; nothing spans more than one key.
///
/// # Example Implementation
///
/// ```rust,ignore
/// pub struct MyStore { ... }
///
/// impl KeyValueStore for MyStore {
///     fn get(&self, key: &str) -> Result<Option<String>> {
///         // Read the latest committed value, never a cached one
///     }
///
///     // ... other methods
/// }
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Returns
    /// `None` when the key was never written (or was removed)
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// Backend name for logs
    fn backend_name(&self) -> &str;
}

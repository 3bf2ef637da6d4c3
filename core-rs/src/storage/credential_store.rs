//! Credential store
//!
//! Typed access to the persisted credential record: the active role, the
//! owner/admin unlock codes and the custom-role mapping. Every successful
//! write is announced to subscribers.
//!
//! | Key               | Value                         | Default when absent   |
//! |-------------------|-------------------------------|-----------------------|
//! | `currentRole`     | ranked or custom role name    | `visitor`             |
//! | `pageOwnerCode`   | 6 digits                      | `445566`              |
//! | `pageAdminCode`   | 6 digits                      | `778899`              |
//! | `pageCustomRoles` | JSON object name -> 6 digits  | two-entry seed        |

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tracing::{debug, info, warn};

use super::custom_roles::CustomRoles;
use super::filesystem::FileStore;
use super::memory::MemoryStore;
use super::traits::KeyValueStore;
use crate::errors::{Result, RoleGuardError};
use crate::rbac::hierarchy::{RankedRole, DEFAULT_ADMIN_CODE, DEFAULT_OWNER_CODE};

pub const CURRENT_ROLE_KEY: &str = "currentRole";
pub const OWNER_CODE_KEY: &str = "pageOwnerCode";
pub const ADMIN_CODE_KEY: &str = "pageAdminCode";
pub const CUSTOM_ROLES_KEY: &str = "pageCustomRoles";

// ASCII digits only; `\d` would also accept other Unicode decimal digits
static CODE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{6}$").unwrap());

/// Check that `code` is exactly six ASCII digits
pub fn validate_code(code: &str) -> Result<()> {
    if CODE_PATTERN.is_match(code) {
        Ok(())
    } else {
        Err(RoleGuardError::Validation("Code must be 6 digits".to_string()))
    }
}

/// What a committed write touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    RoleChanged,
    CodeChanged { key: String },
    CustomRolesChanged,
    /// Another process wrote the shared storage; re-query everything
    External,
}

type Listener = Arc<dyn Fn(&StoreChange) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

fn lock_listeners(listeners: &Mutex<Listeners>) -> MutexGuard<'_, Listeners> {
    // A panicking subscriber must not wedge notifications for everyone else
    listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle returned by [`CredentialStore::subscribe`]
///
/// Dropping the handle unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            lock_listeners(&listeners)
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

/// Explicit handle over the persisted credential record
///
/// Cloning yields another handle onto the same backend and subscriber list.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn KeyValueStore>,
    listeners: Arc<Mutex<Listeners>>,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        CredentialStore {
            backend,
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    /// Store backed by process memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Store backed by a JSON file at `path`
    pub fn open_file<P: AsRef<Path>>(path: P) -> Self {
        Self::new(Arc::new(FileStore::new(path)))
    }

    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    // Empty values read as unset, same as never written
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.backend.get(key)?.filter(|v| !v.is_empty()))
    }

    /// Active role, `visitor` when unset
    pub fn current_role(&self) -> Result<String> {
        Ok(self
            .read(CURRENT_ROLE_KEY)?
            .unwrap_or_else(|| RankedRole::Visitor.as_str().to_string()))
    }

    /// Overwrite the active role without checking that it names a known role
    ///
    /// Low-level primitive. Untrusted input must go through
    /// [`CodeAuthenticator::try_become_role`](crate::rbac::CodeAuthenticator::try_become_role).
    /// A name that is neither ranked nor a registered custom role never
    /// satisfies any gate.
    pub fn set_current_role_unchecked(&self, role: &str) -> Result<()> {
        self.backend.set(CURRENT_ROLE_KEY, role)?;
        info!(role, "active role changed");
        self.notify(&StoreChange::RoleChanged);
        Ok(())
    }

    /// Stored code under `key`, or `default` when unset
    pub fn code(&self, key: &str, default: &str) -> Result<String> {
        Ok(self.read(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// Validate and store a code
    ///
    /// # Errors
    /// `Validation` if `new_code` is not six digits; nothing is written.
    pub fn save_code(&self, key: &str, new_code: &str) -> Result<()> {
        if let Err(e) = validate_code(new_code) {
            warn!(key, "rejected code write: not 6 digits");
            return Err(e);
        }
        self.backend.set(key, new_code)?;
        info!(key, "unlock code saved");
        self.notify(&StoreChange::CodeChanged {
            key: key.to_string(),
        });
        Ok(())
    }

    pub fn owner_code(&self) -> Result<String> {
        self.code(OWNER_CODE_KEY, DEFAULT_OWNER_CODE)
    }

    pub fn admin_code(&self) -> Result<String> {
        self.code(ADMIN_CODE_KEY, DEFAULT_ADMIN_CODE)
    }

    /// Persisted custom roles, or the seed mapping if none were ever saved
    ///
    /// The seed is not written back; storage stays empty until
    /// [`save_custom_roles`](Self::save_custom_roles) is called.
    pub fn custom_roles(&self) -> Result<CustomRoles> {
        match self.read(CUSTOM_ROLES_KEY)? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                RoleGuardError::ParseError(format!("Invalid custom roles JSON: {}", e))
            }),
            None => Ok(CustomRoles::seed()),
        }
    }

    /// Replace the whole custom-role mapping
    ///
    /// Callers merge before calling; there is no per-entry merge here.
    ///
    /// # Errors
    /// `Validation` if any code is not six digits; nothing is written.
    pub fn save_custom_roles(&self, roles: &CustomRoles) -> Result<()> {
        for (name, code) in roles.iter() {
            if validate_code(code).is_err() {
                warn!(role = name, "rejected custom roles write: code not 6 digits");
                return Err(RoleGuardError::Validation(format!(
                    "Code for custom role '{}' must be 6 digits",
                    name
                )));
            }
        }

        let json = serde_json::to_string(roles).map_err(|e| {
            RoleGuardError::SerializationError(format!("Failed to serialize custom roles: {}", e))
        })?;
        self.backend.set(CUSTOM_ROLES_KEY, &json)?;
        info!(count = roles.len(), "custom roles saved");
        self.notify(&StoreChange::CustomRolesChanged);
        Ok(())
    }

    /// Register a callback invoked after every successful write
    ///
    /// # Example
    /// ```
    /// # use roleguard_core::storage::{CredentialStore, StoreChange};
    /// let store = CredentialStore::in_memory();
    /// let subscription = store.subscribe(|change| {
    ///     if *change == StoreChange::RoleChanged {
    ///         // re-run gate checks
    ///     }
    /// });
    /// subscription.unsubscribe();
    /// ```
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&StoreChange) + Send + Sync + 'static,
    {
        let mut listeners = lock_listeners(&self.listeners);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(callback)));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock_listeners(&self.listeners).entries.len()
    }

    /// Tell subscribers that another process changed the shared storage
    pub fn announce_external_change(&self) {
        debug!(backend = self.backend.backend_name(), "external credential change");
        self.notify(&StoreChange::External);
    }

    fn notify(&self, change: &StoreChange) {
        // Snapshot first so callbacks may (un)subscribe without deadlocking
        let snapshot: Vec<Listener> = lock_listeners(&self.listeners)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(change);
        }
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("backend", &self.backend.backend_name())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

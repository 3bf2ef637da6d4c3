//! # RoleGuard Core
//!
//! Local role-based access control for a single-actor client. Resolves who is
//! acting now, decides whether that role may see a gated region or manage
//! another role's unlock code, and persists and rotates the codes.
//!
//! This is not a security boundary: codes are readable by whoever can read
//! the credential store, and nothing is verified server-side.
//!
//! ## Roles
//!
//! ```text
//! developer > owner > admin > visitor        ranked, compared by privilege
//! betaTester, partner, ...                   custom, matched by exact name
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │ RoleResolver   CodeAuthenticator   DelegationAuthority │
//! │                   RoleManager      RoleBadge           │
//! └───────────────────────────┬────────────────────────────┘
//!                             │ &CredentialStore
//!                 ┌───────────┴───────────┐
//!                 │    CredentialStore    │──▶ subscribers
//!                 └───────────┬───────────┘
//!                             │ dyn KeyValueStore
//!                  MemoryStore │ FileStore (+ StoreWatcher)
//! ```
//!
//! ## Example
//!
//! ```
//! use roleguard_core::{CodeAuthenticator, CredentialStore, RoleResolver};
//!
//! let store = CredentialStore::in_memory();
//! assert!(CodeAuthenticator::new(&store).try_become_role("778899")?);
//! assert!(RoleResolver::new(&store).has_access("admin")?);
//! assert!(!RoleResolver::new(&store).has_access("owner")?);
//! # Ok::<(), roleguard_core::RoleGuardError>(())
//! ```

pub mod errors;
pub mod config;
pub mod rbac;
pub mod storage;

pub use errors::RoleGuardError;
pub use config::{RoleGuardConfig, StoreBackend, StoreConfig};
pub use rbac::{
    BadgeTone, CodeAuthenticator, CodeEntry, DelegationAuthority, GateDecision, RankedRole,
    RoleBadge, RoleKind, RoleManager, RoleResolver, DEVELOPER_CODE, ROLE_HIERARCHY,
};
pub use storage::{
    CredentialStore, CustomRoles, FileStore, KeyValueStore, MemoryStore, StoreChange,
    StoreWatcher, Subscription,
};

/// Version of the credential record layout
pub const VERSION: &str = "0.4.2";

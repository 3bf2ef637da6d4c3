//! RBAC (Role-Based Access Control) module
//!
//! Role hierarchy, access resolution for gated regions, unlock-code
//! authentication and delegation of code management.
//!
//! Every component borrows an explicit [`CredentialStore`](crate::storage::CredentialStore)
//! handle; none of them keep state of their own.

pub mod hierarchy;
pub mod resolver;
pub mod authenticator;
pub mod delegation;
pub mod management;
pub mod indicator;

pub use hierarchy::{
    is_ranked, rank, RankedRole, RoleKind, DEFAULT_ADMIN_CODE, DEFAULT_OWNER_CODE,
    DEVELOPER_CODE, ROLE_HIERARCHY,
};
pub use resolver::{role_satisfies, GateDecision, RoleResolver};
pub use authenticator::CodeAuthenticator;
pub use delegation::{may_manage, DelegationAuthority};
pub use management::{CodeEntry, RoleManager};
pub use indicator::{BadgeTone, RoleBadge};

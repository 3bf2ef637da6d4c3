//! Role hierarchy
//!
//! Fixed ranking of the built-in roles. Lower rank means more privilege:
//!
//! ```text
//! developer (0) > owner (1) > admin (2) > visitor (3)
//! ```
//!
//! Any other role name is unranked. Custom roles live outside this ordering and
//! are only ever compared by exact name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::RoleGuardError;
use crate::storage::CustomRoles;

/// Hard-wired developer unlock code. Never stored, never rotated.
pub const DEVELOPER_CODE: &str = "112233";

/// Owner code used until one is saved
pub const DEFAULT_OWNER_CODE: &str = "445566";

/// Admin code used until one is saved
pub const DEFAULT_ADMIN_CODE: &str = "778899";

/// Built-in roles with a total privilege order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankedRole {
    Developer,
    Owner,
    Admin,
    Visitor,
}

/// Ranked roles, most privileged first
pub const ROLE_HIERARCHY: [RankedRole; 4] = [
    RankedRole::Developer,
    RankedRole::Owner,
    RankedRole::Admin,
    RankedRole::Visitor,
];

impl RankedRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankedRole::Developer => "developer",
            RankedRole::Owner => "owner",
            RankedRole::Admin => "admin",
            RankedRole::Visitor => "visitor",
        }
    }

    /// Zero-based position in [`ROLE_HIERARCHY`]
    pub fn rank(&self) -> usize {
        match self {
            RankedRole::Developer => 0,
            RankedRole::Owner => 1,
            RankedRole::Admin => 2,
            RankedRole::Visitor => 3,
        }
    }

    /// Parse an exact (case-sensitive) ranked role name
    pub fn parse(role: &str) -> Option<Self> {
        ROLE_HIERARCHY.iter().copied().find(|r| r.as_str() == role)
    }
}

impl fmt::Display for RankedRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankedRole {
    type Err = RoleGuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RankedRole::parse(s)
            .ok_or_else(|| RoleGuardError::ParseError(format!("'{}' is not a ranked role", s)))
    }
}

/// Rank of a role name, or `None` when the name is unranked
pub fn rank(role: &str) -> Option<usize> {
    RankedRole::parse(role).map(|r| r.rank())
}

pub fn is_ranked(role: &str) -> bool {
    rank(role).is_some()
}

/// How a role name relates to the known roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Ranked(RankedRole),
    /// Present in the custom-role mapping
    Custom,
    /// Neither ranked nor registered (stale or hand-set)
    Unregistered,
}

impl RoleKind {
    pub fn classify(role: &str, custom_roles: &CustomRoles) -> Self {
        match RankedRole::parse(role) {
            Some(ranked) => RoleKind::Ranked(ranked),
            None if custom_roles.contains(role) => RoleKind::Custom,
            None => RoleKind::Unregistered,
        }
    }
}

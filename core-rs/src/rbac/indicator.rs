//! Role badge shown next to the active role

use serde::Serialize;

use super::hierarchy::RankedRole;
use crate::errors::Result;
use crate::storage::CredentialStore;

/// Display tone of a role badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Developer,
    Owner,
    Admin,
    Visitor,
    /// Any unranked role, registered or not
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleBadge {
    pub role: String,
    pub tone: BadgeTone,
    /// Publishing is only offered in developer mode
    pub publish_enabled: bool,
}

impl RoleBadge {
    pub fn for_role(role: &str) -> Self {
        let tone = match RankedRole::parse(role) {
            Some(RankedRole::Developer) => BadgeTone::Developer,
            Some(RankedRole::Owner) => BadgeTone::Owner,
            Some(RankedRole::Admin) => BadgeTone::Admin,
            Some(RankedRole::Visitor) => BadgeTone::Visitor,
            None => BadgeTone::Custom,
        };

        RoleBadge {
            role: role.to_string(),
            tone,
            publish_enabled: tone == BadgeTone::Developer,
        }
    }

    /// Badge for the store's active role
    pub fn current(store: &CredentialStore) -> Result<Self> {
        Ok(Self::for_role(&store.current_role()?))
    }
}

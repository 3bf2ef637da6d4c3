//! Delegation authority
//!
//! Decides whether the active role may view or rotate another role's unlock
//! code.
//!
//! | Active role | May manage                                   |
//! |-------------|----------------------------------------------|
//! | developer   | owner, admin, visitor, every unranked role   |
//! | owner       | admin, every unranked role                   |
//! | admin       | every unranked role                          |
//! | anything else (visitor, custom, unregistered) | nothing    |
//!
//! Unranked targets include names not yet in the custom-role mapping, so the
//! same rule gates creating a new custom role.

use tracing::debug;

use super::hierarchy::{rank, RankedRole, ROLE_HIERARCHY};
use crate::errors::Result;
use crate::storage::CredentialStore;

/// Pure delegation rule, independent of storage
pub fn may_manage(current: &str, target: &str) -> bool {
    let target_ranked = rank(target).is_some();
    match RankedRole::parse(current) {
        Some(RankedRole::Developer) => target != RankedRole::Developer.as_str(),
        Some(RankedRole::Owner) => target == RankedRole::Admin.as_str() || !target_ranked,
        Some(RankedRole::Admin) => !target_ranked,
        Some(RankedRole::Visitor) | None => false,
    }
}

pub struct DelegationAuthority<'a> {
    store: &'a CredentialStore,
}

impl<'a> DelegationAuthority<'a> {
    pub fn new(store: &'a CredentialStore) -> Self {
        DelegationAuthority { store }
    }

    /// Check whether the active role may manage `target_role`
    pub fn can_manage_role(&self, target_role: &str) -> Result<bool> {
        let current = self.store.current_role()?;
        let allowed = may_manage(&current, target_role);
        debug!(current = %current, target = target_role, allowed, "delegation check");
        Ok(allowed)
    }

    /// Ranked roles (hierarchy order) then custom roles (mapping order) the
    /// active role may manage
    pub fn manageable_roles(&self) -> Result<Vec<String>> {
        let current = self.store.current_role()?;
        let custom_roles = self.store.custom_roles()?;

        let mut roles: Vec<String> = ROLE_HIERARCHY
            .iter()
            .map(|r| r.as_str())
            .filter(|target| may_manage(&current, target))
            .map(str::to_string)
            .collect();
        roles.extend(
            custom_roles
                .names()
                .filter(|target| may_manage(&current, target))
                .map(str::to_string),
        );
        Ok(roles)
    }
}

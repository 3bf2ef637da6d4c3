//! Role resolver
//!
//! Answers "may the active role see a region gated on `required`?".
//!
//! - Ranked gate: granted when the active role's rank is lower than or equal
//!   to the gate's rank. An unranked active role never passes a ranked gate.
//! - Unranked (custom) gate: granted only on an exact name match. Ranked
//!   privilege does not flow into custom gates.

use serde::Serialize;
use tracing::debug;

use super::hierarchy::rank;
use crate::errors::Result;
use crate::storage::CredentialStore;

/// Access decision for one gated region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateDecision {
    pub tag: String,
    pub visible: bool,
}

/// Pure access rule, independent of storage
pub fn role_satisfies(current: &str, required: &str) -> bool {
    match rank(required) {
        None => current == required,
        Some(required_rank) => match rank(current) {
            Some(current_rank) => current_rank <= required_rank,
            None => false,
        },
    }
}

pub struct RoleResolver<'a> {
    store: &'a CredentialStore,
}

impl<'a> RoleResolver<'a> {
    pub fn new(store: &'a CredentialStore) -> Self {
        RoleResolver { store }
    }

    pub fn current_role(&self) -> Result<String> {
        self.store.current_role()
    }

    /// Check whether the active role satisfies `required_role`
    ///
    /// Reads the store on every call; nothing is cached.
    pub fn has_access(&self, required_role: &str) -> Result<bool> {
        let current = self.store.current_role()?;
        let granted = role_satisfies(&current, required_role);
        debug!(current = %current, required = required_role, granted, "access check");
        Ok(granted)
    }

    /// Evaluate every gate tag against one read of the active role
    ///
    /// Output order matches `tags`. Showing or hiding is up to the caller.
    pub fn visible_gates<I, S>(&self, tags: I) -> Result<Vec<GateDecision>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let current = self.store.current_role()?;
        Ok(tags
            .into_iter()
            .map(|tag| {
                let tag = tag.as_ref();
                GateDecision {
                    tag: tag.to_string(),
                    visible: role_satisfies(&current, tag),
                }
            })
            .collect())
    }
}

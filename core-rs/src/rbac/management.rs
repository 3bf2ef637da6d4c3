//! Role management
//!
//! Code rotation and custom-role editing on behalf of the active role. Every
//! operation asks the delegation rule first and writes nothing when denied.
//!
//! Custom-role edits are read-merge-save of the whole mapping. The merge and
//! the save are two steps; a concurrent writer in another process can still
//! win the race (last writer wins).

use serde::Serialize;
use tracing::{info, warn};

use super::delegation::may_manage;
use super::hierarchy::{is_ranked, RankedRole};
use crate::errors::{Result, RoleGuardError};
use crate::storage::{validate_code, CredentialStore, CustomRoles, ADMIN_CODE_KEY, OWNER_CODE_KEY};

/// A role and its unlock code, as shown to a role allowed to manage it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeEntry {
    pub role: String,
    pub code: String,
}

pub struct RoleManager<'a> {
    store: &'a CredentialStore,
}

impl<'a> RoleManager<'a> {
    pub fn new(store: &'a CredentialStore) -> Self {
        RoleManager { store }
    }

    fn require_manage(&self, target: &str) -> Result<()> {
        let current = self.store.current_role()?;
        if may_manage(&current, target) {
            return Ok(());
        }
        warn!(current = %current, target, "management denied");
        Err(RoleGuardError::PermissionDenied(format!(
            "role '{}' cannot manage role '{}'",
            current, target
        )))
    }

    fn custom_role_name(name: &str) -> Result<&str> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RoleGuardError::Validation(
                "Role name cannot be empty".to_string(),
            ));
        }
        if is_ranked(name) {
            return Err(RoleGuardError::Validation(format!(
                "'{}' is a built-in role, not a custom role",
                name
            )));
        }
        Ok(name)
    }

    /// Replace the owner or admin unlock code
    ///
    /// # Errors
    /// - `Validation` if `role` is not `owner`/`admin` or the code is malformed
    /// - `PermissionDenied` if the active role may not manage `role`
    pub fn rotate_code(&self, role: &str, new_code: &str) -> Result<()> {
        let key = match RankedRole::parse(role) {
            Some(RankedRole::Owner) => OWNER_CODE_KEY,
            Some(RankedRole::Admin) => ADMIN_CODE_KEY,
            _ => {
                return Err(RoleGuardError::Validation(format!(
                    "role '{}' has no rotatable code",
                    role
                )))
            }
        };
        self.require_manage(role)?;
        self.store.save_code(key, new_code)?;
        info!(role, "unlock code rotated");
        Ok(())
    }

    /// Add a custom role (or overwrite its code if it already exists)
    ///
    /// The name is trimmed and must be non-empty and not a ranked role name.
    pub fn add_custom_role(&self, name: &str, code: &str) -> Result<CustomRoles> {
        let roles = self.upsert_custom_role(name, code)?;
        info!(role = name.trim(), "custom role added");
        Ok(roles)
    }

    /// Change the code of a custom role; creates the role if absent
    pub fn update_custom_role_code(&self, name: &str, code: &str) -> Result<CustomRoles> {
        let roles = self.upsert_custom_role(name, code)?;
        info!(role = name.trim(), "custom role code updated");
        Ok(roles)
    }

    fn upsert_custom_role(&self, name: &str, code: &str) -> Result<CustomRoles> {
        let name = Self::custom_role_name(name)?;
        self.require_manage(name)?;
        validate_code(code)?;

        let mut roles = self.store.custom_roles()?;
        roles.insert(name, code);
        self.store.save_custom_roles(&roles)?;
        Ok(roles)
    }

    /// Delete a custom role
    ///
    /// # Returns
    /// `true` if the role existed. Deleting a missing role succeeds without
    /// writing. An active role that gets deleted stays active.
    pub fn delete_custom_role(&self, name: &str) -> Result<bool> {
        // Same trimming as add; ranked names simply never match an entry
        let name = name.trim();
        self.require_manage(name)?;

        let mut roles = self.store.custom_roles()?;
        if roles.remove(name).is_none() {
            return Ok(false);
        }
        self.store.save_custom_roles(&roles)?;
        info!(role = name, "custom role deleted");
        Ok(true)
    }

    /// Codes the active role may view: owner, admin, then custom roles
    ///
    /// The developer code is never listed.
    pub fn code_listing(&self) -> Result<Vec<CodeEntry>> {
        let current = self.store.current_role()?;
        let mut entries = Vec::new();

        if may_manage(&current, RankedRole::Owner.as_str()) {
            entries.push(CodeEntry {
                role: RankedRole::Owner.as_str().to_string(),
                code: self.store.owner_code()?,
            });
        }
        if may_manage(&current, RankedRole::Admin.as_str()) {
            entries.push(CodeEntry {
                role: RankedRole::Admin.as_str().to_string(),
                code: self.store.admin_code()?,
            });
        }

        let custom_roles = self.store.custom_roles()?;
        for (role, code) in custom_roles.iter() {
            if may_manage(&current, role) {
                entries.push(CodeEntry {
                    role: role.to_string(),
                    code: code.to_string(),
                });
            }
        }

        Ok(entries)
    }
}

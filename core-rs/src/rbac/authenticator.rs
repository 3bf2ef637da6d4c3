//! Code authenticator
//!
//! Turns a submitted unlock code into an active role. Matching order is fixed
//! and first match wins:
//!
//! 1. developer constant
//! 2. owner code
//! 3. admin code
//! 4. custom roles, in mapping order
//!
//! Codes are not unique across roles, so this order is the tie-break.
//! The input is compared as-is; a malformed code simply fails to match.

use tracing::{debug, info};

use super::hierarchy::{RankedRole, DEVELOPER_CODE};
use crate::errors::Result;
use crate::storage::CredentialStore;

pub struct CodeAuthenticator<'a> {
    store: &'a CredentialStore,
}

impl<'a> CodeAuthenticator<'a> {
    pub fn new(store: &'a CredentialStore) -> Self {
        CodeAuthenticator { store }
    }

    /// Role a code would unlock, without changing anything
    pub fn match_code(&self, code: &str) -> Result<Option<String>> {
        if code == DEVELOPER_CODE {
            return Ok(Some(RankedRole::Developer.as_str().to_string()));
        }

        if code == self.store.owner_code()? {
            return Ok(Some(RankedRole::Owner.as_str().to_string()));
        }

        if code == self.store.admin_code()? {
            return Ok(Some(RankedRole::Admin.as_str().to_string()));
        }

        let custom_roles = self.store.custom_roles()?;
        Ok(custom_roles.role_for_code(code).map(str::to_string))
    }

    /// Switch to the role unlocked by `code`
    ///
    /// # Returns
    /// `Ok(true)` when a role matched and became active, `Ok(false)` on a miss
    /// (state untouched). `Err` only for storage failures.
    pub fn try_become_role(&self, code: &str) -> Result<bool> {
        match self.match_code(code)? {
            Some(role) => {
                self.store.set_current_role_unchecked(&role)?;
                info!(role = %role, "unlock code accepted");
                Ok(true)
            }
            None => {
                debug!("unlock code matched no role");
                Ok(false)
            }
        }
    }
}

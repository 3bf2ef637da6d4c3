// Delegation Contract Tests
//
// The right to rotate a code sits strictly above the rank being rotated.
// Unranked (custom) roles are manageable by any of developer, owner, admin.

use roleguard_core::{CredentialStore, DelegationAuthority, RoleGuardError, RoleManager};

fn as_role(role: &str) -> CredentialStore {
    let store = CredentialStore::in_memory();
    store.set_current_role_unchecked(role).unwrap();
    store
}

/// WHY: canManageRole("admin") is true for developer/owner, false for admin/visitor
/// BREAKS: Admins rotating their own code, locking out peers
#[test]
fn admin_code_managed_only_from_above() {
    for (current, expected) in [
        ("developer", true),
        ("owner", true),
        ("admin", false),
        ("visitor", false),
    ] {
        let store = as_role(current);
        assert_eq!(
            DelegationAuthority::new(&store).can_manage_role("admin").unwrap(),
            expected,
            "current={}",
            current
        );
    }
}

/// WHY: Nobody manages developer
/// REASON: The developer code is a compiled-in constant
#[test]
fn developer_is_never_manageable() {
    for current in ["developer", "owner", "admin", "visitor", "betaTester"] {
        let store = as_role(current);
        assert!(!DelegationAuthority::new(&store)
            .can_manage_role("developer")
            .unwrap());
    }
}

/// WHY: Only developer manages owner
#[test]
fn owner_managed_only_by_developer() {
    assert!(DelegationAuthority::new(&as_role("developer"))
        .can_manage_role("owner")
        .unwrap());
    for current in ["owner", "admin", "visitor", "partner"] {
        assert!(!DelegationAuthority::new(&as_role(current))
            .can_manage_role("owner")
            .unwrap());
    }
}

/// WHY: Custom roles are manageable by every privileged ranked role
/// REASON: Administrative convenience; they carry no ranked privilege
#[test]
fn custom_roles_managed_by_privileged_ranks() {
    for (current, expected) in [
        ("developer", true),
        ("owner", true),
        ("admin", true),
        ("visitor", false),
        ("betaTester", false),
        ("partner", false),
    ] {
        let store = as_role(current);
        assert_eq!(
            DelegationAuthority::new(&store)
                .can_manage_role("betaTester")
                .unwrap(),
            expected,
            "current={}",
            current
        );
    }
}

/// WHY: A denied management operation writes nothing
/// BREAKS: Partial writes from an unauthorized role
#[test]
fn denied_rotation_leaves_code_untouched() {
    let store = as_role("admin");
    let result = RoleManager::new(&store).rotate_code("owner", "999999");

    assert!(matches!(result, Err(RoleGuardError::PermissionDenied(_))));
    assert_eq!(store.owner_code().unwrap(), "445566");
}

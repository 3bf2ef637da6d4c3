// Role Hierarchy Contract Tests
//
// These tests pin the access rules for gated regions. They document WHY each
// rule exists so a refactor that "simplifies" the comparison fails loudly.

use roleguard_core::rbac::{rank, role_satisfies, RankedRole, ROLE_HIERARCHY};
use roleguard_core::{CredentialStore, RoleResolver};

/// WHY: The hierarchy order is developer > owner > admin > visitor
/// REASON: Every gate comparison is a rank comparison against this list
/// BREAKS: Reordering silently grants or hides regions for every role
#[test]
fn hierarchy_order_is_fixed() {
    let names: Vec<&str> = ROLE_HIERARCHY.iter().map(|r| r.as_str()).collect();
    assert_eq!(names, vec!["developer", "owner", "admin", "visitor"]);

    assert_eq!(rank("developer"), Some(0));
    assert_eq!(rank("visitor"), Some(3));
    assert_eq!(rank("betaTester"), None);
}

/// WHY: hasAccess(R2) as R1 equals rank(R1) <= rank(R2) for every ranked pair
/// REASON: Lower rank number means more privilege
/// BREAKS: Admin could see owner-only regions if the comparison flips
#[test]
fn ranked_access_is_rank_comparison() {
    let store = CredentialStore::in_memory();
    let resolver = RoleResolver::new(&store);

    for current in ROLE_HIERARCHY {
        store.set_current_role_unchecked(current.as_str()).unwrap();
        for required in ROLE_HIERARCHY {
            assert_eq!(
                resolver.has_access(required.as_str()).unwrap(),
                current.rank() <= required.rank(),
                "current={} required={}",
                current,
                required
            );
        }
    }

    // The three worked examples
    assert!(!role_satisfies("admin", "owner"));
    assert!(role_satisfies("owner", "admin"));
    assert!(role_satisfies("developer", "developer"));
}

/// WHY: Custom gates only open for the exact custom role
/// REASON: Custom roles sit outside the hierarchy; developer is not a superset
/// BREAKS: Beta-only content leaking to every privileged role
#[test]
fn custom_gate_requires_exact_role() {
    let store = CredentialStore::in_memory();
    let resolver = RoleResolver::new(&store);

    store.set_current_role_unchecked("developer").unwrap();
    assert!(!resolver.has_access("betaTester").unwrap());

    store.set_current_role_unchecked("partner").unwrap();
    assert!(!resolver.has_access("betaTester").unwrap());

    store.set_current_role_unchecked("betaTester").unwrap();
    assert!(resolver.has_access("betaTester").unwrap());
}

/// WHY: An active custom role never passes a ranked gate, not even visitor
/// REASON: A failed rank lookup on the current side counts as infinitely low
/// BREAKS: Custom roles inheriting visitor (or worse) access by accident
#[test]
fn custom_role_passes_no_ranked_gate() {
    let store = CredentialStore::in_memory();
    store.set_current_role_unchecked("partner").unwrap();
    let resolver = RoleResolver::new(&store);

    for required in ROLE_HIERARCHY {
        assert!(!resolver.has_access(required.as_str()).unwrap());
    }
}

/// WHY: Visitor is the default role and needs no code
/// REASON: A fresh store must resolve to the least privileged ranked role
#[test]
fn empty_store_is_visitor() {
    let store = CredentialStore::in_memory();
    assert_eq!(store.current_role().unwrap(), RankedRole::Visitor.as_str());
    assert!(RoleResolver::new(&store).has_access("visitor").unwrap());
    assert!(!RoleResolver::new(&store).has_access("admin").unwrap());
}

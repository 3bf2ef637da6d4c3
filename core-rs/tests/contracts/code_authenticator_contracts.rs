// Code Authenticator Contract Tests
//
// Matching order is developer -> owner -> admin -> custom (mapping order).
// Codes may collide across roles; this order is the tie-break and must stay.

use roleguard_core::storage::{ADMIN_CODE_KEY, OWNER_CODE_KEY};
use roleguard_core::{CodeAuthenticator, CredentialStore, CustomRoles, StoreChange};
use std::sync::{Arc, Mutex};

/// WHY: 112233 always unlocks developer
/// REASON: The developer constant is checked before any stored code
/// BREAKS: A rotated owner code equal to 112233 would shadow developer
#[test]
fn developer_constant_wins_every_collision() {
    let store = CredentialStore::in_memory();
    store.save_code(OWNER_CODE_KEY, "112233").unwrap();
    store.save_code(ADMIN_CODE_KEY, "112233").unwrap();
    let roles: CustomRoles = vec![("shadow", "112233")].into_iter().collect();
    store.save_custom_roles(&roles).unwrap();

    assert!(CodeAuthenticator::new(&store).try_become_role("112233").unwrap());
    assert_eq!(store.current_role().unwrap(), "developer");
}

/// WHY: Owner beats admin, admin beats custom on shared codes
/// BREAKS: Operators sharing a code between tiers get the lower tier
#[test]
fn stored_codes_match_in_fixed_order() {
    let store = CredentialStore::in_memory();
    store.save_code(OWNER_CODE_KEY, "500500").unwrap();
    store.save_code(ADMIN_CODE_KEY, "500500").unwrap();
    let auth = CodeAuthenticator::new(&store);
    assert_eq!(auth.match_code("500500").unwrap().as_deref(), Some("owner"));

    let roles: CustomRoles = vec![("auditor", "600600")].into_iter().collect();
    store.save_custom_roles(&roles).unwrap();
    store.save_code(ADMIN_CODE_KEY, "600600").unwrap();
    assert_eq!(auth.match_code("600600").unwrap().as_deref(), Some("admin"));
}

/// WHY: Among custom roles the first entry in mapping order wins
/// REASON: Order follows insertion, not alphabetical order
#[test]
fn custom_roles_match_in_mapping_order() {
    let store = CredentialStore::in_memory();
    let roles: CustomRoles = vec![("zulu", "700700"), ("alpha", "700700")]
        .into_iter()
        .collect();
    store.save_custom_roles(&roles).unwrap();

    assert!(CodeAuthenticator::new(&store).try_become_role("700700").unwrap());
    assert_eq!(store.current_role().unwrap(), "zulu");
}

/// WHY: A miss is a normal false, never an error, and changes nothing
/// REASON: Malformed input must fail to match rather than raise
#[test]
fn miss_is_false_and_silent() {
    let store = CredentialStore::in_memory();
    store.set_current_role_unchecked("admin").unwrap();

    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    let _sub = store.subscribe(move |c: &StoreChange| sink.lock().unwrap().push(c.clone()));

    let auth = CodeAuthenticator::new(&store);
    for code in ["000000", "12a456", "1122334", "", "  112233"] {
        assert!(!auth.try_become_role(code).unwrap(), "code={:?}", code);
    }

    assert_eq!(store.current_role().unwrap(), "admin");
    assert!(changes.lock().unwrap().is_empty());
}

/// WHY: Success announces a role change to subscribers
/// REASON: Presentation code re-evaluates gates on this signal
#[test]
fn success_notifies_role_change() {
    let store = CredentialStore::in_memory();
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    let _sub = store.subscribe(move |c: &StoreChange| sink.lock().unwrap().push(c.clone()));

    assert!(CodeAuthenticator::new(&store).try_become_role("654321").unwrap());
    assert_eq!(store.current_role().unwrap(), "partner");
    assert_eq!(*changes.lock().unwrap(), vec![StoreChange::RoleChanged]);
}

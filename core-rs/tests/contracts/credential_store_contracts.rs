// Credential Store Contract Tests
//
// Format rules, defaults and the seed-without-write behaviour of the
// persisted credential record.

use roleguard_core::storage::{
    KeyValueStore, MemoryStore, ADMIN_CODE_KEY, CUSTOM_ROLES_KEY, OWNER_CODE_KEY,
};
use roleguard_core::{CredentialStore, CustomRoles, RoleGuardError, RoleManager};
use std::sync::Arc;

/// WHY: saveCode with a non 6-digit code fails and keeps the old code
/// BREAKS: A typo would lock every owner out
#[test]
fn invalid_code_write_is_rejected_without_side_effects() {
    let store = CredentialStore::in_memory();
    store.save_code(OWNER_CODE_KEY, "111222").unwrap();

    for bad in ["12a456", "12345", "1234567", "", "abcdef"] {
        let err = store.save_code(OWNER_CODE_KEY, bad).unwrap_err();
        assert!(matches!(err, RoleGuardError::Validation(_)), "code={:?}", bad);
    }
    assert_eq!(store.owner_code().unwrap(), "111222");

    assert!(store.save_code(ADMIN_CODE_KEY, "12a456").is_err());
    assert_eq!(store.admin_code().unwrap(), "778899");
}

/// WHY: First read of an empty store yields the seed, and writes nothing
/// REASON: Defaults materialize on read; storage stays empty until a save
#[test]
fn seed_is_returned_but_not_persisted() {
    let backend = Arc::new(MemoryStore::new());
    let store = CredentialStore::new(backend.clone());

    let first = store.custom_roles().unwrap();
    let second = store.custom_roles().unwrap();

    let expected: CustomRoles = vec![("betaTester", "123456"), ("partner", "654321")]
        .into_iter()
        .collect();
    assert_eq!(first, expected);
    assert_eq!(second, expected);
    assert!(backend.is_empty().unwrap());
}

/// WHY: Saving a merged mapping keeps every prior entry and adds the new one
#[test]
fn custom_roles_round_trip_with_addition() {
    let store = CredentialStore::in_memory();
    let original = store.custom_roles().unwrap();
    store.save_custom_roles(&original).unwrap();

    let addition: CustomRoles = vec![("x", "000000")].into_iter().collect();
    store
        .save_custom_roles(&store.custom_roles().unwrap().merged(&addition))
        .unwrap();

    let after = store.custom_roles().unwrap();
    assert_eq!(after.get("x"), Some("000000"));
    for (name, code) in original.iter() {
        assert_eq!(after.get(name), Some(code));
    }
}

/// WHY: Deleting a missing custom role leaves the stored mapping byte-identical
/// REASON: Lenient delete is deliberate, not a NotFound error
#[test]
fn deleting_missing_role_is_byte_identical() {
    let backend = Arc::new(MemoryStore::new());
    let store = CredentialStore::new(backend.clone());
    store.set_current_role_unchecked("owner").unwrap();
    store.save_custom_roles(&CustomRoles::seed()).unwrap();

    let before = backend.get(CUSTOM_ROLES_KEY).unwrap();
    let removed = RoleManager::new(&store).delete_custom_role("nobody").unwrap();
    let after = backend.get(CUSTOM_ROLES_KEY).unwrap();

    assert!(!removed);
    assert_eq!(before, after);
}

/// WHY: A mapping with any malformed code is rejected whole
/// REASON: Every stored code matches ^[0-9]{6}$
#[test]
fn custom_roles_with_bad_code_are_rejected_whole() {
    let store = CredentialStore::in_memory();
    store.save_custom_roles(&CustomRoles::seed()).unwrap();

    let mut roles = CustomRoles::seed();
    roles.insert("auditor", "99");
    assert!(store.save_custom_roles(&roles).is_err());
    assert_eq!(store.custom_roles().unwrap(), CustomRoles::seed());
}

/// WHY: The unchecked setter accepts any string, and such a role opens nothing ranked
/// REASON: Kept as an explicit low-level primitive (lockout behaviour)
#[test]
fn unchecked_setter_accepts_unknown_role() {
    let store = CredentialStore::in_memory();
    store.set_current_role_unchecked("nobody-knows").unwrap();

    assert_eq!(store.current_role().unwrap(), "nobody-knows");
    assert!(!roleguard_core::RoleResolver::new(&store)
        .has_access("visitor")
        .unwrap());
}

use tokenbook_core::{
    Contact, ContactValidationError, DirectoryService, DirectoryStore, JsonFileStore, StoreError,
};
use uuid::Uuid;

fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
    JsonFileStore::new(dir.path().join("contacts.json"))
}

#[test]
fn list_on_fresh_installation_is_empty_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let contacts = store.list().unwrap();
    assert!(contacts.is_empty());
    assert!(!dir.path().join("contacts.json").exists());
}

#[test]
fn append_round_trip_grows_by_one_and_preserves_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store.append(&Contact::new("first@example.com", "0x111")).unwrap();
    let before = store.list().unwrap().len();

    let contact = Contact::new("a@x.com", "0xAAA");
    store.append(&contact).unwrap();

    let contacts = store.list().unwrap();
    assert_eq!(contacts.len(), before + 1);
    let last = contacts.last().unwrap();
    assert_eq!(last, &contact);
}

#[test]
fn append_preserves_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let c1 = Contact::new("one@example.com", "0x001");
    let c2 = Contact::new("two@example.com", "0x002");
    let c3 = Contact::new("three@example.com", "0x003");
    store.append(&c1).unwrap();
    store.append(&c2).unwrap();
    store.append(&c3).unwrap();

    let contacts = store.list().unwrap();
    assert_eq!(contacts, vec![c1, c2, c3]);
}

#[test]
fn delete_at_shifts_later_entries_down() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let c1 = Contact::new("one@example.com", "0x001");
    let c2 = Contact::new("two@example.com", "0x002");
    let c3 = Contact::new("three@example.com", "0x003");
    store.append(&c1).unwrap();
    store.append(&c2).unwrap();
    store.append(&c3).unwrap();

    let removed = store.delete_at(1).unwrap();
    assert_eq!(removed.id, c2.id);
    assert_eq!(store.list().unwrap(), vec![c1.clone(), c3.clone()]);

    store.delete_at(1).unwrap();
    assert_eq!(store.list().unwrap(), vec![c1]);
}

#[test]
fn delete_at_out_of_range_fails_and_leaves_sequence_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store.append(&Contact::new("one@example.com", "0x001")).unwrap();
    store.append(&Contact::new("two@example.com", "0x002")).unwrap();
    let before = store.list().unwrap();

    let err = store.delete_at(before.len()).unwrap_err();
    assert!(matches!(err, StoreError::OutOfRange { index: 2, len: 2 }));

    let err = store.delete_at(usize::MAX).unwrap_err();
    assert!(matches!(err, StoreError::OutOfRange { .. }));

    assert_eq!(store.list().unwrap(), before);
}

#[test]
fn list_is_idempotent_without_mutations() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store.append(&Contact::new("one@example.com", "0x001")).unwrap();
    store.append(&Contact::new("two@example.com", "0x002")).unwrap();

    assert_eq!(store.list().unwrap(), store.list().unwrap());
}

#[test]
fn empty_append_list_delete_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    assert!(store.list().unwrap().is_empty());

    store.append(&Contact::new("bob@example.com", "0xB0B")).unwrap();

    let contacts = store.list().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].email, "bob@example.com");
    assert_eq!(contacts[0].address, "0xB0B");

    store.delete_at(0).unwrap();
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn delete_by_id_removes_exactly_the_named_entry() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let keep = Contact::new("keep@example.com", "0x001");
    let target = Contact::new("drop@example.com", "0x002");
    store.append(&keep).unwrap();
    store.append(&target).unwrap();

    let removed = store.delete_by_id(target.id).unwrap();
    assert_eq!(removed.id, target.id);
    assert_eq!(store.list().unwrap(), vec![keep]);
}

#[test]
fn delete_by_unknown_id_fails_and_leaves_sequence_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store.append(&Contact::new("one@example.com", "0x001")).unwrap();
    let before = store.list().unwrap();

    let missing = Uuid::new_v4();
    let err = store.delete_by_id(missing).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
    assert_eq!(store.list().unwrap(), before);
}

#[test]
fn append_rejects_blank_fields_without_touching_storage() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let err = store.append(&Contact::new("", "0x001")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ContactValidationError::EmptyEmail)
    ));

    let err = store.append(&Contact::new("one@example.com", "  ")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ContactValidationError::EmptyAddress)
    ));

    assert!(!dir.path().join("contacts.json").exists());
}

#[test]
fn duplicate_contacts_are_permitted() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store.append(&Contact::new("bob@example.com", "0xB0B")).unwrap();
    store.append(&Contact::new("bob@example.com", "0xB0B")).unwrap();

    let contacts = store.list().unwrap();
    assert_eq!(contacts.len(), 2);
    // Stable ids still distinguish the two entries.
    assert_ne!(contacts[0].id, contacts[1].id);
}

#[test]
fn service_wraps_store_calls() {
    let dir = tempfile::tempdir().unwrap();
    let service = DirectoryService::new(store_in(&dir));

    let id = service.add_contact("bob@example.com", "0xB0B").unwrap();

    let contacts = service.list().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].id, id);

    service.delete_by_id(id).unwrap();
    assert!(service.list().unwrap().is_empty());
}

#[test]
fn service_rejects_blank_input_before_storage() {
    let dir = tempfile::tempdir().unwrap();
    let service = DirectoryService::new(store_in(&dir));

    let err = service.add_contact(" ", "0xB0B").unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn list_excluding_filters_callers_own_address_case_insensitively() {
    let dir = tempfile::tempdir().unwrap();
    let service = DirectoryService::new(store_in(&dir));

    service.add_contact("me@example.com", "0xAbCd").unwrap();
    let other = service.add_contact("peer@example.com", "0x999").unwrap();

    let visible = service.list_excluding("0XABCD").unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, other);

    // The full list still contains both entries.
    assert_eq!(service.list().unwrap().len(), 2);
}

//! Integration tests for layout persistence.
//!
//! These tests verify the save/load policy end to end: round-trips,
//! default-equality deletes, corrupt-record recovery, the hydration latch,
//! and the file-backed backend.

use std::fs;

use grid_engine::store::storage_key;
use grid_engine::{
    ColumnDescriptor, JsonFileStorage, LayoutStorage, LayoutStore, MemoryStorage, PinnedColumns,
    TableLayoutState,
};

fn descriptors() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("id", "ID"),
        ColumnDescriptor::new("name", "Name"),
        ColumnDescriptor::new("email", "Email"),
    ]
}

fn customized_state() -> TableLayoutState {
    let mut state = TableLayoutState::default_for(&descriptors());
    state.column_order = vec!["name".into(), "id".into(), "email".into()];
    state.column_visibility.insert("email".into(), false);
    state.pinned = PinnedColumns {
        left: vec!["name".into()],
        right: vec![],
    };
    state
}

#[test]
fn test_save_load_round_trip() {
    let backend = MemoryStorage::new();
    let mut store = LayoutStore::new(backend);
    let default = TableLayoutState::default_for(&descriptors());
    let state = customized_state();

    store.load(Some("user-42"), "invoices");
    store.save(Some("user-42"), "invoices", &state, &default);

    assert_eq!(
        store.load(Some("user-42"), "invoices"),
        Some(state),
        "a saved non-default state must load back equal"
    );
}

#[test]
fn test_default_state_deletes_instead_of_writing() {
    let backend = MemoryStorage::new();
    let mut store = LayoutStore::new(backend.clone());
    let default = TableLayoutState::default_for(&descriptors());
    let key = storage_key(Some("user-42"), "invoices");

    store.load(Some("user-42"), "invoices");
    store.save(Some("user-42"), "invoices", &customized_state(), &default);
    assert!(backend.contains_key(&key));

    // Returning to the default removes the record entirely
    store.save(Some("user-42"), "invoices", &default, &default);
    assert!(
        !backend.contains_key(&key),
        "a state equal to the default must delete the record, not write it"
    );
}

#[test]
fn test_slots_are_scoped_by_identity_and_table() {
    let backend = MemoryStorage::new();
    let mut store = LayoutStore::new(backend.clone());
    let default = TableLayoutState::default_for(&descriptors());
    let state = customized_state();

    store.load(Some("alice"), "invoices");
    store.save(Some("alice"), "invoices", &state, &default);

    assert_eq!(store.load(Some("bob"), "invoices"), None);
    assert_eq!(store.load(Some("alice"), "orders"), None);
    assert_eq!(store.load(None, "invoices"), None);
    assert_eq!(store.load(Some("alice"), "invoices"), Some(state));
}

#[test]
fn test_corrupt_record_is_treated_as_absent() {
    let backend = MemoryStorage::new();
    let mut seed = backend.clone();
    let key = storage_key(None, "invoices");
    seed.set_item(&key, "{\"columnOrder\": [1, 2,").unwrap();

    let mut store = LayoutStore::new(backend);
    assert_eq!(
        store.load(None, "invoices"),
        None,
        "corrupt JSON must degrade to no record, not an error"
    );
}

#[test]
fn test_save_is_gated_until_hydrated() {
    let backend = MemoryStorage::new();
    let mut seed = backend.clone();
    let key = storage_key(None, "invoices");
    let real_state = customized_state();
    seed.set_item(&key, &serde_json::to_string(&real_state).unwrap())
        .unwrap();

    let mut store = LayoutStore::new(backend.clone());
    let default = TableLayoutState::default_for(&descriptors());

    // A save racing ahead of the initial load must not clobber the
    // persisted record
    store.save(None, "invoices", &default, &default);
    assert_eq!(store.load(None, "invoices"), Some(real_state));
}

#[test]
fn test_json_file_storage_round_trip() {
    let dir = std::env::temp_dir().join(format!("grid-engine-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("round-trip.json");
    let _ = fs::remove_file(&path);

    let default = TableLayoutState::default_for(&descriptors());
    let state = customized_state();

    {
        let backend = JsonFileStorage::open(&path).unwrap();
        let mut store = LayoutStore::new(backend);
        store.load(Some("user-1"), "invoices");
        store.save(Some("user-1"), "invoices", &state, &default);
    }

    // Reopen from disk: the record survives the process boundary
    let backend = JsonFileStorage::open(&path).unwrap();
    let mut store = LayoutStore::new(backend);
    assert_eq!(store.load(Some("user-1"), "invoices"), Some(state));

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_json_file_storage_recovers_from_corrupt_file() {
    let dir = std::env::temp_dir().join(format!("grid-engine-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("corrupt.json");
    fs::write(&path, "definitely not json").unwrap();

    // Opening must not fail; the store starts empty
    let backend = JsonFileStorage::open(&path).unwrap();
    assert_eq!(backend.get_item("anything").unwrap(), None);

    fs::remove_file(&path).unwrap();
}

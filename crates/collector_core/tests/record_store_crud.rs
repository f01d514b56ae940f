use collector_core::{
    Collection, Field, FieldValues, IntegrityError, Record, RecordStore, StoreConfig, StoreError,
    ValidationError,
};
use std::fs;
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> RecordStore {
    RecordStore::new(StoreConfig::new(
        dir.path().join("heroes.csv"),
        dir.path().join("photos"),
    ))
}

fn figure(id: &str, name: &str) -> Record {
    let mut record = Record::new(id);
    record.year = "2020".to_string();
    record.series = "DC Multiverse".to_string();
    record.name = name.to_string();
    record
}

fn seeded(store: &RecordStore, records: Vec<Record>) -> Collection {
    let collection = Collection::from_records(records).unwrap();
    store.save(&collection).unwrap();
    store.load().unwrap().collection
}

fn robin() -> FieldValues {
    FieldValues::new()
        .with(Field::Year, "2025")
        .with(Field::Series, "DC")
        .with(Field::Name, "Robin")
}

#[test]
fn add_allocates_next_id_after_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mut collection = seeded(&store, vec![figure("1", "Batman"), figure("2", "Joker")]);

    let added = store.add(&mut collection, &robin(), &[]).unwrap();

    assert_eq!(added.record.id, "3");
    assert_eq!(added.record.name, "Robin");
    assert_eq!(added.record.serial, "");
    assert_eq!(added.record.wave, "");
    assert_eq!(collection.len(), 3);
    assert_eq!(store.load().unwrap().collection, collection);
}

#[test]
fn add_into_empty_collection_starts_at_one() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mut collection = store.load().unwrap().collection;

    let added = store.add(&mut collection, &robin(), &[]).unwrap();
    assert_eq!(added.record.id, "1");
    assert!(dir.path().join("heroes.csv").exists());
}

#[test]
fn ids_increase_strictly_across_adds_and_deletes() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mut collection = seeded(&store, vec![figure("9", "Batman"), figure("10", "Joker")]);

    let mut previous = 10_u64;
    for _ in 0..3 {
        let added = store.add(&mut collection, &robin(), &[]).unwrap();
        let id: u64 = added.record.id.parse().unwrap();
        assert!(id > previous);
        store.delete(&mut collection, &added.record.id).unwrap();
        previous = id;
    }
    assert_eq!(previous, 13);
}

#[test]
fn add_without_name_fails_and_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mut collection = seeded(&store, vec![figure("1", "Batman")]);
    let before = collection.clone();
    let file_before = fs::read(dir.path().join("heroes.csv")).unwrap();

    let fields = FieldValues::new()
        .with(Field::Year, "2025")
        .with(Field::Series, "DC")
        .with(Field::Name, "");
    let err = store.add(&mut collection, &fields, &[]).unwrap_err();

    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::MissingRequiredField(Field::Name))
    ));
    assert_eq!(collection, before);
    assert_eq!(fs::read(dir.path().join("heroes.csv")).unwrap(), file_before);
}

#[test]
fn add_rejects_non_numeric_existing_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mut collection = seeded(&store, vec![figure("1", "Batman"), figure("X2", "Joker")]);
    let before = collection.clone();

    let err = store.add(&mut collection, &robin(), &[]).unwrap_err();

    assert!(matches!(
        err,
        StoreError::Integrity(IntegrityError::NonNumericId(ref id)) if id == "X2"
    ));
    assert_eq!(collection, before);
}

#[test]
fn update_replaces_fields_and_keeps_serial() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mut joker = figure("2", "Joker");
    joker.serial = "SN-0042".to_string();
    joker.wave = "Wave 1".to_string();
    let mut collection = seeded(&store, vec![figure("1", "Batman"), joker]);

    let fields = FieldValues::new()
        .with(Field::Year, "2021")
        .with(Field::Series, "DC Multiverse")
        .with(Field::Name, "Joker (Infinite Frontier)")
        .with(Field::Msrp, "24.99");
    let updated = store.update(&mut collection, "2", &fields).unwrap();

    assert_eq!(updated.id, "2");
    assert_eq!(updated.serial, "SN-0042");
    assert_eq!(updated.msrp, "24.99");
    assert_eq!(updated.wave, "");

    let reloaded = store.load().unwrap().collection;
    let stored = reloaded.get("2").unwrap();
    assert_eq!(stored, &updated);
    for field in [Field::Year, Field::Series, Field::Name, Field::Msrp] {
        assert_eq!(stored.get(field), fields.get(field).unwrap());
    }
}

#[test]
fn update_can_set_serial_explicitly() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mut collection = seeded(&store, vec![figure("1", "Batman")]);

    let fields = robin().with(Field::Serial, "SN-7");
    let updated = store.update(&mut collection, "1", &fields).unwrap();
    assert_eq!(updated.serial, "SN-7");
}

#[test]
fn update_unknown_id_is_not_found_and_file_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mut collection = seeded(&store, vec![figure("1", "Batman")]);
    let before = collection.clone();
    let file_before = fs::read(dir.path().join("heroes.csv")).unwrap();

    let fields = FieldValues::new().with(Field::Msrp, "24.99");
    let err = store.update(&mut collection, "2", &fields).unwrap_err();

    assert!(matches!(err, StoreError::NotFound(ref id) if id == "2"));
    assert_eq!(collection, before);
    assert_eq!(fs::read(dir.path().join("heroes.csv")).unwrap(), file_before);
}

#[test]
fn update_rejects_id_field() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mut collection = seeded(&store, vec![figure("1", "Batman")]);

    let fields = robin().with(Field::Id, "99");
    let err = store.update(&mut collection, "1", &fields).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::ReadOnlyField(Field::Id))
    ));
}

#[test]
fn delete_removes_exactly_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mut collection = seeded(
        &store,
        vec![figure("1", "Batman"), figure("2", "Joker"), figure("10", "Bane")],
    );

    let deleted = store.delete(&mut collection, "1").unwrap();

    assert_eq!(deleted.record.name, "Batman");
    assert!(deleted.photo_errors.is_empty());
    let ids: Vec<_> = collection.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "10"]);
    assert_eq!(store.load().unwrap().collection, collection);
}

#[test]
fn delete_unknown_id_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mut collection = seeded(&store, vec![figure("1", "Batman")]);

    let err = store.delete(&mut collection, "7").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(collection.len(), 1);
}

#[test]
fn failed_save_leaves_collection_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(StoreConfig::new(
        dir.path().join("heroes.ods"),
        dir.path().join("photos"),
    ));
    let mut collection = Collection::from_records(vec![figure("1", "Batman")]).unwrap();
    let before = collection.clone();

    let err = store.add(&mut collection, &robin(), &[]).unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));
    assert_eq!(collection, before);
}

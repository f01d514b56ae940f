use collector_core::{
    Collection, Field, FieldValues, PhotoName, PhotoOp, PhotoUpload, Record, RecordStore,
    StoreConfig, StoreError, ValidationError,
};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> RecordStore {
    RecordStore::new(StoreConfig::new(
        dir.path().join("heroes.csv"),
        dir.path().join("photos"),
    ))
}

fn seeded(store: &RecordStore, ids: &[&str]) -> Collection {
    let records = ids
        .iter()
        .map(|id| {
            let mut record = Record::new(*id);
            record.name = format!("Figure {id}");
            record
        })
        .collect();
    let collection = Collection::from_records(records).unwrap();
    store.save(&collection).unwrap();
    collection
}

fn put_photo(store: &RecordStore, file_name: &str) -> PathBuf {
    let root = store.photo_dir().root();
    fs::create_dir_all(root).unwrap();
    let path = root.join(file_name);
    fs::write(&path, b"img").unwrap();
    path
}

fn listed(store: &RecordStore, id: &str) -> HashSet<PathBuf> {
    store
        .list_photos(id)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn delete_one_keeps_photos_of_ten() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mut collection = seeded(&store, &["1", "10"]);
    let one = put_photo(&store, "1_ab12cd.png");
    let ten = put_photo(&store, "10_ef34gh.png");

    let deleted = store.delete(&mut collection, "1").unwrap();

    assert_eq!(deleted.removed_photos, vec![one.clone()]);
    assert!(deleted.photo_errors.is_empty());
    assert!(!one.exists());
    assert!(ten.exists());
    assert_eq!(listed(&store, "10"), HashSet::from([ten]));
}

#[test]
fn list_photos_matches_separator_not_raw_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    seeded(&store, &["1", "10", "11"]);
    let a = put_photo(&store, "1_aaaaaa.jpg");
    let b = put_photo(&store, "1_bbbbbb.webp");
    put_photo(&store, "10_cccccc.png");
    put_photo(&store, "11_dddddd.png");
    put_photo(&store, "1_notes.txt");
    put_photo(&store, "1.png");

    assert_eq!(listed(&store, "1"), HashSet::from([a, b]));
}

#[test]
fn list_photos_rescans_on_every_call() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    seeded(&store, &["4"]);

    assert!(listed(&store, "4").is_empty());
    let first = put_photo(&store, "4_000001.png");
    assert_eq!(listed(&store, "4"), HashSet::from([first.clone()]));
    let second = put_photo(&store, "4_000002.png");
    assert_eq!(listed(&store, "4"), HashSet::from([first, second]));
}

#[test]
fn add_stores_uploads_under_new_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mut collection = seeded(&store, &["1", "2"]);

    let fields = FieldValues::new()
        .with(Field::Year, "2025")
        .with(Field::Series, "DC")
        .with(Field::Name, "Robin");
    let uploads = [
        PhotoUpload::new("front.PNG", b"front".to_vec()),
        PhotoUpload::new("back.jpg", b"back".to_vec()),
    ];
    let added = store.add(&mut collection, &fields, &uploads).unwrap();

    assert_eq!(added.record.id, "3");
    assert_eq!(added.photos.len(), 2);
    assert!(added.photo_errors.is_empty());
    for path in &added.photos {
        let name = PhotoName::parse(path.file_name().unwrap().to_str().unwrap()).unwrap();
        assert_eq!(name.owner(), "3");
        assert_eq!(name.suffix().len(), 6);
    }
    assert_eq!(
        listed(&store, "3"),
        added.photos.iter().cloned().collect::<HashSet<_>>()
    );
    assert_eq!(fs::read(&added.photos[0]).unwrap(), b"front");
}

#[test]
fn add_rejects_unsupported_upload_before_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mut collection = seeded(&store, &["1"]);
    let before = collection.clone();

    let fields = FieldValues::new()
        .with(Field::Year, "2025")
        .with(Field::Series, "DC")
        .with(Field::Name, "Robin");
    let uploads = [PhotoUpload::new("scan.pdf", b"%PDF".to_vec())];
    let err = store.add(&mut collection, &fields, &uploads).unwrap_err();

    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::UnsupportedPhotoExtension(_))
    ));
    assert_eq!(collection, before);
    assert_eq!(store.load().unwrap().collection.len(), 1);
}

#[test]
fn photo_write_failure_keeps_added_record() {
    let dir = tempfile::tempdir().unwrap();
    let photo_path = dir.path().join("photos");
    fs::write(&photo_path, b"not a directory").unwrap();
    let store = RecordStore::new(StoreConfig::new(dir.path().join("heroes.csv"), &photo_path));
    let mut collection = Collection::new();

    let fields = FieldValues::new()
        .with(Field::Year, "2025")
        .with(Field::Series, "DC")
        .with(Field::Name, "Robin");
    let uploads = [PhotoUpload::new("front.png", b"front".to_vec())];
    let added = store.add(&mut collection, &fields, &uploads).unwrap();

    assert!(added.photos.is_empty());
    assert_eq!(added.photo_errors.len(), 1);
    assert_eq!(added.photo_errors[0].op, PhotoOp::Write);
    assert_eq!(store.load().unwrap().collection.len(), 1);
}

#[test]
fn photo_scan_failure_does_not_undo_delete() {
    let dir = tempfile::tempdir().unwrap();
    let photo_path = dir.path().join("photos");
    fs::write(&photo_path, b"not a directory").unwrap();
    let store = RecordStore::new(StoreConfig::new(dir.path().join("heroes.csv"), &photo_path));
    let mut collection = seeded(&store, &["1", "2"]);

    let deleted = store.delete(&mut collection, "1").unwrap();

    assert_eq!(deleted.record.id, "1");
    assert_eq!(deleted.photo_errors.len(), 1);
    assert_eq!(deleted.photo_errors[0].op, PhotoOp::Scan);
    assert!(!collection.contains("1"));
    assert!(!store.load().unwrap().collection.contains("1"));
}

#[test]
fn delete_removes_photos_of_ids_containing_separator() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let mut collection = seeded(&store, &["A", "A_1"]);
    let nested = put_photo(&store, "A_1_abc123.png");
    let plain = put_photo(&store, "A_def456.png");

    assert_eq!(listed(&store, "A_1"), HashSet::from([nested.clone()]));
    assert_eq!(listed(&store, "A"), HashSet::from([plain.clone()]));

    let deleted = store.delete(&mut collection, "A_1").unwrap();

    assert_eq!(deleted.removed_photos, vec![nested.clone()]);
    assert!(!nested.exists());
    assert!(plain.exists());
}

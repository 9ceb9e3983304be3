use std::sync::Arc;

use lumen_core::constants::{CONSENT_GRANTED, CONSENT_STORAGE_KEY};
use lumen_core::errors::StorageError;
use lumen_core::traits::IKeyValueStore;
use lumen_pipeline::{ConsentStore, FileStore};

// ── FileStore ─────────────────────────────────────────────────────────────

#[test]
fn missing_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("state.json")).unwrap();
    assert_eq!(store.get("anything").unwrap(), None);
}

#[test]
fn values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");

    let store = FileStore::open(&path).unwrap();
    store.set("lumen.last_flush", "2026-05-04T09:30:00+00:00").unwrap();
    store.set("other", "1").unwrap();
    store.remove("other").unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(
        reopened.get("lumen.last_flush").unwrap().as_deref(),
        Some("2026-05-04T09:30:00+00:00")
    );
    assert_eq!(reopened.get("other").unwrap(), None);
}

#[test]
fn corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = FileStore::open(&path).unwrap_err();
    assert!(matches!(err, StorageError::Corrupt { .. }));
}

// ── Consent persistence ───────────────────────────────────────────────────

#[test]
fn consent_round_trips_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("consent.json");

    let consent = ConsentStore::load(Arc::new(FileStore::open(&path).unwrap()));
    consent.set_consent(true);

    let store = FileStore::open(&path).unwrap();
    assert_eq!(
        store.get(CONSENT_STORAGE_KEY).unwrap().as_deref(),
        Some(CONSENT_GRANTED)
    );
    assert!(ConsentStore::load(Arc::new(store)).has_consent());
}

//! Integration tests for sentinel-store
//!
//! These tests exercise the full load/save cycle against a real filesystem.

use sentinel_domain::traits::RecordStore;
use sentinel_domain::{OutputFormat, Record, RecordSet};
use sentinel_store::FileStore;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn record(value: serde_json::Value) -> Record {
    serde_json::from_value(value).unwrap()
}

fn sample_records() -> RecordSet {
    vec![
        record(json!({"title": "Paper accepted", "date": "2024-01-05", "url": "https://a.example"})),
        record(json!({"title": "Award: \"Best Talk\"", "date": "2023-11-30", "url": "https://b.example"})),
        record(json!({"title": "Ünïcode ✓", "date": "2022-02-02", "url": "https://c.example"})),
    ]
}

#[test]
fn test_load_missing_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new();

    let records = store.load(&dir.path().join("nope.json"), OutputFormat::Json);
    assert!(records.is_empty());
}

#[test]
fn test_load_corrupt_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "[{\"title\": \"unterminated").unwrap();

    let store = FileStore::new();
    assert!(store.load(&path, OutputFormat::Json).is_empty());
}

#[test]
fn test_round_trip_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("news.json");
    let store = FileStore::new();
    let records = sample_records();

    store.save(&path, OutputFormat::Json, &records).unwrap();
    let loaded = store.load(&path, OutputFormat::Json);

    assert_eq!(loaded, records);
}

#[test]
fn test_round_trip_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("news.yaml");
    let store = FileStore::new();
    let records = sample_records();

    store.save(&path, OutputFormat::Yaml, &records).unwrap();
    let loaded = store.load(&path, OutputFormat::Yaml);

    assert_eq!(loaded, records);
}

#[test]
fn test_round_trip_preserves_field_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ordered.json");
    let store = FileStore::new();
    let records = vec![record(json!({"zeta": "1", "alpha": "2", "mid": "3"}))];

    store.save(&path, OutputFormat::Json, &records).unwrap();
    let loaded = store.load(&path, OutputFormat::Json);

    let keys: Vec<&String> = loaded[0].keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("content").join("nested").join("awards.json");
    let store = FileStore::new();

    store.save(&path, OutputFormat::Json, &sample_records()).unwrap();

    assert!(path.exists());
    assert_eq!(store.load(&path, OutputFormat::Json).len(), 3);
}

#[test]
fn test_save_overwrites_whole_set() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("news.json");
    let store = FileStore::new();

    store.save(&path, OutputFormat::Json, &sample_records()).unwrap();
    let shorter = vec![record(json!({"title": "only"}))];
    store.save(&path, OutputFormat::Json, &shorter).unwrap();

    assert_eq!(store.load(&path, OutputFormat::Json), shorter);
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.ends_with("]\n"));
}

#[test]
fn test_save_leaves_no_temporary_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("news.json");
    let store = FileStore::new();

    store.save(&path, OutputFormat::Json, &sample_records()).unwrap();
    store.save(&path, OutputFormat::Json, &sample_records()).unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "only the record file should remain");
}

#[test]
fn test_load_with_wrong_format_degrades_to_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("news.yaml");
    let store = FileStore::new();

    store.save(&path, OutputFormat::Yaml, &sample_records()).unwrap();

    assert!(store.load(&path, OutputFormat::Json).is_empty());
}

#[cfg(unix)]
#[test]
fn test_save_preserves_existing_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("news.json");
    fs::write(&path, "[]").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

    let store = FileStore::new();
    store.save(&path, OutputFormat::Json, &sample_records()).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
    assert_eq!(store.load(&path, OutputFormat::Json), sample_records());
}

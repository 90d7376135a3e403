use codash::prefs::{self, PrefStore};

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = PrefStore::load(dir.path().join("prefs.json"));
    assert_eq!(store.get(&prefs::CITY), "Siegen");
    assert_eq!(store.get(&prefs::LANGUAGE), "en");
    assert_eq!(store.get(&prefs::TICKER_CURRENCY), "EUR");
    assert_eq!(store.get(&prefs::ACCENT_COLOR), "#3b82f6");
    let symbols: Vec<String> = store.get_json(&prefs::TICKER_SYMBOLS);
    assert_eq!(symbols, vec!["BTC", "ETH", "SOL"]);
}

#[test]
fn writes_go_through_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let mut store = PrefStore::load(&path);
    store.set(&prefs::CITY, "Berlin");
    store.set_json(&prefs::TICKER_SYMBOLS, &vec!["DOGE".to_string()]);

    let reloaded = PrefStore::load(&path);
    assert_eq!(reloaded.get(&prefs::CITY), "Berlin");
    let symbols: Vec<String> = reloaded.get_json(&prefs::TICKER_SYMBOLS);
    assert_eq!(symbols, vec!["DOGE"]);
}

#[test]
fn malformed_file_is_treated_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = PrefStore::load(&path);
    assert_eq!(store.get(&prefs::CITY), "Siegen");
}

#[test]
fn expired_entries_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(
        &path,
        r#"{
            "city": { "value": "Hamburg", "expires_at": 1000000000 },
            "language": { "value": "de", "expires_at": 99999999999 }
        }"#,
    )
    .unwrap();

    let store = PrefStore::load(&path);
    assert_eq!(store.get(&prefs::CITY), "Siegen");
    assert_eq!(store.get(&prefs::LANGUAGE), "de");
}

#[test]
fn layout_entry_never_expires() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let mut store = PrefStore::load(&path);
    store.set(&prefs::DASHBOARD_LAYOUT, r#"{"version":1}"#);

    let content = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(json["dashboard_layout_v1"]["expires_at"].is_null());
}

#[test]
fn empty_value_counts_as_unset() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = PrefStore::load(dir.path().join("prefs.json"));
    store.set(&prefs::WORK_END_TIME, "");
    assert!(store.raw(prefs::WORK_END_TIME.name).is_none());
}

#[test]
fn remove_deletes_the_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let mut store = PrefStore::load(&path);
    store.set(&prefs::WORK_END_TIME, "2026-03-02T17:00:00+01:00");
    assert!(store.raw(prefs::WORK_END_TIME.name).is_some());

    store.remove(&prefs::WORK_END_TIME);
    assert!(store.raw(prefs::WORK_END_TIME.name).is_none());
    assert!(PrefStore::load(&path)
        .raw(prefs::WORK_END_TIME.name)
        .is_none());
}

#[test]
fn malformed_json_preference_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = PrefStore::load(dir.path().join("prefs.json"));
    store.set(&prefs::TICKER_SYMBOLS, "not-a-list");
    let symbols: Vec<String> = store.get_json(&prefs::TICKER_SYMBOLS);
    assert_eq!(symbols, vec!["BTC", "ETH", "SOL"]);
}

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use sheet_vlookup::processing::MatchFilterMode;
use sheet_vlookup::settings::{LookupSettings, SettingsStore, SETTINGS_KEY};
use sheet_vlookup::LookupError;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sheet-vlookup-{name}-{nanos}.json"))
}

fn custom() -> LookupSettings {
    LookupSettings {
        lookup_value_column: "C".to_string(),
        key_column: "2".to_string(),
        return_columns: "B,D-F".to_string(),
        trim: false,
        ignore_special: true,
        case_sensitive: true,
        include_all_lookup_columns: true,
        match_filter_mode: MatchFilterMode::Found,
    }
}

#[test]
fn missing_file_loads_as_none() {
    let store = SettingsStore::new(tmp_file("missing"));
    assert_eq!(store.load().unwrap(), None);
    assert!(!store.clear().unwrap());
}

#[test]
fn save_then_load_round_trips() {
    let path = tmp_file("roundtrip");
    let store = SettingsStore::new(&path);

    store.save(&custom()).unwrap();
    assert_eq!(store.load().unwrap(), Some(custom()));

    store.save(&LookupSettings::default()).unwrap();
    assert_eq!(store.load().unwrap(), Some(LookupSettings::default()));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn other_keys_in_the_file_are_preserved() {
    let path = tmp_file("shared");
    std::fs::write(&path, r#"{"theme":"dark","recent":["a.xlsx"]}"#).unwrap();
    let store = SettingsStore::new(&path);

    store.save(&custom()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["theme"], "dark");
    assert_eq!(json["recent"][0], "a.xlsx");
    assert_eq!(json[SETTINGS_KEY]["returnColumns"], "B,D-F");
    assert_eq!(json[SETTINGS_KEY]["matchFilterMode"], "found");

    assert!(store.clear().unwrap());
    assert_eq!(store.load().unwrap(), None);
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["theme"], "dark");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn save_creates_parent_directories() {
    let dir = tmp_file("nested-dir");
    let store = SettingsStore::new(dir.join("conf").join("settings.json"));
    store.save(&custom()).unwrap();
    assert_eq!(store.load().unwrap(), Some(custom()));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn corrupt_file_is_a_settings_error() {
    let path = tmp_file("corrupt");
    std::fs::write(&path, "{not json").unwrap();
    let err = SettingsStore::new(&path).load().unwrap_err();
    let _ = std::fs::remove_file(&path);
    assert!(matches!(err, LookupError::Settings(_)));
}

#[test]
fn stored_settings_drive_a_join() {
    let path = tmp_file("drive");
    std::fs::write(
        &path,
        format!(r#"{{"{SETTINGS_KEY}":{{"returnColumns":"B","matchFilterMode":"notfound"}}}}"#),
    )
    .unwrap();
    let settings = SettingsStore::new(&path).load().unwrap().unwrap();
    let _ = std::fs::remove_file(&path);

    let source = sheet_vlookup::types::Table::from_rows(vec![vec!["ID", "V"], vec!["a", "1"]]);
    let lookup = sheet_vlookup::types::Table::from_rows(vec![vec!["ID"], vec!["a"], vec!["b"]]);
    let out = sheet_vlookup::processing::lookup_tables(&source, &lookup, &settings).unwrap();
    assert_eq!(out.emitted_rows(), 1);
    assert_eq!(out.stats.records_processed, 2);
}

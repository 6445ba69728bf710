use std::fs;

use nestkit_config_store::{Error, Repository};
use nestkit_value::{Key, Value};

#[test]
fn test_load_dir_keys_files_by_stem() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("app.json"), r#"{"name": "demo", "debug": true}"#).unwrap();
    fs::write(
        dir.path().join("database.json"),
        r#"{"default": "mysql", "connections": {"mysql": {"port": 3306}}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "not configuration").unwrap();
    fs::create_dir(dir.path().join("nested.json")).unwrap();

    let config = Repository::load_dir(dir.path()).unwrap();

    let top_level: Vec<Key> = config.all().as_map().unwrap().keys().cloned().collect();
    assert_eq!(top_level, vec![Key::from("app"), Key::from("database")]);
    assert_eq!(config.get("app.name", Value::Null), Value::from("demo"));
    assert_eq!(
        config.get("database.connections.mysql.port", Value::Null),
        Value::from(3306)
    );
    assert!(!config.has("notes"));
}

#[test]
fn test_load_dir_rejects_files() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("app.json");
    fs::write(&file, "{}").unwrap();

    let err = Repository::load_dir(&file).unwrap_err();
    assert!(matches!(err, Error::NotADirectory { .. }));

    let err = Repository::load_dir(dir.path().join("missing")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_load_file_reports_bad_json_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("broken.json");
    fs::write(&file, r#"{"name": "#).unwrap();

    match Repository::load_file(&file) {
        Err(Error::Json { path, .. }) => assert_eq!(path, file),
        other => panic!("expected a JSON error, got {:?}", other),
    }
}

#[test]
fn test_save_then_load_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("settings.json");

    let mut config = Repository::new();
    config.set("zeta.enabled", true).unwrap();
    config.set("alpha.hosts", Value::Array(vec![Value::from("a"), Value::from("b")])).unwrap();
    config.push("alpha.hosts", "c").unwrap();
    config.save(&file).unwrap();

    let loaded = Repository::load_file(&file).unwrap();
    assert_eq!(loaded, config);
    let keys: Vec<Key> = loaded.all().as_map().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec![Key::from("zeta"), Key::from("alpha")]);
    assert_eq!(loaded.get("alpha.hosts.2", Value::Null), Value::from("c"));
}

use super::*;
use std::fs;

#[test]
fn test_init_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasmovie").join("settings.toml");

    assert!(init_settings_at(&path).unwrap());
    assert_eq!(Settings::try_load_from(&path).unwrap(), Some(Settings::default()));
}

#[test]
fn test_init_keeps_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "[limits]\nmax_input_bytes = 4096\n").unwrap();

    assert!(!init_settings_at(&path).unwrap());
    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "[limits]\nmax_input_bytes = 4096\n");
}

use super::load_existing_config as load_existing_config_impl;
use std::fs;
use tempfile::TempDir;

#[test]
fn load_existing_config() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let config = load_existing_config_impl(temp_dir.path()).expect("config loaded successfully");
    assert!(!config.generator.output_dir.is_empty());
    assert!(config.generator.timeout_ms > 0);
    assert_eq!(config.get_base_dir(), temp_dir.path());
}

#[test]
fn broken_config_falls_back_to_defaults() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    fs::write(temp_dir.path().join("config.toml"), "[generator\nbroken")
        .expect("should write config");

    let config = load_existing_config_impl(temp_dir.path()).expect("falls back to defaults");
    assert_eq!(config.generator.output_dir, "specs");
    assert_eq!(config.get_base_dir(), temp_dir.path());
}

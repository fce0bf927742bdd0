//! Unit tests for configuration resolution and graceful degradation
//!
//! Tests that manipulate VIDLOOP_CONFIG are marked with #[serial]
//! to ensure they run sequentially, not in parallel.

use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use vidloop_common::config::{load_config, ConfigResolver, TomlConfig, CONFIG_ENV_VAR};
use vidloop_common::Error;

#[test]
#[serial]
fn test_resolver_cli_path_has_highest_priority() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/vidloop-env.toml");

    let resolver = ConfigResolver::new(Some(PathBuf::from("/tmp/vidloop-cli.toml")));
    assert_eq!(resolver.resolve(), Some(PathBuf::from("/tmp/vidloop-cli.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_resolver_env_var() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/vidloop-env.toml");

    let resolver = ConfigResolver::new(None);
    assert_eq!(resolver.resolve(), Some(PathBuf::from("/tmp/vidloop-env.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_resolver_ignores_blank_env_var() {
    env::set_var(CONFIG_ENV_VAR, "   ");

    let resolver = ConfigResolver::new(None);
    assert_ne!(resolver.resolve(), Some(PathBuf::from("   ")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
fn test_missing_config_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let config = load_config(Some(&missing)).unwrap();
    assert_eq!(config, TomlConfig::default());

    let config = load_config(None).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_load_config_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("vidloop.toml");
    fs::write(
        &path,
        r#"
        [playlist]
        resume = true

        [[movie]]
        path = "/media/usb/a.mp4"

        [[movie]]
        path = "/media/usb/b.mp4"
        repeats = 2
        "#,
    )
    .unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert!(config.playlist.resume);
    assert_eq!(config.movies.len(), 2);
    assert_eq!(config.movies[1].repeats, 2);
}

#[test]
fn test_corrupt_config_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("vidloop.toml");
    fs::write(&path, "[[movie]\npath = ").unwrap();

    let result = load_config(Some(&path));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_unreadable_config_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("vidloop.toml");
    fs::create_dir(&path).unwrap();

    let result = load_config(Some(&path));
    assert!(matches!(result, Err(Error::Io(_))));
}

//! Integration tests for the profile configuration loader
//!
//! Exercises the file round trip (save, parse, resolve) without touching the
//! process environment: the environment layer is passed in explicitly.

use arize_domain::constants::DEFAULT_APP_URL;
use arize_domain::{ArizeError, ProfileConfig};
use arize_infra::config::{self, ConfigSources};

fn profile(key: &str, space: &str) -> ProfileConfig {
    ProfileConfig {
        api_key: Some(key.to_string()),
        organization: Some("acme".to_string()),
        space: Some(space.to_string()),
        app_url: None,
    }
}

#[test]
fn saved_profiles_resolve_by_name() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("config.toml");

    config::save_profile(&path, "default", profile("default-key", "prod")).expect("save default");
    config::save_profile(&path, "staging", profile("staging-key", "staging")).expect("save staging");

    let file = config::load_config_file(&path).expect("parse saved file");
    assert_eq!(file.profiles.len(), 2);

    let sources = ConfigSources { profile: Some("staging".into()), path: Some(path), ..Default::default() };
    let resolved = config::resolve(&sources, &ProfileConfig::default(), &file).expect("resolve staging");

    assert_eq!(resolved.api_key, "staging-key");
    assert_eq!(resolved.space, "staging");
    assert_eq!(resolved.app_url, DEFAULT_APP_URL);
}

#[test]
fn saving_a_profile_twice_replaces_it() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.toml");

    config::save_profile(&path, "default", profile("old", "prod")).expect("first save");
    config::save_profile(&path, "default", profile("new", "prod")).expect("second save");

    let file = config::load_config_file(&path).expect("parse");
    assert_eq!(file.profiles.len(), 1);
    assert_eq!(file.profiles["default"].api_key.as_deref(), Some("new"));
}

#[test]
fn environment_layer_fills_gaps_left_by_the_profile() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[profiles.ci]\norganization = \"acme\"\nspace = \"ci\"\n").expect("write config");

    let file = config::load_config_file(&path).expect("parse");
    let env = ProfileConfig { api_key: Some("env-key".into()), ..Default::default() };
    let sources = ConfigSources { profile: Some("ci".into()), path: Some(path), ..Default::default() };

    let resolved = config::resolve(&sources, &env, &file).expect("resolve");

    assert_eq!(resolved.api_key, "env-key");
    assert_eq!(resolved.space, "ci");
}

#[test]
fn incomplete_profile_is_a_config_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[profiles.partial]\norganization = \"acme\"\n").expect("write config");

    let file = config::load_config_file(&path).expect("parse");
    let sources = ConfigSources { profile: Some("partial".into()), path: Some(path), ..Default::default() };

    let err = config::resolve(&sources, &ProfileConfig::default(), &file).unwrap_err();
    assert!(matches!(err, ArizeError::Config(_)), "unexpected error: {err:?}");
}

#[test]
fn missing_file_is_an_empty_profile_set() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = config::load_config_file(&dir.path().join("absent.toml")).expect("missing file is ok");
    assert!(file.profiles.is_empty());
}

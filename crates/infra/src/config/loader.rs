//! Profile configuration loader
//!
//! ## Resolution order (first non-empty value wins per field)
//! 1. Explicit overrides (CLI flags)
//! 2. Environment variables
//! 3. The selected profile in the config file
//! 4. Built-in default (`app_url` only)
//!
//! ## Environment Variables
//! - `ARIZE_API_KEY`: developer API key
//! - `ARIZE_ORGANIZATION`: organization name
//! - `ARIZE_SPACE`: space name
//! - `ARIZE_APP_URL`: platform base URL
//! - `ARIZE_PROFILE`: profile selected when none is given explicitly
//!
//! ## File Location
//! `$HOME/.arize/config.toml`, one table per profile:
//!
//! ```toml
//! [profiles.default]
//! api_key = "..."
//! organization = "acme"
//! space = "prod"
//! ```

use std::path::{Path, PathBuf};

use arize_domain::constants::DEFAULT_PROFILE;
use arize_domain::{ArizeConfig, ArizeError, ConfigFile, ProfileConfig, Result};

use crate::errors::conversions::to_domain;

const ENV_API_KEY: &str = "ARIZE_API_KEY";
const ENV_ORGANIZATION: &str = "ARIZE_ORGANIZATION";
const ENV_SPACE: &str = "ARIZE_SPACE";
const ENV_APP_URL: &str = "ARIZE_APP_URL";
const ENV_PROFILE: &str = "ARIZE_PROFILE";

/// Where to look and what to prefer when resolving credentials.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Profile name; falls back to `ARIZE_PROFILE`, then `default`
    pub profile: Option<String>,
    /// Config file; falls back to [`default_config_path`]
    pub path: Option<PathBuf>,
    /// Highest-precedence values (CLI flags)
    pub overrides: ProfileConfig,
}

/// `$HOME/.arize/config.toml`, if `HOME` is set.
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(".arize").join("config.toml"))
}

/// Read the environment layer.
pub fn profile_from_env() -> ProfileConfig {
    ProfileConfig {
        api_key: env_var(ENV_API_KEY),
        organization: env_var(ENV_ORGANIZATION),
        space: env_var(ENV_SPACE),
        app_url: env_var(ENV_APP_URL),
    }
}

/// Parse a config file; a missing file is an empty config.
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using empty profile set");
        return Ok(ConfigFile::default());
    }

    let contents = std::fs::read_to_string(path).map_err(to_domain)?;
    toml::from_str(&contents)
        .map_err(|e| ArizeError::Config(format!("{}: {}", path.display(), e.message())))
}

/// Collapse overrides, environment and profile into a resolved config.
///
/// Naming a profile that does not exist is an error; the implicit default
/// profile may be absent.
pub fn resolve(sources: &ConfigSources, env: &ProfileConfig, file: &ConfigFile) -> Result<ArizeConfig> {
    let explicit = sources.profile.clone().or_else(|| env_var(ENV_PROFILE));
    let name = explicit.clone().unwrap_or_else(|| DEFAULT_PROFILE.to_string());

    let empty = ProfileConfig::default();
    let profile = match file.profiles.get(&name) {
        Some(profile) => profile,
        None if explicit.is_some() && name != DEFAULT_PROFILE => {
            return Err(ArizeError::Config(format!("profile '{name}' not found in config file")));
        }
        None => &empty,
    };

    tracing::debug!(profile = %name, "resolving configuration");
    ArizeConfig::resolve(&[&sources.overrides, env, profile])
}

/// Load and resolve configuration from every source.
pub fn load(sources: &ConfigSources) -> Result<ArizeConfig> {
    let file = match sources.path.clone().or_else(default_config_path) {
        Some(path) => load_config_file(&path)?,
        None => ConfigFile::default(),
    };
    resolve(sources, &profile_from_env(), &file)
}

/// Insert or replace one profile, creating the file and directory if needed.
pub fn save_profile(path: &Path, name: &str, profile: ProfileConfig) -> Result<()> {
    let mut file = load_config_file(path)?;
    file.profiles.insert(name.to_string(), profile);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(to_domain)?;
    }
    let contents = toml::to_string_pretty(&file).map_err(to_domain)?;
    std::fs::write(path, contents).map_err(to_domain)?;

    tracing::info!(path = %path.display(), profile = name, "saved profile");
    Ok(())
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use arize_domain::constants::DEFAULT_APP_URL;
    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ENV_KEYS: [&str; 5] = [ENV_API_KEY, ENV_ORGANIZATION, ENV_SPACE, ENV_APP_URL, ENV_PROFILE];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const TWO_PROFILES: &str = r#"
        [profiles.default]
        api_key = "default-key"
        organization = "acme"
        space = "prod"

        [profiles.staging]
        api_key = "staging-key"
        organization = "acme"
        space = "staging"
        app_url = "https://staging.arize.example/"
    "#;

    #[test]
    fn loads_default_profile_from_file() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        let file = write_config(TWO_PROFILES);

        let config = load(&ConfigSources { path: Some(file.path().to_path_buf()), ..Default::default() }).unwrap();

        assert_eq!(config.api_key, "default-key");
        assert_eq!(config.space, "prod");
        assert_eq!(config.app_url, DEFAULT_APP_URL);
    }

    #[test]
    fn env_profile_selects_table_and_trims_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_PROFILE, "staging");
        let file = write_config(TWO_PROFILES);

        let config = load(&ConfigSources { path: Some(file.path().to_path_buf()), ..Default::default() }).unwrap();

        assert_eq!(config.space, "staging");
        assert_eq!(config.graphql_url(), "https://staging.arize.example/graphql");
        clear_env();
    }

    #[test]
    fn flags_beat_env_and_env_beats_profile() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_API_KEY, "env-key");
        std::env::set_var(ENV_SPACE, "env-space");
        let file = write_config(TWO_PROFILES);

        let sources = ConfigSources {
            path: Some(file.path().to_path_buf()),
            overrides: ProfileConfig { space: Some("flag-space".into()), ..Default::default() },
            ..Default::default()
        };
        let config = load(&sources).unwrap();

        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.space, "flag-space");
        assert_eq!(config.organization, "acme");
        clear_env();
    }

    #[test]
    fn unknown_explicit_profile_is_an_error() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        let file = write_config(TWO_PROFILES);

        let sources = ConfigSources {
            profile: Some("missing".into()),
            path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let err = load(&sources).unwrap_err();

        assert!(matches!(err, ArizeError::Config(msg) if msg.contains("missing")));
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let file = write_config("[profiles.default\napi_key = ");
        let err = load_config_file(file.path()).unwrap_err();
        assert!(matches!(err, ArizeError::Config(_)));
    }

    #[test]
    fn save_profile_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".arize").join("config.toml");
        let profile = ProfileConfig {
            api_key: Some("k".into()),
            organization: Some("o".into()),
            space: Some("s".into()),
            app_url: None,
        };

        save_profile(&path, "default", profile.clone()).unwrap();
        let file = load_config_file(&path).unwrap();

        assert_eq!(file.profiles.get("default"), Some(&profile));
    }
}

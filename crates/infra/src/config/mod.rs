//! Configuration loading
//!
//! Locates the profile file, reads the environment and collapses both with
//! explicit overrides into an [`arize_domain::ArizeConfig`].

pub mod loader;

pub use loader::{
    default_config_path, load, load_config_file, profile_from_env, resolve, save_profile,
    ConfigSources,
};

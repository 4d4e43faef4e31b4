//! Shared types and configuration for the socdash workspace.
//!
//! Holds the dataset profiles (which columns a LinkedIn or Instagram export
//! carries and how its post time is encoded) and the env-driven
//! [`AppConfig`] consumed by the CLI and the server.

pub mod app_config;
pub mod config;
pub mod profiles;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, resolve_profile};
pub use profiles::{load_profiles, DatasetProfile, Platform, ProfilesFile, TimeKind};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read profiles file {path}: {source}")]
    ProfilesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profiles file: {0}")]
    ProfilesFileParse(#[from] serde_yaml::Error),

    #[error("profile validation failed: {0}")]
    Validation(String),

    #[error("no dataset profile named '{0}'")]
    UnknownProfile(String),
}

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::profiles::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub platform: Platform,
    /// Overrides the dataset path of the selected profile when set.
    pub dataset_path: Option<PathBuf>,
    /// Optional YAML file with custom dataset profiles.
    pub profiles_path: Option<PathBuf>,
    /// Profile name to pick from `profiles_path`; defaults to the first
    /// profile matching `platform`.
    pub profile_name: Option<String>,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Number of groups kept by ranking views.
    pub top_k: usize,
    /// Bucket count for the engagement distribution view.
    pub histogram_bins: usize,
}

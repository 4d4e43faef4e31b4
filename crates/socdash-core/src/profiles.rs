use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Social network a dataset was exported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(alias = "linked_in")]
    LinkedIn,
    Instagram,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::LinkedIn => write!(f, "linkedin"),
            Platform::Instagram => write!(f, "instagram"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linkedin" => Ok(Platform::LinkedIn),
            "instagram" => Ok(Platform::Instagram),
            other => Err(format!(
                "unknown platform '{other}'; expected linkedin or instagram"
            )),
        }
    }
}

/// How the post-time column is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeKind {
    /// Age tokens such as `3d`, `2w`, `1mo`, resolved against "now".
    Relative,
    /// Absolute timestamps such as `2024-03-01T10:00:00.000Z`.
    Absolute,
}

/// Declarative description of one dataset variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub name: String,
    pub platform: Platform,
    pub path: PathBuf,
    /// Columns to retain, in this order. Empty keeps every column.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Columns coerced to numbers in addition to the engagement column.
    #[serde(default)]
    pub numeric_columns: Vec<String>,
    pub time_column: String,
    pub time_kind: TimeKind,
    /// Drop rows whose post time cannot be resolved at load time.
    #[serde(default)]
    pub drop_unresolved: bool,
}

impl DatasetProfile {
    /// The profile matching the stock scraper export for `platform`.
    #[must_use]
    pub fn builtin(platform: Platform) -> Self {
        match platform {
            Platform::LinkedIn => Self {
                name: "linkedin".to_string(),
                platform,
                path: PathBuf::from("dataset_linkedin-post-search-scraper.csv"),
                columns: Vec::new(),
                numeric_columns: Vec::new(),
                time_column: "timeSincePosted".to_string(),
                time_kind: TimeKind::Relative,
                drop_unresolved: false,
            },
            Platform::Instagram => Self {
                name: "instagram".to_string(),
                platform,
                path: PathBuf::from("dataset_instagram-scraper.csv"),
                columns: [
                    "caption",
                    "commentsCount",
                    "likesCount",
                    "timestamp",
                    "type",
                    "videoViewCount",
                ]
                .into_iter()
                .map(String::from)
                .collect(),
                numeric_columns: ["likesCount", "commentsCount", "videoViewCount"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                time_column: "timestamp".to_string(),
                time_kind: TimeKind::Absolute,
                drop_unresolved: true,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfilesFile {
    pub profiles: Vec<DatasetProfile>,
}

impl ProfilesFile {
    /// Look up a profile by name (case-insensitive).
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&DatasetProfile> {
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// First profile declared for `platform`.
    #[must_use]
    pub fn first_for(&self, platform: Platform) -> Option<&DatasetProfile> {
        self.profiles.iter().find(|p| p.platform == platform)
    }
}

/// Load and validate dataset profiles from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profiles(path: &Path) -> Result<ProfilesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfilesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let profiles_file: ProfilesFile = serde_yaml::from_str(&content)?;

    validate_profiles(&profiles_file)?;

    Ok(profiles_file)
}

fn validate_profiles(profiles_file: &ProfilesFile) -> Result<(), ConfigError> {
    if profiles_file.profiles.is_empty() {
        return Err(ConfigError::Validation(
            "profiles file declares no profiles".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();

    for profile in &profiles_file.profiles {
        if profile.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "profile name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(profile.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate profile name: '{}'",
                profile.name
            )));
        }

        if profile.time_column.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "profile '{}' has an empty time_column",
                profile.name
            )));
        }

        if !profile.columns.is_empty() && !profile.columns.contains(&profile.time_column) {
            return Err(ConfigError::Validation(format!(
                "profile '{}' drops its own time column '{}'; add it to columns",
                profile.name, profile.time_column
            )));
        }
    }

    Ok(())
}

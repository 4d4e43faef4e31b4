use crate::app_config::{AppConfig, Environment};
use crate::profiles::{load_profiles, DatasetProfile, Platform};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_positive = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .trim()
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("SOCDASH_ENV", "development"))?;

    let platform = or_default("SOCDASH_PLATFORM", "linkedin")
        .parse::<Platform>()
        .map_err(|reason| invalid("SOCDASH_PLATFORM", reason))?;

    let bind_addr = or_default("SOCDASH_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("SOCDASH_BIND_ADDR", e.to_string()))?;

    let log_level = or_default("SOCDASH_LOG_LEVEL", "info");
    let dataset_path = optional("SOCDASH_DATASET_PATH").map(PathBuf::from);
    let profiles_path = optional("SOCDASH_PROFILES_PATH").map(PathBuf::from);
    let profile_name = optional("SOCDASH_PROFILE");

    let top_k = parse_positive("SOCDASH_TOP_K", "10")?;
    let histogram_bins = parse_positive("SOCDASH_HISTOGRAM_BINS", "20")?;

    Ok(AppConfig {
        env,
        platform,
        dataset_path,
        profiles_path,
        profile_name,
        bind_addr,
        log_level,
        top_k,
        histogram_bins,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SOCDASH_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Pick the dataset profile described by `config`.
///
/// With `profiles_path` set, the named profile (or the first one for the
/// configured platform) is taken from that file; otherwise the built-in
/// profile for the platform is used. `dataset_path` always wins over the
/// profile's own path.
///
/// # Errors
///
/// Returns `ConfigError` if the profiles file is unreadable or invalid, or if
/// no profile matches.
pub fn resolve_profile(config: &AppConfig) -> Result<DatasetProfile, ConfigError> {
    let mut profile = match &config.profiles_path {
        Some(path) => {
            let file = load_profiles(path)?;
            let picked = match &config.profile_name {
                Some(name) => file.find(name),
                None => file.first_for(config.platform),
            };
            picked.cloned().ok_or_else(|| {
                ConfigError::UnknownProfile(
                    config
                        .profile_name
                        .clone()
                        .unwrap_or_else(|| config.platform.to_string()),
                )
            })?
        }
        None => DatasetProfile::builtin(config.platform),
    };

    if let Some(path) = &config.dataset_path {
        profile.path.clone_from(path);
    }

    Ok(profile)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

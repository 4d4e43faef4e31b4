use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "SOCDASH_ENV"));
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.platform, Platform::LinkedIn);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.dataset_path.is_none());
    assert!(cfg.profiles_path.is_none());
    assert!(cfg.profile_name.is_none());
    assert_eq!(cfg.top_k, 10);
    assert_eq!(cfg.histogram_bins, 20);
}

#[test]
fn build_app_config_reads_platform_and_paths() {
    let mut map = HashMap::new();
    map.insert("SOCDASH_PLATFORM", "Instagram");
    map.insert("SOCDASH_DATASET_PATH", "data/ig.csv");
    map.insert("SOCDASH_PROFILES_PATH", "config/profiles.yaml");
    map.insert("SOCDASH_PROFILE", "brand-account");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.platform, Platform::Instagram);
    assert_eq!(cfg.dataset_path, Some(PathBuf::from("data/ig.csv")));
    assert_eq!(
        cfg.profiles_path,
        Some(PathBuf::from("config/profiles.yaml"))
    );
    assert_eq!(cfg.profile_name.as_deref(), Some("brand-account"));
}

#[test]
fn build_app_config_treats_blank_path_as_unset() {
    let mut map = HashMap::new();
    map.insert("SOCDASH_DATASET_PATH", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.dataset_path.is_none());
}

#[test]
fn build_app_config_fails_with_unknown_platform() {
    let mut map = HashMap::new();
    map.insert("SOCDASH_PLATFORM", "myspace");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SOCDASH_PLATFORM"),
        "expected InvalidEnvVar(SOCDASH_PLATFORM), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("SOCDASH_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SOCDASH_BIND_ADDR"),
        "expected InvalidEnvVar(SOCDASH_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn top_k_override() {
    let mut map = HashMap::new();
    map.insert("SOCDASH_TOP_K", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.top_k, 5);
}

#[test]
fn top_k_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("SOCDASH_TOP_K", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SOCDASH_TOP_K"),
        "expected InvalidEnvVar(SOCDASH_TOP_K), got: {result:?}"
    );
}

#[test]
fn histogram_bins_invalid() {
    let mut map = HashMap::new();
    map.insert("SOCDASH_HISTOGRAM_BINS", "twenty");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SOCDASH_HISTOGRAM_BINS"),
        "expected InvalidEnvVar(SOCDASH_HISTOGRAM_BINS), got: {result:?}"
    );
}

fn default_config() -> AppConfig {
    build_app_config(lookup_from_map(&HashMap::new())).unwrap()
}

#[test]
fn resolve_profile_uses_builtin_without_profiles_file() {
    let mut cfg = default_config();
    cfg.platform = Platform::Instagram;
    let profile = resolve_profile(&cfg).unwrap();
    assert_eq!(profile, DatasetProfile::builtin(Platform::Instagram));
}

#[test]
fn resolve_profile_applies_dataset_path_override() {
    let mut cfg = default_config();
    cfg.dataset_path = Some(PathBuf::from("exports/linkedin.csv"));
    let profile = resolve_profile(&cfg).unwrap();
    assert_eq!(profile.path, PathBuf::from("exports/linkedin.csv"));
    assert_eq!(profile.time_column, "timeSincePosted");
}

#[test]
fn resolve_profile_fails_when_profiles_file_missing() {
    let mut cfg = default_config();
    cfg.profiles_path = Some(PathBuf::from("/nonexistent/socdash/profiles.yaml"));
    let err = resolve_profile(&cfg).unwrap_err();
    assert!(matches!(err, ConfigError::ProfilesFileIo { .. }));
}

#[test]
fn resolve_profile_rejects_unknown_profile_name() {
    let mut cfg = default_config();
    cfg.profiles_path =
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/profiles.yaml"));
    cfg.profile_name = Some("tiktok".to_string());
    let err = resolve_profile(&cfg).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownProfile(ref name) if name == "tiktok"));
}

//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, override from the process environment, and validate.
///
/// Without a path the built-in defaults are used as the base.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides through `lookup`.
///
/// Recognised variables: `GIT_SHA`, `APP_ENV`, `BIND_ADDRESS`,
/// `DATABASE_URL`, `REDIS_URL`, `STATION_URL`. Empty values are ignored.
pub fn apply_env<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(sha) = get("GIT_SHA") {
        config.build.git_sha = sha;
    }
    if let Some(env) = get("APP_ENV") {
        config.environment = env
            .parse()
            .map_err(|reason| ConfigError::Env { var: "APP_ENV", reason })?;
    }
    if let Some(addr) = get("BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    if let Some(url) = get("DATABASE_URL") {
        config.database.url = url;
    }
    if let Some(url) = get("REDIS_URL") {
        config.redis.url = url;
    }
    if let Some(url) = get("STATION_URL") {
        config.dashboard.base_url = url;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Environment;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_git_sha_defaults_to_unknown() {
        let mut config = GatewayConfig::default();
        apply_env(&mut config, lookup_from(&[])).unwrap();
        assert_eq!(config.build.git_sha, "unknown");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = GatewayConfig::default();
        apply_env(
            &mut config,
            lookup_from(&[
                ("GIT_SHA", "df08eb357dd7f432c3dcbe0ef4b3212a38b4aeff"),
                ("APP_ENV", "test"),
                ("STATION_URL", "https://station.internal"),
                ("REDIS_URL", ""),
            ]),
        )
        .unwrap();

        assert_eq!(config.build.git_sha, "df08eb357dd7f432c3dcbe0ef4b3212a38b4aeff");
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.dashboard.base_url, "https://station.internal");
        assert_eq!(config.redis.url, "redis://127.0.0.1:6379");
    }

    #[test]
    fn test_bad_environment_rejected() {
        let mut config = GatewayConfig::default();
        let err = apply_env(&mut config, lookup_from(&[("APP_ENV", "qa")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "APP_ENV", .. }));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("health-gateway-{}.toml", std::process::id()));
        fs::write(
            &path,
            "[listener]\nbind_address = \"127.0.0.1:9999\"\n\n[health_check]\ninterval_secs = 30\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.health_check.interval_secs, 30);

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_invalid_file_reports_validation() {
        let path = std::env::temp_dir().join(format!("health-gateway-invalid-{}.toml", std::process::id()));
        fs::write(&path, "[health_check]\ninterval_secs = 0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        fs::remove_file(&path).unwrap_or_default();
    }
}

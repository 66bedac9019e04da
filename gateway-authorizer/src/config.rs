use std::time::Duration;

use crate::{error::InitError, Refresh};

pub const DEFAULT_SECRET_NAME: &str = "test/opportunity-ecosys-producer/aad-client-credentials";
pub const DEFAULT_JWKS_URI: &str = "https://login.microsoftonline.com/common/discovery/keys";

pub const SECRET_NAME_VAR: &str = "SECRET_NAME";
pub const JWKS_URI_VAR: &str = "JWKS_URI";
pub const JWKS_MIN_REFRESH_SECS_VAR: &str = "JWKS_MIN_REFRESH_SECS";

/// Deploy-time settings, each overridable from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub secret_name: String,
    pub jwks_uri: String,
    /// minimal interval between two jwks fetches caused by unknown key ids
    pub jwks_min_refresh: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            secret_name: DEFAULT_SECRET_NAME.to_owned(),
            jwks_uri: DEFAULT_JWKS_URI.to_owned(),
            jwks_min_refresh: Duration::ZERO,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, InitError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Config, InitError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let jwks_min_refresh = match non_empty(JWKS_MIN_REFRESH_SECS_VAR) {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| InitError::Config(format!("{JWKS_MIN_REFRESH_SECS_VAR}={secs}: {e}")))?,
            None => defaults.jwks_min_refresh,
        };

        let jwks_uri = non_empty(JWKS_URI_VAR).unwrap_or(defaults.jwks_uri);
        if !jwks_uri.starts_with("https://") && !jwks_uri.starts_with("http://") {
            return Err(InitError::Config(format!("{JWKS_URI_VAR}={jwks_uri}: not an http(s) url")));
        }

        Ok(Config {
            secret_name: non_empty(SECRET_NAME_VAR).unwrap_or(defaults.secret_name),
            jwks_uri,
            jwks_min_refresh,
        })
    }

    pub fn refresh(&self) -> Refresh {
        Refresh {
            minimal_refresh_interval: self.jwks_min_refresh,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use super::{Config, DEFAULT_JWKS_URI, DEFAULT_SECRET_NAME};
    use crate::error::InitError;

    fn config(vars: &[(&str, &str)]) -> Result<Config, InitError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.secret_name, DEFAULT_SECRET_NAME);
        assert_eq!(c.jwks_uri, DEFAULT_JWKS_URI);
        assert_eq!(c.jwks_min_refresh, Duration::ZERO);
        assert_eq!(c, Config::default());
    }

    #[test]
    fn overrides() {
        let c = config(&[
            ("SECRET_NAME", "prod/creds"),
            ("JWKS_URI", "http://localhost:8080/keys"),
            ("JWKS_MIN_REFRESH_SECS", "30"),
        ])
        .unwrap();
        assert_eq!(c.secret_name, "prod/creds");
        assert_eq!(c.jwks_uri, "http://localhost:8080/keys");
        assert_eq!(c.refresh().minimal_refresh_interval, Duration::from_secs(30));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let c = config(&[("SECRET_NAME", "  "), ("JWKS_URI", "")]).unwrap();
        assert_eq!(c, Config::default());
    }

    #[test]
    fn invalid_values() {
        assert!(matches!(config(&[("JWKS_MIN_REFRESH_SECS", "soon")]), Err(InitError::Config(_))));
        assert!(matches!(config(&[("JWKS_URI", "login.microsoftonline.com")]), Err(InitError::Config(_))));
    }
}

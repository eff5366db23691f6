//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "ptv.toml",
    "./config/config.toml",
    "/etc/ptv/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    use_search_paths: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            use_search_paths: true,
        }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
            use_search_paths: true,
        }
    }

    /// Only consider the explicit path and `PTV_CONFIG`.
    pub fn without_search_paths(mut self) -> Self {
        self.use_search_paths = false;
        self
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match self.find_config_file() {
            Some(path) => {
                info!(?path, "Loading configuration from file");
                AppConfig::from_file(&path)?
            }
            None => AppConfig::default(),
        };

        apply_env_overrides(&mut config, |key| env::var(key).ok());

        Ok(config)
    }

    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
        }

        if let Ok(path) = env::var("PTV_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if !self.use_search_paths {
            return None;
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply `PTV_*` overrides; `lookup` abstracts the environment for tests.
pub(crate) fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    // HTTP
    if let Some(port) = lookup("PTV_HTTP_PORT").and_then(|v| v.parse().ok()) {
        config.http.port = port;
    }
    if let Some(val) = lookup("PTV_HTTP_HOST") {
        config.http.host = val;
    }
    if let Some(val) = lookup("PTV_CORS_ORIGINS") {
        config.http.cors_origins = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    // Auth
    if let Some(val) = lookup("PTV_JWT_SECRET") {
        config.auth.jwt_secret = val;
    }
    if let Some(val) = lookup("PTV_JWT_ISSUER") {
        config.auth.issuer = val;
    }
    if let Some(val) = lookup("PTV_JWT_AUDIENCE") {
        config.auth.audience = val;
    }

    // Paging
    if let Some(size) = lookup("PTV_PAGE_SIZE").and_then(|v| v.parse().ok()) {
        config.paging.page_size = size;
    }

    // API
    if let Some(val) = lookup("PTV_DOCUMENTATION_URL") {
        config.api.documentation_url = val;
    }

    // General
    if let Some(val) = lookup("PTV_DEV_MODE") {
        config.dev_mode = matches!(val.as_str(), "true" | "1");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PTV_HTTP_PORT", "9000"),
            ("PTV_CORS_ORIGINS", "http://a, http://b,"),
            ("PTV_JWT_SECRET", "s3cret"),
            ("PTV_PAGE_SIZE", "-1"),
            ("PTV_DEV_MODE", "1"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.cors_origins, vec!["http://a", "http://b"]);
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.paging.effective_page_size(), crate::DEFAULT_PAGE_SIZE);
        assert!(config.dev_mode);
    }

    #[test]
    fn test_unparseable_port_is_ignored() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, |key| {
            (key == "PTV_HTTP_PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(config.http.port, 8080);
    }
}

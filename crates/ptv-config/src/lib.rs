//! PTV Open API Configuration
//!
//! TOML-based configuration with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Page size used when the configured one is not positive.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub auth: AuthConfig,
    pub paging: PagingConfig,
    pub api: ApiConfig,

    /// Seed a sample organization and channel besides the reference code lists
    pub dev_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            auth: AuthConfig::default(),
            paging: PagingConfig::default(),
            api: ApiConfig::default(),
            dev_mode: false,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

/// Bearer token validation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 secret shared with the token service
    pub jwt_secret: String,
    pub issuer: String,
    pub audience: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: "ptv-token-service".to_string(),
            audience: "ptv-open-api".to_string(),
        }
    }
}

/// List endpoint paging
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Items per page; zero or negative falls back to [`DEFAULT_PAGE_SIZE`]
    pub page_size: i64,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE as i64,
        }
    }
}

impl PagingConfig {
    /// The page size every list operation applies.
    pub fn effective_page_size(&self) -> u32 {
        if self.page_size <= 0 {
            DEFAULT_PAGE_SIZE
        } else {
            u32::try_from(self.page_size).unwrap_or(u32::MAX)
        }
    }
}

/// Public API metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Where callers of unsupported versions are pointed to
    pub documentation_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            documentation_url: "https://api.palvelutietovaranto.suomi.fi/swagger/ui/index.html".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Reject settings the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::ValidationError("http.port must not be 0".to_string()));
        }
        if self.auth.jwt_secret.trim().is_empty() && !self.dev_mode {
            return Err(ConfigError::ValidationError(
                "auth.jwt_secret is required unless dev_mode is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# PTV Open API Configuration
# Environment variables override these settings

[http]
port = 8080
host = "0.0.0.0"
cors_origins = []

[auth]
jwt_secret = ""
issuer = "ptv-token-service"
audience = "ptv-open-api"

[paging]
page_size = 1000

[api]
documentation_url = "https://api.palvelutietovaranto.suomi.fi/swagger/ui/index.html"

dev_mode = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.paging.effective_page_size(), 1000);
        assert!(!config.dev_mode);
    }

    #[test]
    fn test_non_positive_page_size_falls_back() {
        let mut paging = PagingConfig { page_size: 0 };
        assert_eq!(paging.effective_page_size(), DEFAULT_PAGE_SIZE);

        paging.page_size = -5;
        assert_eq!(paging.effective_page_size(), DEFAULT_PAGE_SIZE);

        paging.page_size = 50;
        assert_eq!(paging.effective_page_size(), 50);
    }

    #[test]
    fn test_example_toml_parses() {
        let config = AppConfig::from_toml_str(&AppConfig::example_toml()).unwrap();
        assert_eq!(config.auth.issuer, "ptv-token-service");
        assert_eq!(config.paging.page_size, 1000);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str("[paging]\npage_size = 25\n").unwrap();
        assert_eq!(config.paging.page_size, 25);
        assert_eq!(config.http.port, 8080);
    }

    #[test]
    fn test_validate_requires_secret_outside_dev_mode() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_err());

        config.dev_mode = true;
        assert!(config.validate().is_ok());

        config.dev_mode = false;
        config.auth.jwt_secret = "secret".to_string();
        assert!(config.validate().is_ok());

        config.http.port = 0;
        assert!(config.validate().is_err());
    }
}

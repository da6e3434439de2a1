//! Configuration loading
//!
//! Precedence: command-line flag > environment > config file > defaults.
//! Flags and environment are handled by clap in the binary; this module
//! owns the file layer and validation.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default API root
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

/// Rows per page in the admin lock panel
pub const DEFAULT_ADMIN_PAGE_SIZE: u32 = 20;

/// Rows per page in the faculty listing
pub const DEFAULT_FACULTY_PAGE_SIZE: u32 = 50;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API root, e.g. `http://localhost:8080/api`
    pub api_base: String,
    /// Rows per page in the admin lock panel
    pub admin_page_size: u32,
    /// Rows per page in the faculty listing
    pub faculty_page_size: u32,
    /// Request timeout; unset keeps the transport default
    pub request_timeout_secs: Option<u64>,
    /// Token file override
    pub token_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            admin_page_size: DEFAULT_ADMIN_PAGE_SIZE,
            faculty_page_size: DEFAULT_FACULTY_PAGE_SIZE,
            request_timeout_secs: None,
            token_file: None,
        }
    }
}

/// `<config dir>/marksflow`
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("marksflow"))
}

/// `<config dir>/marksflow/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|d| d.join("config.toml"))
}

/// `<config dir>/marksflow/token`
pub fn default_token_path() -> Option<PathBuf> {
    default_config_dir().map(|d| d.join("token"))
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present, otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => {
                    debug!("no config file, using defaults");
                    Self::default()
                }
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config file");
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
    }

    /// Override the API root (from flag or environment)
    #[must_use]
    pub fn with_api_base(mut self, api_base: Option<String>) -> Self {
        if let Some(base) = api_base {
            self.api_base = base;
        }
        self
    }

    /// Check values that the file format cannot express
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_base)
            .map_err(|e| Error::Config(format!("invalid api_base '{}': {e}", self.api_base)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "api_base must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.admin_page_size == 0 || self.faculty_page_size == 0 {
            return Err(Error::Config("page sizes must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Request timeout, if configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.admin_page_size, 20);
        assert!(config.request_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
api_base = "https://erp.example.edu/api"
request_timeout_secs = 15
"#,
        )
        .unwrap();
        assert_eq!(config.api_base, "https://erp.example.edu/api");
        assert_eq!(config.faculty_page_size, DEFAULT_FACULTY_PAGE_SIZE);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "admin_page_size = 5\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.admin_page_size, 5);
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::load(Some(&dir.path().join("nope.toml"))),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = Config::default().with_api_base(Some("ftp://example.com".to_string()));
        assert!(config.validate().is_err());

        let config = Config {
            admin_page_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}

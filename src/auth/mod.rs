//! Bearer token resolution
//!
//! Supports an environment variable and a token file in the config directory.
//! Obtaining the token (login) happens outside this crate.

use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable holding the bearer token
pub const TOKEN_ENV_VAR: &str = "MARKSFLOW_TOKEN";

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from environment variable
    EnvVar,
    /// Token from the token file
    TokenFile,
}

/// Resolved authentication
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Bearer token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

/// Get authentication
///
/// Priority:
/// 1. `MARKSFLOW_TOKEN` environment variable
/// 2. token file (`token_file`, or `<config dir>/marksflow/token`)
pub async fn get_auth(token_file: Option<&Path>) -> Result<AuthConfig> {
    let path = token_file
        .map(Path::to_path_buf)
        .or_else(crate::config::default_token_path);
    resolve_token(env::var(TOKEN_ENV_VAR).ok(), path.as_deref()).await
}

/// Resolve a token from an explicit env value and token file path
pub async fn resolve_token(env_token: Option<String>, token_file: Option<&Path>) -> Result<AuthConfig> {
    debug!("checking {TOKEN_ENV_VAR} env var");
    if let Some(token) = env_token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
        debug!("obtained token from {TOKEN_ENV_VAR} env var");
        return Ok(AuthConfig {
            token,
            source: AuthSource::EnvVar,
        });
    }

    if let Some(path) = token_file {
        debug!(path = %path.display(), "checking token file");
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                let token = contents.trim().to_string();
                if !token.is_empty() {
                    debug!("obtained token from token file");
                    return Ok(AuthConfig {
                        token,
                        source: AuthSource::TokenFile,
                    });
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::Io(e)),
        }
    }

    debug!("no token found");
    Err(Error::Auth(format!(
        "No token found. Log in through the web portal, then set {TOKEN_ENV_VAR} or write the token to {}",
        token_file.map_or_else(|| PathBuf::from("<config dir>/marksflow/token"), Path::to_path_buf).display()
    )))
}

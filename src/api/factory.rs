//! Repository factory
//!
//! Creates the marks repository from configuration.

use crate::api::{HttpMarksRepository, MarksRepository};
use crate::auth::get_auth;
use crate::config::Config;
use crate::error::Result;

/// Create a marks repository from configuration
///
/// Resolves the bearer token and builds the HTTP client.
pub async fn create_repository(config: &Config) -> Result<Box<dyn MarksRepository>> {
    config.validate()?;
    let auth = get_auth(config.token_file.as_deref()).await?;
    Ok(Box::new(HttpMarksRepository::new(
        auth.token,
        &config.api_base,
        config.request_timeout(),
    )?))
}

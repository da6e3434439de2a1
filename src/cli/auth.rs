//! Auth command - inspect token setup

use crate::cli::style::{Stylize, check};
use anstream::println;
use marksflow::auth::{AuthSource, TOKEN_ENV_VAR, get_auth};
use marksflow::config::{Config, default_token_path};
use marksflow::error::Result;

/// Run the auth status command (no network)
pub async fn run_auth_status(config: &Config) -> Result<()> {
    let auth = get_auth(config.token_file.as_deref()).await?;
    let source = match auth.source {
        AuthSource::EnvVar => TOKEN_ENV_VAR.to_string(),
        AuthSource::TokenFile => config
            .token_file
            .clone()
            .or_else(default_token_path)
            .map_or_else(|| "token file".to_string(), |p| p.display().to_string()),
    };
    println!("{} Token found", check());
    println!("  {} {}", "Token source:".muted(), source.accent());
    println!("  {} {}", "API base:".muted(), config.api_base.accent());
    Ok(())
}

/// Run the auth setup command (show instructions)
pub fn run_auth_setup(config: &Config) {
    let token_path = config
        .token_file
        .clone()
        .or_else(default_token_path)
        .map_or_else(|| "<config dir>/marksflow/token".to_string(), |p| p.display().to_string());

    println!("{}", "marksflow Authentication Setup".emphasis());
    println!();
    println!("Log in through the ERP web portal and copy your bearer token.");
    println!();
    println!("{}", "Option 1: Environment variable".emphasis());
    println!("  export {}=<your-token>", TOKEN_ENV_VAR.accent());
    println!();
    println!("{}", "Option 2: Token file".emphasis());
    println!("  Write the token to {}", token_path.accent());
    println!();
    println!("{}", "Tokens expire; when the backend answers 401, repeat the steps above.".muted());
}

/// Wrapper for auth commands
pub async fn run_auth(config: &Config, action: &str) -> Result<()> {
    match action {
        "status" => run_auth_status(config).await,
        "setup" => {
            run_auth_setup(config);
            Ok(())
        }
        _ => {
            println!(
                "{}",
                format!("Unknown action: {action}. Use 'status' or 'setup'.").muted()
            );
            Ok(())
        }
    }
}

//! Interactive credential setup for the Plex server

use anyhow::{Result, bail};
use dialoguer::{Confirm, Input, Password};
use tracing::debug;
use url::Url;

use super::output;
use crate::config::{ConfigManager, Credentials};
use crate::plex::PlexClient;
use crate::utils::mask_token;

const DEFAULT_SERVER_URL: &str = "http://localhost:32400";
const MIN_TOKEN_LEN: usize = 10;

pub fn validate_token(token: &str) -> Result<(), &'static str> {
    let token = token.trim();
    if token.is_empty() {
        return Err("Token is required");
    }
    if token.chars().count() < MIN_TOKEN_LEN {
        return Err("Token seems too short");
    }
    Ok(())
}

pub fn validate_server_url(server_url: &str) -> Result<(), &'static str> {
    let server_url = server_url.trim();
    if server_url.is_empty() {
        return Err("Server url is required");
    }
    match Url::parse(server_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err("Server url must be an http(s) URL"),
    }
}

/// Prompt for anything not supplied, save, then check the server answers
///
/// Values passed in (flags or `PLEX_URL`/`PLEX_TOKEN`) are validated instead
/// of prompted for.
pub async fn run_configure(
    config: &ConfigManager,
    url: Option<String>,
    token: Option<String>,
) -> Result<Credentials> {
    output::info("Configuring hactar...");

    let token = match token {
        Some(token) => token,
        None => Password::new()
            .with_prompt("Enter your Plex token")
            .validate_with(|input: &String| validate_token(input))
            .interact()?,
    };

    let server_url = match url {
        Some(url) => url,
        None => Input::<String>::new()
            .with_prompt("Enter your Plex server url")
            .default(DEFAULT_SERVER_URL.to_string())
            .validate_with(|input: &String| validate_server_url(input))
            .interact_text()?,
    };

    if let Err(e) = validate_token(&token) {
        bail!(e);
    }
    if let Err(e) = validate_server_url(&server_url) {
        bail!(e);
    }

    let saved = config.update_credentials(&server_url, &token)?;
    debug!("Wrote credentials to {:?}", config.config_path());
    let credentials = Credentials {
        server_url: saved.user.server_url,
        token: saved.user.token,
    };

    output::success("Configuration completed successfully!");
    output::info(format!("Token: {}", mask_token(&credentials.token)));
    output::info(format!("Server: {}", credentials.server_url));

    output::info("Testing Plex API connection...");
    let client = PlexClient::new(&credentials.server_url, &credentials.token)?;
    if client.test_connection().await {
        output::success("Plex API connection successful!");
        output::info("You can now use \"hactar scan\" to scan your library!");
    } else {
        output::warning("Plex API connection failed. Please check your token and server url.");
    }

    Ok(credentials)
}

/// Ask before running the configure flow; `None` when the user declines
pub async fn offer_configuration(config: &ConfigManager) -> Result<Option<Credentials>> {
    let configure = Confirm::new()
        .with_prompt("hactar has not yet been configured. Would you like to configure it now?")
        .default(true)
        .interact()?;

    if configure {
        output::info("Starting configuration...");
        run_configure(config, None, None).await.map(Some)
    } else {
        output::info("Configuration skipped. Run 'hactar configure' when ready.");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_validation() {
        assert_eq!(validate_token(""), Err("Token is required"));
        assert_eq!(validate_token("   "), Err("Token is required"));
        assert_eq!(validate_token("short"), Err("Token seems too short"));
        assert_eq!(validate_token("abcdefghij"), Ok(()));
    }

    #[test]
    fn test_server_url_validation() {
        assert_eq!(validate_server_url(""), Err("Server url is required"));
        assert!(validate_server_url("localhost:32400").is_err());
        assert!(validate_server_url("ftp://plex.local").is_err());
        assert_eq!(validate_server_url("http://localhost:32400"), Ok(()));
        assert_eq!(validate_server_url(" https://plex.example.com "), Ok(()));
    }

    #[tokio::test]
    async fn test_configure_with_flags_saves() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigManager::with_root(dir.path());

        // Port 9 is discard; the connection check fails and only warns
        let credentials = run_configure(
            &config,
            Some("http://127.0.0.1:9".into()),
            Some("abcdefghijkl".into()),
        )
        .await
        .unwrap();

        assert_eq!(credentials.token, "abcdefghijkl");
        assert_eq!(config.credentials().unwrap(), Some(credentials));
    }

    #[tokio::test]
    async fn test_configure_rejects_bad_flags() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigManager::with_root(dir.path());

        let err = run_configure(&config, Some("http://127.0.0.1:9".into()), Some("short".into()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Token seems too short");
        assert!(!config.is_configured().unwrap());
    }
}

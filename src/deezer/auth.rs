use chrono::{DateTime, Duration, Local};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};

const DEEZER_CONNECT_URL: &str = "https://connect.deezer.com/oauth";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeezerToken {
    pub value: String,
    /// `None` for tokens issued with the `offline_access` permission.
    pub expire_time: Option<DateTime<Local>>,
}

impl DeezerToken {
    pub fn is_expired(&self) -> bool {
        self.expire_time.is_some_and(|t| t < Local::now())
    }

    pub fn load(path: &Path) -> Option<Self> {
        let raw = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!("Ignoring unreadable token file {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn dump(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Authorization-code flow against Deezer Connect, with the token kept on disk.
pub struct DeezerAuthenticator {
    http_client: Client,
    app_id: String,
    secret_key: String,
    redirect_uri: String,
    permissions: String,
    token_path: PathBuf,
    token: Option<DeezerToken>,
}

impl DeezerAuthenticator {
    pub fn new(config: &Config) -> Self {
        Self {
            http_client: Client::new(),
            app_id: config.deezer_app_id.clone(),
            secret_key: config.deezer_secret_key.clone(),
            redirect_uri: config.deezer_redirect_uri.clone(),
            permissions: config.deezer_permissions.clone(),
            token_path: config.deezer_token_path(),
            token: None,
        }
    }

    /// A valid access token: from memory, then the token file, then a fresh login.
    pub async fn token(&mut self) -> Result<String> {
        if let Some(token) = self.token.as_ref().filter(|t| !t.is_expired()) {
            return Ok(token.value.clone());
        }

        debug!("No valid Deezer token in memory");
        if let Some(token) = DeezerToken::load(&self.token_path).filter(|t| !t.is_expired()) {
            debug!("Using Deezer token from {}", self.token_path.display());
            let value = token.value.clone();
            self.token = Some(token);
            return Ok(value);
        }

        debug!("No valid Deezer token on disk, requesting a new one");
        let code = self.request_code()?;
        let token = self.exchange_code(&code).await?;
        token.dump(&self.token_path)?;

        let value = token.value.clone();
        self.token = Some(token);
        Ok(value)
    }

    #[cfg(test)]
    pub(crate) fn set_token(&mut self, value: &str) {
        self.token = Some(DeezerToken {
            value: value.to_string(),
            expire_time: None,
        });
    }

    pub fn code_url(&self) -> String {
        format!(
            "{}/auth.php?app_id={}&redirect_uri={}&perms={}",
            DEEZER_CONNECT_URL,
            urlencoding::encode(&self.app_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&self.permissions)
        )
    }

    fn request_code(&self) -> Result<String> {
        println!("\nOpen this URL in your browser to authorize Deezer:");
        println!("{}\n", self.code_url());

        print!("Enter the URL you were redirected to: ");
        io::stdout().flush()?;

        let mut redirect_url = String::new();
        io::stdin().read_line(&mut redirect_url)?;

        parse_code(redirect_url.trim())
    }

    async fn exchange_code(&self, code: &str) -> Result<DeezerToken> {
        let response = self
            .http_client
            .post(format!("{}/access_token.php", DEEZER_CONNECT_URL))
            .form(&[
                ("app_id", self.app_id.as_str()),
                ("secret", self.secret_key.as_str()),
                ("code", code),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!("Token request failed: {}", error_text)));
        }

        let body = response.text().await?;
        let (value, expires_in) = parse_token_response(&body).inspect_err(|_| {
            warn!("Unknown Deezer token response: {}", body);
        })?;

        let expire_time = (expires_in > 0).then(|| Local::now() + Duration::seconds(expires_in));
        match expire_time {
            Some(t) => info!("Got Deezer token, expires at {} after {} sec", t, expires_in),
            None => info!("Got Deezer token without expiry"),
        }

        Ok(DeezerToken { value, expire_time })
    }
}

/// Pull `code` out of the redirect URL Deezer sent the browser to.
pub fn parse_code(redirect_url: &str) -> Result<String> {
    let url = Url::parse(redirect_url)
        .map_err(|e| AppError::Auth(format!("Invalid redirect URL: {}", e)))?;

    if let Some((_, reason)) = url.query_pairs().find(|(k, _)| k == "error_reason") {
        return Err(AppError::Auth(format!("Deezer refused access: {}", reason)));
    }

    url.query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.into_owned())
        .ok_or_else(|| AppError::Auth("Failed to parse authorization code".into()))
}

/// Parse the `access_token=...&expires=...` body of the token endpoint.
pub fn parse_token_response(body: &str) -> Result<(String, i64)> {
    let mut value = None;
    let mut expires = None;

    for (key, v) in url::form_urlencoded::parse(body.trim().as_bytes()) {
        match &*key {
            "access_token" => value = Some(v.into_owned()),
            "expires" => expires = v.parse::<i64>().ok(),
            _ => {}
        }
    }

    match (value, expires) {
        (Some(value), Some(expires)) if !value.is_empty() => Ok((value, expires)),
        _ => Err(AppError::Auth(format!("Unexpected token response: {}", body))),
    }
}

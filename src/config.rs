use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::matcher::DEFAULT_THRESHOLD;
use crate::track::DEFAULT_DISPLAY_WIDTH;

#[derive(Debug, Clone)]
pub struct Config {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_redirect_uri: String,
    pub deezer_app_id: String,
    pub deezer_secret_key: String,
    pub deezer_redirect_uri: String,
    pub deezer_permissions: String,
    pub cache_dir: PathBuf,
    pub match_threshold: usize,
    pub display_width: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let match_threshold = parse_usize("MATCH_THRESHOLD", DEFAULT_THRESHOLD)?;
        let display_width = parse_usize("DISPLAY_WIDTH", DEFAULT_DISPLAY_WIDTH)?;

        Ok(Self {
            spotify_client_id: env_or("SPOTIFY_CLIENT_ID", ""),
            spotify_client_secret: env_or("SPOTIFY_CLIENT_SECRET", ""),
            spotify_redirect_uri: env_or("SPOTIFY_REDIRECT_URI", "http://localhost:8000"),
            deezer_app_id: env_or("DEEZER_APP_ID", ""),
            deezer_secret_key: env_or("DEEZER_SECRET_KEY", ""),
            deezer_redirect_uri: env_or("DEEZER_REDIRECT_URI", "http://localhost:8912"),
            deezer_permissions: env_or("DEEZER_PERMISSIONS", "basic_access,email,manage_library"),
            cache_dir: PathBuf::from(env_or("PLAYLIST_ORGANIZER_CACHE_DIR", ".playlist-organizer")),
            match_threshold,
            display_width,
        })
    }

    pub fn get_missing_config(&self) -> Vec<String> {
        let mut missing = Vec::new();

        if self.spotify_client_id.is_empty() {
            missing.push("SPOTIFY_CLIENT_ID".to_string());
        }
        if self.spotify_client_secret.is_empty() {
            missing.push("SPOTIFY_CLIENT_SECRET".to_string());
        }
        if self.deezer_app_id.is_empty() {
            missing.push("DEEZER_APP_ID".to_string());
        }
        if self.deezer_secret_key.is_empty() {
            missing.push("DEEZER_SECRET_KEY".to_string());
        }

        missing
    }

    pub fn validate_spotify_config(&self) -> bool {
        !self.spotify_client_id.is_empty() && !self.spotify_client_secret.is_empty()
    }

    pub fn validate_deezer_config(&self) -> bool {
        !self.deezer_app_id.is_empty() && !self.deezer_secret_key.is_empty()
    }

    pub fn spotify_token_path(&self) -> PathBuf {
        self.cache_dir.join("spotify-token.json")
    }

    pub fn deezer_token_path(&self) -> PathBuf {
        self.cache_dir.join("deezer-token.json")
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_usize(key: &str, default: usize) -> Result<usize> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a non-negative integer, got {:?}", key, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn mock() -> Self {
        Self {
            spotify_client_id: "spotify_id".to_string(),
            spotify_client_secret: "spotify_secret".to_string(),
            spotify_redirect_uri: "http://localhost:8000".to_string(),
            deezer_app_id: "deezer_id".to_string(),
            deezer_secret_key: "deezer_secret".to_string(),
            deezer_redirect_uri: "http://localhost:8912".to_string(),
            deezer_permissions: "basic_access".to_string(),
            cache_dir: PathBuf::from(".playlist-organizer"),
            match_threshold: DEFAULT_THRESHOLD,
            display_width: DEFAULT_DISPLAY_WIDTH,
        }
    }
}

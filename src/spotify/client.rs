use rspotify::{
    model::SimplifiedPlaylist, prelude::*, scopes, AuthCodeSpotify, Config as RspotifyConfig,
    Credentials, OAuth,
};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::matcher::unique;
use crate::source::{find_playlist, PlaylistSource};
use crate::track::{Platform, Track};

const PAGE_LIMIT: u32 = 50;

pub struct SpotifyClient {
    client: AuthCodeSpotify,
    cache_dir: PathBuf,
    authenticated: bool,
    playlists: Option<Vec<SimplifiedPlaylist>>,
    tracks: HashMap<String, Vec<Track>>,
}

impl SpotifyClient {
    pub fn new(config: &Config) -> Result<Self> {
        if !config.validate_spotify_config() {
            return Err(AppError::Config(
                "SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET must be set".into(),
            ));
        }

        let creds = Credentials::new(&config.spotify_client_id, &config.spotify_client_secret);

        let oauth = OAuth {
            redirect_uri: config.spotify_redirect_uri.clone(),
            scopes: scopes!(
                "user-read-private",
                "user-read-email",
                "playlist-read-private",
                "playlist-read-collaborative"
            ),
            ..Default::default()
        };

        let rspotify_config = RspotifyConfig {
            token_cached: true,
            token_refreshing: true,
            cache_path: config.spotify_token_path(),
            ..Default::default()
        };

        Ok(Self {
            client: AuthCodeSpotify::with_config(creds, oauth, rspotify_config),
            cache_dir: config.cache_dir.clone(),
            authenticated: false,
            playlists: None,
            tracks: HashMap::new(),
        })
    }

    async fn authorize_interactively(&self) -> Result<()> {
        let auth_url = self.client.get_authorize_url(false)?;
        println!("\nOpen this URL in your browser to authorize Spotify:");
        println!("{}\n", auth_url);

        print!("Enter the URL you were redirected to: ");
        io::stdout().flush()?;

        let mut redirect_url = String::new();
        io::stdin().read_line(&mut redirect_url)?;

        let code = self
            .client
            .parse_response_code(redirect_url.trim())
            .ok_or_else(|| AppError::Auth("Failed to parse authorization code".into()))?;

        self.client.request_token(&code).await?;
        Ok(())
    }

    pub async fn get_playlist_list(&mut self) -> Result<&[SimplifiedPlaylist]> {
        if self.playlists.is_none() {
            self.authenticate().await?;

            let mut playlists = Vec::new();
            let mut offset = 0;

            loop {
                let page = self
                    .client
                    .current_user_playlists_manual(Some(PAGE_LIMIT), Some(offset))
                    .await?;

                playlists.extend(page.items);

                if page.next.is_none() {
                    break;
                }
                offset += PAGE_LIMIT;
            }

            info!("Found {} Spotify playlists", playlists.len());
            self.playlists = Some(playlists);
        }

        Ok(self.playlists.as_deref().unwrap_or_default())
    }
}

impl PlaylistSource for SpotifyClient {
    fn platform(&self) -> Platform {
        Platform::Spotify
    }

    /// Reuse the cached token when there is one, otherwise run the browser flow.
    /// Expired cached tokens are refreshed by rspotify on the next request.
    async fn authenticate(&mut self) -> Result<()> {
        if self.authenticated {
            return Ok(());
        }

        match self.client.read_token_cache(true).await {
            Ok(Some(token)) => {
                debug!("Using cached Spotify token");
                *self
                    .client
                    .token
                    .lock()
                    .await
                    .map_err(|_| AppError::Auth("Spotify token lock poisoned".into()))? =
                    Some(token);
            }
            _ => {
                fs::create_dir_all(&self.cache_dir)?;
                self.authorize_interactively().await?
            }
        }

        let user = self.client.current_user().await?;
        let display_name = user.display_name.unwrap_or_else(|| user.id.to_string());
        info!("Successfully authenticated as Spotify user: {}", display_name);

        self.authenticated = true;
        Ok(())
    }

    async fn user_info(&mut self) -> Result<String> {
        self.authenticate().await?;
        let user = self.client.current_user().await?;

        Ok(format!(
            "{} (id: {}, country: {}, email: {})",
            user.display_name.as_deref().unwrap_or("-"),
            user.id,
            user.country
                .map(|c| format!("{:?}", c))
                .unwrap_or_else(|| "-".to_string()),
            user.email.as_deref().unwrap_or("-")
        ))
    }

    async fn get_playlist_names(&mut self) -> Result<Vec<String>> {
        Ok(self
            .get_playlist_list()
            .await?
            .iter()
            .map(|p| p.name.clone())
            .collect())
    }

    async fn get_playlist_tracks(&mut self, name: &str) -> Result<Vec<Track>> {
        let playlist_id = find_playlist(self.get_playlist_list().await?, name, |p| {
            p.name.as_str()
        })?
        .id
        .clone();

        let key = playlist_id.id().to_string();
        if let Some(tracks) = self.tracks.get(&key) {
            return Ok(tracks.clone());
        }

        let mut converted = Vec::new();
        let mut offset = 0;

        loop {
            let page = self
                .client
                .playlist_items_manual(
                    playlist_id.clone(),
                    None,
                    None,
                    Some(PAGE_LIMIT),
                    Some(offset),
                )
                .await?;

            for item in &page.items {
                match Track::from_spotify(item) {
                    Some(track) => converted.push(track),
                    None => debug!("Skipping playlist item without a catalogue id"),
                }
            }

            if page.next.is_none() {
                break;
            }
            offset += PAGE_LIMIT;
        }

        let tracks = unique(&converted);
        info!("Fetched {} tracks from Spotify playlist {}", tracks.len(), name);

        self.tracks.insert(key, tracks.clone());
        Ok(tracks)
    }
}

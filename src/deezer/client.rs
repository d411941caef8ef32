use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::Config;
use crate::deezer::auth::DeezerAuthenticator;
use crate::deezer::models::{DeezerErrorBody, DeezerPlaylist, DeezerTrack, Page};
use crate::error::{AppError, Result};
use crate::matcher::unique;
use crate::source::{find_playlist, PlaylistSource};
use crate::track::{Platform, Track};

const DEEZER_API_BASE: &str = "https://api.deezer.com";
const PLAYLISTS_PAGE_LIMIT: u32 = 50;
const TRACKS_PAGE_LIMIT: u32 = 200;

pub struct DeezerClient {
    http_client: Client,
    pub(crate) api_base: String,
    auth: DeezerAuthenticator,
    playlists: Option<Vec<DeezerPlaylist>>,
    tracks: HashMap<u64, Vec<Track>>,
}

impl DeezerClient {
    pub fn new(config: &Config) -> Result<Self> {
        if !config.validate_deezer_config() {
            return Err(AppError::Config(
                "DEEZER_APP_ID and DEEZER_SECRET_KEY must be set".into(),
            ));
        }

        Ok(Self {
            http_client: Client::new(),
            api_base: DEEZER_API_BASE.to_string(),
            auth: DeezerAuthenticator::new(config),
            playlists: None,
            tracks: HashMap::new(),
        })
    }

    pub async fn user_json(&mut self) -> Result<serde_json::Value> {
        let token = self.auth.token().await?;
        self.get_json(&format!("{}/user/me", self.api_base), &token, None)
            .await
    }

    pub async fn get_playlist_list(&mut self) -> Result<&[DeezerPlaylist]> {
        if self.playlists.is_none() {
            let token = self.auth.token().await?;
            let playlists: Vec<DeezerPlaylist> = self
                .fetch_paginated(
                    format!("{}/user/me/playlists", self.api_base),
                    PLAYLISTS_PAGE_LIMIT,
                    &token,
                )
                .await?;
            info!("Found {} Deezer playlists", playlists.len());
            self.playlists = Some(playlists);
        }

        Ok(self.playlists.as_deref().unwrap_or_default())
    }

    async fn fetch_paginated<T: DeserializeOwned>(
        &self,
        url: String,
        limit: u32,
        token: &str,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(url);
        let mut first = true;

        while let Some(url) = next {
            let limit = first.then_some(limit);
            let page: Page<T> = self.get_json(&url, token, limit).await?;
            debug!("Fetched {} items from {}", page.data.len(), url);

            items.extend(page.data);
            next = page.next;
            first = false;
        }

        Ok(items)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
        limit: Option<u32>,
    ) -> Result<T> {
        let mut request = self
            .http_client
            .get(url)
            .query(&[("access_token", token)]);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }

        let response = request.send().await?.error_for_status()?;
        let body: serde_json::Value = response.json().await?;
        parse_response(body)
    }
}

/// Deezer answers errors with HTTP 200 and an `error` object.
fn parse_response<T: DeserializeOwned>(body: serde_json::Value) -> Result<T> {
    if body.get("error").is_some() {
        let err: DeezerErrorBody = serde_json::from_value(body)?;
        return Err(AppError::DeezerApi(format!(
            "{} ({}): {}",
            err.error.kind, err.error.code, err.error.message
        )));
    }

    Ok(serde_json::from_value(body)?)
}

impl PlaylistSource for DeezerClient {
    fn platform(&self) -> Platform {
        Platform::Deezer
    }

    async fn authenticate(&mut self) -> Result<()> {
        self.auth.token().await?;
        info!("Successfully authenticated with Deezer");
        Ok(())
    }

    async fn user_info(&mut self) -> Result<String> {
        let user = self.user_json().await?;
        Ok(serde_json::to_string_pretty(&user)?)
    }

    async fn get_playlist_names(&mut self) -> Result<Vec<String>> {
        Ok(self
            .get_playlist_list()
            .await?
            .iter()
            .map(|p| p.title.clone())
            .collect())
    }

    async fn get_playlist_tracks(&mut self, name: &str) -> Result<Vec<Track>> {
        let playlist_id = find_playlist(self.get_playlist_list().await?, name, |p| {
            p.title.as_str()
        })?
        .id;

        if let Some(tracks) = self.tracks.get(&playlist_id) {
            return Ok(tracks.clone());
        }

        let token = self.auth.token().await?;
        let raw: Vec<DeezerTrack> = self
            .fetch_paginated(
                format!("{}/playlist/{}/tracks", self.api_base, playlist_id),
                TRACKS_PAGE_LIMIT,
                &token,
            )
            .await?;

        let converted: Vec<Track> = raw.iter().map(Track::from_deezer).collect();
        let tracks = unique(&converted);
        info!("Fetched {} tracks from Deezer playlist {}", tracks.len(), name);

        self.tracks.insert(playlist_id, tracks.clone());
        Ok(tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn track_json(id: u64, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "time_add": 1599377243,
            "album": {"id": 302127, "title": "Machine Head"},
            "artist": {"id": 27, "name": "Deep Purple"}
        })
    }

    fn client_for(server: &Server) -> DeezerClient {
        let mut client = DeezerClient::new(&Config::mock()).unwrap();
        client.api_base = server.url();
        client.auth.set_token("frXyz");
        client
    }

    #[test]
    fn test_parse_tracks_page() {
        let body = json!({
            "data": [
                {
                    "id": 3135556,
                    "title": "Highway Star (Remastered 2012)",
                    "time_add": 1599377243,
                    "album": {"id": 302127, "title": "Machine Head"},
                    "artist": {"id": 27, "name": "Deep Purple"}
                }
            ],
            "total": 2,
            "next": "https://api.deezer.com/playlist/908622995/tracks?index=1"
        });

        let page: Page<DeezerTrack> = parse_response(body).unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].artist.name, "Deep Purple");
        assert!(page.next.is_some());
    }

    #[test]
    fn test_last_page_has_no_next() {
        let body = json!({"data": [{"id": 1, "title": "Rock"}], "total": 1});
        let page: Page<DeezerPlaylist> = parse_response(body).unwrap();
        assert!(page.next.is_none());
    }

    #[test]
    fn test_error_body_becomes_api_error() {
        let body = json!({
            "error": {"type": "OAuthException", "message": "Invalid OAuth access token.", "code": 300}
        });

        let err = parse_response::<Page<DeezerPlaylist>>(body).unwrap_err();

        match err {
            AppError::DeezerApi(msg) => {
                assert!(msg.contains("OAuthException"));
                assert!(msg.contains("300"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_client_requires_credentials() {
        let mut config = Config::mock();
        config.deezer_app_id.clear();
        assert!(matches!(DeezerClient::new(&config), Err(AppError::Config(_))));
        assert!(DeezerClient::new(&Config::mock()).is_ok());
    }

    #[tokio::test]
    async fn test_playlist_tracks_follow_next_and_are_cached() {
        let mut server = Server::new_async().await;
        let base = server.url();

        let playlists = server
            .mock("GET", "/user/me/playlists")
            .match_query(Matcher::UrlEncoded("access_token".into(), "frXyz".into()))
            .with_body(json!({"data": [{"id": 7, "title": "Purple"}], "total": 1}).to_string())
            .expect(1)
            .create_async()
            .await;
        let first_page = server
            .mock("GET", "/playlist/7/tracks")
            .match_query(Matcher::UrlEncoded("limit".into(), "200".into()))
            .with_body(
                json!({
                    "data": [track_json(1, "Highway Star"), track_json(2, "Lazy")],
                    "total": 3,
                    "next": format!("{}/playlist/7/tracks?index=2", base)
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;
        let second_page = server
            .mock("GET", "/playlist/7/tracks")
            .match_query(Matcher::UrlEncoded("index".into(), "2".into()))
            .with_body(
                json!({
                    "data": [track_json(2, "Lazy"), track_json(3, "Burn")],
                    "total": 3
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let mut client = client_for(&server);

        let tracks = client.get_playlist_tracks("Purple").await.unwrap();
        let ids: Vec<&str> = tracks.iter().map(|t| t.external_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        let again = client.get_playlist_tracks("Purple").await.unwrap();
        assert_eq!(again, tracks);
        assert_eq!(client.get_playlist_names().await.unwrap(), vec!["Purple"]);

        playlists.assert_async().await;
        first_page.assert_async().await;
        second_page.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_playlist_is_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/user/me/playlists")
            .match_query(Matcher::Any)
            .with_body(json!({"data": [{"id": 7, "title": "Purple"}]}).to_string())
            .create_async()
            .await;

        let mut client = client_for(&server);
        let err = client.get_playlist_tracks("Rock").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}

use serde::{Deserialize, Serialize};

/// One page of a Deezer list endpoint. `next` is absent on the last page.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeezerPlaylist {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeezerAlbum {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeezerArtist {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeezerTrack {
    pub id: u64,
    pub title: String,
    /// Unix seconds when the track was added to the playlist.
    pub time_add: i64,
    pub album: DeezerAlbum,
    pub artist: DeezerArtist,
}

/// Deezer reports failures inside a 200 response.
#[derive(Debug, Clone, Deserialize)]
pub struct DeezerErrorBody {
    pub error: DeezerErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeezerErrorDetail {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: i64,
}

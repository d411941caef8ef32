use chrono::{DateTime, Utc};
use rspotify::model::{PlayableItem, PlaylistItem};
use rspotify::prelude::Id;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::deezer::models::DeezerTrack;

/// Character budget for one cell of the pair table.
pub const DEFAULT_DISPLAY_WIDTH: usize = 93;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    Deezer,
    Spotify,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Deezer => write!(f, "Deezer"),
            Platform::Spotify => write!(f, "Spotify"),
        }
    }
}

/// A platform-agnostic song reference.
///
/// Equality and hashing only look at `source` and `external_id`, so two fetches of
/// the same platform track compare equal even if their metadata drifted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artists: Vec<String>,
    pub album: String,
    pub added_at: DateTime<Utc>,
    pub source: Platform,
    pub external_id: String,
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.external_id == other.external_id
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.external_id.hash(state);
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [added: {}]", self.brief(), self.added_at.format("%Y-%m-%d %H:%M:%S"))
    }
}

impl Track {
    pub fn from_deezer(track: &DeezerTrack) -> Self {
        Self {
            title: track.title.clone(),
            artists: vec![track.artist.name.clone()],
            album: track.album.title.clone(),
            added_at: DateTime::from_timestamp(track.time_add, 0).unwrap_or_default(),
            source: Platform::Deezer,
            external_id: track.id.to_string(),
        }
    }

    /// Local files and podcast episodes have no catalogue id and yield `None`.
    pub fn from_spotify(item: &PlaylistItem) -> Option<Self> {
        let Some(PlayableItem::Track(track)) = &item.track else {
            return None;
        };
        let id = track.id.as_ref()?;

        Some(Self {
            title: track.name.clone(),
            artists: track.artists.iter().map(|a| a.name.clone()).collect(),
            album: track.album.name.clone(),
            added_at: item.added_at.unwrap_or_default(),
            source: Platform::Spotify,
            external_id: id.uri(),
        })
    }

    /// `"artist1; artist2 - title (album)"`
    pub fn brief(&self) -> String {
        format!("{} - {} ({})", self.artists.join("; "), self.title, self.album)
    }

    /// Like [`Track::brief`], cut to at most `width` characters with a trailing ellipsis.
    pub fn to_brief_str(&self, width: usize) -> String {
        truncate(&self.brief(), width)
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }

    let keep = width.saturating_sub(ELLIPSIS.len());
    let mut cut: String = text.chars().take(keep).collect();
    cut.push_str(&ELLIPSIS[..width.min(ELLIPSIS.len())]);
    cut
}

#[cfg(test)]
impl Track {
    pub fn mock(title: &str, source: Platform, external_id: &str) -> Self {
        Self {
            title: title.to_string(),
            artists: vec!["Mock Artist".to_string()],
            album: "Mock Album".to_string(),
            added_at: DateTime::from_timestamp(1_599_377_243, 0).unwrap_or_default(),
            source,
            external_id: external_id.to_string(),
        }
    }
}

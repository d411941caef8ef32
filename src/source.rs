use crate::error::{AppError, Result};
use crate::track::{Platform, Track};

/// A platform that can list playlists and hand back their tracks.
///
/// Implementations paginate fully, drop tracks without a catalogue id and
/// deduplicate by track identity before returning.
#[allow(async_fn_in_trait)]
pub trait PlaylistSource {
    fn platform(&self) -> Platform;

    /// Make sure a usable token exists, prompting the user if needed.
    async fn authenticate(&mut self) -> Result<()>;

    /// Human-readable description of the logged-in account.
    async fn user_info(&mut self) -> Result<String>;

    async fn get_playlist_names(&mut self) -> Result<Vec<String>>;

    async fn get_playlist_tracks(&mut self, name: &str) -> Result<Vec<Track>>;
}

/// Exact title lookup, the way playlists are offered to the user.
pub fn find_playlist<'a, P>(
    playlists: &'a [P],
    name: &str,
    title: impl Fn(&P) -> &str,
) -> Result<&'a P> {
    playlists
        .iter()
        .find(|p| title(p) == name)
        .ok_or_else(|| AppError::NotFound(format!("Playlist \"{}\" was not found", name)))
}


#[cfg(test)]
mod tests {
    use super::testing::StaticSource;
    use super::*;

    #[test]
    fn test_find_playlist_is_exact() {
        let playlists = vec!["Rock".to_string(), "rock ballads".to_string()];

        let found = find_playlist(&playlists, "Rock", |p| p.as_str()).unwrap();
        assert_eq!(found, "Rock");

        let err = find_playlist(&playlists, "rock", |p| p.as_str()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_static_source_dedups_tracks() {
        let track = Track::mock("Lazy", Platform::Deezer, "1");
        let mut source = StaticSource::new(
            Platform::Deezer,
            vec![("Rock", vec![track.clone(), track.clone()])],
        );

        assert_eq!(source.get_playlist_names().await.unwrap(), vec!["Rock"]);
        assert_eq!(source.get_playlist_tracks("Rock").await.unwrap(), vec![track]);
        assert!(source.get_playlist_tracks("Jazz").await.is_err());
    }
}

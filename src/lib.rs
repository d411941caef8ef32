pub mod config;
pub mod deezer;
pub mod error;
pub mod matcher;
pub mod menu;
pub mod report;
pub mod session;
pub mod source;
pub mod spotify;
pub mod track;

pub use config::Config;
pub use deezer::DeezerClient;
pub use error::{AppError, Result};
pub use matcher::{normalize, MatchResult, TrackMatcher, TrackPair, DEFAULT_THRESHOLD};
pub use report::MatchSummary;
pub use session::MatchSession;
pub use source::PlaylistSource;
pub use spotify::SpotifyClient;
pub use track::{Platform, Track};

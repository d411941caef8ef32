pub mod auth;
pub mod client;
pub mod models;

pub use auth::{DeezerAuthenticator, DeezerToken};
pub use client::DeezerClient;
pub use models::{DeezerPlaylist, DeezerTrack};

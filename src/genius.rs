//! Genius song-metadata service.
//!
//! The pipeline only needs two calls, a keyword search and a song lookup, so
//! they sit behind [`SongService`]. [`GeniusClient`] is the HTTP
//! implementation; tests substitute in-memory fakes.

mod client;
mod types;

pub use client::GeniusClient;
pub use types::{ProducerCredit, SearchHit, SongDetail};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("credentials rejected (HTTP {0}); check the API token")]
    Unauthorized(u16),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid song reference {0:?}")]
    BadReference(String),
}

impl ServiceError {
    /// Errors that will recur for every remaining track.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

pub trait SongService {
    /// Keyword search. An empty list means nothing matched.
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, ServiceError>;

    /// Full details of the song behind a search hit's `api_path`.
    fn song_detail(&self, api_path: &str) -> Result<SongDetail, ServiceError>;
}

/// The service already ranks its hits; the top one is taken as is.
pub fn first_hit(hits: &[SearchHit]) -> Option<&SearchHit> {
    hits.first()
}

//! One pass over the library: query, search, look up producers, write.

use std::fmt;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::genius::{ServiceError, SongService, first_hit};
use crate::library::TrackDescriptor;
use crate::playlist::{AppendOutcome, PlaylistError, PlaylistRecord, PlaylistWriter};
use crate::producers::{ProducerQuery, playlist_name};
use crate::query::normalize_query;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Playlist(#[from] PlaylistError),
}

/// What happened to a single track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    NoHits,
    NoCredits,
    NoMatch,
    Added { playlist: String },
    Duplicate { playlist: String },
}

/// Per-outcome counts for a whole run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub scanned: usize,
    pub added: usize,
    pub duplicates: usize,
    pub no_hits: usize,
    pub no_credits: usize,
    pub no_match: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &TrackOutcome) {
        match outcome {
            TrackOutcome::NoHits => self.no_hits += 1,
            TrackOutcome::NoCredits => self.no_credits += 1,
            TrackOutcome::NoMatch => self.no_match += 1,
            TrackOutcome::Added { .. } => self.added += 1,
            TrackOutcome::Duplicate { .. } => self.duplicates += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tracks: {} added, {} already listed, {} not found, {} without producer credits, {} by other producers, {} failed",
            self.scanned,
            self.added,
            self.duplicates,
            self.no_hits,
            self.no_credits,
            self.no_match,
            self.failed
        )
    }
}

pub struct Pipeline<'a, S: SongService> {
    service: &'a S,
    producers: &'a ProducerQuery,
    playlists: &'a mut PlaylistWriter,
}

impl<'a, S: SongService> Pipeline<'a, S> {
    pub fn new(
        service: &'a S,
        producers: &'a ProducerQuery,
        playlists: &'a mut PlaylistWriter,
    ) -> Self {
        Self {
            service,
            producers,
            playlists,
        }
    }

    /// Run a single track from query to playlist.
    pub fn process(&mut self, track: &TrackDescriptor) -> Result<TrackOutcome, PipelineError> {
        let query = normalize_query(&track.artist, &track.title);
        info!("Searching for {query}");

        let hits = self.service.search(&query)?;
        let Some(hit) = first_hit(&hits) else {
            info!(%query, "No results found");
            return Ok(TrackOutcome::NoHits);
        };
        debug!(api_path = %hit.api_path, title = ?hit.full_title, "Best hit");

        let song = self.service.song_detail(&hit.api_path)?;
        if song.producer_credits.is_empty() {
            info!(api_path = %hit.api_path, "No producers credited on {}", track.title);
            return Ok(TrackOutcome::NoCredits);
        }

        let Some(producer) = self.producers.find_match(&song.producer_credits) else {
            let credits: Vec<&str> = song
                .producer_credits
                .iter()
                .map(|c| c.name.as_str())
                .collect();
            info!(song = ?song.full_title, ?credits, "Didn't match any requested producer");
            return Ok(TrackOutcome::NoMatch);
        };

        info!("{producer} produced {}", track.title);
        let playlist = playlist_name(producer);
        let outcome = match self.playlists.append(&playlist, &PlaylistRecord::from(track))? {
            AppendOutcome::Added => TrackOutcome::Added { playlist },
            AppendOutcome::Duplicate => TrackOutcome::Duplicate { playlist },
        };
        Ok(outcome)
    }

    /// Process every track in turn.
    ///
    /// A service failure only costs the track it happened on, unless the
    /// service rejected our credentials. Playlist write failures stop the run.
    pub fn run<I>(&mut self, tracks: I) -> Result<RunSummary, PipelineError>
    where
        I: IntoIterator<Item = TrackDescriptor>,
    {
        let mut summary = RunSummary::default();

        for track in tracks {
            summary.scanned += 1;
            match self.process(&track) {
                Ok(outcome) => summary.record(&outcome),
                Err(PipelineError::Service(e)) if !e.is_fatal() => {
                    error!(
                        path = %track.path.display(),
                        "Failed to look up {} - {}: {e}",
                        track.artist,
                        track.title
                    );
                    summary.failed += 1;
                }
                Err(e) => {
                    warn!("Stopping after {} tracks", summary.scanned);
                    return Err(e);
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests;

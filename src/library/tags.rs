use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::ItemKey;
use thiserror::Error;

/// The tag fields the scanner cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagInfo {
    pub album_artist: Option<String>,
    pub artist: Option<String>,
    pub title: Option<String>,
    pub duration: Duration,
}

#[derive(Debug, Error)]
pub enum TagError {
    #[error("could not read {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("{0} carries no tags")]
    NoTags(String),
}

/// Reads tag metadata for a single audio file.
pub trait TagReader {
    fn read(&self, path: &Path) -> Result<TagInfo, TagError>;
}

/// [`TagReader`] backed by `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn read(&self, path: &Path) -> Result<TagInfo, TagError> {
        let tagged_file = Probe::open(path)
            .and_then(|p| p.read())
            .map_err(|e| TagError::Unreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .ok_or_else(|| TagError::NoTags(path.display().to_string()))?;

        let album_artist = tag
            .get(&ItemKey::AlbumArtist)
            .and_then(|item| item.value().text())
            .map(|s| s.to_string());

        Ok(TagInfo {
            album_artist,
            artist: tag.artist().map(|s| s.to_string()),
            title: tag.title().map(|s| s.to_string()),
            duration: tagged_file.properties().duration(),
        })
    }
}

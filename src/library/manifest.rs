use std::path::{Path, PathBuf};

use plist::{Dictionary, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use urlencoding::decode;

use super::model::{TrackDescriptor, ceil_millis, pick_artist};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read iTunes library {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: plist::Error,
    },

    #[error("iTunes library {0} has no Tracks dictionary")]
    NoTracks(String),
}

/// A track entry of an exported iTunes library, kept close to the XML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub track_id: String,
    pub name: Option<String>,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub total_time_ms: Option<u64>,
    pub location: Option<String>,
    pub track_type: Option<String>,
}

/// Parse the `Tracks` dictionary of an iTunes `Library.xml`.
///
/// Entries that are not dictionaries are dropped here; entries that cannot
/// become a track are dropped later by [`LibraryEntry::to_track`].
pub fn parse_library<P: AsRef<Path>>(path: P) -> Result<Vec<LibraryEntry>, ManifestError> {
    let path = path.as_ref();
    let value = Value::from_file(path).map_err(|source| ManifestError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let tracks = value
        .as_dictionary()
        .and_then(|root| root.get("Tracks"))
        .and_then(Value::as_dictionary)
        .ok_or_else(|| ManifestError::NoTracks(path.display().to_string()))?;

    let mut entries = Vec::with_capacity(tracks.len());
    for (key, track_value) in tracks {
        let Some(info) = track_value.as_dictionary() else {
            debug!(track_id = %key, "Skipping library entry that is not a dictionary");
            continue;
        };
        entries.push(entry_from_dict(key, info));
    }

    Ok(entries)
}

fn entry_from_dict(key: &str, info: &Dictionary) -> LibraryEntry {
    let text = |field: &str| {
        info.get(field)
            .and_then(Value::as_string)
            .map(|s| s.to_string())
    };

    LibraryEntry {
        track_id: key.to_string(),
        name: text("Name"),
        artist: text("Artist"),
        album_artist: text("Album Artist"),
        total_time_ms: info.get("Total Time").and_then(Value::as_unsigned_integer),
        location: text("Location"),
        track_type: text("Track Type"),
    }
}

impl LibraryEntry {
    /// Streamed or remote entries have no local file to put in a playlist.
    fn is_remote(&self) -> bool {
        matches!(self.track_type.as_deref(), Some("Remote" | "URL" | "Stream"))
    }

    pub fn to_track(&self) -> Option<TrackDescriptor> {
        if self.is_remote() {
            debug!(track_id = %self.track_id, "Skipping remote library entry");
            return None;
        }

        let Some(path) = self.location.as_deref().and_then(decode_location) else {
            debug!(track_id = %self.track_id, "Skipping library entry without a file location");
            return None;
        };

        let Some(title) = self.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            debug!(track_id = %self.track_id, "Skipping library entry without a name");
            return None;
        };

        let Some(artist) = pick_artist(self.album_artist.as_deref(), self.artist.as_deref()) else {
            warn!(path = %path.display(), "Skipping library entry without an artist");
            return None;
        };

        Some(TrackDescriptor {
            artist,
            title: title.to_string(),
            duration_secs: ceil_millis(self.total_time_ms.unwrap_or(0)),
            path,
        })
    }
}

/// iTunes stores locations as `file://localhost/Users/...` URLs.
fn decode_location(location: &str) -> Option<PathBuf> {
    let stripped = location
        .strip_prefix("file://localhost")
        .or_else(|| location.strip_prefix("file://"))
        .unwrap_or(location);

    match decode(stripped) {
        Ok(decoded) if !decoded.is_empty() => Some(PathBuf::from(decoded.into_owned())),
        Ok(_) => None,
        Err(e) => {
            warn!("Undecodable library location {location}: {e}");
            None
        }
    }
}

//! Extended M3U playlist files.
//!
//! A playlist is `#EXTM3U` followed by one two-line record per track:
//!
//! ```text
//! #EXTINF:250,Jay-Z - Izzo (H.O.V.A.)
//! /music/Jay-Z/Izzo.mp3
//! ```
//!
//! Files are append-only and may already hold records from earlier runs. A
//! record is a duplicate when its `#EXTINF` line is already present, whatever
//! path follows it.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::library::TrackDescriptor;

pub const FORMAT_DESCRIPTOR: &str = "#EXTM3U";
pub const RECORD_MARKER: &str = "#EXTINF";
pub const EXTENSION: &str = "m3u";

#[derive(Debug, Error)]
#[error("playlist {path}: {source}")]
pub struct PlaylistError {
    path: String,
    #[source]
    source: io::Error,
}

impl PlaylistError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.display().to_string(),
            source,
        }
    }
}

/// One track entry of a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRecord {
    pub duration_secs: u64,
    pub artist: String,
    pub title: String,
    pub path: PathBuf,
}

impl From<&TrackDescriptor> for PlaylistRecord {
    fn from(track: &TrackDescriptor) -> Self {
        Self {
            duration_secs: track.duration_secs,
            artist: track.artist.clone(),
            title: track.title.clone(),
            path: track.path.clone(),
        }
    }
}

impl PlaylistRecord {
    /// `#EXTINF:{seconds},{artist} - {title}`; also the duplicate key.
    pub fn metadata_line(&self) -> String {
        format!(
            "{RECORD_MARKER}:{},{} - {}",
            self.duration_secs,
            single_line(&self.artist),
            single_line(&self.title)
        )
    }

    fn path_line(&self) -> String {
        single_line(&self.path.display().to_string())
    }
}

/// A stray newline in a tag would split the record in two.
fn single_line(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Added,
    Duplicate,
}

/// An opened playlist: its location and the metadata lines already in it.
#[derive(Debug)]
struct Playlist {
    path: PathBuf,
    records: HashSet<String>,
    /// The last line on disk has no terminator yet.
    unterminated: bool,
}

impl Playlist {
    /// Load an existing playlist, or create it with the format header.
    fn open(path: PathBuf) -> Result<Self, PlaylistError> {
        let is_empty = match fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => return Err(PlaylistError::new(&path, e)),
        };

        if is_empty {
            debug!(path = %path.display(), "Creating playlist");
            let mut file = File::create(&path).map_err(|e| PlaylistError::new(&path, e))?;
            writeln!(file, "{FORMAT_DESCRIPTOR}").map_err(|e| PlaylistError::new(&path, e))?;
            return Ok(Self {
                path,
                records: HashSet::new(),
                unterminated: false,
            });
        }

        let text = fs::read_to_string(&path).map_err(|e| PlaylistError::new(&path, e))?;
        let records: HashSet<String> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| line.starts_with(RECORD_MARKER))
            .map(str::to_string)
            .collect();
        debug!(path = %path.display(), records = records.len(), "Loaded playlist");

        Ok(Self {
            path,
            records,
            unterminated: !text.ends_with('\n'),
        })
    }

    fn append(&mut self, record: &PlaylistRecord) -> Result<AppendOutcome, PlaylistError> {
        let metadata = record.metadata_line();
        if self.records.contains(&metadata) {
            return Ok(AppendOutcome::Duplicate);
        }

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| PlaylistError::new(&self.path, e))?;
        let separator = if self.unterminated { "\n" } else { "" };
        file.write_all(format!("{separator}{metadata}\n{}\n", record.path_line()).as_bytes())
            .map_err(|e| PlaylistError::new(&self.path, e))?;

        self.unterminated = false;
        self.records.insert(metadata);
        Ok(AppendOutcome::Added)
    }
}

/// Appends records to `Produced by ....m3u` files in one directory.
///
/// Each playlist is read once, the first time it is written to during a run.
/// Nothing here locks the files; one writer per directory at a time.
#[derive(Debug)]
pub struct PlaylistWriter {
    dir: PathBuf,
    open: HashMap<String, Playlist>,
}

impl PlaylistWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            open: HashMap::new(),
        }
    }

    /// File backing the playlist called `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let file_name = name.replace(['/', '\\'], "-");
        self.dir.join(format!("{file_name}.{EXTENSION}"))
    }

    pub fn append(
        &mut self,
        name: &str,
        record: &PlaylistRecord,
    ) -> Result<AppendOutcome, PlaylistError> {
        let path = self.path_for(name);
        let playlist = match self.open.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(Playlist::open(path)?),
        };

        let outcome = playlist.append(record)?;
        match outcome {
            AppendOutcome::Added => info!(
                playlist = %name,
                "Added {} - {} to playlist",
                record.artist,
                record.title
            ),
            AppendOutcome::Duplicate => info!(
                playlist = %name,
                "Skipped {} - {}, already in playlist",
                record.artist,
                record.title
            ),
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests;

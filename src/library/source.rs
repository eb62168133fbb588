use std::path::PathBuf;

use crate::config::LibrarySettings;

use super::manifest::LibraryEntry;
use super::model::TrackDescriptor;
use super::scan::scan;
use super::tags::TagReader;

/// Where the tracks of a run come from.
#[derive(Debug, Clone)]
pub enum TrackSource {
    /// Walk a directory tree and read tags from each audio file.
    Directory {
        root: PathBuf,
        settings: LibrarySettings,
    },
    /// Entries of an already parsed iTunes library.
    Library(Vec<LibraryEntry>),
}

impl TrackSource {
    /// A fresh, lazy pass over every usable track. Each call starts over.
    pub fn tracks<'a>(
        &'a self,
        reader: &'a dyn TagReader,
    ) -> Box<dyn Iterator<Item = TrackDescriptor> + 'a> {
        match self {
            Self::Directory { root, settings } => Box::new(scan(root, settings, reader)),
            Self::Library(entries) => Box::new(entries.iter().filter_map(LibraryEntry::to_track)),
        }
    }
}

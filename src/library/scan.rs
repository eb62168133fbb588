use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{TrackDescriptor, ceil_secs, pick_artist};
use super::tags::TagReader;

/// Configured extensions, lower-cased and without a leading dot.
fn audio_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn is_audio_file(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Lazily walk `dir`, yielding one descriptor per readable audio file.
///
/// Files whose tags cannot be read, or that name no artist at all, are
/// skipped with a warning.
pub fn scan<'a>(
    dir: &'a Path,
    settings: &'a LibrarySettings,
    reader: &'a dyn TagReader,
) -> impl Iterator<Item = TrackDescriptor> + 'a {
    let exts = audio_extensions(settings);

    WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .into_iter()
        .filter_entry(move |e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable directory entry: {e}");
                None
            }
        })
        .filter(move |entry| {
            let path = entry.path();
            path.is_file() && is_audio_file(path, &exts)
        })
        .filter_map(move |entry| read_track(entry.path(), reader))
}

fn read_track(path: &Path, reader: &dyn TagReader) -> Option<TrackDescriptor> {
    let info = match reader.read(path) {
        Ok(info) => info,
        Err(e) => {
            warn!("Skipping {e}");
            return None;
        }
    };

    let Some(artist) = pick_artist(info.album_artist.as_deref(), info.artist.as_deref()) else {
        warn!(path = %path.display(), "Skipping track without an artist tag");
        return None;
    };

    let title = info
        .title
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("UNKNOWN")
                .to_string()
        });

    debug!(path = %path.display(), %artist, %title, "Read tags");

    Some(TrackDescriptor {
        artist,
        title,
        duration_secs: ceil_secs(info.duration),
        path: path.to_path_buf(),
    })
}

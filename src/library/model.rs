use std::path::PathBuf;
use std::time::Duration;

/// One track as seen by the matching pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDescriptor {
    pub artist: String,
    pub title: String,
    /// Whole seconds, rounded up.
    pub duration_secs: u64,
    /// Absolute location of the audio file.
    pub path: PathBuf,
}

/// Album artist wins over the track artist when it carries any text.
pub(super) fn pick_artist(album_artist: Option<&str>, artist: Option<&str>) -> Option<String> {
    album_artist
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| artist.map(str::trim).filter(|s| !s.is_empty()))
        .map(str::to_string)
}

pub(super) fn ceil_secs(duration: Duration) -> u64 {
    if duration.subsec_nanos() > 0 {
        duration.as_secs() + 1
    } else {
        duration.as_secs()
    }
}

pub(super) fn ceil_millis(millis: u64) -> u64 {
    millis.div_ceil(1000)
}

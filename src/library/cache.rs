use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::CacheSettings;

use super::manifest::{LibraryEntry, ManifestError, parse_library};

/// Bumped whenever [`Snapshot`] or [`LibraryEntry`] change shape.
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Error)]
enum CacheError {
    #[error("no cache at {0}")]
    Missing(String),

    #[error("cache is stale: {0}")]
    Stale(&'static str),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("cache is unreadable: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    manifest_path: PathBuf,
    manifest_modified_ms: u64,
    entries: Vec<LibraryEntry>,
}

/// Parse `manifest`, reusing a recent snapshot of it when one is on disk.
///
/// A snapshot is only trusted when it was written within `ttl_secs` and was
/// built from the same manifest file at the same modification time. Cache
/// trouble of any kind falls back to a full parse.
pub fn load_library(
    manifest: &Path,
    settings: &CacheSettings,
) -> Result<Vec<LibraryEntry>, ManifestError> {
    load_library_at(manifest, settings, SystemTime::now())
}

fn load_library_at(
    manifest: &Path,
    settings: &CacheSettings,
    now: SystemTime,
) -> Result<Vec<LibraryEntry>, ManifestError> {
    if !settings.enabled {
        return parse_library(manifest);
    }

    let manifest_modified_ms = match modified_ms(manifest) {
        Ok(ms) => ms,
        Err(e) => {
            warn!("Cannot stat {}, skipping library cache: {e}", manifest.display());
            return parse_library(manifest);
        }
    };

    let ttl = Duration::from_secs(settings.ttl_secs);
    match read_fresh(&settings.path, manifest, manifest_modified_ms, ttl, now) {
        Ok(entries) => {
            info!(
                "Using cached library from {} ({} entries)",
                settings.path.display(),
                entries.len()
            );
            return Ok(entries);
        }
        Err(e @ (CacheError::Missing(_) | CacheError::Stale(_))) => debug!("{e}"),
        Err(e) => warn!("Ignoring library cache {}: {e}", settings.path.display()),
    }

    info!("Parsing iTunes library {}", manifest.display());
    let entries = parse_library(manifest)?;

    let snapshot = Snapshot {
        version: CACHE_VERSION,
        manifest_path: manifest.to_path_buf(),
        manifest_modified_ms,
        entries,
    };
    if let Err(e) = write_snapshot(&settings.path, &snapshot) {
        warn!("Failed to write library cache {}: {e}", settings.path.display());
    }

    Ok(snapshot.entries)
}

fn modified_ms(path: &Path) -> io::Result<u64> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(modified
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64)
}

fn read_fresh(
    cache_path: &Path,
    manifest: &Path,
    manifest_modified_ms: u64,
    ttl: Duration,
    now: SystemTime,
) -> Result<Vec<LibraryEntry>, CacheError> {
    let written = match fs::metadata(cache_path) {
        Ok(meta) => meta.modified()?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(CacheError::Missing(cache_path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    // A TTL past the end of time never expires.
    if written.checked_add(ttl).is_some_and(|expiry| expiry <= now) {
        return Err(CacheError::Stale("expired"));
    }

    let snapshot: Snapshot = serde_json::from_reader(BufReader::new(File::open(cache_path)?))?;

    if snapshot.version != CACHE_VERSION {
        return Err(CacheError::Stale("written by another version"));
    }
    if snapshot.manifest_path != manifest {
        return Err(CacheError::Stale("built from another library file"));
    }
    if snapshot.manifest_modified_ms != manifest_modified_ms {
        return Err(CacheError::Stale("library file changed since"));
    }

    Ok(snapshot.entries)
}

fn write_snapshot(cache_path: &Path, snapshot: &Snapshot) -> Result<(), CacheError> {
    let mut writer = BufWriter::new(File::create(cache_path)?);
    serde_json::to_writer(&mut writer, snapshot)?;
    writer.flush()?;
    Ok(())
}

//! Command-line arguments and the validated run configuration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use thiserror::Error;

use crate::config::{CacheSettings, LibrarySettings, Settings};
use crate::producers::{EmptyProducerList, ProducerQuery};

/// Build playlists of the tracks in your library made by a given producer.
///
/// Every track is looked up on Genius; tracks produced by one of the listed
/// producers are appended to "Produced by <Producer>.m3u".
#[derive(Parser, Debug)]
#[command(name = "prodlist", version)]
pub struct Args {
    /// Producers to look for, pipe-delimited. Earlier names win when a song
    /// credits several of them.
    #[arg(short = 'p', long = "producers", value_name = "NAME|NAME...")]
    pub producers: String,

    /// Directory where your music lives. Ignored when --itunes-library is given.
    #[arg(short = 'm', long = "music-dir", value_name = "DIR", default_value = ".")]
    pub music_dir: PathBuf,

    /// Read tracks from an exported iTunes Library.xml instead of scanning.
    #[arg(short = 'i', long = "itunes-library", value_name = "FILE")]
    pub itunes_library: Option<PathBuf>,

    /// Where playlists are written (defaults to playlist.output_dir).
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Genius API access token (overrides service.token).
    #[arg(long, env = "GENIUS_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Always reparse the iTunes library instead of using the cached copy.
    #[arg(long)]
    pub no_cache: bool,

    /// More output; repeat for trace level.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Error)]
pub enum ArgsError {
    #[error(transparent)]
    Producers(#[from] EmptyProducerList),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("iTunes library {} does not exist", .0.display())]
    MissingLibrary(PathBuf),

    #[error("cannot resolve {}: {source}", .path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "no Genius API token; pass --token, set GENIUS_ACCESS_TOKEN or PRODLIST__SERVICE__TOKEN"
    )]
    MissingToken,
}

/// Where the run reads its tracks from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Directory(PathBuf),
    ItunesLibrary(PathBuf),
}

/// Everything a run needs, checked once up front.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub producers: ProducerQuery,
    pub source: SourceKind,
    pub output_dir: PathBuf,
    pub token: String,
    pub library: LibrarySettings,
    pub cache: CacheSettings,
}

impl RunConfig {
    /// Merge arguments over settings and check that the paths make sense.
    pub fn from_args(args: &Args, settings: &Settings) -> Result<Self, ArgsError> {
        let producers = ProducerQuery::parse(&args.producers)?;

        let source = match &args.itunes_library {
            Some(path) => {
                if !path.is_file() {
                    return Err(ArgsError::MissingLibrary(path.clone()));
                }
                SourceKind::ItunesLibrary(absolute(path)?)
            }
            None => {
                if !args.music_dir.is_dir() {
                    return Err(ArgsError::NotADirectory(args.music_dir.clone()));
                }
                SourceKind::Directory(absolute(&args.music_dir)?)
            }
        };

        let token = args
            .token
            .as_deref()
            .unwrap_or(settings.service.token.as_str())
            .trim()
            .to_string();
        if token.is_empty() {
            return Err(ArgsError::MissingToken);
        }

        let mut cache = settings.cache.clone();
        if args.no_cache {
            cache.enabled = false;
        }

        Ok(Self {
            producers,
            source,
            output_dir: args
                .output_dir
                .clone()
                .unwrap_or_else(|| settings.playlist.output_dir.clone()),
            token,
            library: settings.library.clone(),
            cache,
        })
    }
}

/// Playlists store absolute paths, so sources are resolved up front.
fn absolute(path: &Path) -> Result<PathBuf, ArgsError> {
    fs::canonicalize(path).map_err(|source| ArgsError::Resolve {
        path: path.to_path_buf(),
        source,
    })
}

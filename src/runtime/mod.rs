use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{Args, RunConfig, SourceKind};
use crate::genius::GeniusClient;
use crate::library::{LoftyTagReader, TrackSource, load_library};
use crate::pipeline::{Pipeline, RunSummary};
use crate::playlist::PlaylistWriter;

mod logging;
mod settings;

pub use logging::init_logging;

pub fn run(args: Args) -> Result<RunSummary> {
    let settings = settings::load_settings();
    let config = RunConfig::from_args(&args, &settings)?;

    info!(
        "Gonna try and find songs produced by {}",
        config.producers.names().join(", ")
    );

    let source = match &config.source {
        SourceKind::Directory(root) => {
            info!("Scanning {}", root.display());
            TrackSource::Directory {
                root: root.clone(),
                settings: config.library.clone(),
            }
        }
        SourceKind::ItunesLibrary(path) => TrackSource::Library(
            load_library(path, &config.cache).context("Failed to load the iTunes library")?,
        ),
    };

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create playlist directory {}",
            config.output_dir.display()
        )
    })?;

    let client = GeniusClient::new(&settings.service, &config.token)
        .context("Failed to set up the Genius client")?;
    let mut playlists = PlaylistWriter::new(&config.output_dir);

    let summary = Pipeline::new(&client, &config.producers, &mut playlists)
        .run(source.tracks(&LoftyTagReader))
        .context("Run aborted")?;

    info!("Done. {summary}");
    Ok(summary)
}

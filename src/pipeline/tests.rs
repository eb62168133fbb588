use super::*;
use crate::genius::{ProducerCredit, SearchHit, SongDetail};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// In-memory stand-in for the Genius API that remembers what it was asked.
#[derive(Default)]
struct FakeGenius {
    hits: HashMap<String, Vec<SearchHit>>,
    songs: HashMap<String, SongDetail>,
    failing: HashSet<String>,
    reject_token: bool,
    searches: RefCell<Vec<String>>,
    lookups: RefCell<Vec<String>>,
}

impl FakeGenius {
    fn with_song(mut self, query: &str, api_path: &str, producers: &[&str]) -> Self {
        self.hits.insert(
            query.to_string(),
            vec![SearchHit {
                api_path: api_path.to_string(),
                full_title: None,
            }],
        );
        self.songs.insert(
            api_path.to_string(),
            SongDetail {
                full_title: None,
                producer_credits: producers
                    .iter()
                    .map(|name| ProducerCredit {
                        name: name.to_string(),
                    })
                    .collect(),
            },
        );
        self
    }
}

impl SongService for FakeGenius {
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, ServiceError> {
        self.searches.borrow_mut().push(query.to_string());
        if self.reject_token {
            return Err(ServiceError::Unauthorized(401));
        }
        if self.failing.contains(query) {
            return Err(ServiceError::Status {
                status: 502,
                body: "bad gateway".into(),
            });
        }
        Ok(self.hits.get(query).cloned().unwrap_or_default())
    }

    fn song_detail(&self, api_path: &str) -> Result<SongDetail, ServiceError> {
        self.lookups.borrow_mut().push(api_path.to_string());
        self.songs
            .get(api_path)
            .cloned()
            .ok_or_else(|| ServiceError::Status {
                status: 404,
                body: String::new(),
            })
    }
}

fn track(artist: &str, title: &str, duration_secs: u64, path: &str) -> TrackDescriptor {
    TrackDescriptor {
        artist: artist.into(),
        title: title.into(),
        duration_secs,
        path: PathBuf::from(path),
    }
}

fn izzo() -> TrackDescriptor {
    track("Jay-Z", "Izzo (H.O.V.A.)", 250, "/music/izzo.mp3")
}

fn playlist_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn matching_track_lands_in_the_producer_playlist() {
    let dir = tempdir().unwrap();
    let genius = FakeGenius::default().with_song("jay-z izzo", "/songs/1", &["Kanye West"]);
    let producers = ProducerQuery::parse("Kanye West").unwrap();
    let mut playlists = PlaylistWriter::new(dir.path());

    let outcome = Pipeline::new(&genius, &producers, &mut playlists)
        .process(&izzo())
        .unwrap();
    assert_eq!(
        outcome,
        TrackOutcome::Added {
            playlist: "Produced by Kanye West".into()
        }
    );
    assert_eq!(*genius.searches.borrow(), vec!["jay-z izzo".to_string()]);

    let text = fs::read_to_string(dir.path().join("Produced by Kanye West.m3u")).unwrap();
    assert_eq!(
        text,
        "#EXTM3U\n#EXTINF:250,Jay-Z - Izzo (H.O.V.A.)\n/music/izzo.mp3\n"
    );
}

#[test]
fn song_without_producer_credits_writes_nothing_and_run_continues() {
    let dir = tempdir().unwrap();
    let genius = FakeGenius::default()
        .with_song("nas halftime", "/songs/2", &[])
        .with_song("jay-z izzo", "/songs/1", &["Kanye West"]);
    let producers = ProducerQuery::parse("Kanye West").unwrap();
    let mut playlists = PlaylistWriter::new(dir.path());

    let mut pipeline = Pipeline::new(&genius, &producers, &mut playlists);
    assert_eq!(
        pipeline
            .process(&track("Nas", "Halftime", 100, "/music/halftime.mp3"))
            .unwrap(),
        TrackOutcome::NoCredits
    );
    assert!(playlist_files(dir.path()).is_empty());

    let summary = pipeline
        .run(vec![
            track("Nas", "Halftime", 100, "/music/halftime.mp3"),
            izzo(),
        ])
        .unwrap();
    assert_eq!(summary.no_credits, 1);
    assert_eq!(summary.added, 1);
    assert_eq!(
        playlist_files(dir.path()),
        vec!["Produced by Kanye West.m3u".to_string()]
    );
}

#[test]
fn no_search_hits_skips_the_detail_lookup() {
    let dir = tempdir().unwrap();
    let genius = FakeGenius::default();
    let producers = ProducerQuery::parse("Kanye West").unwrap();
    let mut playlists = PlaylistWriter::new(dir.path());

    let summary = Pipeline::new(&genius, &producers, &mut playlists)
        .run(vec![izzo()])
        .unwrap();
    assert_eq!(summary.no_hits, 1);
    assert!(genius.lookups.borrow().is_empty());
    assert!(playlist_files(dir.path()).is_empty());
}

#[test]
fn other_producers_do_not_create_playlists() {
    let dir = tempdir().unwrap();
    let genius = FakeGenius::default().with_song("jay-z izzo", "/songs/1", &["Kanye West"]);
    let producers = ProducerQuery::parse("Pharrell|Timbaland").unwrap();
    let mut playlists = PlaylistWriter::new(dir.path());

    let outcome = Pipeline::new(&genius, &producers, &mut playlists)
        .process(&izzo())
        .unwrap();
    assert_eq!(outcome, TrackOutcome::NoMatch);
    assert!(playlist_files(dir.path()).is_empty());
}

#[test]
fn first_requested_producer_names_the_playlist() {
    let dir = tempdir().unwrap();
    let genius =
        FakeGenius::default().with_song("eminem forgot about dre", "/songs/3", &["Dre", "Kanye"]);
    let producers = ProducerQuery::parse("kanye|Dre").unwrap();
    let mut playlists = PlaylistWriter::new(dir.path());

    let outcome = Pipeline::new(&genius, &producers, &mut playlists)
        .process(&track(
            "Eminem",
            "Forgot About Dre (feat. Dr. Dre)",
            222,
            "/music/fad.mp3",
        ))
        .unwrap();
    assert_eq!(
        outcome,
        TrackOutcome::Added {
            playlist: "Produced by Kanye".into()
        }
    );
}

#[test]
fn second_run_over_the_same_tracks_changes_nothing() {
    let dir = tempdir().unwrap();
    let genius = FakeGenius::default().with_song("jay-z izzo", "/songs/1", &["Kanye West"]);
    let producers = ProducerQuery::parse("Kanye West").unwrap();
    let path = dir.path().join("Produced by Kanye West.m3u");

    let mut first = PlaylistWriter::new(dir.path());
    Pipeline::new(&genius, &producers, &mut first)
        .run(vec![izzo()])
        .unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let mut second = PlaylistWriter::new(dir.path());
    let summary = Pipeline::new(&genius, &producers, &mut second)
        .run(vec![izzo()])
        .unwrap();
    assert_eq!(summary.duplicates, 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn service_failure_costs_only_that_track() {
    let dir = tempdir().unwrap();
    let mut genius = FakeGenius::default().with_song("jay-z izzo", "/songs/1", &["Kanye West"]);
    genius.failing.insert("nas halftime".to_string());
    let producers = ProducerQuery::parse("Kanye West").unwrap();
    let mut playlists = PlaylistWriter::new(dir.path());

    let summary = Pipeline::new(&genius, &producers, &mut playlists)
        .run(vec![
            track("Nas", "Halftime", 100, "/music/halftime.mp3"),
            izzo(),
        ])
        .unwrap();
    assert_eq!(summary.scanned, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.added, 1);
}

#[test]
fn rejected_credentials_stop_the_run() {
    let dir = tempdir().unwrap();
    let genius = FakeGenius {
        reject_token: true,
        ..FakeGenius::default()
    };
    let producers = ProducerQuery::parse("Kanye West").unwrap();
    let mut playlists = PlaylistWriter::new(dir.path());

    let result = Pipeline::new(&genius, &producers, &mut playlists).run(vec![
        izzo(),
        track("Nas", "Halftime", 100, "/music/halftime.mp3"),
    ]);
    assert!(matches!(
        result,
        Err(PipelineError::Service(ServiceError::Unauthorized(401)))
    ));
    assert_eq!(genius.searches.borrow().len(), 1);
}

#[test]
fn summary_reads_as_a_sentence() {
    let summary = RunSummary {
        scanned: 4,
        added: 1,
        duplicates: 1,
        no_hits: 1,
        no_credits: 0,
        no_match: 1,
        failed: 0,
    };
    assert_eq!(
        summary.to_string(),
        "4 tracks: 1 added, 1 already listed, 1 not found, 0 without producer credits, 1 by other producers, 0 failed"
    );
}

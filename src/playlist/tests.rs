use super::*;
use std::fs;
use tempfile::tempdir;

fn izzo(path: &str) -> PlaylistRecord {
    PlaylistRecord {
        duration_secs: 250,
        artist: "Jay-Z".into(),
        title: "Izzo (H.O.V.A.)".into(),
        path: PathBuf::from(path),
    }
}

#[test]
fn metadata_line_follows_extinf_convention() {
    assert_eq!(
        izzo("/m/izzo.mp3").metadata_line(),
        "#EXTINF:250,Jay-Z - Izzo (H.O.V.A.)"
    );
}

#[test]
fn first_record_creates_file_with_header() {
    let dir = tempdir().unwrap();
    let mut writer = PlaylistWriter::new(dir.path());

    let outcome = writer
        .append("Produced by Kanye West", &izzo("/m/izzo.mp3"))
        .unwrap();
    assert_eq!(outcome, AppendOutcome::Added);

    let text = fs::read_to_string(dir.path().join("Produced by Kanye West.m3u")).unwrap();
    assert_eq!(
        text,
        "#EXTM3U\n#EXTINF:250,Jay-Z - Izzo (H.O.V.A.)\n/m/izzo.mp3\n"
    );
}

#[test]
fn appending_the_same_record_twice_adds_zero_bytes() {
    let dir = tempdir().unwrap();
    let mut writer = PlaylistWriter::new(dir.path());
    let path = writer.path_for("Produced by Kanye West");

    writer
        .append("Produced by Kanye West", &izzo("/m/izzo.mp3"))
        .unwrap();
    let size = fs::metadata(&path).unwrap().len();

    let outcome = writer
        .append("Produced by Kanye West", &izzo("/m/izzo.mp3"))
        .unwrap();
    assert_eq!(outcome, AppendOutcome::Duplicate);
    assert_eq!(fs::metadata(&path).unwrap().len(), size);
}

#[test]
fn duplicates_are_keyed_on_metadata_not_path() {
    let dir = tempdir().unwrap();
    let mut writer = PlaylistWriter::new(dir.path());

    writer.append("P", &izzo("/m/izzo.mp3")).unwrap();
    let outcome = writer.append("P", &izzo("/backup/izzo.mp3")).unwrap();
    assert_eq!(outcome, AppendOutcome::Duplicate);

    let mut longer = izzo("/m/izzo.mp3");
    longer.duration_secs = 251;
    assert_eq!(writer.append("P", &longer).unwrap(), AppendOutcome::Added);

    let text = fs::read_to_string(writer.path_for("P")).unwrap();
    assert_eq!(text.lines().count(), 5);
}

#[test]
fn records_from_earlier_runs_are_respected() {
    let dir = tempdir().unwrap();

    PlaylistWriter::new(dir.path())
        .append("P", &izzo("/m/izzo.mp3"))
        .unwrap();

    let mut second_run = PlaylistWriter::new(dir.path());
    let outcome = second_run.append("P", &izzo("/m/izzo.mp3")).unwrap();
    assert_eq!(outcome, AppendOutcome::Duplicate);

    let text = fs::read_to_string(second_run.path_for("P")).unwrap();
    assert_eq!(text.matches(FORMAT_DESCRIPTOR).count(), 1);
    assert_eq!(text.matches("#EXTINF:").count(), 1);
}

#[test]
fn existing_file_keeps_its_contents_and_gets_no_second_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("P.m3u");
    fs::write(
        &path,
        "#EXTM3U\r\n#EXTINF:100,Nas - Halftime\r\n/m/halftime.mp3\r\n",
    )
    .unwrap();

    let mut writer = PlaylistWriter::new(dir.path());
    let halftime = PlaylistRecord {
        duration_secs: 100,
        artist: "Nas".into(),
        title: "Halftime".into(),
        path: PathBuf::from("/m/halftime.mp3"),
    };
    assert_eq!(writer.append("P", &halftime).unwrap(), AppendOutcome::Duplicate);
    assert_eq!(writer.append("P", &izzo("/m/izzo.mp3")).unwrap(), AppendOutcome::Added);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("#EXTM3U\r\n#EXTINF:100,Nas - Halftime\r\n"));
    assert!(text.ends_with("#EXTINF:250,Jay-Z - Izzo (H.O.V.A.)\n/m/izzo.mp3\n"));
}

#[test]
fn file_without_trailing_newline_keeps_records_on_their_own_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("P.m3u");
    fs::write(&path, "#EXTM3U\n#EXTINF:100,Nas - Halftime\n/m/halftime.mp3").unwrap();

    let mut writer = PlaylistWriter::new(dir.path());
    writer.append("P", &izzo("/m/izzo.mp3")).unwrap();
    let mut longer = izzo("/m/izzo.mp3");
    longer.duration_secs = 251;
    writer.append("P", &longer).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "#EXTM3U\n#EXTINF:100,Nas - Halftime\n/m/halftime.mp3\n\
         #EXTINF:250,Jay-Z - Izzo (H.O.V.A.)\n/m/izzo.mp3\n\
         #EXTINF:251,Jay-Z - Izzo (H.O.V.A.)\n/m/izzo.mp3\n"
    );

    let mut next_run = PlaylistWriter::new(dir.path());
    assert_eq!(
        next_run.append("P", &izzo("/m/izzo.mp3")).unwrap(),
        AppendOutcome::Duplicate
    );
}

#[test]
fn empty_file_gets_a_header() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("P.m3u"), "").unwrap();

    let mut writer = PlaylistWriter::new(dir.path());
    writer.append("P", &izzo("/m/izzo.mp3")).unwrap();

    let text = fs::read_to_string(writer.path_for("P")).unwrap();
    assert!(text.starts_with("#EXTM3U\n#EXTINF:250,"));
}

#[test]
fn path_separators_in_names_stay_inside_the_directory() {
    let writer = PlaylistWriter::new("/out");
    assert_eq!(
        writer.path_for("Produced by Ac/Dc"),
        PathBuf::from("/out/Produced by Ac-Dc.m3u")
    );
}

#[test]
fn newlines_in_tags_do_not_break_records() {
    let record = PlaylistRecord {
        duration_secs: 3,
        artist: "A\r\nB".into(),
        title: "C\nD".into(),
        path: PathBuf::from("/m/x.mp3"),
    };
    assert_eq!(record.metadata_line(), "#EXTINF:3,A  B - C D");
}

#[test]
fn record_from_track_copies_every_field() {
    let track = TrackDescriptor {
        artist: "Jay-Z".into(),
        title: "Izzo (H.O.V.A.)".into(),
        duration_secs: 250,
        path: PathBuf::from("/m/izzo.mp3"),
    };
    assert_eq!(PlaylistRecord::from(&track), izzo("/m/izzo.mp3"));
}

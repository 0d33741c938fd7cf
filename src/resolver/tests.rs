use std::path::Path;

use tempfile::tempdir;

use super::*;
use crate::config::{ExtractorSettings, LibrarySettings};
use crate::error::Error;
use crate::playlist::TrackKind;

#[test]
fn title_from_path_uses_the_file_stem() {
    assert_eq!(title_from_path(Path::new("/music/My Song.mp3")), "My Song");
    assert_eq!(title_from_path(Path::new("noext")), "noext");
}

#[test]
fn read_tags_fails_for_a_missing_file() {
    let err = read_tags(Path::new("/definitely/not/here.mp3")).unwrap_err();
    assert!(matches!(err, Error::Resolution(_)));
}

#[test]
fn read_tags_soft_fails_on_an_unreadable_tag_block() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.mp3");
    std::fs::write(&path, b"not actually an mp3").unwrap();

    // The file exists but carries no parseable audio: empty info, no error.
    let info = read_tags(&path).unwrap();
    assert!(info.title.is_none());
    assert!(info.duration_secs.is_none());
}

#[test]
fn resolve_local_falls_back_to_the_filename() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Fallback Title.mp3");
    std::fs::write(&path, b"junk").unwrap();

    let track = resolve_local(&path).unwrap();
    assert_eq!(track.title, "Fallback Title");
    assert_eq!(track.kind, TrackKind::Local);
    assert!(track.origin.is_none());
    assert_eq!(track.source, path.to_string_lossy());
}

#[test]
fn resolve_local_rejects_a_missing_file() {
    assert!(resolve_local(Path::new("/no/such/file.mp3")).is_err());
}

#[test]
fn store_upload_never_overwrites_an_existing_file() {
    let dir = tempdir().unwrap();

    let first = store_upload(b"aaa", "song.mp3", dir.path()).unwrap();
    let second = store_upload(b"bbb", "song.mp3", dir.path()).unwrap();

    assert_ne!(first.source, second.source);
    assert_eq!(std::fs::read(&first.source).unwrap(), b"aaa");
    assert_eq!(std::fs::read(&second.source).unwrap(), b"bbb");
    assert!(second.source.ends_with("song-1.mp3"));
}

#[test]
fn store_upload_strips_any_directory_components() {
    let dir = tempdir().unwrap();
    let track = store_upload(b"x", "../../sneaky.mp3", dir.path()).unwrap();
    let path = Path::new(&track.source);
    assert_eq!(path.parent().unwrap(), dir.path());
    assert_eq!(path.file_name().unwrap(), "sneaky.mp3");
}

fn library() -> LibrarySettings {
    LibrarySettings::default()
}

#[test]
fn resolve_dir_filters_non_audio_and_sorts_case_insensitively() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("b.MP3"), b"junk").unwrap();
    std::fs::write(dir.path().join("A.ogg"), b"junk").unwrap();
    std::fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

    let tracks = resolve_dir(dir.path(), &library()).unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].title, "A");
    assert_eq!(tracks[1].title, "b");
}

#[test]
fn resolve_dir_skips_hidden_files_unless_configured() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(".hidden.mp3"), b"junk").unwrap();
    std::fs::write(dir.path().join("shown.mp3"), b"junk").unwrap();

    let tracks = resolve_dir(dir.path(), &library()).unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "shown");

    let mut settings = library();
    settings.include_hidden = true;
    let tracks = resolve_dir(dir.path(), &settings).unwrap();
    assert_eq!(tracks.len(), 2);
}

#[test]
fn resolve_dir_respects_the_recursive_flag() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("top.mp3"), b"junk").unwrap();
    std::fs::write(dir.path().join("sub").join("nested.mp3"), b"junk").unwrap();

    let mut settings = library();
    settings.recursive = false;
    let tracks = resolve_dir(dir.path(), &settings).unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "top");

    settings.recursive = true;
    let tracks = resolve_dir(dir.path(), &settings).unwrap();
    assert_eq!(tracks.len(), 2);
}

#[test]
fn resolve_dir_rejects_a_non_directory() {
    assert!(resolve_dir(Path::new("/no/such/dir"), &library()).is_err());
}

#[test]
fn remote_resolution_fails_cleanly_when_the_extractor_is_missing() {
    let dir = tempdir().unwrap();
    let extractor = Extractor::new(
        ExtractorSettings {
            command: "vibes-test-no-such-binary".to_string(),
            extra_args: Vec::new(),
        },
        dir.path().to_path_buf(),
    );

    let err = extractor
        .resolve_remote("https://example.com/watch?v=x")
        .unwrap_err();
    assert!(matches!(err, Error::Resolution(_)));
    // Nothing may be left behind in the downloads dir.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn remote_resolution_surfaces_a_failing_extractor() {
    let dir = tempdir().unwrap();
    let extractor = Extractor::new(
        ExtractorSettings {
            command: "false".to_string(),
            extra_args: Vec::new(),
        },
        dir.path().to_path_buf(),
    );

    let err = extractor
        .resolve_remote("https://example.com/watch?v=x")
        .unwrap_err();
    assert!(matches!(err, Error::Resolution(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// Write an executable stand-in for the extractor that prints `title`,
/// then creates the cached file and prints its path — the same order a
/// real extractor uses when the title template runs at an earlier stage.
#[cfg(unix)]
fn fake_extractor(dir: &Path, title: &str, cached: &Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-extractor.sh");
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\nprintf '%s\\n' '{title}'\nprintf 'junk' > '{cached}'\nprintf '%s\\n' '{cached}'\n",
            cached = cached.display(),
        ),
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
#[test]
fn remote_resolution_takes_the_reported_title_not_the_file_path() {
    let dir = tempdir().unwrap();
    let cached = dir.path().join("cached.mp3");
    let script = fake_extractor(dir.path(), "Never Gonna Give You Up", &cached);

    let extractor = Extractor::new(
        ExtractorSettings {
            command: script.to_string_lossy().into_owned(),
            extra_args: Vec::new(),
        },
        dir.path().to_path_buf(),
    );

    let track = extractor
        .resolve_remote("https://example.com/watch?v=x")
        .unwrap();
    assert_eq!(track.title, "Never Gonna Give You Up");
    assert_eq!(track.source, cached.to_string_lossy());
    assert_eq!(track.kind, TrackKind::Remote);
    assert_eq!(
        track.origin.as_deref(),
        Some("https://example.com/watch?v=x")
    );
    assert!(cached.is_file());
}

#[cfg(unix)]
#[test]
fn remote_resolution_handles_filepath_printed_first() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let cached = dir.path().join("cached.mp3");
    let script = dir.path().join("fake-extractor.sh");
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\nprintf 'junk' > '{cached}'\nprintf '%s\\n' '{cached}'\nprintf 'Some Title\\n'\n",
            cached = cached.display(),
        ),
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let extractor = Extractor::new(
        ExtractorSettings {
            command: script.to_string_lossy().into_owned(),
            extra_args: Vec::new(),
        },
        dir.path().to_path_buf(),
    );

    let track = extractor
        .resolve_remote("https://example.com/watch?v=x")
        .unwrap();
    assert_eq!(track.title, "Some Title");
    assert_eq!(track.source, cached.to_string_lossy());
}

#[test]
fn remote_resolution_rejects_an_empty_link() {
    let dir = tempdir().unwrap();
    let extractor = Extractor::new(ExtractorSettings::default(), dir.path().to_path_buf());
    assert!(extractor.resolve_remote("   ").is_err());
}

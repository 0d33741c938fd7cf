use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::{Error, Result};
use crate::playlist::{ResolvedTrack, TrackKind};

use super::tags::{read_tags, title_from_path};

/// Resolve an existing audio file into a track.
///
/// Tag-read failures on a readable file are soft: the title falls back to
/// the file stem and the duration stays unknown.
pub fn resolve_local(path: &Path) -> Result<ResolvedTrack> {
    let tags = read_tags(path)?;
    Ok(ResolvedTrack {
        title: tags.title.unwrap_or_else(|| title_from_path(path)),
        artist: tags.artist,
        album: tags.album,
        duration_secs: tags.duration_secs,
        source: path.to_string_lossy().into_owned(),
        origin: None,
        kind: TrackKind::Local,
    })
}

/// Persist uploaded bytes into `downloads_dir` and resolve the result.
///
/// The target name is derived from `filename` but never overwrites an
/// existing file; the bytes go through a temporary file in the same
/// directory, so no partial file survives a failure.
pub fn store_upload(bytes: &[u8], filename: &str, downloads_dir: &Path) -> Result<ResolvedTrack> {
    fs::create_dir_all(downloads_dir)?;
    let target = unique_target(downloads_dir, filename);

    let mut tmp = tempfile::NamedTempFile::new_in(downloads_dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(&target).map_err(|e| Error::Io(e.error))?;

    info!(path = %target.display(), bytes = bytes.len(), "upload stored");
    resolve_local(&target)
}

/// Pick a path under `dir` for `filename` that does not exist yet:
/// `stem.ext`, then `stem-1.ext`, `stem-2.ext`, ...
fn unique_target(dir: &Path, filename: &str) -> PathBuf {
    let name = Path::new(filename)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("upload.mp3");
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    let ext = Path::new(name).extension().and_then(|s| s.to_str());

    let with_ext = |base: &str| match ext {
        Some(e) => dir.join(format!("{base}.{e}")),
        None => dir.join(base.to_string()),
    };

    let mut candidate = with_ext(stem);
    let mut n = 0usize;
    while candidate.exists() {
        n += 1;
        candidate = with_ext(&format!("{stem}-{n}"));
    }
    candidate
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

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

/// Resolve every audio file under `dir`, sorted case-insensitively by
/// display name. Files that fail to resolve are skipped with a warning.
pub fn resolve_dir(dir: &Path, settings: &LibrarySettings) -> Result<Vec<ResolvedTrack>> {
    if !dir.is_dir() {
        return Err(Error::Resolution(format!(
            "not a directory: {}",
            dir.display()
        )));
    }

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<ResolvedTrack> = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(std::result::Result::ok)
    {
        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, settings)
        {
            match resolve_local(path) {
                Ok(t) => tracks.push(t),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping file"),
            }
        }
    }

    tracks.sort_by(|a, b| {
        title_key(a)
            .to_lowercase()
            .cmp(&title_key(b).to_lowercase())
    });
    Ok(tracks)
}

fn title_key(track: &ResolvedTrack) -> String {
    match track.artist.as_deref() {
        Some(a) => format!("{} - {}", a, track.title),
        None => track.title.clone(),
    }
}

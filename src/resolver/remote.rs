use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ExtractorSettings;
use crate::error::{Error, Result};
use crate::playlist::{ResolvedTrack, TrackKind};

use super::tags::read_tags;

/// Wrapper around the external link extractor (yt-dlp by default).
///
/// The extractor is a black box that turns a link into a locally cached
/// audio file; network-bound and potentially slow. Failures never leave a
/// partial file behind.
pub struct Extractor {
    settings: ExtractorSettings,
    downloads_dir: PathBuf,
}

impl Extractor {
    pub fn new(settings: ExtractorSettings, downloads_dir: PathBuf) -> Self {
        Self {
            settings,
            downloads_dir,
        }
    }

    /// Extract the audio of `url` into the downloads directory and resolve
    /// it into a track. The record keeps the link in `origin`.
    pub fn resolve_remote(&self, url: &str) -> Result<ResolvedTrack> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::Resolution("empty link".to_string()));
        }

        fs::create_dir_all(&self.downloads_dir)?;

        // Unique stem so concurrent/repeated extractions never collide and
        // the error path knows exactly which files to clean up.
        let stem = Uuid::new_v4().simple().to_string();
        let out_template = self.downloads_dir.join(format!("{stem}.%(ext)s"));
        let expected = self.downloads_dir.join(format!("{stem}.mp3"));

        let output = Command::new(&self.settings.command)
            .args([
                "--no-playlist",
                "--extract-audio",
                "--audio-format",
                "mp3",
                "--output",
            ])
            .arg(&out_template)
            .args(["--print", "after_move:filepath", "--print", "after_move:title"])
            .args(["--no-simulate", "--quiet"])
            .args(&self.settings.extra_args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                Error::Resolution(format!(
                    "cannot run extractor {:?}: {e}",
                    self.settings.command
                ))
            })?;

        if !output.status.success() {
            self.cleanup_stem(&stem);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Resolution(format!(
                "extractor failed for {url}: {}",
                first_line(&stderr)
            )));
        }

        // The print order depends on which stage the extractor runs each
        // template at, so identify the filepath line as the one that exists
        // on disk and treat the other as the title.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut filepath: Option<PathBuf> = None;
        let mut title: Option<String> = None;
        for line in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let candidate = PathBuf::from(line);
            if filepath.is_none() && candidate.is_file() {
                filepath = Some(candidate);
            } else if title.is_none() {
                title = Some(line.to_string());
            }
        }
        let filepath = filepath.unwrap_or(expected);

        if !filepath.is_file() {
            self.cleanup_stem(&stem);
            return Err(Error::Resolution(format!(
                "extractor produced no audio file for {url}"
            )));
        }

        let tags = read_tags(&filepath)?;
        let title = title
            .or(tags.title)
            .unwrap_or_else(|| url.to_string());

        info!(url, path = %filepath.display(), "link extracted");
        Ok(ResolvedTrack {
            title,
            artist: tags.artist,
            album: tags.album,
            duration_secs: tags.duration_secs,
            source: filepath.to_string_lossy().into_owned(),
            origin: Some(url.to_string()),
            kind: TrackKind::Remote,
        })
    }

    /// Remove whatever the failed extraction left behind for `stem`
    /// (the final file plus .part/.temp intermediates).
    fn cleanup_stem(&self, stem: &str) {
        let Ok(rd) = fs::read_dir(&self.downloads_dir) else {
            return;
        };
        for entry in rd.filter_map(|e| e.ok()) {
            let path = entry.path();
            if file_stem_starts_with(&path, stem) {
                if let Err(e) = fs::remove_file(&path) {
                    warn!(path = %path.display(), error = %e, "leftover file not removed");
                }
            }
        }
    }
}

fn file_stem_starts_with(path: &Path, stem: &str) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with(stem))
        .unwrap_or(false)
}

fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("no error output")
}

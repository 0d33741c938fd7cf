use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a track came from.
///
/// `Remote` records were extracted from a link and keep that link in
/// `TrackRecord::origin`, so they can be re-resolved if the cached file is
/// ever lost. Either way, `source` points at the playable file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Local,
    Remote,
}

/// One entry of a playlist.
///
/// The store holds `source` by value; it does not own the underlying file's
/// lifecycle. A record whose file has since disappeared is only detected
/// when playback is attempted, never at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    /// Track length in seconds; absent when unknown.
    #[serde(default)]
    pub duration_secs: Option<f64>,
    /// Path of the playable file.
    pub source: String,
    /// Link a `Remote` record was extracted from.
    #[serde(default)]
    pub origin: Option<String>,
    pub kind: TrackKind,
}

impl TrackRecord {
    /// "Artist - Title" when an artist is known, bare title otherwise.
    pub fn display(&self) -> String {
        match self.artist.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => format!("{} - {}", a, self.title),
            _ => self.title.clone(),
        }
    }

    pub fn source_path(&self) -> PathBuf {
        PathBuf::from(&self.source)
    }
}

/// A resolved track before it has been given an id.
///
/// Produced by the resolver; `PlaylistStore::append` turns it into a
/// `TrackRecord` by assigning a fresh id.
#[derive(Debug, Clone)]
pub struct ResolvedTrack {
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_secs: Option<f64>,
    pub source: String,
    pub origin: Option<String>,
    pub kind: TrackKind,
}

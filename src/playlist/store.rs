use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};

use super::model::{ResolvedTrack, TrackRecord};

/// Ordered, mutable list of tracks with named persistence slots.
///
/// Mutations only touch memory; nothing is written to disk until an explicit
/// `save`. `load` is all-or-nothing: on any failure the in-memory entries are
/// left untouched.
pub struct PlaylistStore {
    entries: Vec<TrackRecord>,
    slots_dir: PathBuf,
}

impl PlaylistStore {
    pub fn new(slots_dir: PathBuf) -> Self {
        Self {
            entries: Vec::new(),
            slots_dir,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrackRecord> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[TrackRecord] {
        &self.entries
    }

    /// Append `track` at the end, assigning and returning its id.
    pub fn append(&mut self, track: ResolvedTrack) -> Uuid {
        let id = Uuid::new_v4();
        self.entries.push(TrackRecord {
            id,
            title: track.title,
            artist: track.artist,
            album: track.album,
            duration_secs: track.duration_secs,
            source: track.source,
            origin: track.origin,
            kind: track.kind,
        });
        id
    }

    /// Remove and return the entry at `index`.
    ///
    /// The caller owns any playback cursor and is responsible for re-clamping
    /// it afterwards; this store knows nothing about playback state.
    pub fn remove_at(&mut self, index: usize) -> Result<TrackRecord> {
        if index >= self.entries.len() {
            return Err(Error::InvalidIndex {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serialize the entries to the named slot, replacing any previous save.
    ///
    /// The JSON is written to a temporary file in the slots directory and
    /// renamed into place, so a crash mid-write cannot corrupt an existing
    /// valid save.
    pub fn save(&self, name: &str) -> Result<()> {
        let path = self.slot_path(name)?;
        fs::create_dir_all(&self.slots_dir)?;

        let json = serde_json::to_vec_pretty(&self.entries)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.slots_dir)?;
        tmp.write_all(&json)?;
        tmp.persist(&path).map_err(|e| Error::Io(e.error))?;

        info!(slot = name, tracks = self.entries.len(), "playlist saved");
        Ok(())
    }

    /// Replace the entries wholesale with the contents of the named slot.
    ///
    /// Fails with `PlaylistNotFound` when no such slot exists and
    /// `CorruptPlaylist` when the slot cannot be parsed; either way the
    /// current entries are untouched.
    pub fn load(&mut self, name: &str) -> Result<usize> {
        // A name that cannot map to a slot file cannot name a saved
        // playlist either, so for load that is simply "not found".
        let path = self
            .slot_path(name)
            .map_err(|_| Error::PlaylistNotFound(name.to_string()))?;
        let data = match fs::read(&path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::PlaylistNotFound(name.to_string()));
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let loaded: Vec<TrackRecord> =
            serde_json::from_slice(&data).map_err(|e| Error::CorruptPlaylist {
                name: name.to_string(),
                source: e,
            })?;

        let count = loaded.len();
        self.entries = loaded;
        info!(slot = name, tracks = count, "playlist loaded");
        Ok(count)
    }

    /// Names of all saved slots, sorted.
    pub fn slots(&self) -> Vec<String> {
        let mut names: Vec<String> = match fs::read_dir(&self.slots_dir) {
            Ok(rd) => rd
                .filter_map(|e| e.ok())
                .filter_map(|e| {
                    let path = e.path();
                    if path.extension().and_then(|s| s.to_str()) == Some("json") {
                        path.file_stem()
                            .and_then(|s| s.to_str())
                            .map(|s| s.to_string())
                    } else {
                        None
                    }
                })
                .collect(),
            Err(e) => {
                warn!(dir = %self.slots_dir.display(), error = %e, "cannot list playlist slots");
                Vec::new()
            }
        };
        names.sort();
        names
    }

    fn slot_path(&self, name: &str) -> Result<PathBuf> {
        let sanitized = sanitize_slot_name(name)
            .ok_or_else(|| Error::InvalidSlotName(name.to_string()))?;
        Ok(self.slots_dir.join(format!("{sanitized}.json")))
    }
}

/// Reduce a user-supplied slot name to a filename-safe form.
///
/// Returns `None` when nothing safe remains (empty or all-separator names),
/// so a name can never escape the slots directory.
fn sanitize_slot_name(name: &str) -> Option<String> {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        None
    } else {
        Some(cleaned)
    }
}

/// Hydrate a fresh store from a startup slot, tolerating every failure.
///
/// Startup hydration is best-effort: a missing or unreadable slot logs a
/// warning and leaves the store empty, it never prevents the app starting.
pub fn hydrate(store: &mut PlaylistStore, slot: &str) {
    match store.load(slot) {
        Ok(count) => info!(slot, tracks = count, "startup playlist hydrated"),
        Err(e) => warn!(slot, error = %e, "startup playlist not loaded"),
    }
}

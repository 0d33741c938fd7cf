//! Crate-wide error types.

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the user at the boundary of the triggering action.
///
/// None of these are fatal: the runtime reports them in the status line and
/// leaves prior in-memory state intact.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Turning an upload, path or link into a playable track failed.
    #[error("resolution failed: {0}")]
    Resolution(String),

    /// A playlist index was out of range.
    #[error("invalid track index: {index} (playlist has {len} tracks)")]
    InvalidIndex { index: usize, len: usize },

    /// No saved playlist exists under the given name.
    #[error("no saved playlist named {0:?}")]
    PlaylistNotFound(String),

    /// The slot name cannot be turned into a filename.
    #[error("invalid playlist name: {0:?}")]
    InvalidSlotName(String),

    /// A saved playlist exists but could not be parsed.
    #[error("saved playlist {name:?} is corrupt: {source}")]
    CorruptPlaylist {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

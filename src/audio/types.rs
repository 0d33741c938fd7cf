//! Audio-related small types and handles.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
pub enum AudioCmd {
    /// Start playing the given file, replacing whatever is playing.
    Play(PathBuf),
    /// Stop playback immediately.
    Stop,
    /// Toggle pause/resume.
    TogglePause,
    /// Set the output volume, 0..=100.
    SetVolume(u8),
    /// Quit the audio thread.
    Quit,
}

/// Signals the engine sends back to the orchestrating layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The current file played to its end.
    TrackEnded,
    /// The file could not be opened or decoded.
    TrackFailed(String),
}

#[derive(Debug, Clone)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Elapsed playback time for the current file.
    pub elapsed: Duration,
    /// Whether the engine is actually producing audio right now.
    pub playing: bool,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            elapsed: Duration::ZERO,
            playing: false,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Map a 0..=100 volume level onto rodio's linear gain.
pub(crate) fn volume_gain(volume: u8) -> f32 {
    f32::from(volume.min(100)) / 100.0
}

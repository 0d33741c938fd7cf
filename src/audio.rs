//! Playback engine: a dedicated thread owning the audio output.
//!
//! The engine plays exactly one file at a time; track ordering and the
//! decision of what to play next belong to the playback session. Commands
//! go in over an mpsc channel, end-of-track and failure signals come back
//! out as `EngineEvent`s.

mod player;
mod sink;
mod thread;
mod types;

pub use player::*;
pub use types::*;

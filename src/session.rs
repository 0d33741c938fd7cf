//! Playback session state machine.
//!
//! The session owns the playback cursor into a `PlaylistStore` and the
//! intended play/pause state. It never talks to the audio engine directly;
//! the runtime feeds it user actions and engine signals and acts on the
//! transitions it reports.

mod model;

pub use model::*;

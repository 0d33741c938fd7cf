//! Playlist model and persistence.
//!
//! A `PlaylistStore` is an ordered list of `TrackRecord`s; insertion order is
//! playback order. Stores are saved to and loaded from named JSON slots.

mod model;
mod store;

pub use model::*;
pub use store::*;

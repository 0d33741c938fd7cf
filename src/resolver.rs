//! Track resolution: turning user input into playable tracks.
//!
//! Three inputs are supported: a path to an existing audio file, raw
//! uploaded bytes with a filename, and a remote link handed to an external
//! extractor. All of them produce a `ResolvedTrack` ready to be appended to
//! the playlist, or fail without leaving partial files behind.

mod local;
mod remote;
mod tags;

pub use local::*;
pub use remote::*;
pub use tags::*;

#[cfg(test)]
mod tests;

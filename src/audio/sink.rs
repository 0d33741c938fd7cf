//! Utilities for creating `rodio` sinks.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink};

/// Create a playing `Sink` for the file at `path` with the given gain.
///
/// Open/decode failures are returned as messages, not panics; a dangling
/// playlist entry is only discovered here, at play time.
pub(super) fn create_sink(handle: &OutputStream, path: &Path, gain: f32) -> Result<Sink, String> {
    let file =
        File::open(path).map_err(|e| format!("cannot open {}: {e}", path.display()))?;

    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| format!("cannot decode {}: {e}", path.display()))?;

    let sink = Sink::connect_new(handle.mixer());
    sink.set_volume(gain);
    sink.append(source);
    Ok(sink)
}

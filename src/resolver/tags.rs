use std::path::Path;

use lofty::prelude::*;
use lofty::probe::Probe;
use tracing::debug;

use crate::error::{Error, Result};

/// Tag metadata read from an audio file. All fields optional.
#[derive(Debug, Clone, Default)]
pub struct TagInfo {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_secs: Option<f64>,
}

/// Read tag metadata from `path`.
///
/// An unreadable or missing file is an error; an unreadable tag block is
/// not — the file may still decode fine, so that case yields empty
/// `TagInfo` and the caller falls back to the filename.
pub fn read_tags(path: &Path) -> Result<TagInfo> {
    if !path.is_file() {
        return Err(Error::Resolution(format!(
            "no such file: {}",
            path.display()
        )));
    }

    let tagged = match Probe::open(path).and_then(|p| p.read()) {
        Ok(t) => t,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "tag block unreadable");
            return Ok(TagInfo::default());
        }
    };

    let mut info = TagInfo {
        duration_secs: Some(tagged.properties().duration().as_secs_f64()),
        ..TagInfo::default()
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        info.title = nonempty(tag.title().as_deref());
        info.artist = nonempty(tag.artist().as_deref());
        info.album = nonempty(tag.album().as_deref());
    }

    Ok(info)
}

fn nonempty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Title used when the tags had none: the file stem.
pub fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}

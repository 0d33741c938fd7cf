use std::env;
use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/vibes/config.toml` or `~/.config/vibes/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `VIBES__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub library: LibrarySettings,
    pub extractor: ExtractorSettings,
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Where uploads and extracted audio land.
    pub downloads_dir: PathBuf,
    /// Where named playlist slots are kept.
    pub playlists_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        let data = data_home().join("vibes");
        Self {
            downloads_dir: data.join("downloads"),
            playlists_dir: data.join("playlists"),
        }
    }
}

/// `$XDG_DATA_HOME` or `~/.local/share`, with a relative-path fallback so a
/// missing HOME still yields something usable.
fn data_home() -> PathBuf {
    if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        PathBuf::from(".")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks when importing a directory.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorSettings {
    /// External command that turns a link into a local audio file.
    pub command: String,
    /// Extra arguments appended to every extractor invocation.
    pub extra_args: Vec<String>,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            command: "yt-dlp".to_string(),
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Initial volume, 0..=100.
    pub volume: u8,
    /// Step applied by the volume keys.
    pub volume_step: u8,
    /// Playlist slot to hydrate at startup, if any.
    pub startup_slot: Option<String>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 80,
            volume_step: 5,
            startup_slot: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ vibes ~ ".to_string(),
        }
    }
}

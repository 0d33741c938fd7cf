use std::fs;

use tracing::warn;

use crate::config;
use crate::playlist::{self, PlaylistStore};

pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                warn!("invalid config, using defaults: {msg}");
                eprintln!("vibes: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            warn!("failed to load config, using defaults: {e}");
            eprintln!("vibes: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}

pub fn prepare_storage(settings: &config::Settings) -> std::io::Result<()> {
    fs::create_dir_all(&settings.storage.downloads_dir)?;
    fs::create_dir_all(&settings.storage.playlists_dir)?;
    Ok(())
}

/// Build the playlist store, hydrating the configured startup slot if any.
pub fn build_store(settings: &config::Settings) -> PlaylistStore {
    let mut store = PlaylistStore::new(settings.storage.playlists_dir.clone());
    if let Some(slot) = settings.playback.startup_slot.as_deref() {
        playlist::hydrate(&mut store, slot);
    }
    store
}

use std::fs;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::{AudioPlayer, EngineEvent};
use crate::config;
use crate::error::Error;
use crate::playlist::{PlaylistStore, ResolvedTrack};
use crate::resolver::{self, Extractor};
use crate::session::{Direction, PlaybackSession};
use crate::ui;

/// What the bottom input line is currently asking for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PromptKind {
    AddFile,
    ImportDir,
    UploadFile,
    AddLink,
    Save,
    Load,
}

/// An in-progress line of user input.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

/// State tracked by the runtime event loop across iterations.
pub struct ViewState {
    /// Cursor position in the playlist view.
    pub selected: usize,
    /// One-line message shown instead of the now-playing text.
    pub status: Option<String>,
    pub prompt: Option<Prompt>,
    pub volume: u8,
    /// Playlist index of the file currently loaded in the engine, if any.
    /// Distinguishes "paused, resumable" from "stopped, must reload".
    pub engine_loaded: Option<usize>,
    /// Internal two-key prefix state used for `gg` handling.
    pending_gg: bool,
}

impl ViewState {
    pub fn new(volume: u8) -> Self {
        Self {
            selected: 0,
            status: None,
            prompt: None,
            volume,
            engine_loaded: None,
            pending_gg: false,
        }
    }

    fn clamp_selected(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// Main terminal event loop: drains engine events, draws, handles input.
/// Returns `Ok(())` when shutdown is requested.
///
/// Every user action runs to completion before the next key is read, so no
/// two mutations of the store or session ever interleave.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    store: &mut PlaylistStore,
    session: &mut PlaybackSession,
    extractor: &Extractor,
    player: &AudioPlayer,
    state: &mut ViewState,
) -> Result<(), Box<dyn std::error::Error>> {
    let playback = player.playback_handle();

    loop {
        while let Some(ev) = player.try_recv_event() {
            match ev {
                EngineEvent::TrackEnded => {
                    state.engine_loaded = None;
                    if let Some(next) = session.on_track_ended(store.len()) {
                        play_index(next, store, player, state);
                    }
                }
                EngineEvent::TrackFailed(msg) => {
                    state.engine_loaded = None;
                    if session.is_playing() {
                        session.toggle_play_pause();
                    }
                    state.status = Some(msg);
                }
            }
        }

        let elapsed = playback
            .lock()
            .ok()
            .map(|info| info.elapsed)
            .unwrap_or(Duration::ZERO);
        terminal.draw(|f| {
            ui::draw(f, &settings.ui.header_text, store, session, state, elapsed)
        })?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        if state.prompt.is_some() {
            state.pending_gg = false;
            match key.code {
                KeyCode::Esc => {
                    state.prompt = None;
                }
                KeyCode::Backspace => {
                    if let Some(p) = state.prompt.as_mut() {
                        p.input.pop();
                    }
                }
                KeyCode::Enter => {
                    let prompt = state.prompt.take();
                    if let Some(p) = prompt {
                        submit_prompt(p, terminal, settings, store, session, extractor, player, state)?;
                    }
                }
                KeyCode::Char(c) => {
                    // Keep it simple: accept printable characters only.
                    if !c.is_control() {
                        if let Some(p) = state.prompt.as_mut() {
                            p.input.push(c);
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        // Any plain key clears a stale status message.
        state.status = None;

        match key.code {
            KeyCode::Char('q') => {
                break;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                state.pending_gg = false;
                if !store.is_empty() {
                    state.selected = (state.selected + 1) % store.len();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                state.pending_gg = false;
                if !store.is_empty() {
                    state.selected = (state.selected + store.len() - 1) % store.len();
                }
            }
            KeyCode::Char('g') => {
                if state.pending_gg {
                    state.pending_gg = false;
                    state.selected = 0;
                } else {
                    state.pending_gg = true;
                }
            }
            KeyCode::Char('G') => {
                state.pending_gg = false;
                if !store.is_empty() {
                    state.selected = store.len() - 1;
                }
            }
            KeyCode::Enter => {
                state.pending_gg = false;
                match session.select(state.selected, store.len()) {
                    Ok(()) => play_index(state.selected, store, player, state),
                    Err(e) => state.status = Some(e.to_string()),
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('p') => {
                state.pending_gg = false;
                toggle_play_pause(store, session, player, state);
            }
            KeyCode::Char('h') | KeyCode::Char('l') => {
                state.pending_gg = false;
                let direction = if key.code == KeyCode::Char('l') {
                    Direction::Next
                } else {
                    Direction::Previous
                };
                if let Some(next) = session.advance(direction, store.len()) {
                    play_index(next, store, player, state);
                    state.selected = next;
                }
            }
            KeyCode::Char('d') => {
                state.pending_gg = false;
                remove_selected(store, session, player, state);
            }
            KeyCode::Char('c') => {
                state.pending_gg = false;
                store.clear();
                *session = PlaybackSession::new(0);
                player.stop();
                state.engine_loaded = None;
                state.selected = 0;
                state.status = Some("Playlist cleared".to_string());
            }
            KeyCode::Char('a') => open_prompt(state, PromptKind::AddFile),
            KeyCode::Char('A') => open_prompt(state, PromptKind::ImportDir),
            KeyCode::Char('i') => open_prompt(state, PromptKind::UploadFile),
            KeyCode::Char('u') => open_prompt(state, PromptKind::AddLink),
            KeyCode::Char('s') => open_prompt(state, PromptKind::Save),
            KeyCode::Char('o') => {
                let slots = store.slots();
                state.status = if slots.is_empty() {
                    Some("No saved playlists".to_string())
                } else {
                    Some(format!("Saved playlists: {}", slots.join(", ")))
                };
                open_prompt(state, PromptKind::Load);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                state.pending_gg = false;
                state.volume = state
                    .volume
                    .saturating_add(settings.playback.volume_step)
                    .min(100);
                player.set_volume(state.volume);
            }
            KeyCode::Char('-') => {
                state.pending_gg = false;
                state.volume = state.volume.saturating_sub(settings.playback.volume_step);
                player.set_volume(state.volume);
            }
            _ => {
                state.pending_gg = false;
            }
        }
    }

    Ok(())
}

fn open_prompt(state: &mut ViewState, kind: PromptKind) {
    state.pending_gg = false;
    state.prompt = Some(Prompt {
        kind,
        input: String::new(),
    });
}

/// Hand the file at `index` to the engine.
fn play_index(
    index: usize,
    store: &PlaylistStore,
    player: &AudioPlayer,
    state: &mut ViewState,
) {
    if let Some(track) = store.get(index) {
        player.play(track.source_path());
        state.engine_loaded = Some(index);
    }
}

/// Reconcile the session's intent with what the engine has loaded: resume
/// the paused file when it is still current, otherwise start it fresh.
fn toggle_play_pause(
    store: &PlaylistStore,
    session: &mut PlaybackSession,
    player: &AudioPlayer,
    state: &mut ViewState,
) {
    let before = session.current_index();
    session.toggle_play_pause();
    let Some(index) = before else {
        return;
    };

    if session.is_playing() && state.engine_loaded != Some(index) {
        play_index(index, store, player, state);
    } else {
        player.toggle_pause();
    }
}

fn remove_selected(
    store: &mut PlaylistStore,
    session: &mut PlaybackSession,
    player: &AudioPlayer,
    state: &mut ViewState,
) {
    let index = state.selected;
    match store.remove_at(index) {
        Ok(removed) => {
            session.on_entry_removed(index, store.len());

            // The engine may be playing the removed file, or a file whose
            // playlist index just shifted down.
            match state.engine_loaded {
                Some(loaded) if loaded == index => {
                    player.stop();
                    state.engine_loaded = None;
                }
                Some(loaded) if loaded > index => {
                    state.engine_loaded = Some(loaded - 1);
                }
                _ => {}
            }

            state.clamp_selected(store.len());
            state.status = Some(format!("Removed {}", removed.display()));
        }
        Err(e) => state.status = Some(e.to_string()),
    }
}

/// Append a resolved track, waking an `Empty` session if this was the first
/// entry.
fn append_resolved(
    track: ResolvedTrack,
    store: &mut PlaylistStore,
    session: &mut PlaybackSession,
) {
    store.append(track);
    if session.current_index().is_none() {
        *session = PlaybackSession::new(store.len());
    }
}

fn submit_prompt(
    prompt: Prompt,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    store: &mut PlaylistStore,
    session: &mut PlaybackSession,
    extractor: &Extractor,
    player: &AudioPlayer,
    state: &mut ViewState,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = prompt.input.trim().to_string();
    if input.is_empty() {
        return Ok(());
    }

    match prompt.kind {
        PromptKind::AddFile => match resolver::resolve_local(Path::new(&input)) {
            Ok(track) => {
                let title = track.title.clone();
                append_resolved(track, store, session);
                state.status = Some(format!("Added {title}"));
            }
            Err(e) => state.status = Some(e.to_string()),
        },
        PromptKind::ImportDir => {
            match resolver::resolve_dir(Path::new(&input), &settings.library) {
                Ok(tracks) => {
                    let count = tracks.len();
                    for track in tracks {
                        append_resolved(track, store, session);
                    }
                    state.status = Some(format!("Imported {count} tracks"));
                }
                Err(e) => state.status = Some(e.to_string()),
            }
        }
        PromptKind::UploadFile => {
            // Unlike `a`, this copies the file into the downloads directory
            // first, so the entry survives the source going away.
            let path = Path::new(&input);
            let filename = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("upload.mp3")
                .to_string();
            let result = fs::read(path)
                .map_err(Error::from)
                .and_then(|bytes| {
                    resolver::store_upload(&bytes, &filename, &settings.storage.downloads_dir)
                });
            match result {
                Ok(track) => {
                    let title = track.title.clone();
                    append_resolved(track, store, session);
                    state.status = Some(format!("Imported {title}"));
                }
                Err(e) => state.status = Some(e.to_string()),
            }
        }
        PromptKind::AddLink => {
            // Extraction is network-bound and can take seconds; show what is
            // happening before blocking on it. No other mutation can start
            // until it finishes.
            state.status = Some(format!("Resolving {input} ..."));
            let elapsed = Duration::ZERO;
            terminal.draw(|f| {
                ui::draw(f, &settings.ui.header_text, store, session, state, elapsed)
            })?;

            match extractor.resolve_remote(&input) {
                Ok(track) => {
                    let title = track.title.clone();
                    append_resolved(track, store, session);
                    state.status = Some(format!("Added {title}"));
                }
                Err(e) => state.status = Some(e.to_string()),
            }
        }
        PromptKind::Save => match store.save(&input) {
            Ok(()) => state.status = Some(format!("Saved playlist {input:?}")),
            Err(e) => state.status = Some(e.to_string()),
        },
        PromptKind::Load => match store.load(&input) {
            Ok(count) => {
                player.stop();
                state.engine_loaded = None;
                *session = PlaybackSession::new(store.len());
                state.selected = 0;
                state.status = Some(format!("Loaded {count} tracks from {input:?}"));
            }
            Err(e) => state.status = Some(e.to_string()),
        },
    }

    Ok(())
}

//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::time::Duration;

use crate::playlist::{PlaylistStore, TrackKind, TrackRecord};
use crate::runtime::{Prompt, PromptKind, ViewState};
use crate::session::PlaybackSession;

/// Render the controls help line.
fn controls_text(volume: u8) -> String {
    format!(
        "[j/k] up/down | [enter] play | [space/p] play/pause | [h/l] prev/next | \
         [a] add file | [A] import dir | [i] import copy | [u] add link | [d] remove | [c] clear | \
         [s] save | [o] load | [-/+] vol {volume}% | [q] quit"
    )
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Interpret a record's `duration_secs` for display.
///
/// Hand-edited slots can carry any finite JSON number here, so anything
/// that is not a positive, in-range duration renders as "unknown".
fn track_duration(secs: Option<f64>) -> Option<Duration> {
    secs.filter(|s| *s > 0.0)
        .and_then(|s| Duration::try_from_secs_f64(s).ok())
}

fn track_line(track: &TrackRecord) -> String {
    let mark = match track.kind {
        TrackKind::Local => ' ',
        TrackKind::Remote => '@',
    };
    match track_duration(track.duration_secs) {
        Some(d) => format!("{mark} {}  [{}]", track.display(), format_mmss(d)),
        None => format!("{mark} {}", track.display()),
    }
}

fn now_playing_text(
    store: &PlaylistStore,
    session: &PlaybackSession,
    elapsed: Duration,
) -> String {
    let Some(index) = session.current_index() else {
        return "Playlist is empty".to_string();
    };
    let Some(track) = store.get(index) else {
        return "Nothing selected".to_string();
    };

    let state = if session.is_playing() { "▶" } else { "⏸" };
    let time = match track_duration(track.duration_secs) {
        Some(total) => format!(" {} / {}", format_mmss(elapsed), format_mmss(total)),
        None => format!(" {}", format_mmss(elapsed)),
    };
    format!("{state} {}{time}", track.display())
}

fn prompt_title(kind: PromptKind) -> &'static str {
    match kind {
        PromptKind::AddFile => "Add file (path)",
        PromptKind::ImportDir => "Import directory (path)",
        PromptKind::UploadFile => "Import file into library (path)",
        PromptKind::AddLink => "Add link (URL)",
        PromptKind::Save => "Save playlist as",
        PromptKind::Load => "Load playlist",
    }
}

/// Draw one frame: header, playlist, now-playing/status, prompt or help bar.
pub fn draw(
    f: &mut Frame,
    header_text: &str,
    store: &PlaylistStore,
    session: &PlaybackSession,
    view: &ViewState,
    elapsed: Duration,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let header = Paragraph::new(header_text.to_string())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" vibes "));
    f.render_widget(header, chunks[0]);

    let playing_index = session.current_index().filter(|_| session.is_playing());
    let items: Vec<ListItem> = store
        .entries()
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let mut line = track_line(track);
            if Some(i) == playing_index {
                line = format!("♪{}", &line[1..]);
            }
            let mut item = ListItem::new(Line::from(line));
            if i == view.selected {
                item = item.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            item
        })
        .collect();

    let title = format!(" playlist ({} tracks) ", store.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, chunks[1]);

    // Status line: an explicit message wins over the now-playing text.
    let status = match &view.status {
        Some(msg) => msg.clone(),
        None => now_playing_text(store, session, elapsed),
    };
    let status = Paragraph::new(status)
        .block(Block::default().borders(Borders::ALL).title(" status "));
    f.render_widget(status, chunks[2]);

    let bottom = match &view.prompt {
        Some(Prompt { kind, input }) => Paragraph::new(format!("{input}█"))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} (enter to confirm, esc to cancel) ", prompt_title(*kind))),
            )
            .bold(),
        None => Paragraph::new(controls_text(view.volume))
            .block(Block::default().borders(Borders::ALL).title(" controls ")),
    };
    f.render_widget(bottom, chunks[3]);
}

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::AudioPlayer;
use crate::resolver::Extractor;
use crate::session::PlaybackSession;

mod event_loop;
mod startup;

pub use event_loop::{Prompt, PromptKind, ViewState};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = startup::load_settings();
    startup::prepare_storage(&settings)?;

    let mut store = startup::build_store(&settings);
    let mut session = PlaybackSession::new(store.len());

    let extractor = Extractor::new(
        settings.extractor.clone(),
        settings.storage.downloads_dir.clone(),
    );
    let player = AudioPlayer::new(settings.playback.volume);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::ViewState::new(settings.playback.volume);
        event_loop::run(
            &mut terminal,
            &settings,
            &mut store,
            &mut session,
            &extractor,
            &player,
            &mut state,
        )
    })();

    player.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

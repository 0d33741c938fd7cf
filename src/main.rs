use std::fs::OpenOptions;

use tracing_subscriber::EnvFilter;

mod audio;
mod config;
mod error;
mod playlist;
mod resolver;
mod runtime;
mod session;
mod ui;

/// Send tracing output to the file named by `VIBES_LOG`, if set.
///
/// The terminal belongs to the TUI, so there is nowhere sensible to log by
/// default; without `VIBES_LOG` the subscriber is simply not installed.
fn init_logging() {
    let Some(path) = std::env::var_os("VIBES_LOG") else {
        return;
    };

    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(e) => {
            eprintln!("vibes: cannot open log file {path:?}: {e}");
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    runtime::run()
}

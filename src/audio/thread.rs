use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};
use tracing::warn;

use super::sink::create_sink;
use super::types::{AudioCmd, EngineEvent, PlaybackHandle, volume_gain};

/// Spawn the playback thread.
///
/// The thread owns the output stream and the current sink. It wakes every
/// 200 ms to refresh the shared `PlaybackInfo` and to detect that the
/// current file has played to its end, which it reports as
/// `EngineEvent::TrackEnded`.
pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback: PlaybackHandle,
    events: Sender<EngineEvent>,
    initial_volume: u8,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut sink: Option<Sink> = None;
        let mut paused = true;
        let mut gain = volume_gain(initial_volume);

        // Track start time and accumulated elapsed when paused.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        let publish = |playing: bool, elapsed: Duration| {
            if let Ok(mut info) = playback.lock() {
                info.playing = playing;
                info.elapsed = elapsed;
            }
        };

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(AudioCmd::Play(path)) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    match create_sink(&stream, &path, gain) {
                        Ok(new_sink) => {
                            new_sink.play();
                            sink = Some(new_sink);
                            paused = false;
                            started_at = Some(Instant::now());
                            accumulated = Duration::ZERO;
                            publish(true, Duration::ZERO);
                        }
                        Err(msg) => {
                            warn!(path = %path.display(), "playback failed: {msg}");
                            paused = true;
                            started_at = None;
                            accumulated = Duration::ZERO;
                            publish(false, Duration::ZERO);
                            let _ = events.send(EngineEvent::TrackFailed(msg));
                        }
                    }
                }
                Ok(AudioCmd::Stop) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    paused = true;
                    started_at = None;
                    accumulated = Duration::ZERO;
                    publish(false, Duration::ZERO);
                }
                Ok(AudioCmd::TogglePause) => {
                    if let Some(ref s) = sink {
                        if paused {
                            s.play();
                            started_at = Some(Instant::now());
                        } else {
                            s.pause();
                            if let Some(st) = started_at.take() {
                                accumulated += st.elapsed();
                            }
                        }
                        paused = !paused;
                        publish(!paused, current_elapsed(accumulated, started_at));
                    }
                }
                Ok(AudioCmd::SetVolume(v)) => {
                    gain = volume_gain(v);
                    if let Some(ref s) = sink {
                        s.set_volume(gain);
                    }
                }
                Ok(AudioCmd::Quit) => {
                    if let Some(ref s) = sink {
                        s.stop();
                    }
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    let ended = sink.as_ref().is_some_and(|s| !paused && s.empty());
                    if ended {
                        // Played to the end: report it and go idle. The
                        // session decides what, if anything, plays next.
                        sink = None;
                        paused = true;
                        started_at = None;
                        accumulated = Duration::ZERO;
                        publish(false, Duration::ZERO);
                        let _ = events.send(EngineEvent::TrackEnded);
                    } else if sink.is_some() {
                        publish(!paused, current_elapsed(accumulated, started_at));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

fn current_elapsed(accumulated: Duration, started_at: Option<Instant>) -> Duration {
    match started_at {
        Some(st) => accumulated + st.elapsed(),
        None => accumulated,
    }
}

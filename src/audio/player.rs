use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, EngineEvent, PlaybackHandle, PlaybackInfo};

/// Handle to the playback thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<EngineEvent>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(initial_volume: u8) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let handle = spawn_audio_thread(rx, playback.clone(), event_tx, initial_volume);

        Self {
            tx,
            events: event_rx,
            playback,
            join: Mutex::new(Some(handle)),
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn play(&self, path: PathBuf) {
        let _ = self.tx.send(AudioCmd::Play(path));
    }

    pub fn stop(&self) {
        let _ = self.tx.send(AudioCmd::Stop);
    }

    pub fn toggle_pause(&self) {
        let _ = self.tx.send(AudioCmd::TogglePause);
    }

    pub fn set_volume(&self, volume: u8) {
        let _ = self.tx.send(AudioCmd::SetVolume(volume));
    }

    /// Next pending engine event, if any. Never blocks.
    pub fn try_recv_event(&self) -> Option<EngineEvent> {
        match self.events.try_recv() {
            Ok(ev) => Some(ev),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Ask the thread to quit and wait for it.
    pub fn shutdown(&self) {
        let _ = self.tx.send(AudioCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

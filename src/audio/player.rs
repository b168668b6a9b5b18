use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, EngineEvent, MediaEngine};

/// Handle to the audio thread. Commands go in, events come out of the
/// receiver returned by `new`.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Option<JoinHandle<()>>,
}

impl AudioPlayer {
    pub fn new() -> (Self, Receiver<EngineEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        let join = spawn_audio_thread(rx, event_tx);
        (
            Self {
                tx,
                join: Some(join),
            },
            event_rx,
        )
    }

    pub fn send(&self, cmd: AudioCmd) {
        if let Err(e) = self.tx.send(cmd) {
            log::warn!("audio thread is gone, dropped {:?}", e.0);
        }
    }

    /// Stop playback and wait for the audio thread to exit.
    pub fn shutdown(&mut self) {
        if let Some(h) = self.join.take() {
            let _ = self.tx.send(AudioCmd::Quit);
            let _ = h.join();
        }
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl MediaEngine for AudioPlayer {
    fn load(&mut self, path: Option<&Path>) {
        self.send(AudioCmd::Load(path.map(Path::to_path_buf)));
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn stop(&mut self) {
        self.send(AudioCmd::Stop);
    }

    fn set_position(&mut self, position_ms: u64) {
        self.send(AudioCmd::SetPosition(position_ms));
    }

    fn set_volume(&mut self, volume: u8) {
        self.send(AudioCmd::SetVolume(volume));
    }
}

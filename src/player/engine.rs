use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::player::adapter::PlayerEngine;
use crate::player::clock::EngineClock;
use crate::player::commands::PlayerCommand;

/// Handle to the engine thread. Commands are queued; time, duration and
/// volume are read straight from the shared clock.
#[derive(Clone)]
pub struct ThreadEngine {
    cmd_tx: Sender<PlayerCommand>,
    clock: Arc<EngineClock>,
}

impl ThreadEngine {
    pub fn new(cmd_tx: Sender<PlayerCommand>, clock: Arc<EngineClock>) -> Self {
        Self { cmd_tx, clock }
    }

    pub fn is_muted(&self) -> bool {
        self.clock.is_muted()
    }

    fn send(&self, cmd: PlayerCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::warn!("engine thread is gone, command dropped");
        }
    }
}

impl PlayerEngine for ThreadEngine {
    fn play(&mut self) {
        self.send(PlayerCommand::Play);
    }

    fn pause(&mut self) {
        self.send(PlayerCommand::Pause);
    }

    fn stop(&mut self) {
        self.send(PlayerCommand::Stop);
    }

    fn seek(&mut self, time_secs: f64, allow_seek_ahead: bool) {
        self.send(PlayerCommand::Seek {
            position: Duration::from_secs_f64(time_secs.max(0.0)),
            allow_seek_ahead,
        });
    }

    fn current_time(&self) -> f64 {
        self.clock.position_secs()
    }

    fn duration(&self) -> f64 {
        self.clock.duration_secs()
    }

    fn volume(&self) -> u8 {
        self.clock.volume()
    }

    fn set_volume(&mut self, percent: u8) {
        self.clock.set_volume(percent);
    }

    fn mute(&mut self) {
        self.clock.set_muted(true);
    }

    fn unmute(&mut self) {
        self.clock.set_muted(false);
    }
}

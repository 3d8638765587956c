use crate::player::commands::codes;
use crate::widget::error::ControlError;

/// Engine-level playback state, after translating the engine's raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl EngineState {
    /// `Some(is_playing)` for states that decide it, `None` for the rest.
    pub fn is_playing(&self) -> Option<bool> {
        match self {
            EngineState::Playing => Some(true),
            EngineState::Paused | EngineState::Ended => Some(false),
            _ => None,
        }
    }
}

/// Translation table from an engine's numeric state codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateCodes {
    pub unstarted: i32,
    pub ended: i32,
    pub playing: i32,
    pub paused: i32,
    pub buffering: i32,
    pub cued: i32,
}

impl StateCodes {
    pub fn translate(&self, code: i32) -> Option<EngineState> {
        match code {
            c if c == self.playing => Some(EngineState::Playing),
            c if c == self.paused => Some(EngineState::Paused),
            c if c == self.ended => Some(EngineState::Ended),
            c if c == self.buffering => Some(EngineState::Buffering),
            c if c == self.cued => Some(EngineState::Cued),
            c if c == self.unstarted => Some(EngineState::Unstarted),
            _ => None,
        }
    }
}

impl Default for StateCodes {
    fn default() -> Self {
        Self {
            unstarted: codes::UNSTARTED,
            ended: codes::ENDED,
            playing: codes::PLAYING,
            paused: codes::PAUSED,
            buffering: codes::BUFFERING,
            cued: codes::CUED,
        }
    }
}

/// The capabilities the widget needs from a playback engine.
///
/// Calls are synchronous and local. Command results are not awaited; the
/// engine reports the outcome through its state codes.
pub trait PlayerEngine {
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek(&mut self, time_secs: f64, allow_seek_ahead: bool);
    fn current_time(&self) -> f64;
    fn duration(&self) -> f64;
    fn volume(&self) -> u8;
    fn set_volume(&mut self, percent: u8);
    fn mute(&mut self);
    fn unmute(&mut self);
}

/// Guarded wrapper around an engine handle that only exists after `ready`.
pub struct EmbeddedPlayer<E> {
    handle: Option<E>,
    codes: StateCodes,
}

impl<E: PlayerEngine> EmbeddedPlayer<E> {
    pub fn new(codes: StateCodes) -> Self {
        Self {
            handle: None,
            codes,
        }
    }

    pub fn ready(&mut self, handle: E) {
        self.handle = Some(handle);
    }

    pub fn is_ready(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<&E> {
        self.handle.as_ref()
    }

    pub fn handle_mut(&mut self) -> Option<&mut E> {
        self.handle.as_mut()
    }

    /// Releases the handle, returning it to the caller.
    pub fn release(&mut self) -> Option<E> {
        self.handle.take()
    }

    pub fn state_changed(&self, code: i32) -> Option<EngineState> {
        let state = self.codes.translate(code);
        if state.is_none() {
            tracing::debug!(code, "unrecognised engine state code");
        }
        state
    }

    fn with_handle<T>(&mut self, f: impl FnOnce(&mut E) -> T) -> Result<T, ControlError> {
        self.handle
            .as_mut()
            .map(f)
            .ok_or(ControlError::AdapterNotReady)
    }

    pub fn play(&mut self) -> Result<(), ControlError> {
        self.with_handle(|e| e.play())
    }

    pub fn pause(&mut self) -> Result<(), ControlError> {
        self.with_handle(|e| e.pause())
    }

    pub fn stop(&mut self) -> Result<(), ControlError> {
        self.with_handle(|e| e.stop())
    }

    pub fn seek(&mut self, time_secs: f64, allow_seek_ahead: bool) -> Result<(), ControlError> {
        self.with_handle(|e| e.seek(time_secs, allow_seek_ahead))
    }

    pub fn set_volume(&mut self, percent: u8) -> Result<(), ControlError> {
        self.with_handle(|e| e.set_volume(percent.min(100)))
    }

    pub fn mute(&mut self) -> Result<(), ControlError> {
        self.with_handle(|e| e.mute())
    }

    pub fn unmute(&mut self) -> Result<(), ControlError> {
        self.with_handle(|e| e.unmute())
    }

    pub fn current_time(&self) -> Result<f64, ControlError> {
        self.handle
            .as_ref()
            .map(|e| e.current_time())
            .ok_or(ControlError::AdapterNotReady)
    }

    pub fn duration(&self) -> Result<f64, ControlError> {
        self.handle
            .as_ref()
            .map(|e| e.duration())
            .ok_or(ControlError::AdapterNotReady)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingEngine {
        plays: usize,
        volume: u8,
    }

    impl PlayerEngine for CountingEngine {
        fn play(&mut self) {
            self.plays += 1;
        }
        fn pause(&mut self) {}
        fn stop(&mut self) {}
        fn seek(&mut self, _time_secs: f64, _allow_seek_ahead: bool) {}
        fn current_time(&self) -> f64 {
            3.5
        }
        fn duration(&self) -> f64 {
            10.0
        }
        fn volume(&self) -> u8 {
            self.volume
        }
        fn set_volume(&mut self, percent: u8) {
            self.volume = percent;
        }
        fn mute(&mut self) {}
        fn unmute(&mut self) {}
    }

    #[test]
    fn test_commands_before_ready_are_skipped() {
        let mut player: EmbeddedPlayer<CountingEngine> = EmbeddedPlayer::new(StateCodes::default());

        assert_eq!(player.play(), Err(ControlError::AdapterNotReady));
        assert_eq!(player.seek(4.0, true), Err(ControlError::AdapterNotReady));
        assert_eq!(player.current_time(), Err(ControlError::AdapterNotReady));
        assert!(!player.is_ready());
    }

    #[test]
    fn test_commands_reach_engine_after_ready() {
        let mut player = EmbeddedPlayer::new(StateCodes::default());
        player.ready(CountingEngine::default());

        assert_eq!(player.play(), Ok(()));
        assert_eq!(player.set_volume(130), Ok(()));
        assert_eq!(player.current_time(), Ok(3.5));
        assert_eq!(player.duration(), Ok(10.0));

        let engine = player.handle().unwrap();
        assert_eq!(engine.plays, 1);
        assert_eq!(engine.volume, 100);
    }

    #[test]
    fn test_default_codes_translate() {
        let player: EmbeddedPlayer<CountingEngine> = EmbeddedPlayer::new(StateCodes::default());

        assert_eq!(player.state_changed(1), Some(EngineState::Playing));
        assert_eq!(player.state_changed(2), Some(EngineState::Paused));
        assert_eq!(player.state_changed(0), Some(EngineState::Ended));
        assert_eq!(player.state_changed(3), Some(EngineState::Buffering));
        assert_eq!(player.state_changed(5), Some(EngineState::Cued));
        assert_eq!(player.state_changed(-1), Some(EngineState::Unstarted));
        assert_eq!(player.state_changed(42), None);
    }

    #[test]
    fn test_injected_codes_are_used() {
        let codes = StateCodes {
            unstarted: 10,
            ended: 11,
            playing: 12,
            paused: 13,
            buffering: 14,
            cued: 15,
        };
        let player: EmbeddedPlayer<CountingEngine> = EmbeddedPlayer::new(codes);

        assert_eq!(player.state_changed(12), Some(EngineState::Playing));
        assert_eq!(player.state_changed(1), None);
    }

    #[test]
    fn test_playing_flag_mapping() {
        assert_eq!(EngineState::Playing.is_playing(), Some(true));
        assert_eq!(EngineState::Paused.is_playing(), Some(false));
        assert_eq!(EngineState::Ended.is_playing(), Some(false));
        assert_eq!(EngineState::Buffering.is_playing(), None);
        assert_eq!(EngineState::Cued.is_playing(), None);
    }
}

//! Custom playback chrome layered over an embedded engine.
//!
//! [`PlayerWidget`] owns the playback state, the progress poller and the
//! scrub gesture, and drives the engine through an [`EmbeddedPlayer`]. It is
//! single-threaded: every method is called from the UI loop, with the current
//! [`Instant`] passed in so ticks and optimistic writes share one clock.

pub mod controls;
pub mod error;
pub mod poller;
pub mod scrub;
pub mod state;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::player::adapter::{EmbeddedPlayer, EngineState, PlayerEngine, StateCodes};
use crate::widget::controls::{Intent, SKIP_SECS, skip_target};
use crate::widget::error::ControlError;
use crate::widget::poller::ProgressPoller;
use crate::widget::scrub::ScrubController;
use crate::widget::state::{PlaybackState, SampleOutcome, WidgetVariant};

/// Options handed to the embedded engine, as 0/1 flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedOptions {
    pub autoplay: u8,
    /// Whether the engine draws its own status line inside the embed region.
    pub controls: u8,
    pub mute: u8,
    pub height: u16,
    pub width: u16,
}

impl EmbedOptions {
    pub fn autoplay(&self) -> bool {
        self.autoplay != 0
    }

    pub fn engine_controls(&self) -> bool {
        self.controls != 0
    }

    pub fn start_muted(&self) -> bool {
        self.mute != 0
    }
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            autoplay: 0,
            controls: 0,
            mute: 0,
            height: 9,
            width: 48,
        }
    }
}

pub struct PlayerWidget<E: PlayerEngine> {
    video_id: String,
    options: EmbedOptions,
    variant: WidgetVariant,
    player: EmbeddedPlayer<E>,
    state: PlaybackState,
    poller: ProgressPoller,
    scrub: ScrubController,
    unmute_pending: bool,
}

impl<E: PlayerEngine> PlayerWidget<E> {
    pub fn new(
        video_id: impl Into<String>,
        options: EmbedOptions,
        variant: WidgetVariant,
        codes: StateCodes,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            options,
            variant,
            player: EmbeddedPlayer::new(codes),
            state: PlaybackState::new(variant),
            poller: ProgressPoller::default(),
            scrub: ScrubController::new(),
            unmute_pending: false,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn options(&self) -> &EmbedOptions {
        &self.options
    }

    pub fn variant(&self) -> WidgetVariant {
        self.variant
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn poller(&self) -> &ProgressPoller {
        &self.poller
    }

    pub fn player(&self) -> &EmbeddedPlayer<E> {
        &self.player
    }

    pub fn is_ready(&self) -> bool {
        self.player.is_ready()
    }

    /// Installs the engine handle once it signals readiness, then applies the
    /// embed options.
    pub fn on_ready(&mut self, handle: E, now: Instant) {
        self.player.ready(handle);
        self.refresh_duration();
        tracing::info!(
            video_id = %self.video_id,
            duration = self.state.duration_secs,
            "player ready"
        );

        note_degraded(
            self.player.set_volume(self.state.volume_percent),
            "initial volume skipped",
        );

        if self.options.start_muted() {
            note_degraded(self.player.mute(), "mute skipped");
            self.unmute_pending = self.options.autoplay();
        }

        if self.options.autoplay() {
            if let Err(err) = self.play(now) {
                tracing::debug!(%err, "autoplay skipped");
            }
        }
    }

    /// Applies an engine state code. Returns the translated state, if known.
    pub fn on_state_changed(&mut self, code: i32, now: Instant) -> Option<EngineState> {
        let engine_state = self.player.state_changed(code)?;

        match engine_state.is_playing() {
            Some(true) => {
                self.state.is_playing = true;
                self.poller.start(now);
                self.refresh_duration();
                if self.unmute_pending {
                    self.unmute_pending = false;
                    note_degraded(self.player.unmute(), "unmute skipped");
                }
            }
            Some(false) => {
                self.state.is_playing = false;
                self.poller.stop();
                if engine_state == EngineState::Ended {
                    self.sample(now);
                }
            }
            None => {}
        }

        Some(engine_state)
    }

    /// Services the poller. Returns `true` if a sample was taken.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.poller.poll(now) {
            return false;
        }
        if !self.player.is_ready() {
            self.poller.stop();
            return false;
        }
        self.refresh_duration();
        self.sample(now);
        true
    }

    /// How long the UI loop may sleep before the next tick is due.
    pub fn next_tick_in(&self, now: Instant) -> Option<Duration> {
        self.poller.time_until_due(now)
    }

    pub fn dispatch(&mut self, intent: Intent, now: Instant) -> Result<(), ControlError> {
        match intent {
            Intent::TogglePlay => self.toggle_play(now),
            Intent::Stop => self.stop(now),
            Intent::SkipBackward => self.skip(-SKIP_SECS, now),
            Intent::SkipForward => self.skip(SKIP_SECS, now),
            Intent::SetVolume(percent) => self.set_volume(percent),
        }
    }

    pub fn toggle_play(&mut self, now: Instant) -> Result<(), ControlError> {
        if self.state.is_playing {
            self.pause()
        } else {
            self.play(now)
        }
    }

    pub fn play(&mut self, now: Instant) -> Result<(), ControlError> {
        self.player.play()?;
        self.state.is_playing = true;
        self.poller.start(now);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), ControlError> {
        self.player.pause()?;
        self.state.is_playing = false;
        self.poller.stop();
        Ok(())
    }

    pub fn stop(&mut self, now: Instant) -> Result<(), ControlError> {
        self.player.stop()?;
        self.state.is_playing = false;
        self.poller.stop();
        self.state.write_optimistic(0.0, now);
        Ok(())
    }

    pub fn skip(&mut self, delta_secs: f64, now: Instant) -> Result<(), ControlError> {
        if !self.player.is_ready() {
            return Err(ControlError::AdapterNotReady);
        }
        let target = skip_target(self.state.current_time_secs, delta_secs, self.state.duration_secs)?;
        self.player.seek(target, true)?;
        self.state.write_optimistic(target, now);
        Ok(())
    }

    pub fn set_volume(&mut self, percent: u8) -> Result<(), ControlError> {
        let percent = percent.min(100);
        self.player.set_volume(percent)?;
        self.state.set_volume(percent);
        Ok(())
    }

    /// Starts a scrub gesture and seeks to the pointer position.
    pub fn pointer_down(
        &mut self,
        offset_x: f64,
        track_width: f64,
        now: Instant,
    ) -> Result<f64, ControlError> {
        if !self.variant.allows_scrubbing() {
            return Err(ControlError::ScrubbingDisabled);
        }
        if !self.player.is_ready() {
            return Err(ControlError::AdapterNotReady);
        }
        let duration = self.state.duration_secs;
        let (target, degraded) = self.scrub.pointer_down(offset_x, track_width, duration);
        self.state.is_scrubbing = true;
        self.seek_optimistic(target, degraded, now);
        Ok(target)
    }

    /// Follows a drag. `None` when no gesture is in progress.
    pub fn pointer_move(&mut self, offset_x: f64, track_width: f64, now: Instant) -> Option<f64> {
        let duration = self.state.duration_secs;
        let (target, degraded) = self.scrub.pointer_move(offset_x, track_width, duration)?;
        self.seek_optimistic(target, degraded, now);
        Some(target)
    }

    pub fn pointer_up(&mut self) {
        if self.scrub.pointer_up() {
            self.state.is_scrubbing = false;
        }
    }

    pub fn pointer_leave(&mut self) {
        if self.scrub.pointer_leave() {
            self.state.is_scrubbing = false;
        }
    }

    /// Tears the widget down: the timer is cancelled and the handle released.
    pub fn unmount(&mut self) -> Option<E> {
        self.poller.stop();
        self.pointer_up();
        self.player.release()
    }

    fn seek_optimistic(&mut self, target: f64, degraded: Option<ControlError>, now: Instant) {
        if let Some(err) = degraded {
            tracing::debug!(%err, "scrub fell back to track start");
        }
        if let Err(err) = self.player.seek(target, true) {
            tracing::debug!(%err, target, "scrub seek skipped");
            return;
        }
        self.state.write_optimistic(target, now);
    }

    fn sample(&mut self, now: Instant) {
        let Ok(time) = self.player.current_time() else {
            return;
        };
        if self.state.apply_sample(time, now) == SampleOutcome::Stale {
            tracing::trace!(time, "stale sample ignored");
        }
    }

    fn refresh_duration(&mut self) {
        if let Ok(duration) = self.player.duration() {
            if duration != self.state.duration_secs {
                self.state.set_duration(duration);
            }
        }
    }
}

fn note_degraded(result: Result<(), ControlError>, what: &str) {
    if let Err(err) = result {
        tracing::debug!(%err, "{}", what);
    }
}

impl<E: PlayerEngine> Drop for PlayerWidget<E> {
    fn drop(&mut self) {
        self.poller.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::commands::codes;
    use crate::widget::poller::POLL_INTERVAL;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Play,
        Pause,
        Stop,
        Seek(f64),
        Volume(u8),
        Mute,
        Unmute,
    }

    #[derive(Default)]
    struct FakeEngine {
        calls: Vec<Call>,
        time: f64,
        duration: f64,
        volume: u8,
    }

    impl FakeEngine {
        fn with_duration(duration: f64) -> Self {
            Self {
                duration,
                ..Self::default()
            }
        }
    }

    impl PlayerEngine for FakeEngine {
        fn play(&mut self) {
            self.calls.push(Call::Play);
        }
        fn pause(&mut self) {
            self.calls.push(Call::Pause);
        }
        fn stop(&mut self) {
            self.calls.push(Call::Stop);
        }
        fn seek(&mut self, time_secs: f64, _allow_seek_ahead: bool) {
            self.time = time_secs;
            self.calls.push(Call::Seek(time_secs));
        }
        fn current_time(&self) -> f64 {
            self.time
        }
        fn duration(&self) -> f64 {
            self.duration
        }
        fn volume(&self) -> u8 {
            self.volume
        }
        fn set_volume(&mut self, percent: u8) {
            self.volume = percent;
            self.calls.push(Call::Volume(percent));
        }
        fn mute(&mut self) {
            self.calls.push(Call::Mute);
        }
        fn unmute(&mut self) {
            self.calls.push(Call::Unmute);
        }
    }

    fn widget(variant: WidgetVariant, options: EmbedOptions) -> PlayerWidget<FakeEngine> {
        PlayerWidget::new("mO-qxAJwD34", options, variant, StateCodes::default())
    }

    fn calls(widget: &PlayerWidget<FakeEngine>) -> &[Call] {
        &widget.player().handle().unwrap().calls
    }

    #[test]
    fn test_controls_ignored_before_ready() {
        let now = Instant::now();
        let mut w = widget(WidgetVariant::Scrubbable, EmbedOptions::default());

        assert_eq!(w.toggle_play(now), Err(ControlError::AdapterNotReady));
        assert_eq!(w.set_volume(10), Err(ControlError::AdapterNotReady));
        assert_eq!(w.pointer_down(5.0, 10.0, now), Err(ControlError::AdapterNotReady));
        assert!(!w.state().is_playing);
        assert!(!w.state().is_scrubbing);
        assert_eq!(w.state().volume_percent, 50);
        assert!(!w.poller().is_running());
    }

    #[test]
    fn test_ready_syncs_volume_and_duration() {
        let now = Instant::now();
        let mut w = widget(WidgetVariant::Standard, EmbedOptions::default());
        w.on_ready(FakeEngine::with_duration(30.0), now);

        assert_eq!(w.state().duration_secs, 30.0);
        assert_eq!(calls(&w), &[Call::Volume(100)]);
        assert!(!w.state().is_playing);
    }

    #[test]
    fn test_muted_autoplay_unmutes_once_playing() {
        let now = Instant::now();
        let options = EmbedOptions {
            autoplay: 1,
            mute: 1,
            ..EmbedOptions::default()
        };
        let mut w = widget(WidgetVariant::Standard, options);
        w.on_ready(FakeEngine::with_duration(30.0), now);

        assert_eq!(calls(&w), &[Call::Volume(100), Call::Mute, Call::Play]);
        assert!(w.state().is_playing);

        w.on_state_changed(codes::PLAYING, now);
        w.on_state_changed(codes::PAUSED, now);
        w.on_state_changed(codes::PLAYING, now);

        let unmutes = calls(&w).iter().filter(|c| **c == Call::Unmute).count();
        assert_eq!(unmutes, 1);
    }

    #[test]
    fn test_muted_without_autoplay_stays_muted() {
        let now = Instant::now();
        let options = EmbedOptions {
            mute: 1,
            ..EmbedOptions::default()
        };
        let mut w = widget(WidgetVariant::Standard, options);
        w.on_ready(FakeEngine::with_duration(30.0), now);
        w.on_state_changed(codes::PLAYING, now);

        assert!(!calls(&w).contains(&Call::Unmute));
    }

    #[test]
    fn test_state_codes_drive_playing_flag_and_poller() {
        let now = Instant::now();
        let mut w = widget(WidgetVariant::Standard, EmbedOptions::default());
        w.on_ready(FakeEngine::with_duration(30.0), now);

        assert_eq!(w.on_state_changed(codes::PLAYING, now), Some(EngineState::Playing));
        assert!(w.state().is_playing);
        assert!(w.poller().is_running());

        w.on_state_changed(codes::BUFFERING, now);
        assert!(w.state().is_playing);

        w.on_state_changed(codes::ENDED, now);
        assert!(!w.state().is_playing);
        assert!(!w.poller().is_running());

        assert_eq!(w.on_state_changed(99, now), None);
    }

    #[test]
    fn test_tick_samples_engine_time() {
        let start = Instant::now();
        let mut w = widget(WidgetVariant::Standard, EmbedOptions::default());
        w.on_ready(FakeEngine::with_duration(20.0), start);
        w.play(start).unwrap();

        w.player.handle_mut().unwrap().time = 5.0;
        assert!(!w.tick(start + Duration::from_millis(40)));
        assert!(w.tick(start + POLL_INTERVAL));
        assert_eq!(w.state().current_time_secs, 5.0);
        assert_eq!(w.state().progress_percent, 25.0);
    }

    #[test]
    fn test_stop_resets_position_and_poller() {
        let now = Instant::now();
        let mut w = widget(WidgetVariant::Standard, EmbedOptions::default());
        w.on_ready(FakeEngine::with_duration(20.0), now);
        w.play(now).unwrap();
        w.skip(SKIP_SECS, now).unwrap();

        w.stop(now).unwrap();
        assert!(!w.state().is_playing);
        assert!(!w.poller().is_running());
        assert_eq!(w.state().current_time_secs, 0.0);
        assert_eq!(calls(&w).last(), Some(&Call::Stop));
    }

    #[test]
    fn test_standard_variant_track_is_display_only() {
        let now = Instant::now();
        let mut w = widget(WidgetVariant::Standard, EmbedOptions::default());
        w.on_ready(FakeEngine::with_duration(100.0), now);

        assert_eq!(w.pointer_down(50.0, 100.0, now), Err(ControlError::ScrubbingDisabled));
        assert!(!calls(&w).iter().any(|c| matches!(c, Call::Seek(_))));
    }

    #[test]
    fn test_engine_pause_after_play_request_reconciles() {
        let now = Instant::now();
        let mut w = widget(WidgetVariant::Standard, EmbedOptions::default());
        w.on_ready(FakeEngine::with_duration(20.0), now);

        // Engine could not start playback and reported PAUSED instead.
        w.play(now).unwrap();
        assert!(w.state().is_playing);
        w.on_state_changed(codes::PAUSED, now);
        assert!(!w.state().is_playing);
        assert!(!w.poller().is_running());
        assert!(!w.tick(now + POLL_INTERVAL * 3));

        w.play(now).unwrap();
        w.on_state_changed(codes::ENDED, now);
        assert!(!w.state().is_playing);
        assert!(!w.poller().is_running());
        assert_eq!(w.poller().arm_count(), 2);
    }

    #[test]
    fn test_skip_before_ready_reports_not_ready() {
        let now = Instant::now();
        let mut w = widget(WidgetVariant::Standard, EmbedOptions::default());

        assert_eq!(w.skip(SKIP_SECS, now), Err(ControlError::AdapterNotReady));
        assert_eq!(w.skip(-SKIP_SECS, now), Err(ControlError::AdapterNotReady));
        assert_eq!(
            w.dispatch(Intent::SkipForward, now),
            Err(ControlError::AdapterNotReady)
        );
        assert_eq!(w.state().current_time_secs, 0.0);
    }

    #[test]
    fn test_unmute_after_release_is_skipped() {
        let now = Instant::now();
        let options = EmbedOptions {
            autoplay: 1,
            mute: 1,
            ..EmbedOptions::default()
        };
        let mut w = widget(WidgetVariant::Standard, options);
        w.on_ready(FakeEngine::with_duration(30.0), now);

        let engine = w.unmount().unwrap();
        assert_eq!(engine.calls, vec![Call::Volume(100), Call::Mute, Call::Play]);

        // PLAYING arrives late: the pending unmute is consumed without a handle.
        assert_eq!(w.on_state_changed(codes::PLAYING, now), Some(EngineState::Playing));
        assert!(!w.unmute_pending);
        w.on_state_changed(codes::PAUSED, now);
        w.player.ready(engine);
        w.on_state_changed(codes::PLAYING, now);
        assert!(!calls(&w).contains(&Call::Unmute));
    }

    #[test]
    fn test_unmount_releases_handle_and_timer() {
        let now = Instant::now();
        let mut w = widget(WidgetVariant::Standard, EmbedOptions::default());
        w.on_ready(FakeEngine::with_duration(20.0), now);
        w.play(now).unwrap();

        let engine = w.unmount();
        assert!(engine.is_some());
        assert!(!w.poller().is_running());
        assert!(!w.is_ready());
        assert_eq!(w.play(now), Err(ControlError::AdapterNotReady));
    }
}

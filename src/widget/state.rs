use std::time::{Duration, Instant};

/// How long after an optimistic write a diverging sample is still treated as stale.
pub const SETTLE_WINDOW: Duration = Duration::from_millis(300);

/// Samples closer than this to the optimistic target confirm it.
pub const CONFIRM_TOLERANCE_SECS: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetVariant {
    /// Full volume on mount, progress track is display-only.
    #[default]
    Standard,
    /// Half volume on mount, progress track accepts click and drag.
    Scrubbable,
}

impl WidgetVariant {
    pub fn default_volume(&self) -> u8 {
        match self {
            WidgetVariant::Standard => 100,
            WidgetVariant::Scrubbable => 50,
        }
    }

    pub fn allows_scrubbing(&self) -> bool {
        matches!(self, WidgetVariant::Scrubbable)
    }
}

/// A position the UI predicted before the engine confirmed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimisticWrite {
    pub target_secs: f64,
    pub written_at: Instant,
}

/// What happened to a poll sample offered to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    Applied,
    /// The sample agreed with a pending optimistic write and cleared it.
    Confirmed,
    /// The sample predates or contradicts a fresh optimistic write.
    Stale,
    /// A scrub gesture owns the position.
    Suppressed,
}

pub fn progress_percent(current_secs: f64, duration_secs: f64) -> f64 {
    if duration_secs <= 0.0 {
        return 0.0;
    }
    (current_secs / duration_secs * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time_secs: f64,
    pub duration_secs: f64,
    pub volume_percent: u8,
    pub progress_percent: f64,
    pub is_scrubbing: bool,
    pending: Option<OptimisticWrite>,
}

impl PlaybackState {
    pub fn new(variant: WidgetVariant) -> Self {
        Self {
            is_playing: false,
            current_time_secs: 0.0,
            duration_secs: 0.0,
            volume_percent: variant.default_volume(),
            progress_percent: 0.0,
            is_scrubbing: false,
            pending: None,
        }
    }

    pub fn pending_write(&self) -> Option<OptimisticWrite> {
        self.pending
    }

    pub fn set_duration(&mut self, duration_secs: f64) {
        self.duration_secs = duration_secs.max(0.0);
        self.refresh_progress();
    }

    pub fn set_volume(&mut self, percent: u8) {
        self.volume_percent = percent.min(100);
    }

    /// Moves the playhead ahead of engine confirmation.
    pub fn write_optimistic(&mut self, target_secs: f64, now: Instant) {
        self.set_position(target_secs);
        self.pending = Some(OptimisticWrite {
            target_secs: self.current_time_secs,
            written_at: now,
        });
    }

    /// Offers an engine sample taken at `sampled_at`, reconciling it against
    /// any pending optimistic write.
    pub fn apply_sample(&mut self, time_secs: f64, sampled_at: Instant) -> SampleOutcome {
        if self.is_scrubbing {
            return SampleOutcome::Suppressed;
        }

        let Some(pending) = self.pending else {
            self.set_position(time_secs);
            return SampleOutcome::Applied;
        };

        if sampled_at < pending.written_at {
            return SampleOutcome::Stale;
        }

        if (time_secs - pending.target_secs).abs() <= CONFIRM_TOLERANCE_SECS {
            self.pending = None;
            self.set_position(time_secs);
            return SampleOutcome::Confirmed;
        }

        if sampled_at.duration_since(pending.written_at) < SETTLE_WINDOW {
            return SampleOutcome::Stale;
        }

        // Settle window elapsed, the engine is authoritative again.
        self.pending = None;
        self.set_position(time_secs);
        SampleOutcome::Applied
    }

    fn set_position(&mut self, time_secs: f64) {
        self.current_time_secs = time_secs.max(0.0);
        self.refresh_progress();
    }

    fn refresh_progress(&mut self) {
        self.progress_percent = progress_percent(self.current_time_secs, self.duration_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_ratio_of_duration() {
        assert_eq!(progress_percent(25.0, 100.0), 25.0);
        assert_eq!(progress_percent(0.0, 10.0), 0.0);
        assert_eq!(progress_percent(10.0, 10.0), 100.0);
        assert!((progress_percent(1.0, 3.0) - 33.333).abs() < 0.01);
    }

    #[test]
    fn test_progress_zero_without_duration() {
        assert_eq!(progress_percent(42.0, 0.0), 0.0);
        assert_eq!(progress_percent(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_progress_clamps_past_end() {
        assert_eq!(progress_percent(12.0, 10.0), 100.0);
    }

    #[test]
    fn test_defaults_follow_variant() {
        let standard = PlaybackState::new(WidgetVariant::Standard);
        assert_eq!(standard.volume_percent, 100);
        assert!(!standard.is_playing);
        assert!(!standard.is_scrubbing);
        assert_eq!(standard.current_time_secs, 0.0);

        let scrubbable = PlaybackState::new(WidgetVariant::Scrubbable);
        assert_eq!(scrubbable.volume_percent, 50);
    }

    #[test]
    fn test_sample_older_than_write_is_ignored() {
        let mut state = PlaybackState::new(WidgetVariant::Scrubbable);
        state.set_duration(100.0);

        let before = Instant::now();
        let written = before + Duration::from_millis(10);
        state.write_optimistic(40.0, written);

        assert_eq!(state.apply_sample(12.0, before), SampleOutcome::Stale);
        assert_eq!(state.current_time_secs, 40.0);
        assert_eq!(state.progress_percent, 40.0);
    }

    #[test]
    fn test_diverging_sample_inside_settle_window_is_stale() {
        let mut state = PlaybackState::new(WidgetVariant::Scrubbable);
        state.set_duration(100.0);

        let written = Instant::now();
        state.write_optimistic(40.0, written);

        let outcome = state.apply_sample(12.0, written + Duration::from_millis(100));
        assert_eq!(outcome, SampleOutcome::Stale);
        assert_eq!(state.current_time_secs, 40.0);
        assert!(state.pending_write().is_some());
    }

    #[test]
    fn test_matching_sample_confirms_write() {
        let mut state = PlaybackState::new(WidgetVariant::Scrubbable);
        state.set_duration(100.0);

        let written = Instant::now();
        state.write_optimistic(40.0, written);

        let outcome = state.apply_sample(40.1, written + Duration::from_millis(100));
        assert_eq!(outcome, SampleOutcome::Confirmed);
        assert_eq!(state.current_time_secs, 40.1);
        assert!(state.pending_write().is_none());
    }

    #[test]
    fn test_engine_wins_after_settle_window() {
        let mut state = PlaybackState::new(WidgetVariant::Scrubbable);
        state.set_duration(100.0);

        let written = Instant::now();
        state.write_optimistic(40.0, written);

        let outcome = state.apply_sample(12.0, written + SETTLE_WINDOW);
        assert_eq!(outcome, SampleOutcome::Applied);
        assert_eq!(state.current_time_secs, 12.0);
        assert!(state.pending_write().is_none());
    }

    #[test]
    fn test_samples_suppressed_while_scrubbing() {
        let mut state = PlaybackState::new(WidgetVariant::Scrubbable);
        state.set_duration(100.0);
        state.is_scrubbing = true;

        assert_eq!(
            state.apply_sample(70.0, Instant::now()),
            SampleOutcome::Suppressed
        );
        assert_eq!(state.current_time_secs, 0.0);
    }

    #[test]
    fn test_volume_is_capped() {
        let mut state = PlaybackState::new(WidgetVariant::Standard);
        state.set_volume(250);
        assert_eq!(state.volume_percent, 100);
    }
}

use std::time::{Duration, Instant};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_DURATION: Duration = Duration::from_millis(80);

/// Spinner shown in the embed region until the engine is ready. The frame is
/// derived from elapsed time, so it needs no ticking.
pub struct LoadingAnimation {
    started: Instant,
}

impl LoadingAnimation {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn frame_at(&self, now: Instant) -> &'static str {
        let elapsed = now.saturating_duration_since(self.started);
        let index = (elapsed.as_millis() / FRAME_DURATION.as_millis()) as usize % FRAMES.len();
        FRAMES[index]
    }
}

impl Default for LoadingAnimation {
    fn default() -> Self {
        Self::new()
    }
}

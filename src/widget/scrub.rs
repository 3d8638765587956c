use crate::widget::error::ControlError;

/// Maps a pointer offset on the track to a time in the clip.
///
/// Offsets outside the track clamp to its ends. A zero-width track maps
/// everything to the start and reports [`ControlError::DegenerateLayout`]
/// alongside the fallback value.
pub fn target_time(offset_x: f64, track_width: f64, duration_secs: f64) -> (f64, Option<ControlError>) {
    if track_width <= 0.0 {
        return (0.0, Some(ControlError::DegenerateLayout));
    }
    let ratio = (offset_x / track_width).clamp(0.0, 1.0);
    (ratio * duration_secs.max(0.0), None)
}

/// Transient drag state, alive between pointer-down and pointer-up/leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrubGesture {
    pub active: bool,
}

/// Tracks the pointer gesture on the progress track. Seeks are issued by the
/// widget for every target this controller returns.
#[derive(Debug, Default)]
pub struct ScrubController {
    gesture: Option<ScrubGesture>,
}

impl ScrubController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.map(|g| g.active).unwrap_or(false)
    }

    pub fn pointer_down(
        &mut self,
        offset_x: f64,
        track_width: f64,
        duration_secs: f64,
    ) -> (f64, Option<ControlError>) {
        self.gesture = Some(ScrubGesture { active: true });
        target_time(offset_x, track_width, duration_secs)
    }

    /// `None` when no drag is in progress.
    pub fn pointer_move(
        &mut self,
        offset_x: f64,
        track_width: f64,
        duration_secs: f64,
    ) -> Option<(f64, Option<ControlError>)> {
        if !self.is_active() {
            return None;
        }
        Some(target_time(offset_x, track_width, duration_secs))
    }

    /// Ends the gesture. Returns `true` if one was in progress.
    pub fn pointer_up(&mut self) -> bool {
        self.gesture.take().is_some()
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.pointer_up()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_maps_to_half_duration() {
        assert_eq!(target_time(50.0, 100.0, 100.0), (50.0, None));
        assert_eq!(target_time(30.0, 60.0, 240.0), (120.0, None));
    }

    #[test]
    fn test_offsets_clamp_to_track() {
        assert_eq!(target_time(-15.0, 100.0, 80.0).0, 0.0);
        assert_eq!(target_time(130.0, 100.0, 80.0).0, 80.0);
    }

    #[test]
    fn test_zero_width_track_maps_to_start() {
        let (target, err) = target_time(12.0, 0.0, 80.0);
        assert_eq!(target, 0.0);
        assert_eq!(err, Some(ControlError::DegenerateLayout));
    }

    #[test]
    fn test_move_without_down_is_ignored() {
        let mut scrub = ScrubController::new();
        assert_eq!(scrub.pointer_move(10.0, 100.0, 100.0), None);
    }

    #[test]
    fn test_gesture_lifecycle() {
        let mut scrub = ScrubController::new();

        scrub.pointer_down(10.0, 100.0, 100.0);
        assert!(scrub.is_active());
        assert_eq!(scrub.pointer_move(20.0, 100.0, 100.0), Some((20.0, None)));

        assert!(scrub.pointer_leave());
        assert!(!scrub.is_active());
        assert_eq!(scrub.pointer_move(30.0, 100.0, 100.0), None);
        assert!(!scrub.pointer_up());
    }
}

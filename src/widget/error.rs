use thiserror::Error;

/// Ways a widget operation can degrade. None of these reach the user: callers
/// log them and carry on with a no-op or a clamped value.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ControlError {
    #[error("player is not ready yet")]
    AdapterNotReady,

    #[error("seek target {target:.2}s is outside 0..{duration:.2}s")]
    InvalidSeekTarget { target: f64, duration: f64 },

    #[error("progress track has no width")]
    DegenerateLayout,

    #[error("progress track is display-only for this widget variant")]
    ScrubbingDisabled,
}

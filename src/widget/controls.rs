use crate::widget::error::ControlError;

pub const SKIP_SECS: f64 = 2.0;
pub const VOLUME_STEP: u8 = 5;

/// Everything the control panel can ask the player to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    TogglePlay,
    Stop,
    SkipBackward,
    SkipForward,
    SetVolume(u8),
}

impl Intent {
    pub fn volume_up(current: u8) -> Self {
        Intent::SetVolume(current.saturating_add(VOLUME_STEP).min(100))
    }

    pub fn volume_down(current: u8) -> Self {
        Intent::SetVolume(current.saturating_sub(VOLUME_STEP))
    }
}

/// Buttons in the order the panel draws them.
pub const BUTTONS: [Intent; 4] = [
    Intent::SkipBackward,
    Intent::TogglePlay,
    Intent::Stop,
    Intent::SkipForward,
];

pub fn button_label(intent: Intent, is_playing: bool) -> &'static str {
    match intent {
        Intent::TogglePlay if is_playing => "󰏤 Pause",
        Intent::TogglePlay => " Play",
        Intent::Stop => "󰓛 Stop",
        Intent::SkipBackward => "󰑟 -2s",
        Intent::SkipForward => "󰈑 +2s",
        Intent::SetVolume(_) => "Volume",
    }
}

/// Target for a skip of `delta` seconds. Skips that would land on or past
/// either end of the clip are refused.
pub fn skip_target(current_secs: f64, delta: f64, duration_secs: f64) -> Result<f64, ControlError> {
    let target = current_secs + delta;
    if target > 0.0 && target < duration_secs {
        Ok(target)
    } else {
        Err(ControlError::InvalidSeekTarget {
            target,
            duration: duration_secs,
        })
    }
}

/// Volume for a click at `offset_x` on a slider `width` cells wide.
pub fn volume_at(offset_x: f64, width: f64) -> u8 {
    if width <= 0.0 {
        return 0;
    }
    ((offset_x / width).clamp(0.0, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_inside_clip() {
        assert_eq!(skip_target(5.0, SKIP_SECS, 10.0), Ok(7.0));
        assert_eq!(skip_target(5.0, -SKIP_SECS, 10.0), Ok(3.0));
    }

    #[test]
    fn test_skip_forward_past_end_is_refused() {
        assert_eq!(
            skip_target(9.0, SKIP_SECS, 10.0),
            Err(ControlError::InvalidSeekTarget {
                target: 11.0,
                duration: 10.0
            })
        );
        // Landing exactly on the end is refused too.
        assert!(skip_target(8.0, SKIP_SECS, 10.0).is_err());
    }

    #[test]
    fn test_skip_backward_before_start_is_refused() {
        assert!(skip_target(1.0, -SKIP_SECS, 10.0).is_err());
        assert!(skip_target(2.0, -SKIP_SECS, 10.0).is_err());
    }

    #[test]
    fn test_skip_without_duration_is_refused() {
        assert!(skip_target(0.0, SKIP_SECS, 0.0).is_err());
    }

    #[test]
    fn test_volume_steps_saturate() {
        assert_eq!(Intent::volume_up(98), Intent::SetVolume(100));
        assert_eq!(Intent::volume_down(3), Intent::SetVolume(0));
        assert_eq!(Intent::volume_up(50), Intent::SetVolume(55));
    }

    #[test]
    fn test_volume_from_slider_click() {
        assert_eq!(volume_at(0.0, 20.0), 0);
        assert_eq!(volume_at(10.0, 20.0), 50);
        assert_eq!(volume_at(25.0, 20.0), 100);
        assert_eq!(volume_at(3.0, 0.0), 0);
    }

    #[test]
    fn test_toggle_label_follows_state() {
        assert!(button_label(Intent::TogglePlay, true).contains("Pause"));
        assert!(button_label(Intent::TogglePlay, false).contains("Play"));
    }
}

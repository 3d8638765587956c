use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

/// Playback facts shared between the engine thread, its audio callback and
/// the UI thread. Readers never block the audio callback.
#[derive(Debug)]
pub struct EngineClock {
    played_frames: AtomicU64,
    sample_rate: AtomicU32,
    duration_micros: AtomicU64,
    volume: AtomicU8,
    muted: AtomicBool,
}

impl EngineClock {
    pub fn new(volume: u8) -> Self {
        Self {
            played_frames: AtomicU64::new(0),
            sample_rate: AtomicU32::new(0),
            duration_micros: AtomicU64::new(0),
            volume: AtomicU8::new(volume.min(100)),
            muted: AtomicBool::new(false),
        }
    }

    /// Resets the clock for a newly loaded track.
    pub fn reset(&self, sample_rate: u32, duration: Option<Duration>) {
        self.sample_rate.store(sample_rate, Ordering::Relaxed);
        self.duration_micros.store(
            duration.map(|d| d.as_micros() as u64).unwrap_or(0),
            Ordering::Relaxed,
        );
        self.played_frames.store(0, Ordering::Relaxed);
    }

    pub fn advance(&self, frames: u64) {
        self.played_frames.fetch_add(frames, Ordering::Relaxed);
    }

    pub fn set_position(&self, position: Duration) {
        let rate = self.sample_rate.load(Ordering::Relaxed) as f64;
        let frames = (position.as_secs_f64() * rate) as u64;
        self.played_frames.store(frames, Ordering::Relaxed);
    }

    pub fn position_secs(&self) -> f64 {
        let rate = self.sample_rate.load(Ordering::Relaxed);
        if rate == 0 {
            return 0.0;
        }
        self.played_frames.load(Ordering::Relaxed) as f64 / rate as f64
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0
    }

    pub fn volume(&self) -> u8 {
        self.volume.load(Ordering::Relaxed)
    }

    pub fn set_volume(&self, percent: u8) {
        self.volume.store(percent.min(100), Ordering::Relaxed);
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    /// Linear gain the audio callback applies to each sample.
    pub fn gain(&self) -> f32 {
        if self.is_muted() {
            0.0
        } else {
            self.volume() as f32 / 100.0
        }
    }
}

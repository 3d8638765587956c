use std::time::{Duration, Instant};

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A single armed deadline. Only ever owned by [`ProgressPoller`].
#[derive(Debug)]
struct PollTimer {
    next_due: Instant,
}

/// Recurring progress sampler, driven by the UI loop.
///
/// The timer is acquired by [`start`](Self::start) and released by
/// [`stop`](Self::stop) or by dropping the poller. Starting an already running
/// poller keeps the existing timer, so there is never more than one.
#[derive(Debug)]
pub struct ProgressPoller {
    period: Duration,
    timer: Option<PollTimer>,
    arms: u64,
}

impl ProgressPoller {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            timer: None,
            arms: 0,
        }
    }

    /// Returns `true` if this call armed a new timer.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.timer.is_some() {
            return false;
        }
        self.timer = Some(PollTimer {
            next_due: now + self.period,
        });
        self.arms += 1;
        tracing::trace!(arms = self.arms, "progress poller started");
        true
    }

    /// Returns `true` if a running timer was cancelled.
    pub fn stop(&mut self) -> bool {
        match self.timer.take() {
            Some(_) => {
                tracing::trace!("progress poller stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Number of timers armed over the poller's lifetime.
    pub fn arm_count(&self) -> u64 {
        self.arms
    }

    /// Time left until the next tick, `None` when stopped.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.timer
            .as_ref()
            .map(|t| t.next_due.saturating_duration_since(now))
    }

    /// Returns `true` when a tick is due and re-arms the timer.
    ///
    /// Several missed periods collapse into a single tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        if now < timer.next_due {
            return false;
        }
        timer.next_due = now + self.period;
        true
    }
}

impl Default for ProgressPoller {
    fn default() -> Self {
        Self::new(POLL_INTERVAL)
    }
}

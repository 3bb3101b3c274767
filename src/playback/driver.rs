//! Wall-clock driver for terminal hosts.

use std::thread;
use std::time::{Duration, Instant};

use super::PlaybackController;

/// Sleeps until each tick is due and feeds the elapsed wall time to the
/// controller. Returns once playback stops.
#[derive(Debug, Clone, Copy)]
pub struct RealtimeDriver {
    /// Longest single sleep, so hosts can poll between ticks.
    max_sleep: Duration,
}

impl Default for RealtimeDriver {
    fn default() -> Self {
        Self {
            max_sleep: Duration::from_millis(250),
        }
    }
}

impl RealtimeDriver {
    /// Driver with the default sleep cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap each sleep at `max_sleep`.
    #[must_use]
    pub fn with_max_sleep(max_sleep: Duration) -> Self {
        Self {
            max_sleep: max_sleep.max(Duration::from_millis(1)),
        }
    }

    /// Drive `controller` until it leaves `Playing`. Returns steps advanced.
    pub fn run(&self, controller: &mut PlaybackController) -> usize {
        self.run_while(controller, || true)
    }

    /// Like [`Self::run`], but also stops as soon as `keep_going` returns
    /// `false`. Checked before every sleep.
    pub fn run_while<F>(&self, controller: &mut PlaybackController, mut keep_going: F) -> usize
    where
        F: FnMut() -> bool,
    {
        let mut fired = 0;
        let mut last = Instant::now();

        while controller.is_playing() && keep_going() {
            let wait = controller
                .next_deadline()
                .unwrap_or(Duration::ZERO)
                .min(self.max_sleep);
            if !wait.is_zero() {
                thread::sleep(wait);
            }

            let now = Instant::now();
            fired += controller.advance(now.duration_since(last));
            last = now;
        }

        tracing::debug!(fired, "realtime driver finished");
        fired
    }
}

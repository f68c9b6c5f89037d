//! Frame pacing
//!
//! The loop blocks until the next tick boundary and feeds the measured wall
//! time into the next tick as `dt`. Browsers pace with
//! `requestAnimationFrame` instead and only need `dt_between`.

/// Seconds between two millisecond timestamps; 0 for the first frame
pub fn dt_between(last_ms: f64, now_ms: f64) -> f32 {
    if last_ms <= 0.0 || now_ms < last_ms {
        0.0
    } else {
        ((now_ms - last_ms) / 1000.0) as f32
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FrameClock;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{Duration, Instant};

    /// Fixed-rate pacer
    #[derive(Debug)]
    pub struct FrameClock {
        period: Duration,
        last: Instant,
        deadline: Instant,
    }

    impl FrameClock {
        pub fn new(ticks_per_second: u32) -> Self {
            let period = Duration::from_secs_f64(1.0 / ticks_per_second.max(1) as f64);
            let now = Instant::now();
            Self {
                period,
                last: now,
                deadline: now + period,
            }
        }

        /// Block until the next tick boundary; returns seconds since the
        /// previous call.
        pub fn wait(&mut self) -> f32 {
            let now = Instant::now();
            if let Some(remaining) = self.deadline.checked_duration_since(now) {
                std::thread::sleep(remaining);
            }
            let now = Instant::now();
            self.deadline += self.period;
            // Don't try to catch up after a stall
            if self.deadline < now {
                self.deadline = now + self.period;
            }
            let dt = now.duration_since(self.last).as_secs_f32();
            self.last = now;
            dt
        }
    }
}

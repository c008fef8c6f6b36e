// src/clock.rs

//! Fixed-rate frame limiter.

use log::trace;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until a frame's worth of time at `fps` has passed since the
    /// previous tick and returns the time elapsed since that tick. An `fps` of
    /// 0 never sleeps. The first tick only starts the clock.
    pub fn tick(&mut self, fps: u32) -> Duration {
        let now = Instant::now();
        let Some(last) = self.last else {
            self.last = Some(now);
            self.frames += 1;
            return Duration::ZERO;
        };
        if fps > 0 {
            let budget = Duration::from_secs(1) / fps;
            let spent = now.duration_since(last);
            if let Some(remaining) = budget.checked_sub(spent) {
                trace!("FrameClock: sleeping {:?}", remaining);
                thread::sleep(remaining);
            }
        }
        let now = Instant::now();
        self.last = Some(now);
        self.frames += 1;
        now.duration_since(last)
    }

    /// Number of ticks so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_not_sleep_on_the_first_tick() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(1), Duration::ZERO);
        assert_eq!(clock.frames(), 1);
    }

    #[test]
    fn it_should_hold_ticks_to_the_frame_rate() {
        let mut clock = FrameClock::new();
        clock.tick(50);
        let elapsed = clock.tick(50);
        assert!(elapsed >= Duration::from_millis(19), "elapsed {:?}", elapsed);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn it_should_not_throttle_at_zero_fps() {
        let mut clock = FrameClock::new();
        clock.tick(0);
        let elapsed = clock.tick(0);
        assert!(elapsed < Duration::from_millis(50));
    }
}

//! Fixed-timestep tick loop.
//!
//! Wall-clock time is fed into an accumulator and drained in whole ticks, so the
//! world advances at a steady rate regardless of how long each iteration took.

use tracing::warn;

/// Default tick rate.
pub const DEFAULT_TPS: u32 = 20;

/// Longest frame time credited at once, so a long stall cannot queue up an
/// unbounded burst of ticks.
pub const MAX_FRAME_TIME: f64 = 0.5;

/// Accumulator-driven tick scheduler.
#[derive(Debug, Clone)]
pub struct TickLoop {
    tick_dt: f64,
    accumulator: f64,
    tick_count: u64,
}

impl TickLoop {
    /// A loop running at `ticks_per_second` (0 is treated as [`DEFAULT_TPS`]).
    pub fn new(ticks_per_second: u32) -> Self {
        let tps = if ticks_per_second == 0 {
            DEFAULT_TPS
        } else {
            ticks_per_second
        };
        Self {
            tick_dt: 1.0 / f64::from(tps),
            accumulator: 0.0,
            tick_count: 0,
        }
    }

    /// Seconds per tick.
    pub fn tick_dt(&self) -> f64 {
        self.tick_dt
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Credit `frame_time` seconds and run `update_fn(tick_index)` once per
    /// whole tick that fits. Returns the number of ticks run.
    pub fn advance(&mut self, frame_time: f64, mut update_fn: impl FnMut(u64)) -> u32 {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        let mut ran = 0;
        while self.accumulator >= self.tick_dt {
            update_fn(self.tick_count);
            self.tick_count += 1;
            self.accumulator -= self.tick_dt;
            ran += 1;
        }
        ran
    }

    /// Seconds until the next tick is due.
    pub fn time_to_next_tick(&self) -> f64 {
        (self.tick_dt - self.accumulator).max(0.0)
    }
}

impl Default for TickLoop {
    fn default() -> Self {
        Self::new(DEFAULT_TPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_dt_for_20_tps() {
        let tick_loop = TickLoop::new(20);
        assert!((tick_loop.tick_dt() - 0.05).abs() < 1e-12);
        assert_eq!(TickLoop::new(0).tick_dt(), TickLoop::default().tick_dt());
    }

    #[test]
    fn test_partial_frames_accumulate() {
        let mut tick_loop = TickLoop::new(20);
        let mut ticks = Vec::new();
        assert_eq!(tick_loop.advance(0.03, |t| ticks.push(t)), 0);
        assert_eq!(tick_loop.advance(0.03, |t| ticks.push(t)), 1);
        assert_eq!(ticks, vec![0]);
        assert!(tick_loop.time_to_next_tick() > 0.0);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut tick_loop = TickLoop::new(4);
        let ran = tick_loop.advance(5.0, |_| {});
        assert_eq!(ran, 2, "0.5s at 4 TPS is 2 ticks");
        assert_eq!(tick_loop.tick_count(), 2);
    }

    #[test]
    fn test_negative_frame_time_is_ignored() {
        let mut tick_loop = TickLoop::new(20);
        assert_eq!(tick_loop.advance(-1.0, |_| {}), 0);
        assert_eq!(tick_loop.time_to_next_tick(), tick_loop.tick_dt());
    }
}

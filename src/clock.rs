// clock.rs - Frame timestamps to simulation deltas
//
// The first frame is measured against a zero baseline, matching
// requestAnimationFrame timestamps that count from page load.

use log::warn;

pub struct FrameClock {
    prev_ms: f64,
    max_secs: f32,
}

impl FrameClock {
    pub fn new(max_secs: f32) -> Self {
        Self { prev_ms: 0.0, max_secs }
    }

    /// Seconds since the previous call, clamped to `[0, max_secs]`
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let elapsed = (now_ms - self.prev_ms) / 1000.0;
        if elapsed < 0.0 {
            warn!("timestamp went backwards ({} ms -> {} ms)", self.prev_ms, now_ms);
        }
        self.prev_ms = now_ms;
        (elapsed as f32).clamp(0.0, self.max_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_delta_counts_from_zero() {
        let mut clock = FrameClock::new(10.0);
        assert_eq!(clock.delta(500.0), 0.5);
        assert_eq!(clock.delta(750.0), 0.25);
    }

    #[test]
    fn backwards_time_yields_zero() {
        let mut clock = FrameClock::new(10.0);
        clock.delta(1000.0);
        assert_eq!(clock.delta(900.0), 0.0);
        assert!((clock.delta(1000.0) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn long_gaps_are_clamped() {
        let mut clock = FrameClock::new(1.0);
        assert_eq!(clock.delta(60_000.0), 1.0);
        assert!((clock.delta(60_016.0) - 0.016).abs() < 1e-6);
    }
}

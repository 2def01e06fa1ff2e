//! Wall-clock-gated shooting-star spawn scheduler
//!
//! A fixed-interval gate, not a Poisson process: checked once per frame,
//! it fires at most one spawn whenever the configured interval has elapsed
//! since the previous one. There is deliberately no cap on concurrently
//! alive stars; their bounded lifetime keeps the population small.

use crate::Settings;

/// Spawn scheduler state
#[derive(Debug, Clone)]
pub struct Spawner {
    /// Timestamp of the last spawn, in host milliseconds
    last_spawn_ms: f64,
}

impl Spawner {
    /// Create a spawner; the first spawn happens one full interval after
    /// `now_ms`.
    pub fn new(now_ms: f64) -> Self {
        Self {
            last_spawn_ms: now_ms,
        }
    }

    /// Check the gate for this frame. Returns true exactly when a new
    /// shooting star should be created, and stamps the spawn time.
    pub fn should_spawn(&mut self, now_ms: f64, settings: &Settings) -> bool {
        if !settings.effective_shooting_stars() {
            return false;
        }
        if now_ms - self.last_spawn_ms > f64::from(settings.spawn_frequency) * 1000.0 {
            self.last_spawn_ms = now_ms;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(freq: f32) -> Settings {
        let mut s = Settings::default();
        s.spawn_frequency = freq;
        s
    }

    #[test]
    fn test_gate_respects_interval() {
        let s = settings(2.0);
        let mut spawner = Spawner::new(0.0);
        assert!(!spawner.should_spawn(1000.0, &s));
        assert!(!spawner.should_spawn(2000.0, &s)); // strict >, not >=
        assert!(spawner.should_spawn(2001.0, &s));
        // Gate re-arms from the spawn timestamp
        assert!(!spawner.should_spawn(3000.0, &s));
        assert!(spawner.should_spawn(4002.0, &s));
    }

    #[test]
    fn test_one_spawn_per_frame_check() {
        // Even after a long stall only one spawn fires per check
        let s = settings(1.0);
        let mut spawner = Spawner::new(0.0);
        assert!(spawner.should_spawn(10_000.0, &s));
        assert!(!spawner.should_spawn(10_000.0, &s));
    }

    #[test]
    fn test_disabled_never_spawns() {
        let mut s = settings(1.0);
        s.shooting_stars = false;
        let mut spawner = Spawner::new(0.0);
        assert!(!spawner.should_spawn(60_000.0, &s));
    }

    #[test]
    fn test_cadence_over_ten_seconds() {
        // 10 s of 60 fps frames at 1 s frequency: 9-11 spawns allowing for
        // frame-timing jitter
        let s = settings(1.0);
        let mut spawner = Spawner::new(0.0);
        let mut spawned = 0;
        for frame in 0..600 {
            let now_ms = f64::from(frame) * 1000.0 / 60.0;
            if spawner.should_spawn(now_ms, &s) {
                spawned += 1;
            }
        }
        assert!((9..=11).contains(&spawned), "spawned {spawned}");
    }
}

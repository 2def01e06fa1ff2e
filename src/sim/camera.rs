//! Scroll-driven parallax camera
//!
//! The scroll listener only writes a raw offset; each frame derives a target
//! from it and damps the current position toward that target, giving the
//! lag-following parallax feel instead of an instant jump.

use glam::Vec2;

use crate::consts::CAMERA_DAMPING;
use crate::damp_toward;

/// Camera offset state
#[derive(Debug, Clone, Default)]
pub struct Camera {
    pub current: Vec2,
    pub target: Vec2,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the target offset from the current scroll position (pixels)
    pub fn set_scroll(&mut self, scroll_y: f32, parallax: f32) {
        self.target.y = scroll_y / 1000.0 * parallax * 20.0;
        self.target.x = (scroll_y / 500.0).sin() * parallax * 5.0;
    }

    /// One frame of exponential damping toward the target
    pub fn tick(&mut self) {
        self.current.x = damp_toward(self.current.x, self.target.x, CAMERA_DAMPING);
        self.current.y = damp_toward(self.current.y, self.target.y, CAMERA_DAMPING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_formulas() {
        let mut cam = Camera::new();
        cam.set_scroll(1000.0, 1.0);
        assert!((cam.target.y - 20.0).abs() < 1e-5);
        assert!((cam.target.x - 2.0f32.sin() * 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_parallax_freezes_target() {
        let mut cam = Camera::new();
        cam.set_scroll(5000.0, 0.0);
        assert_eq!(cam.target, Vec2::ZERO);
    }

    #[test]
    fn test_converges_without_overshoot() {
        let mut cam = Camera::new();
        cam.set_scroll(2000.0, 1.0);
        let target = cam.target;

        let mut last_gap = (target - cam.current).length();
        // (1 - 0.05)^n < 0.01 needs n ≈ 90 frames
        for _ in 0..90 {
            let before = cam.current;
            cam.tick();
            let gap = (target - cam.current).length();
            // Monotone approach: never overshoots past the target
            assert!(gap <= last_gap);
            let step = (cam.current - before).length();
            assert!(gap + step >= last_gap - 1e-4);
            last_gap = gap;
        }
        assert!(
            last_gap < target.length() * 0.01,
            "not within 1% after 90 frames: gap {last_gap}"
        );
    }

    #[test]
    fn test_retarget_mid_flight() {
        let mut cam = Camera::new();
        cam.set_scroll(1000.0, 1.0);
        for _ in 0..10 {
            cam.tick();
        }
        cam.set_scroll(0.0, 1.0);
        for _ in 0..200 {
            cam.tick();
        }
        assert!(cam.current.length() < 0.05);
    }
}

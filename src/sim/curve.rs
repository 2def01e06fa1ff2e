//! Cubic Bezier evaluation for shooting-star trajectories
//!
//! A trajectory is defined by four control points; position comes from the
//! standard Bernstein form and the travel direction from the first
//! derivative.

use glam::Vec3;

/// A cubic Bezier curve in 3D
#[derive(Debug, Clone, Copy)]
pub struct CubicBezier {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
    pub p3: Vec3,
}

impl CubicBezier {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate the curve position at `t` (clamped to [0, 1])
    pub fn point(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        self.p0 * (u * u * u)
            + self.p1 * (3.0 * u * u * t)
            + self.p2 * (3.0 * u * t * t)
            + self.p3 * (t * t * t)
    }

    /// First derivative at `t`; its direction is the instantaneous velocity
    pub fn tangent(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        (self.p1 - self.p0) * (3.0 * u * u)
            + (self.p2 - self.p1) * (6.0 * u * t)
            + (self.p3 - self.p2) * (3.0 * t * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc() -> CubicBezier {
        CubicBezier::new(
            Vec3::new(-120.0, 0.0, -20.0),
            Vec3::new(-75.0, 60.0, -40.0),
            Vec3::new(15.0, 80.0, -45.0),
            Vec3::new(60.0, 70.0, -50.0),
        )
    }

    #[test]
    fn test_endpoints() {
        let c = arc();
        assert!((c.point(0.0) - c.p0).length() < 1e-5);
        assert!((c.point(1.0) - c.p3).length() < 1e-5);
    }

    #[test]
    fn test_t_is_clamped() {
        let c = arc();
        assert_eq!(c.point(-0.5), c.point(0.0));
        assert_eq!(c.point(1.5), c.point(1.0));
    }

    #[test]
    fn test_initial_tangent_points_toward_end() {
        // Start at the left edge, end on the right: the first derivative at
        // t = 0 must have a positive x component.
        let c = arc();
        let tangent = c.tangent(0.0);
        assert!(tangent.x > 0.0, "tangent.x = {}", tangent.x);
    }

    #[test]
    fn test_tangent_matches_finite_difference() {
        let c = arc();
        let t = 0.4;
        let eps = 1e-3;
        let approx = (c.point(t + eps) - c.point(t - eps)) / (2.0 * eps);
        let exact = c.tangent(t);
        assert!((approx - exact).length() < 0.1, "{:?} vs {:?}", approx, exact);
    }

    #[test]
    fn test_midpoint_arcs_above_chord() {
        // Control points displaced upward should lift the curve above the
        // straight start-to-end line.
        let c = arc();
        let chord_mid = (c.p0 + c.p3) * 0.5;
        assert!(c.point(0.5).y > chord_mid.y);
    }
}

//! Deterministic simulation module
//!
//! All backdrop logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - No rendering or platform dependencies
//! - Every mutation happens inside the per-frame tick

pub mod camera;
pub mod curve;
pub mod field;
pub mod shooting;
pub mod spawner;
pub mod tick;

pub use camera::Camera;
pub use curve::CubicBezier;
pub use field::{StarField, StarVertex, breathe, density_bias};
pub use shooting::{Phase, ShootingStar, Sprite};
pub use spawner::Spawner;
pub use tick::{BackdropState, FrameInput};

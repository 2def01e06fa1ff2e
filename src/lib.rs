//! Starfall - an animated starfield backdrop with procedural shooting stars
//!
//! Core modules:
//! - `sim`: Deterministic simulation (star field, shooting-star state machine,
//!   spawner, parallax camera, per-frame tick)
//! - `renderer`: WebGPU point-sprite rendering pipeline
//! - `settings`: Visual tuning knobs with LocalStorage persistence

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

/// Simulation constants
pub mod consts {
    /// Nominal frame duration (the host drives us at display rate; 60 Hz is
    /// the reference the per-frame formulas were tuned against)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Half-height of the visible scene region in world units
    pub const SCENE_HALF_HEIGHT: f32 = 60.0;

    /// Exponential damping factor applied to the camera each frame
    pub const CAMERA_DAMPING: f32 = 0.05;

    /// Shooting stars enter from just outside this |x|
    pub const SPAWN_EDGE_X: f32 = 120.0;
    /// Depth at which shooting stars enter the scene
    pub const SPAWN_DEPTH: f32 = -20.0;

    /// Curve progress at which travel ends and the star parks
    pub const TRAVEL_END_PROGRESS: f32 = 0.85;
    /// Base curve-progress rate in progress/second (edge to park in about
    /// 4.7 s at multiplier 1.0)
    pub const TRAVEL_RATE: f32 = 0.18;
    /// Velocity is the curve tangent scaled by this factor
    pub const TANGENT_SCALE: f32 = 8.0;

    /// Hold duration after travel, before the morph begins (seconds)
    pub const STOP_DURATION: f32 = 0.3;
    /// Crossfade duration from trail/glow to the terminal star (seconds)
    pub const TRANSFORM_DURATION: f32 = 0.3;
}

/// One step of exponential damping toward `target`
#[inline]
pub fn damp_toward(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

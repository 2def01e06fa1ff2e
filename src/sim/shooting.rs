//! Shooting-star entity and its lifecycle state machine
//!
//! Each shooting star travels a cubic Bezier arc, parks, morphs into a
//! static twinkling star and fades away. The phase tag enforces a strict
//! linear order: Moving → Stopping → Transforming → Breathing → Dead.
//!
//! The entity exclusively owns its four visual sub-entities (trail, stream,
//! glow, terminal star); the registry holds the entity by value and drops
//! everything together when `update` reports death.

use glam::{Vec2, Vec3};
use rand::Rng;

use super::curve::CubicBezier;
use crate::consts::*;
use crate::settings::TerminalStar;
use crate::Settings;

/// Lifecycle phase, strict linear order with no skipping or backtracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Traveling along the Bezier arc
    Moving,
    /// Parked at the end of the arc, holding
    Stopping,
    /// Crossfading from trail/glow to the terminal star
    Transforming,
    /// Terminal star shrinking and fading out
    Breathing,
    /// Finished; the registry must dispose and drop the entity
    Dead,
}

/// A visual sub-entity consumed by the renderer
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    pub position: Vec3,
    /// Rotation around the view axis (radians), used to align trails
    pub rotation: f32,
    /// Half-extents in world units (length, width)
    pub scale: Vec2,
    pub color: Vec3,
    pub alpha: f32,
    pub visible: bool,
    disposed: bool,
}

impl Sprite {
    fn new(color: Vec3, scale: Vec2) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: 0.0,
            scale,
            color,
            alpha: 1.0,
            visible: true,
            disposed: false,
        }
    }

    /// Release the sprite. Idempotent; a disposed sprite never renders again.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.visible = false;
        self.alpha = 0.0;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// True when the renderer should emit this sprite
    pub fn renderable(&self) -> bool {
        self.visible && !self.disposed && self.alpha > 0.0
    }
}

/// Trail base color (warm white)
const TRAIL_COLOR: Vec3 = Vec3::new(1.0, 0.9, 0.7);
/// Stream (secondary trail) color, cooler and offset from the main trail
const STREAM_COLOR: Vec3 = Vec3::new(0.55, 0.7, 1.0);
/// Glow color
const GLOW_COLOR: Vec3 = Vec3::new(1.0, 0.85, 0.6);

const TRAIL_LENGTH: f32 = 12.0;
const TRAIL_WIDTH: f32 = 0.8;
const STREAM_LENGTH: f32 = 8.0;
const STREAM_WIDTH: f32 = 0.5;
const STREAM_OFFSET: f32 = 1.5;
const GLOW_SIZE: f32 = 4.0;

/// A single procedural shooting star
#[derive(Debug, Clone)]
pub struct ShootingStar {
    curve: CubicBezier,
    /// Curve progress in [0, TRAVEL_END_PROGRESS]; monotone while Moving
    progress: f32,
    /// Progress advance rate in progress/second
    rate: f32,
    phase: Phase,
    /// Phase-local timer, reset on every transition
    timer: f32,
    pub position: Vec3,
    /// Curve tangent scaled by TANGENT_SCALE
    pub velocity: Vec3,
    terminal_cfg: TerminalStar,

    // Owned visual sub-entities
    pub trail: Sprite,
    pub stream: Sprite,
    pub glow: Sprite,
    pub terminal: Sprite,
}

impl ShootingStar {
    /// Build a new shooting star with a randomized arc.
    ///
    /// The start sits just outside a horizontal edge (side chosen uniformly)
    /// at a lower-middle-band height; the end is a random point in the upper
    /// band at a further negative depth. The two control points lie at 25%
    /// and 75% of the chord, displaced upward and backward in depth.
    pub fn spawn<R: Rng>(rng: &mut R, settings: &Settings) -> Self {
        let dir: f32 = if rng.random::<bool>() { 1.0 } else { -1.0 };

        let start = Vec3::new(
            -dir * SPAWN_EDGE_X,
            rng.random_range(-30.0..10.0),
            SPAWN_DEPTH,
        );
        let end = Vec3::new(
            dir * rng.random_range(10.0..70.0),
            rng.random_range(40.0..90.0),
            SPAWN_DEPTH - rng.random_range(20.0..40.0),
        );

        let lift1 = rng.random_range(40.0..100.0);
        let lift2 = rng.random_range(10.0..20.0);
        let cp1 = start.lerp(end, 0.25) + Vec3::new(0.0, lift1, -lift1 * 0.3);
        let cp2 = start.lerp(end, 0.75) + Vec3::new(0.0, lift2, -lift2 * 0.3);

        let curve = CubicBezier::new(start, cp1, cp2, end);
        let velocity = curve.tangent(0.0) * TANGENT_SCALE;

        let terminal_cfg = settings.terminal;
        let mut terminal = Sprite::new(Vec3::ONE, Vec2::splat(terminal_cfg.size));
        terminal.visible = false;
        terminal.alpha = 0.0;

        Self {
            curve,
            progress: 0.0,
            rate: TRAVEL_RATE * settings.speed_multiplier,
            phase: Phase::Moving,
            timer: 0.0,
            position: start,
            velocity,
            terminal_cfg,
            trail: Sprite::new(TRAIL_COLOR, Vec2::new(TRAIL_LENGTH, TRAIL_WIDTH)),
            stream: Sprite::new(STREAM_COLOR, Vec2::new(STREAM_LENGTH, STREAM_WIDTH)),
            glow: Sprite::new(GLOW_COLOR, Vec2::splat(GLOW_SIZE)),
            terminal,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Advance one frame. Returns false once the entity is Dead and must be
    /// disposed and dropped by the caller.
    pub fn update(&mut self, dt: f32) -> bool {
        match self.phase {
            Phase::Moving => self.tick_moving(dt),
            Phase::Stopping => {
                self.timer += dt;
                if self.timer >= STOP_DURATION {
                    self.enter(Phase::Transforming);
                }
            }
            Phase::Transforming => self.tick_transforming(dt),
            Phase::Breathing => self.tick_breathing(dt),
            Phase::Dead => return false,
        }

        // Malformed curve guard: a non-finite position poisons every later
        // frame, so treat the entity as dead and let the registry reap it.
        if !self.position.is_finite() {
            log::warn!("Shooting star produced a non-finite position; culling");
            self.phase = Phase::Dead;
        }

        self.phase != Phase::Dead
    }

    /// Dispose all owned sub-entities. Idempotent.
    pub fn dispose(&mut self) {
        self.trail.dispose();
        self.stream.dispose();
        self.glow.dispose();
        self.terminal.dispose();
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.timer = 0.0;
    }

    fn tick_moving(&mut self, dt: f32) {
        self.progress += self.rate * dt;
        if self.progress >= TRAVEL_END_PROGRESS {
            self.progress = TRAVEL_END_PROGRESS;
            self.enter(Phase::Stopping);
        }

        self.position = self.curve.point(self.progress);
        self.velocity = self.curve.tangent(self.progress) * TANGENT_SCALE;

        let travel = self.progress / TRAVEL_END_PROGRESS;

        // Glow shrinks linearly to nothing as the star approaches its park
        // point; scale and brightness track together.
        self.glow.position = self.position;
        self.glow.scale = Vec2::splat(GLOW_SIZE * (1.0 - travel));
        self.glow.alpha = 1.0 - travel;

        // Trails follow the velocity direction and taper as travel ends
        let heading = self.velocity.y.atan2(self.velocity.x);
        let shrink = 1.0 - travel * 0.6;

        self.trail.position = self.position;
        self.trail.rotation = heading;
        self.trail.scale = Vec2::new(TRAIL_LENGTH * shrink, TRAIL_WIDTH * shrink);

        // The stream rides beside the trail, offset perpendicular to travel
        let perp = Vec3::new(-heading.sin(), heading.cos(), 0.0);
        self.stream.position = self.position + perp * STREAM_OFFSET;
        self.stream.rotation = heading;
        self.stream.scale = Vec2::new(STREAM_LENGTH * shrink, STREAM_WIDTH * shrink);

        self.terminal.position = self.position;
    }

    fn tick_transforming(&mut self, dt: f32) {
        self.timer += dt;
        let t = (self.timer / TRANSFORM_DURATION).min(1.0);

        // Travel visuals fade out while the terminal star fades in, in
        // lockstep on the same timer
        self.trail.alpha = 1.0 - t;
        self.stream.alpha = 1.0 - t;
        self.glow.alpha = self.glow.alpha.min(1.0 - t);

        self.terminal.visible = true;
        self.terminal.position = self.position;
        self.terminal.alpha = (self.timer * self.terminal_cfg.fade_in_speed).min(t);

        if self.timer >= TRANSFORM_DURATION {
            self.trail.visible = false;
            self.stream.visible = false;
            self.glow.visible = false;
            self.terminal.alpha = 1.0;
            self.enter(Phase::Breathing);
        }
    }

    fn tick_breathing(&mut self, dt: f32) {
        self.timer += dt;
        let t = (self.timer / self.terminal_cfg.disappear_seconds).min(1.0);

        self.terminal.scale = Vec2::splat(self.terminal_cfg.size * (1.0 - t));
        self.terminal.alpha = 1.0 - t;

        if self.timer >= self.terminal_cfg.disappear_seconds {
            self.enter(Phase::Dead);
        }
    }
}

//! Per-frame simulation driver
//!
//! All mutable simulation state lives here and is touched only from the
//! frame callback, which the host runs strictly serially. Event listeners
//! write nothing but the raw scroll offset carried in `FrameInput`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::camera::Camera;
use super::field::StarField;
use super::shooting::ShootingStar;
use super::spawner::Spawner;
use crate::Settings;

/// Ambient inputs sampled at the start of a frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Current vertical scroll offset in pixels
    pub scroll_y: f32,
    /// Host wall clock in milliseconds
    pub now_ms: f64,
}

/// Complete backdrop simulation state for one mount
pub struct BackdropState {
    pub settings: Settings,
    pub field: StarField,
    pub camera: Camera,
    /// Shared breathing-time value: reset at mount, advanced every frame,
    /// discarded at unmount
    pub time: f32,
    /// Live shooting stars, owned and mutated only by the frame loop
    pub shooting: Vec<ShootingStar>,
    spawner: Spawner,
    rng: Pcg32,
    /// Total spawns since mount
    pub spawned_total: u64,
}

impl BackdropState {
    /// Build a fresh simulation: generates both star populations once and
    /// arms the spawner from the current wall clock.
    pub fn new(seed: u64, now_ms: f64, settings: Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let field = StarField::generate(&mut rng, &settings);
        Self {
            settings,
            field,
            camera: Camera::new(),
            time: 0.0,
            shooting: Vec::new(),
            spawner: Spawner::new(now_ms),
            rng,
            spawned_total: 0,
        }
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self, input: &FrameInput, dt: f32) {
        // 1-2. Camera target from scroll, then damp toward it
        self.camera
            .set_scroll(input.scroll_y, self.settings.effective_parallax());
        self.camera.tick();

        // 3. Shared breathing time for both star populations
        self.time += dt;

        // 4. Spawn gate
        if self.spawner.should_spawn(input.now_ms, &self.settings) {
            self.spawn_now();
        }

        // 5. Advance every live shooting star; dispose and drop the dead
        self.shooting.retain_mut(|star| {
            let alive = star.update(dt);
            if !alive {
                star.dispose();
            }
            alive
        });
    }

    /// Create one shooting star immediately
    pub fn spawn_now(&mut self) {
        let star = ShootingStar::spawn(&mut self.rng, &self.settings);
        log::debug!(
            "Spawned shooting star #{} from x = {:.0}",
            self.spawned_total + 1,
            star.position.x
        );
        self.shooting.push(star);
        self.spawned_total += 1;
    }

    /// Dispose every live shooting star. Idempotent; used by teardown.
    pub fn dispose(&mut self) {
        for star in &mut self.shooting {
            star.dispose();
        }
        self.shooting.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::sim::shooting::Phase;

    fn state(settings: Settings) -> BackdropState {
        BackdropState::new(1234, 0.0, settings)
    }

    /// Run `seconds` of simulated 60 fps frames
    fn run(state: &mut BackdropState, seconds: f32) {
        let frames = (seconds * 60.0) as u64;
        for frame in 1..=frames {
            let input = FrameInput {
                scroll_y: 0.0,
                now_ms: frame as f64 * 1000.0 / 60.0,
            };
            state.tick(&input, FRAME_DT);
        }
    }

    #[test]
    fn test_ten_second_spawn_window() {
        let mut settings = Settings::default();
        settings.spawn_frequency = 1.0;
        let mut st = state(settings);

        run(&mut st, 10.0);

        assert!(
            (9..=11).contains(&st.spawned_total),
            "spawned {}",
            st.spawned_total
        );
        // Default lifecycle is ≈8.3 s (travel 0.85/0.18 + 0.3 + 0.3 + 3.0),
        // so the earliest spawns have completed and been removed while the
        // recent ones are still alive.
        let alive = st.shooting.len() as u64;
        assert!(alive < st.spawned_total, "nothing was reaped");
        assert!((6..=9).contains(&alive), "alive {alive}");
        for star in &st.shooting {
            assert_ne!(star.phase(), Phase::Dead);
        }
    }

    #[test]
    fn test_time_advances_monotonically() {
        let mut st = state(Settings::default());
        let mut last = st.time;
        for frame in 1..=120 {
            st.tick(
                &FrameInput {
                    scroll_y: 0.0,
                    now_ms: frame as f64 * 16.0,
                },
                FRAME_DT,
            );
            assert!(st.time > last);
            last = st.time;
        }
        assert!((st.time - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_field_generated_once_and_untouched() {
        let mut st = state(Settings::default());
        let snapshot: Vec<_> = st.field.glyph.iter().map(|s| s.position).collect();
        run(&mut st, 2.0);
        for (star, pos) in st.field.glyph.iter().zip(snapshot) {
            assert_eq!(star.position, pos);
        }
    }

    #[test]
    fn test_malformed_curve_is_culled_not_fatal() {
        let mut settings = Settings::default();
        settings.speed_multiplier = f32::NAN;
        let mut st = state(settings);

        st.spawn_now();
        assert_eq!(st.shooting.len(), 1);

        // The poisoned entity dies on its first update and the loop goes on
        st.tick(
            &FrameInput {
                scroll_y: 0.0,
                now_ms: 16.0,
            },
            FRAME_DT,
        );
        assert!(st.shooting.is_empty());

        // A healthy simulation keeps running afterward
        st.settings.speed_multiplier = 1.0;
        st.spawn_now();
        run(&mut st, 1.0);
        assert_eq!(st.shooting.len(), 1);
    }

    #[test]
    fn test_scroll_drives_camera() {
        let mut st = state(Settings::default());
        for frame in 1..=300 {
            st.tick(
                &FrameInput {
                    scroll_y: 1000.0,
                    now_ms: frame as f64 * 16.0,
                },
                FRAME_DT,
            );
        }
        assert!((st.camera.current.y - 20.0).abs() < 0.2);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut settings = Settings::default();
        settings.spawn_frequency = 0.5;
        let mut st = state(settings);
        run(&mut st, 3.0);
        assert!(!st.shooting.is_empty());

        st.dispose();
        assert!(st.shooting.is_empty());
        st.dispose();
        assert!(st.shooting.is_empty());
    }

    #[test]
    fn test_reduced_motion_spawns_nothing() {
        let mut settings = Settings::default();
        settings.spawn_frequency = 0.5;
        settings.reduced_motion = true;
        let mut st = state(settings);
        run(&mut st, 5.0);
        assert_eq!(st.spawned_total, 0);
        assert_eq!(st.camera.current.y, 0.0);
    }
}

//! Background star-field generation
//!
//! Two populations are generated once per mount and never mutated:
//! - "glyph" stars: four-pointed sprites with concave corners (count N)
//! - "round" stars: soft circular sprites (count N/4)
//!
//! Only the shared animation-time value changes afterward; per-star phase
//! offsets keep the breathing from synchronizing.

use glam::Vec3;
use rand::Rng;

use crate::Settings;

/// Warm amber palette, picked roughly 30% of the time
const PALETTE_AMBER: [f32; 3] = [1.0, 0.72, 0.45];
/// Warm white palette, picked roughly 70% of the time
const PALETTE_WARM_WHITE: [f32; 3] = [1.0, 0.92, 0.78];
/// Fraction of stars drawn from the amber palette
const AMBER_FRACTION: f32 = 0.3;

/// Vertical placement: y = Y_BASE + bias(u) · Y_SPAN
const Y_BASE: f32 = -45.0;
const Y_SPAN: f32 = 105.0;

/// One generated star (per-vertex attribute record for the point pipeline)
#[derive(Debug, Clone, Copy)]
pub struct StarVertex {
    pub position: Vec3,
    pub color: Vec3,
    /// Per-vertex size factor, already multiplied by the base size
    pub size: f32,
    /// Breathing phase offset so stars twinkle independently
    pub phase: f32,
}

/// Both star populations for one mount
#[derive(Debug, Clone)]
pub struct StarField {
    pub glyph: Vec<StarVertex>,
    pub round: Vec<StarVertex>,
}

/// Density-bias transform: concentrates mass at the high end of the range.
///
/// For uniform u, `1 − u⁴` piles most samples near 1, which lands the bulk
/// of the field in the band the backdrop framing shows. The quartic is part
/// of the visual signature; changing it changes the sky.
#[inline]
pub fn density_bias(u: f32) -> f32 {
    1.0 - u * u * u * u
}

fn generate_population<R: Rng>(rng: &mut R, settings: &Settings, count: usize) -> Vec<StarVertex> {
    let spread = settings.radius * 1.5;
    (0..count)
        .map(|_| {
            let x = rng.random_range(-spread..spread);
            let y = Y_BASE + density_bias(rng.random::<f32>()) * Y_SPAN;
            let z = -rng.random::<f32>() * settings.depth * 1.5;

            let palette = if rng.random::<f32>() < AMBER_FRACTION {
                PALETTE_AMBER
            } else {
                PALETTE_WARM_WHITE
            };
            let brightness = rng.random_range(0.85..1.0);
            let color = Vec3::from_array(palette) * brightness;

            let size = settings.star_size * (0.5 + rng.random::<f32>() * 1.5);
            let phase = rng.random_range(0.0..std::f32::consts::TAU);

            StarVertex {
                position: Vec3::new(x, y, z),
                color,
                size,
                phase,
            }
        })
        .collect()
}

impl StarField {
    /// Generate both populations from the given RNG (once per mount)
    pub fn generate<R: Rng>(rng: &mut R, settings: &Settings) -> Self {
        let glyph = generate_population(rng, settings, settings.effective_star_count());
        let round = generate_population(rng, settings, settings.round_star_count());
        log::info!(
            "Generated star field: {} glyph, {} round",
            glyph.len(),
            round.len()
        );
        Self { glyph, round }
    }
}

/// Breathing modulation for a star at the shared animation time.
///
/// Returns a factor around 1.0; the shader applies the same curve to size
/// and alpha so twinkle reads as a pulse rather than a flicker.
#[inline]
pub fn breathe(time: f32, speed: f32, amplitude: f32, phase: f32) -> f32 {
    1.0 - amplitude + amplitude * (time * speed + phase).sin().abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field(seed: u64) -> StarField {
        let mut rng = Pcg32::seed_from_u64(seed);
        StarField::generate(&mut rng, &Settings::default())
    }

    #[test]
    fn test_population_counts() {
        let settings = Settings::default();
        let f = field(7);
        assert_eq!(f.glyph.len(), settings.effective_star_count());
        assert_eq!(f.round.len(), settings.effective_star_count() / 4);
    }

    #[test]
    fn test_positions_in_bounds() {
        let settings = Settings::default();
        let spread = settings.radius * 1.5;
        let f = field(7);
        for star in f.glyph.iter().chain(f.round.iter()) {
            assert!(star.position.x.abs() <= spread);
            assert!(star.position.y >= Y_BASE && star.position.y <= Y_BASE + Y_SPAN);
            assert!(star.position.z <= 0.0 && star.position.z >= -settings.depth * 1.5);
            assert!(star.size >= settings.star_size * 0.5);
            assert!(star.size <= settings.star_size * 2.0);
        }
    }

    #[test]
    fn test_density_bias_skews_distribution() {
        // With the quartic bias, far more than the uniform baseline of 40%
        // of stars must land in the top 40% of the y range.
        let f = field(42);
        let threshold = Y_BASE + 0.6 * Y_SPAN;
        let dense = f.glyph.iter().filter(|s| s.position.y > threshold).count();
        let fraction = dense as f32 / f.glyph.len() as f32;
        assert!(
            fraction > 0.65,
            "expected strong concentration, got {fraction}"
        );
    }

    #[test]
    fn test_palette_split() {
        let f = field(3);
        let amber = f
            .glyph
            .iter()
            .filter(|s| {
                // Amber stars have a noticeably lower blue channel relative to red
                s.color.z / s.color.x < 0.6
            })
            .count();
        let fraction = amber as f32 / f.glyph.len() as f32;
        assert!(fraction > 0.2 && fraction < 0.4, "amber fraction {fraction}");
    }

    #[test]
    fn test_generation_is_seed_deterministic() {
        let a = field(99);
        let b = field(99);
        assert_eq!(a.glyph.len(), b.glyph.len());
        for (x, y) in a.glyph.iter().zip(b.glyph.iter()) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.size, y.size);
        }
    }

    #[test]
    fn test_breathe_stays_positive_and_bounded() {
        for i in 0..1000 {
            let t = i as f32 * 0.05;
            let b = breathe(t, 1.2, 0.35, 1.7);
            assert!(b >= 0.65 - 1e-5 && b <= 1.0 + 1e-5, "b = {b}");
        }
    }
}

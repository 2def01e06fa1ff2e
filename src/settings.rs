//! Backdrop settings and preferences
//!
//! Immutable for the lifetime of a mount; persisted in LocalStorage so a
//! returning visitor keeps their quality choice.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Star count multiplier for this preset
    pub fn star_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.35,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.5,
        }
    }

    /// Whether shooting stars run at this preset
    pub fn shooting_stars_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }
}

/// Visual parameters of the terminal static star a shooting star becomes
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TerminalStar {
    /// World-space size of the parked star
    pub size: f32,
    /// Glow falloff softness (0 = hard edge, 1 = very diffuse)
    pub glow_softness: f32,
    /// Concave corner sharpness of the four-pointed glyph
    pub corner_sharpness: f32,
    /// Relative size of the bright center highlight
    pub core_size: f32,
    /// Alpha ramp rate while the star is fading in (per second)
    pub fade_in_speed: f32,
    /// How long the parked star breathes before it disappears (seconds)
    pub disappear_seconds: f32,
}

impl Default for TerminalStar {
    fn default() -> Self {
        Self {
            size: 3.0,
            glow_softness: 0.5,
            corner_sharpness: 0.7,
            core_size: 0.2,
            fade_in_speed: 3.3,
            disappear_seconds: 3.0,
        }
    }
}

/// Backdrop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Star field ===
    /// Primary (glyph) population size; the round population is a quarter of it
    pub star_count: u32,
    /// Base point-sprite size in world units
    pub star_size: f32,
    /// Horizontal spread radius (stars span ±radius·1.5)
    pub radius: f32,
    /// Depth range (stars sit in z ∈ [−depth·1.5, 0])
    pub depth: f32,
    /// Glow falloff softness for the glyph population
    pub glow_softness: f32,
    /// Concave corner softness for the glyph shape
    pub corner_softness: f32,

    // === Breathing ===
    /// Breathing (twinkle) frequency in radians/second
    pub breath_speed: f32,
    /// Breathing size/alpha modulation depth (0 = none)
    pub breath_amplitude: f32,

    // === Parallax ===
    /// Scroll-driven parallax intensity (0 disables camera motion)
    pub parallax: f32,

    // === Shooting stars ===
    /// Master toggle for shooting stars
    pub shooting_stars: bool,
    /// Seconds between spawns (fixed-interval gate)
    pub spawn_frequency: f32,
    /// Travel-speed multiplier over the base curve rate
    pub speed_multiplier: f32,
    /// Terminal static-star look
    pub terminal: TerminalStar,

    // === Accessibility ===
    /// Reduced motion (static field only: no parallax, no shooting stars)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            star_count: 2000,
            star_size: 2.0,
            radius: 60.0,
            depth: 60.0,
            glow_softness: 0.6,
            corner_softness: 0.35,

            breath_speed: 1.2,
            breath_amplitude: 0.35,

            parallax: 1.0,

            shooting_stars: true,
            spawn_frequency: 10.0,
            speed_multiplier: 1.0,
            terminal: TerminalStar::default(),

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.quality = preset;
        settings
    }

    /// Glyph-population size after the quality preset is applied
    pub fn effective_star_count(&self) -> usize {
        (self.star_count as f32 * self.quality.star_scale()).round() as usize
    }

    /// Round-population size (a quarter of the glyph population)
    pub fn round_star_count(&self) -> usize {
        self.effective_star_count() / 4
    }

    /// Whether shooting stars actually run (toggle, preset, reduced motion)
    pub fn effective_shooting_stars(&self) -> bool {
        self.shooting_stars && self.quality.shooting_stars_enabled() && !self.reduced_motion
    }

    /// Effective parallax intensity (respects reduced_motion)
    pub fn effective_parallax(&self) -> f32 {
        if self.reduced_motion { 0.0 } else { self.parallax }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "starfall_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_scales_star_count() {
        let mut s = Settings::default();
        s.star_count = 2000;
        s.quality = QualityPreset::Low;
        assert_eq!(s.effective_star_count(), 700);
        s.quality = QualityPreset::High;
        assert_eq!(s.effective_star_count(), 3000);
        assert_eq!(s.round_star_count(), 750);
    }

    #[test]
    fn test_reduced_motion_disables_motion() {
        let mut s = Settings::default();
        assert!(s.effective_shooting_stars());
        assert!(s.effective_parallax() > 0.0);
        s.reduced_motion = true;
        assert!(!s.effective_shooting_stars());
        assert_eq!(s.effective_parallax(), 0.0);
    }

    #[test]
    fn test_low_preset_gates_shooting_stars() {
        let s = Settings::from_preset(QualityPreset::Low);
        assert!(s.shooting_stars);
        assert!(!s.effective_shooting_stars());
    }
}

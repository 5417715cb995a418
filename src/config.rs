//! Configuration for backdrop runs.
//!
//! Every field has a default matching the stock look, so an empty TOML
//! file (or none at all) is a valid configuration:
//!
//! ```toml
//! backend = "shapes"
//! theme = "light"
//! seed = 42
//!
//! [particles]
//! area_per_particle = 12000.0
//!
//! [shapes]
//! count = 30
//! ```

use glam::Vec3;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::theme::ThemeMode;
use crate::time::DEFAULT_MAX_TICKS;
use crate::viewport::{SceneBounds, Viewport};

/// Which renderer backend drives the backdrop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// 2-D particles with proximity connectors.
    #[default]
    Particles,
    /// Lit 3-D floating shapes.
    Shapes,
}

/// Where the light/dark signal comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSource {
    /// Follow the OS theme reported by the window, live.
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeSource {
    /// Initial mode given what the OS reports, dark when unknown.
    pub fn initial(self, system: Option<ThemeMode>) -> ThemeMode {
        match self {
            ThemeSource::System => system.unwrap_or(ThemeMode::Dark),
            ThemeSource::Light => ThemeMode::Light,
            ThemeSource::Dark => ThemeMode::Dark,
        }
    }

    pub fn follows_system(self) -> bool {
        self == ThemeSource::System
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "backdrop".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Tuning of the 2-D particle field.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    /// Viewport area (px²) per particle; population = area / this.
    pub area_per_particle: f32,
    /// Pointer influence radius in pixels.
    pub influence_radius: f32,
    /// Max distance at which two particles are connected.
    pub connection_distance: f32,
    /// Frames for the displaced position to relax toward the anchor.
    pub relaxation: f32,
    /// Max anchor drift per axis per reference frame.
    pub max_drift: f32,
    pub size_range: [f32; 2],
    pub density_range: [f32; 2],
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            area_per_particle: 9000.0,
            influence_radius: 150.0,
            connection_distance: 120.0,
            relaxation: 10.0,
            max_drift: 0.25,
            size_range: [1.0, 4.0],
            density_range: [1.0, 31.0],
        }
    }
}

impl ParticleSettings {
    /// Population size for a viewport: `floor(area / area_per_particle)`.
    pub fn target_count(&self, viewport: Viewport) -> usize {
        if self.area_per_particle <= 0.0 {
            return 0;
        }
        (viewport.area() / self.area_per_particle).floor() as usize
    }

    /// How far outside the viewport a displaced particle may be drawn.
    pub fn display_margin(&self) -> f32 {
        self.influence_radius
    }
}

/// Tuning of the 3-D shape field.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShapeSettings {
    pub count: usize,
    /// Scales drift and spin (base ±0.01 per frame per axis).
    pub speed_multiplier: f32,
    pub half_extents: [f32; 3],
    /// Pointer proximity (scene units) inside which shapes are nudged.
    pub proximity: f32,
    /// Nudge distance per reference frame.
    pub nudge: f32,
    /// Scene units per NDC unit when placing the pointer on the z = 0 plane.
    pub pointer_scale: f32,
    /// Light orbit speed in radians per second.
    pub light_orbit_rate: f32,
    pub camera_distance: f32,
    pub fov_degrees: f32,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            count: 45,
            speed_multiplier: 1.5,
            half_extents: [25.0, 25.0, 20.0],
            proximity: 5.0,
            nudge: 0.1,
            pointer_scale: 10.0,
            light_orbit_rate: 0.5,
            camera_distance: 15.0,
            fov_degrees: 75.0,
        }
    }
}

impl ShapeSettings {
    pub fn bounds(&self) -> SceneBounds {
        SceneBounds::new(Vec3::from_array(self.half_extents))
    }
}

/// Complete backdrop configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub backend: BackendKind,
    pub theme: ThemeSource,
    /// Fixed seed for reproducible spawns.
    pub seed: Option<u64>,
    pub max_ticks_per_frame: Option<f32>,
    pub window: WindowSettings,
    pub particles: ParticleSettings,
    pub shapes: ShapeSettings,
}

impl BackdropConfig {
    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn max_ticks(&self) -> f32 {
        self.max_ticks_per_frame.unwrap_or(DEFAULT_MAX_TICKS)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.particles;
        if !(p.area_per_particle > 0.0) {
            return Err(ConfigError::Invalid("particles.area_per_particle must be positive"));
        }
        if !(p.influence_radius > 0.0) || !(p.connection_distance > 0.0) {
            return Err(ConfigError::Invalid("particle radii must be positive"));
        }
        if !(p.relaxation >= 1.0) {
            return Err(ConfigError::Invalid("particles.relaxation must be at least 1"));
        }
        if p.size_range[0] > p.size_range[1] || p.density_range[0] > p.density_range[1] {
            return Err(ConfigError::Invalid("particle ranges must be ordered low..high"));
        }
        if !(p.max_drift >= 0.0) {
            return Err(ConfigError::Invalid("particles.max_drift must not be negative"));
        }
        let s = &self.shapes;
        if s.half_extents.iter().any(|h| !(*h > 0.0)) {
            return Err(ConfigError::Invalid("shapes.half_extents must be positive"));
        }
        if !(s.fov_degrees > 0.0 && s.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid("shapes.fov_degrees must be in (0, 180)"));
        }
        if !(self.max_ticks() > 0.0) {
            return Err(ConfigError::Invalid("max_ticks_per_frame must be positive"));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = BackdropConfig::from_toml("").unwrap();
        assert_eq!(config, BackdropConfig::default());
        assert_eq!(config.particles.area_per_particle, 9000.0);
        assert_eq!(config.shapes.count, 45);
    }

    #[test]
    fn test_partial_toml() {
        let config = BackdropConfig::from_toml(
            r#"
            backend = "shapes"
            theme = "light"
            seed = 42

            [shapes]
            count = 12
            "#,
        )
        .unwrap();
        assert_eq!(config.backend, BackendKind::Shapes);
        assert_eq!(config.theme, ThemeSource::Light);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.shapes.count, 12);
        assert_eq!(config.shapes.nudge, 0.1);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = BackdropConfig::from_toml("[particles]\narea_per_particle = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = BackdropConfig::from_toml("backend = \"voxels\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_target_count() {
        let settings = ParticleSettings::default();
        assert_eq!(settings.target_count(Viewport::new(800.0, 600.0)), 53);
        assert_eq!(settings.target_count(Viewport::new(0.0, 600.0)), 0);
        assert_eq!(settings.target_count(Viewport::new(-800.0, -600.0)), 0);
    }

    #[test]
    fn test_theme_source_initial() {
        assert_eq!(ThemeSource::System.initial(None), ThemeMode::Dark);
        assert_eq!(ThemeSource::System.initial(Some(ThemeMode::Light)), ThemeMode::Light);
        assert_eq!(ThemeSource::Dark.initial(Some(ThemeMode::Light)), ThemeMode::Dark);
    }
}

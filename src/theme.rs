//! Theme adapter: light/dark signal to palette.
//!
//! A [`Palette`] carries every theme-dependent parameter both backends use.
//! Swapping palettes never touches geometry or element positions; the
//! [`ThemeAdapter`] bumps a version counter so renderers and populations can
//! re-derive their cached paint on the next frame.
//!
//! ```ignore
//! let mut theme = ThemeAdapter::new(ThemeMode::Dark);
//! let before = theme.version();
//! theme.set_mode(ThemeMode::Light);
//! assert!(theme.version() > before);
//! ```

use glam::Vec3;
use serde::Deserialize;

/// Light/dark signal from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }
}

impl From<winit::window::Theme> for ThemeMode {
    fn from(theme: winit::window::Theme) -> Self {
        match theme {
            winit::window::Theme::Light => ThemeMode::Light,
            winit::window::Theme::Dark => ThemeMode::Dark,
        }
    }
}

/// Convert a `0xRRGGBB` literal to linear-ish RGB in `0.0..=1.0`.
pub fn hex(rgb: u32) -> Vec3 {
    Vec3::new(
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
    )
}

/// Number of colors in the particle palette.
pub const PARTICLE_COLORS: usize = 5;

/// Material slots shared by the floating shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialSlot {
    Purple,
    Pink,
    Yellow,
    Blue,
}

impl MaterialSlot {
    pub const ALL: [MaterialSlot; 4] = [
        MaterialSlot::Purple,
        MaterialSlot::Pink,
        MaterialSlot::Yellow,
        MaterialSlot::Blue,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Surface parameters for one material slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    pub color: Vec3,
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub metalness: f32,
    pub roughness: f32,
}

/// A point light before orbit animation is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLightParams {
    pub color: Vec3,
    pub intensity: f32,
}

/// Every theme-dependent parameter, selected wholesale from a [`ThemeMode`].
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub mode: ThemeMode,
    /// Bumped by the adapter on every swap.
    pub version: u64,
    /// Backdrop gradient, top to bottom.
    pub background: [Vec3; 2],
    /// Particle fill colors, indexed by each particle's color index.
    pub particle_colors: [Vec3; PARTICLE_COLORS],
    pub connection_color: Vec3,
    /// Connector alpha at distance zero.
    pub connection_alpha: f32,
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
    pub point_lights: [PointLightParams; 3],
    /// Indexed by [`MaterialSlot::index`].
    pub materials: [MaterialParams; 4],
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        let material = |color| MaterialParams {
            color,
            emissive_intensity: 0.2,
            opacity: 0.9,
            metalness: 0.3,
            roughness: 0.4,
        };
        Self {
            mode: ThemeMode::Dark,
            version: 0,
            background: [hex(0x111827), hex(0x000000)],
            particle_colors: [
                hex(0xf5c842),
                hex(0xe91e63),
                hex(0x9c27b0),
                hex(0x4a90e2),
                hex(0x50e3c2),
            ],
            connection_color: Vec3::ONE,
            connection_alpha: 0.15,
            ambient_color: Vec3::ONE,
            ambient_intensity: 0.6,
            point_lights: [
                PointLightParams { color: hex(0x9333ea), intensity: 1.0 },
                PointLightParams { color: hex(0xec4899), intensity: 1.0 },
                PointLightParams { color: hex(0xfbbf24), intensity: 0.8 },
            ],
            materials: [
                material(hex(0x9333ea)),
                material(hex(0xec4899)),
                material(hex(0xfbbf24)),
                material(hex(0x3b82f6)),
            ],
        }
    }

    pub fn light() -> Self {
        let material = |color| MaterialParams {
            color,
            emissive_intensity: 0.1,
            opacity: 0.8,
            metalness: 0.3,
            roughness: 0.4,
        };
        Self {
            mode: ThemeMode::Light,
            version: 0,
            background: [hex(0x818cf8), hex(0x7e22ce)],
            particle_colors: [
                hex(0xfbbf24),
                hex(0xec4899),
                hex(0xa855f7),
                hex(0x3b82f6),
                hex(0x06b6d4),
            ],
            connection_color: Vec3::ONE,
            connection_alpha: 0.25,
            ambient_color: Vec3::ONE,
            ambient_intensity: 0.8,
            point_lights: [
                PointLightParams { color: hex(0x6366f1), intensity: 0.8 },
                PointLightParams { color: hex(0xf43f5e), intensity: 0.8 },
                PointLightParams { color: hex(0xf59e0b), intensity: 1.0 },
            ],
            materials: [
                material(hex(0x6366f1)),
                material(hex(0xf43f5e)),
                material(hex(0xf59e0b)),
                material(hex(0x0ea5e9)),
            ],
        }
    }

    /// Particle color for an index, wrapping out-of-range indices.
    pub fn particle_color(&self, index: usize) -> Vec3 {
        self.particle_colors[index % PARTICLE_COLORS]
    }

    pub fn material(&self, slot: MaterialSlot) -> &MaterialParams {
        &self.materials[slot.index()]
    }
}

/// Maps the host's light/dark signal to the current [`Palette`].
#[derive(Debug, Clone)]
pub struct ThemeAdapter {
    palette: Palette,
}

impl ThemeAdapter {
    pub fn new(mode: ThemeMode) -> Self {
        let mut palette = Palette::for_mode(mode);
        palette.version = 1;
        Self { palette }
    }

    pub fn mode(&self) -> ThemeMode {
        self.palette.mode
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn version(&self) -> u64 {
        self.palette.version
    }

    /// Swap the palette if `mode` differs from the current one.
    ///
    /// Returns `true` when a swap happened.
    pub fn set_mode(&mut self, mode: ThemeMode) -> bool {
        if mode == self.palette.mode {
            return false;
        }
        let version = self.palette.version + 1;
        self.palette = Palette::for_mode(mode);
        self.palette.version = version;
        true
    }
}

impl Default for ThemeAdapter {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(hex(0xffffff), Vec3::ONE);
        assert_eq!(hex(0x000000), Vec3::ZERO);
        assert_eq!(hex(0xff0000), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_set_mode_bumps_version_once() {
        let mut theme = ThemeAdapter::new(ThemeMode::Dark);
        let v0 = theme.version();

        assert!(!theme.set_mode(ThemeMode::Dark));
        assert_eq!(theme.version(), v0);

        assert!(theme.set_mode(ThemeMode::Light));
        assert_eq!(theme.version(), v0 + 1);
        assert_eq!(theme.palette().mode, ThemeMode::Light);
        assert_eq!(theme.palette().ambient_intensity, 0.8);
    }

    #[test]
    fn test_palettes_differ_per_mode() {
        let dark = Palette::dark();
        let light = Palette::light();
        assert_ne!(dark.particle_colors, light.particle_colors);
        assert_eq!(dark.connection_alpha, 0.15);
        assert_eq!(light.connection_alpha, 0.25);
        assert_eq!(dark.material(MaterialSlot::Blue).opacity, 0.9);
        assert_eq!(light.material(MaterialSlot::Blue).opacity, 0.8);
    }

    #[test]
    fn test_particle_color_wraps() {
        let palette = Palette::dark();
        assert_eq!(palette.particle_color(7), palette.particle_colors[2]);
    }
}

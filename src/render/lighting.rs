//! Ambient plus orbiting point lights for the shape field.

use glam::Vec3;

use crate::theme::{MaterialParams, Palette};

/// Distance at which a point light no longer contributes.
pub const LIGHT_RANGE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

/// Three point lights and an ambient term.
///
/// Colors come from the palette; positions come from the clock, so lights
/// keep moving independently of the shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub orbit_rate: f32,
    pub ambient: Vec3,
    pub lights: [PointLight; 3],
}

impl LightRig {
    pub fn new(orbit_rate: f32, palette: &Palette) -> Self {
        let mut rig = Self {
            orbit_rate,
            ambient: Vec3::ZERO,
            lights: [PointLight {
                position: Vec3::ZERO,
                color: Vec3::ZERO,
                intensity: 0.0,
            }; 3],
        };
        rig.apply_palette(palette);
        rig.update(0.0);
        rig
    }

    pub fn apply_palette(&mut self, palette: &Palette) {
        self.ambient = palette.ambient_color * palette.ambient_intensity;
        for (light, params) in self.lights.iter_mut().zip(&palette.point_lights) {
            light.color = params.color;
            light.intensity = params.intensity;
        }
    }

    /// Move the lights for `elapsed` seconds since start.
    pub fn update(&mut self, elapsed: f32) {
        let t = elapsed * self.orbit_rate;
        self.lights[0].position = Vec3::new(t.sin() * 10.0, 10.0, t.cos() * 10.0);
        self.lights[1].position = Vec3::new((t * 0.7).cos() * 10.0, (t * 0.7).sin() * 10.0, 10.0);
        self.lights[2].position = Vec3::new(0.0, 10.0, -10.0);
    }
}

/// Lit color of a surface point.
///
/// Lambert diffuse plus a Blinn-Phong highlight whose sharpness follows the
/// material roughness, then the material's own emission.
pub fn shade(material: &MaterialParams, point: Vec3, normal: Vec3, eye: Vec3, rig: &LightRig) -> Vec3 {
    let base = material.color;
    let view = (eye - point).normalize_or_zero();
    let diffuse_weight = 1.0 - material.metalness;
    let specular_tint = Vec3::splat(0.04).lerp(base, material.metalness);
    let roughness = material.roughness.clamp(0.05, 1.0);
    let shininess = 2.0 / roughness.powi(4) - 2.0;

    let mut color = base * rig.ambient * diffuse_weight;
    for light in &rig.lights {
        let to_light = light.position - point;
        let distance = to_light.length();
        let falloff = (1.0 - distance / LIGHT_RANGE).clamp(0.0, 1.0);
        if falloff <= 0.0 {
            continue;
        }
        let dir = to_light / distance;
        let n_dot_l = normal.dot(dir);
        if n_dot_l <= 0.0 {
            continue;
        }
        let radiance = light.color * light.intensity * falloff;
        let half = (dir + view).normalize_or_zero();
        let highlight = normal.dot(half).max(0.0).powf(shininess);

        color += radiance * (base * diffuse_weight * n_dot_l + specular_tint * highlight);
    }
    color += base * material.emissive_intensity;
    color.clamp(Vec3::ZERO, Vec3::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::MaterialSlot;
    use approx::assert_relative_eq;

    #[test]
    fn test_lights_orbit_with_time() {
        let mut rig = LightRig::new(0.5, &Palette::dark());
        assert_relative_eq!(rig.lights[0].position.z, 10.0);
        rig.update(std::f32::consts::PI);
        // t = pi / 2
        assert_relative_eq!(rig.lights[0].position.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(rig.lights[0].position.z, 0.0, epsilon = 1e-4);
        assert_eq!(rig.lights[2].position, Vec3::new(0.0, 10.0, -10.0));
    }

    #[test]
    fn test_palette_swaps_light_colors() {
        let mut rig = LightRig::new(0.5, &Palette::dark());
        let dark_ambient = rig.ambient;
        rig.apply_palette(&Palette::light());
        assert_eq!(rig.lights[0].color, Palette::light().point_lights[0].color);
        assert!(rig.ambient.x > dark_ambient.x);
    }

    #[test]
    fn test_lit_side_is_brighter() {
        let palette = Palette::dark();
        let rig = LightRig::new(0.5, &palette);
        let material = palette.material(MaterialSlot::Yellow);
        let eye = Vec3::new(0.0, 0.0, 15.0);
        let toward = shade(material, Vec3::ZERO, Vec3::Y, eye, &rig);
        let away = shade(material, Vec3::ZERO, Vec3::NEG_Y, eye, &rig);
        assert!(toward.length() > away.length());
        assert!(away.cmpge(Vec3::ZERO).all() && toward.cmple(Vec3::ONE).all());
    }
}

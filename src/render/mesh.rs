//! Triangle meshes for the five floating shapes.
//!
//! Meshes are built once per renderer and shared by every shape of the same
//! kind. Each triangle carries an outward unit normal; winding is not relied
//! on anywhere, so generators only need to say which side is "out".

use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

use crate::element::ShapeKind;

/// Sphere tessellation. Kept coarse: every triangle is rasterized on the CPU.
const SPHERE_SEGMENTS: usize = 12;
const SPHERE_RINGS: usize = 8;
const CYLINDER_SEGMENTS: usize = 12;
/// Samples per cubic segment of the heart outline.
const CURVE_SAMPLES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
    /// Outward unit normal.
    pub normal: Vec3,
}

impl Triangle {
    pub fn centroid(&self) -> Vec3 {
        (self.vertices[0] + self.vertices[1] + self.vertices[2]) / 3.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Add a triangle whose normal should point along `outward`.
    ///
    /// Degenerate triangles (pole slivers) are dropped.
    pub fn push(&mut self, a: Vec3, b: Vec3, c: Vec3, outward: Vec3) {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        if normal == Vec3::ZERO {
            return;
        }
        let (vertices, normal) = if normal.dot(outward) < 0.0 {
            ([a, c, b], -normal)
        } else {
            ([a, b, c], normal)
        };
        self.triangles.push(Triangle { vertices, normal });
    }

    pub fn extend(&mut self, other: Mesh) {
        self.triangles.extend(other.triangles);
    }

    /// Latitude/longitude ellipsoid around `center`.
    pub fn ellipsoid(center: Vec3, radii: Vec3) -> Self {
        let mut mesh = Mesh::default();
        let point = |ring: usize, seg: usize| {
            let theta = ring as f32 / SPHERE_RINGS as f32 * PI;
            let phi = seg as f32 / SPHERE_SEGMENTS as f32 * TAU;
            let dir = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
            center + dir * radii
        };
        for ring in 0..SPHERE_RINGS {
            for seg in 0..SPHERE_SEGMENTS {
                let p00 = point(ring, seg);
                let p01 = point(ring, seg + 1);
                let p10 = point(ring + 1, seg);
                let p11 = point(ring + 1, seg + 1);
                mesh.push(p00, p10, p11, (p00 + p10 + p11) / 3.0 - center);
                mesh.push(p00, p11, p01, (p00 + p11 + p01) / 3.0 - center);
            }
        }
        mesh
    }

    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::ellipsoid(center, Vec3::splat(radius))
    }

    /// Capped cylinder centered on the origin, lying along the X axis.
    pub fn cylinder_x(radius: f32, length: f32) -> Self {
        let mut mesh = Mesh::default();
        let half = length * 0.5;
        let rim = |seg: usize, x: f32| {
            let phi = seg as f32 / CYLINDER_SEGMENTS as f32 * TAU;
            Vec3::new(x, phi.cos() * radius, phi.sin() * radius)
        };
        for seg in 0..CYLINDER_SEGMENTS {
            let (a0, a1) = (rim(seg, -half), rim(seg + 1, -half));
            let (b0, b1) = (rim(seg, half), rim(seg + 1, half));
            let side = ((a0 + a1) * 0.5).with_x(0.0);
            mesh.push(a0, b0, b1, side);
            mesh.push(a0, b1, a1, side);
            mesh.push(Vec3::new(-half, 0.0, 0.0), a0, a1, Vec3::NEG_X);
            mesh.push(Vec3::new(half, 0.0, 0.0), b0, b1, Vec3::X);
        }
        mesh
    }

    /// Regular octahedron with vertices on the axes.
    pub fn octahedron(radius: f32) -> Self {
        let mut mesh = Mesh::default();
        let xs = [Vec3::X * radius, Vec3::NEG_X * radius];
        let ys = [Vec3::Y * radius, Vec3::NEG_Y * radius];
        let zs = [Vec3::Z * radius, Vec3::NEG_Z * radius];
        for x in xs {
            for y in ys {
                for z in zs {
                    mesh.push(x, y, z, x + y + z);
                }
            }
        }
        mesh
    }

    /// Closed outline extruded from z = 0 to z = `depth`.
    ///
    /// Caps are fanned from `interior`, which must see the whole outline.
    pub fn extrude(outline: &[Vec2], interior: Vec2, depth: f32) -> Self {
        let mut mesh = Mesh::default();
        let n = outline.len();
        if n < 3 {
            return mesh;
        }
        // Positive for counter-clockwise outlines.
        let winding = outline
            .iter()
            .zip(outline.iter().cycle().skip(1))
            .map(|(a, b)| a.perp_dot(*b))
            .sum::<f32>()
            .signum();

        let front = interior.extend(0.0);
        let back = interior.extend(depth);
        for i in 0..n {
            let (p, q) = (outline[i], outline[(i + 1) % n]);
            let edge = q - p;
            let outward = Vec2::new(edge.y, -edge.x) * winding;

            let (p0, q0) = (p.extend(0.0), q.extend(0.0));
            let (p1, q1) = (p.extend(depth), q.extend(depth));
            mesh.push(p0, q0, q1, outward.extend(0.0));
            mesh.push(p0, q1, p1, outward.extend(0.0));
            mesh.push(front, p0, q0, Vec3::NEG_Z);
            mesh.push(back, p1, q1, Vec3::Z);
        }
        mesh
    }

    pub fn scaled(mut self, factor: f32) -> Self {
        for tri in &mut self.triangles {
            for v in &mut tri.vertices {
                *v *= factor;
            }
        }
        self
    }

    /// Axis-aligned bounds as `(min, max)`, `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut verts = self.triangles.iter().flat_map(|t| t.vertices);
        let first = verts.next()?;
        Some(verts.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

fn cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Heart outline from four cubic segments, notch at the origin, tip at y = 1.
pub fn heart_outline() -> Vec<Vec2> {
    let v = Vec2::new;
    let segments = [
        [v(0.0, 0.0), v(0.0, -0.3), v(-0.6, -0.3), v(-0.6, 0.0)],
        [v(-0.6, 0.0), v(-0.6, 0.3), v(0.0, 0.6), v(0.0, 1.0)],
        [v(0.0, 1.0), v(0.0, 0.6), v(0.6, 0.3), v(0.6, 0.0)],
        [v(0.6, 0.0), v(0.6, -0.3), v(0.0, -0.3), v(0.0, 0.0)],
    ];
    let mut outline = Vec::with_capacity(segments.len() * CURVE_SAMPLES);
    for [p0, p1, p2, p3] in segments {
        // The last sample of each segment is the first of the next.
        for i in 0..CURVE_SAMPLES {
            outline.push(cubic(p0, p1, p2, p3, i as f32 / CURVE_SAMPLES as f32));
        }
    }
    outline
}

fn paw_print() -> Mesh {
    let mut mesh = Mesh::ellipsoid(Vec3::ZERO, Vec3::new(0.48, 0.4, 0.4));
    for (x, y) in [(-0.3, 0.5), (-0.1, 0.6), (0.1, 0.6), (0.3, 0.5)] {
        mesh.extend(Mesh::sphere(Vec3::new(x, y, 0.0), 0.2));
    }
    mesh
}

fn bone() -> Mesh {
    let mut mesh = Mesh::cylinder_x(0.15, 1.5);
    mesh.extend(Mesh::sphere(Vec3::new(-0.75, 0.0, 0.0), 0.3));
    mesh.extend(Mesh::sphere(Vec3::new(0.75, 0.0, 0.0), 0.3));
    mesh
}

/// Straight extrusion of the outline, with no bevelled rim.
fn heart() -> Mesh {
    Mesh::extrude(&heart_outline(), Vec2::new(0.0, 0.35), 0.3).scaled(0.4)
}

/// One mesh per [`ShapeKind`], indexed by [`ShapeKind::index`].
#[derive(Debug, Clone)]
pub struct ShapeCatalog {
    meshes: [Mesh; 5],
}

impl ShapeCatalog {
    pub fn new() -> Self {
        Self {
            meshes: [
                paw_print(),
                bone(),
                Mesh::sphere(Vec3::ZERO, 0.5),
                heart(),
                Mesh::octahedron(0.5),
            ],
        }
    }

    pub fn mesh(&self, kind: ShapeKind) -> &Mesh {
        &self.meshes[kind.index()]
    }
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_every_kind_has_geometry() {
        let catalog = ShapeCatalog::new();
        for kind in ShapeKind::ALL {
            assert!(!catalog.mesh(kind).is_empty(), "{kind:?} has no triangles");
        }
    }

    #[test]
    fn test_sphere_normals_point_outward() {
        let center = Vec3::new(0.3, -0.2, 0.1);
        let mesh = Mesh::sphere(center, 0.5);
        for tri in mesh.triangles() {
            assert!(tri.normal.dot(tri.centroid() - center) > 0.0);
            assert_relative_eq!(tri.normal.length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_octahedron_faces() {
        let mesh = Mesh::octahedron(0.5);
        assert_eq!(mesh.len(), 8);
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo, Vec3::splat(-0.5));
        assert_eq!(hi, Vec3::splat(0.5));
    }

    #[test]
    fn test_bone_spans_both_ends() {
        let (lo, hi) = ShapeCatalog::new().mesh(ShapeKind::Bone).bounds().unwrap();
        assert_relative_eq!(lo.x, -1.05, epsilon = 1e-4);
        assert_relative_eq!(hi.x, 1.05, epsilon = 1e-4);
    }

    #[test]
    fn test_heart_extrusion_depth_and_scale() {
        let (lo, hi) = ShapeCatalog::new().mesh(ShapeKind::Heart).bounds().unwrap();
        // Unbevelled: depth is exactly the extrusion.
        assert_relative_eq!(lo.z, 0.0);
        assert_relative_eq!(hi.z, 0.12, epsilon = 1e-5);
        assert_relative_eq!(hi.y, 0.4, epsilon = 1e-5);
    }

    #[test]
    fn test_extrude_side_normals_face_away() {
        let square = [
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ];
        for outline in [square.to_vec(), square.iter().rev().copied().collect()] {
            let mesh = Mesh::extrude(&outline, Vec2::ZERO, 1.0);
            for tri in mesh.triangles() {
                let c = tri.centroid();
                assert!(tri.normal.dot(c - Vec3::new(0.0, 0.0, 0.5)) > 0.0);
            }
        }
    }
}

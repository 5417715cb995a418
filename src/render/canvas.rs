//! Software raster surface.
//!
//! Both backends draw into a [`PixelCanvas`]: an sRGB RGBA8 image with
//! source-over alpha blending, filled circles, 1-px lines and flat triangles.
//! The windowed presenter uploads the finished image once per frame.

use glam::{Vec2, Vec3};
use image::{Rgba, RgbaImage};

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// RGBA8 draw target.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    image: RgbaImage,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Resize, reallocating only when the size actually changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.image.dimensions() != (width, height) {
            self.image = RgbaImage::new(width, height);
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA bytes, row-major, top row first.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Pixel at `(x, y)`, `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Fill every pixel with one color.
    pub fn clear(&mut self, color: Vec3, alpha: f32) {
        let px = Rgba([to_byte(color.x), to_byte(color.y), to_byte(color.z), to_byte(alpha)]);
        for p in self.image.pixels_mut() {
            *p = px;
        }
    }

    /// Fill with an opaque vertical gradient, `top` on row 0.
    pub fn clear_gradient(&mut self, top: Vec3, bottom: Vec3) {
        let height = self.height();
        let span = height.saturating_sub(1).max(1) as f32;
        for (y, row) in self.image.enumerate_rows_mut() {
            let c = top.lerp(bottom, y as f32 / span);
            let px = Rgba([to_byte(c.x), to_byte(c.y), to_byte(c.z), 255]);
            for (_, _, p) in row {
                *p = px;
            }
        }
    }

    /// Source-over blend of one pixel; out-of-range coordinates are ignored.
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, color: Vec3, alpha: f32) {
        if x < 0 || y < 0 || alpha <= 0.0 {
            return;
        }
        let Some(dst) = self.image.get_pixel_mut_checked(x as u32, y as u32) else {
            return;
        };
        let a = alpha.min(1.0);
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = a + dst_a * (1.0 - a);
        if out_a <= 0.0 {
            return;
        }
        let mix = |src: f32, d: u8| {
            let d = d as f32 / 255.0;
            to_byte((src * a + d * dst_a * (1.0 - a)) / out_a)
        };
        *dst = Rgba([mix(color.x, dst[0]), mix(color.y, dst[1]), mix(color.z, dst[2]), to_byte(out_a)]);
    }

    /// Filled, edge-antialiased circle.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec3, alpha: f32) {
        if !(radius > 0.0) || !center.is_finite() {
            return;
        }
        let x0 = (center.x - radius - 1.0).floor().max(0.0) as i32;
        let y0 = (center.y - radius - 1.0).floor().max(0.0) as i32;
        let x1 = ((center.x + radius + 1.0).ceil() as i32).min(self.width() as i32 - 1);
        let y1 = ((center.y + radius + 1.0).ceil() as i32).min(self.height() as i32 - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                let coverage = (radius - d + 0.5).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, alpha * coverage);
                }
            }
        }
    }

    /// One pixel wide line, stepping one pixel along the major axis.
    pub fn stroke_line(&mut self, a: Vec2, b: Vec2, color: Vec3, alpha: f32) {
        if !a.is_finite() || !b.is_finite() || alpha <= 0.0 {
            return;
        }
        let delta = b - a;
        let steps = delta.abs().max_element().ceil().max(1.0);
        // Lines far off-canvas would otherwise loop for nothing.
        if steps > 4.0 * (self.width() + self.height()) as f32 {
            return;
        }
        let step = delta / steps;
        let mut p = a;
        for _ in 0..=steps as u32 {
            self.blend(p.x.floor() as i32, p.y.floor() as i32, color, alpha);
            p += step;
        }
    }

    /// Flat-colored triangle, either winding, sampled at pixel centers.
    pub fn fill_triangle(&mut self, tri: [Vec2; 3], color: Vec3, alpha: f32) {
        let [a, b, c] = tri;
        if !(a.is_finite() && b.is_finite() && c.is_finite()) {
            return;
        }
        let area = (b - a).perp_dot(c - a);
        if area.abs() < f32::EPSILON {
            return;
        }
        let sign = area.signum();

        let min = a.min(b).min(c);
        let max = a.max(b).max(c);
        let x0 = min.x.floor().max(0.0) as i32;
        let y0 = min.y.floor().max(0.0) as i32;
        let x1 = (max.x.ceil() as i32).min(self.width() as i32 - 1);
        let y1 = (max.y.ceil() as i32).min(self.height() as i32 - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = (c - b).perp_dot(p - b) * sign;
                let w1 = (a - c).perp_dot(p - c) * sign;
                let w2 = (b - a).perp_dot(p - a) * sign;
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }
}

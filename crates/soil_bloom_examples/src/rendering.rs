use std::path::Path;

use anyhow::Context;
use glam::{Mat3, Vec2, Vec3};
use image::{Rgba, RgbaImage};
use soil_bloom::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Decodes an image file into an RGBA pixel buffer.
pub fn load_pixel_buffer(path: impl AsRef<Path>) -> anyhow::Result<PixelBuffer> {
    let path = path.as_ref();
    let decoded = image::open(path)
        .with_context(|| format!("decoding {}", path.display()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    Ok(PixelBuffer::new(
        width,
        height,
        PixelFormat::Rgba8,
        decoded.into_raw(),
    )?)
}

/// Reads soil settings from a RON file.
pub fn load_settings(path: impl AsRef<Path>) -> anyhow::Result<SoilSettings> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let settings: SoilSettings =
        ron::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    settings.validate()?;
    Ok(settings)
}

/// Radial brightness falloff used when no input image is given.
pub fn demo_image(width: u32, height: u32) -> anyhow::Result<LumaGrid> {
    let center = Vec2::new(width as f32, height as f32) * 0.5;
    let reach = center.length().max(1.0);
    let grid = LumaGrid::from_fn(width, height, |x, y| {
        let d = Vec2::new(x as f32, y as f32).distance(center) / reach;
        let rings = (d * 18.0).sin() * 0.5 + 0.5;
        (255.0 * (1.0 - d) * (0.6 + 0.4 * rings)).clamp(0.0, 255.0)
    })?;
    Ok(grid)
}

/// Orbit camera: yaw around Y, pitch around X, uniform zoom, centered on the canvas.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub rotation: Vec2,
    pub zoom: f32,
    pub canvas: (u32, u32),
}

impl Camera {
    pub fn new(canvas: (u32, u32)) -> Self {
        Self {
            rotation: Vec2::ZERO,
            zoom: 1.0,
            canvas,
        }
    }

    pub fn from_interaction(state: &InteractionState, canvas: (u32, u32)) -> Self {
        Self {
            rotation: state.rotation,
            zoom: state.zoom,
            canvas,
        }
    }

    fn basis(&self) -> Mat3 {
        Mat3::from_rotation_x(self.rotation.x) * Mat3::from_rotation_y(self.rotation.y)
    }

    /// Orthographic projection to pixel coordinates.
    pub fn project(&self, p: Vec3) -> Vec2 {
        let v = self.basis() * p * self.zoom;
        Vec2::new(
            v.x + self.canvas.0 as f32 * 0.5,
            v.y + self.canvas.1 as f32 * 0.5,
        )
    }
}

/// Software rasterizer writing draw calls into an RGBA image.
pub struct PngCanvas {
    image: RgbaImage,
    camera: Camera,
}

impl PngCanvas {
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Self {
        let [r, g, b] = background;
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255])),
            camera: Camera::new((width, height)),
        }
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        self.image
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote {}.", path.display());
        Ok(())
    }

    fn blend(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let a = color[3] as f32 / 255.0;
        let px = self.image.get_pixel_mut(x as u32, y as u32);
        for c in 0..3 {
            px.0[c] = (px.0[c] as f32 * (1.0 - a) + color[c] as f32 * a).round() as u8;
        }
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: [u8; 4]) {
        let r = radius.max(0.5);
        let (x0, x1) = ((center.x - r).floor() as i64, (center.x + r).ceil() as i64);
        let (y0, y1) = ((center.y - r).floor() as i64, (center.y + r).ceil() as i64);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                if d <= r {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn stroke_segment(&mut self, a: Vec2, b: Vec2, weight: f32, color: [u8; 4]) {
        let steps = a.distance(b).ceil().max(1.0) as usize;
        let radius = (weight * self.camera.zoom * 0.5).max(0.5);
        for i in 0..=steps {
            let p = a.lerp(b, i as f32 / steps as f32);
            if radius <= 0.75 {
                self.blend(p.x as i64, p.y as i64, color);
            } else {
                self.fill_disc(p, radius, color);
            }
        }
    }

    /// Even-odd scanline fill.
    fn fill_polygon(&mut self, points: &[Vec2], color: [u8; 4]) {
        if points.len() < 3 {
            return;
        }
        let (min_y, max_y) = points
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let mut crossings = Vec::new();
        for y in min_y.floor() as i64..=max_y.ceil() as i64 {
            let sy = y as f32 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= sy) != (b.y <= sy) {
                    crossings.push(a.x + (sy - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for pair in crossings.chunks_exact(2) {
                for x in pair[0].round() as i64..pair[1].round() as i64 {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn outline(&mut self, points: &[Vec2], weight: f32, color: [u8; 4]) {
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            self.stroke_segment(*a, b, weight, color);
        }
    }

    /// Draws preview dots in image space, centered on the canvas.
    pub fn draw_preview(&mut self, dots: &[PreviewDot], shape: SoilShape, color: [u8; 3]) {
        let offset = Vec2::new(self.image.width() as f32, self.image.height() as f32) * 0.5;
        let [r, g, b] = color;
        for dot in dots {
            let c = offset + dot.position;
            let alpha = (80.0 + 175.0 * dot.n).round() as u8;
            let rgba = [r, g, b, alpha];
            let half = dot.size * 0.5;
            match shape {
                SoilShape::Dot => self.fill_disc(c, half, rgba),
                SoilShape::Square => {
                    let corners = [
                        c + Vec2::new(-half, -half),
                        c + Vec2::new(half, -half),
                        c + Vec2::new(half, half),
                        c + Vec2::new(-half, half),
                    ];
                    self.fill_polygon(&corners, rgba);
                }
                SoilShape::Line => {
                    self.stroke_segment(c - Vec2::X * half, c + Vec2::X * half, 1.0, rgba)
                }
            }
        }
    }
}

impl DrawSurface for PngCanvas {
    fn ellipse(&mut self, center: Vec3, radii: Vec2, paint: Paint) {
        let c = self.camera.project(center);
        let r = radii * self.camera.zoom;
        let color = paint.to_rgba8();
        let segments = 24;
        let ring: Vec<Vec2> = (0..segments)
            .map(|i| {
                let t = i as f32 / segments as f32 * std::f32::consts::TAU;
                c + Vec2::new(t.cos() * r.x, t.sin() * r.y)
            })
            .collect();
        if paint.is_stroke() {
            self.outline(&ring, paint.stroke_weight, color);
        } else if r.x.max(r.y) < 1.5 {
            self.fill_disc(c, r.x.max(r.y), color);
        } else {
            self.fill_polygon(&ring, color);
        }
    }

    fn cuboid(&mut self, center: Vec3, size: Vec3, paint: Paint) {
        let h = size * 0.5;
        let corners: Vec<Vec2> = [
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ]
        .iter()
        .map(|&o| self.camera.project(center + o))
        .collect();
        let color = paint.to_rgba8();

        const FACES: [[usize; 4]; 6] = [
            [0, 1, 2, 3],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [3, 2, 6, 7],
            [0, 3, 7, 4],
            [1, 2, 6, 5],
        ];
        for face in FACES {
            let quad = face.map(|i| corners[i]);
            if paint.is_stroke() {
                self.outline(&quad, paint.stroke_weight, color);
            } else {
                self.fill_polygon(&quad, color);
            }
        }
    }

    fn polygon(&mut self, points: &[Vec3], paint: Paint) {
        let projected: Vec<Vec2> = points.iter().map(|&p| self.camera.project(p)).collect();
        let color = paint.to_rgba8();
        if paint.is_stroke() {
            self.outline(&projected, paint.stroke_weight, color);
        } else {
            self.fill_polygon(&projected, color);
        }
    }

    fn line(&mut self, from: Vec3, to: Vec3, paint: Paint) {
        let a = self.camera.project(from);
        let b = self.camera.project(to);
        self.stroke_segment(a, b, paint.stroke_weight.max(1.0), paint.to_rgba8());
    }
}

//! Drawing surface abstraction used by the creature display step.
//!
//! The crate never rasterizes anything itself. Display code issues primitive draw calls
//! on a [`DrawSurface`] in a right-handed 3D space with Y pointing down (screen convention).
//! - `()` discards every call.
//! - [`RecordingSurface`] collects [`Shape`]s, e.g. for tests or a deferred renderer.
use glam::{Vec2, Vec3};

/// Fill or stroke style in HSB space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Paint {
    /// Hue in degrees, `[0, 360)`.
    pub hue: f32,
    /// Saturation in `[0, 1]`.
    pub saturation: f32,
    /// Brightness in `[0, 1]`.
    pub brightness: f32,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Stroke weight; `0.0` means filled without outline.
    pub stroke_weight: f32,
}

impl Paint {
    /// Filled paint without outline.
    pub fn fill(hue: f32, saturation: f32, brightness: f32, alpha: f32) -> Self {
        Self {
            hue: hue.rem_euclid(360.0),
            saturation: saturation.clamp(0.0, 1.0),
            brightness: brightness.clamp(0.0, 1.0),
            alpha: alpha.clamp(0.0, 1.0),
            stroke_weight: 0.0,
        }
    }

    /// Outline-only paint.
    pub fn stroke(hue: f32, saturation: f32, brightness: f32, alpha: f32, weight: f32) -> Self {
        Self {
            stroke_weight: weight.max(0.0),
            ..Self::fill(hue, saturation, brightness, alpha)
        }
    }

    pub fn is_stroke(&self) -> bool {
        self.stroke_weight > 0.0
    }

    /// Converts to straight (non-premultiplied) 8-bit RGBA.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let (r, g, b) = hsb_to_rgb(self.hue, self.saturation, self.brightness);
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [to_u8(r), to_u8(g), to_u8(b), to_u8(self.alpha)]
    }
}

/// HSB (HSV) to RGB, all channels in `[0, 1]`.
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> (f32, f32, f32) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = brightness * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = brightness - c;
    (r + m, g + m, b + m)
}

/// Primitive drawing calls consumed from the rendering backend.
pub trait DrawSurface {
    /// Camera-facing ellipse centered at `center`.
    fn ellipse(&mut self, center: Vec3, radii: Vec2, paint: Paint);

    /// Axis-aligned box centered at `center`.
    fn cuboid(&mut self, center: Vec3, size: Vec3, paint: Paint);

    /// Closed polygon through `points`.
    fn polygon(&mut self, points: &[Vec3], paint: Paint);

    fn line(&mut self, from: Vec3, to: Vec3, paint: Paint);
}

/// A no-op surface.
impl DrawSurface for () {
    #[inline]
    fn ellipse(&mut self, _center: Vec3, _radii: Vec2, _paint: Paint) {}

    #[inline]
    fn cuboid(&mut self, _center: Vec3, _size: Vec3, _paint: Paint) {}

    #[inline]
    fn polygon(&mut self, _points: &[Vec3], _paint: Paint) {}

    #[inline]
    fn line(&mut self, _from: Vec3, _to: Vec3, _paint: Paint) {}
}

/// A recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Ellipse {
        center: Vec3,
        radii: Vec2,
        paint: Paint,
    },
    Cuboid {
        center: Vec3,
        size: Vec3,
        paint: Paint,
    },
    Polygon {
        points: Vec<Vec3>,
        paint: Paint,
    },
    Line {
        from: Vec3,
        to: Vec3,
        paint: Paint,
    },
}

impl Shape {
    pub fn paint(&self) -> &Paint {
        match self {
            Shape::Ellipse { paint, .. }
            | Shape::Cuboid { paint, .. }
            | Shape::Polygon { paint, .. }
            | Shape::Line { paint, .. } => paint,
        }
    }

    /// Vertices spanned by the shape, used for bounds checks.
    pub fn anchor_points(&self) -> Vec<Vec3> {
        match self {
            Shape::Ellipse { center, .. } | Shape::Cuboid { center, .. } => vec![*center],
            Shape::Polygon { points, .. } => points.clone(),
            Shape::Line { from, to, .. } => vec![*from, *to],
        }
    }
}

/// A surface that collects all draw calls in a `Vec`.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    shapes: Vec<Shape>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<Shape> {
        self.shapes
    }

    pub fn as_slice(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl DrawSurface for RecordingSurface {
    fn ellipse(&mut self, center: Vec3, radii: Vec2, paint: Paint) {
        self.shapes.push(Shape::Ellipse {
            center,
            radii,
            paint,
        });
    }

    fn cuboid(&mut self, center: Vec3, size: Vec3, paint: Paint) {
        self.shapes.push(Shape::Cuboid {
            center,
            size,
            paint,
        });
    }

    fn polygon(&mut self, points: &[Vec3], paint: Paint) {
        self.shapes.push(Shape::Polygon {
            points: points.to_vec(),
            paint,
        });
    }

    fn line(&mut self, from: Vec3, to: Vec3, paint: Paint) {
        self.shapes.push(Shape::Line { from, to, paint });
    }
}

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// 2D point in normalized detector coordinates (both axes in `[0, 1]`).
pub type Point = Point2<f32>;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f32 {
    nalgebra::distance(&a, &b)
}

/// Midpoint of the segment `a`-`b`.
#[inline]
pub fn midpoint(a: Point, b: Point) -> Point {
    nalgebra::center(&a, &b)
}

/// Arithmetic mean of a set of points, `None` for an empty slice.
pub fn mean_point(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f32;
    let (sx, sy) = points
        .iter()
        .fold((0.0_f32, 0.0_f32), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Clamp `v` into `[lo, hi]`.
///
/// Unlike `f32::clamp` this never panics when `lo > hi`; `lo` wins.
#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    v.min(hi).max(lo)
}

/// Pixel scale of the canvas that pixel-space thresholds are expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Map a normalized displacement to canvas pixels.
    #[inline]
    pub fn scale(&self, dx: f32, dy: f32) -> (f32, f32) {
        (dx * self.width, dy * self.height)
    }
}

/// Four corners of a frame candidate, in normalized space.
///
/// Corner order is meaningful: for axis-aligned boxes it is top-left,
/// top-right, bottom-right, bottom-left; for direct-connect frames it is
/// left index, right index, right thumb, left thumb.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub corners: [Point; 4],
}

impl Quad {
    pub fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }

    /// Axis-aligned box spanned by two opposite points (any order).
    pub fn axis_aligned(a: Point, b: Point) -> Self {
        let min = Point::new(a.x.min(b.x), a.y.min(b.y));
        let max = Point::new(a.x.max(b.x), a.y.max(b.y));
        Self::from_bounds(min, max)
    }

    /// Axis-aligned box from its min/max corners.
    pub fn from_bounds(min: Point, max: Point) -> Self {
        Self {
            corners: [
                Point::new(min.x, min.y),
                Point::new(max.x, min.y),
                Point::new(max.x, max.y),
                Point::new(min.x, max.y),
            ],
        }
    }

    /// Axis-aligned bounding box of an arbitrary point set.
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points.iter().fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        });
        Some(Self::from_bounds(min, max))
    }

    /// Min/max corners of the axis-aligned bounds.
    pub fn bounds(&self) -> (Point, Point) {
        let c = &self.corners;
        let mut min = c[0];
        let mut max = c[0];
        for p in &c[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        let (min, max) = self.bounds();
        max.x - min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        let (min, max) = self.bounds();
        max.y - min.y
    }

    /// Corner-wise arithmetic mean of a set of quads.
    pub fn mean<'a, I>(quads: I) -> Option<Quad>
    where
        I: IntoIterator<Item = &'a Quad>,
    {
        let mut acc = [[0.0_f32; 2]; 4];
        let mut n = 0usize;
        for q in quads {
            for (sum, p) in acc.iter_mut().zip(q.corners.iter()) {
                sum[0] += p.x;
                sum[1] += p.y;
            }
            n += 1;
        }
        if n == 0 {
            return None;
        }
        let inv = 1.0 / n as f32;
        Some(Quad {
            corners: acc.map(|[x, y]| Point::new(x * inv, y * inv)),
        })
    }

    /// Mean corner-wise displacement to `other`, measured in `canvas` pixels.
    pub fn mean_displacement_px(&self, other: &Quad, canvas: CanvasSize) -> f32 {
        let total: f32 = self
            .corners
            .iter()
            .zip(other.corners.iter())
            .map(|(a, b)| {
                let (dx, dy) = canvas.scale(b.x - a.x, b.y - a.y);
                (dx * dx + dy * dy).sqrt()
            })
            .sum();
        total / 4.0
    }
}

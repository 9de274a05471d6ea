//! Normalized frame geometry to pixel crop regions.
//!
//! Pure geometry: nothing here knows about gesture policies.

use fingerframe_core::Quad;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Tolerance (pixels) absorbing float noise before flooring / ceiling, so
/// that `0.8 * 1000.0` lands on 800 and not 801.
const EDGE_EPS: f64 = 1e-3;

/// Shape of the region to extract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropMode {
    /// Axis-aligned bounding box of the corners.
    #[default]
    BoundingBox,
    /// The corners themselves, in order, for clipped extraction.
    Polygon,
}

/// Native pixel resolution of a video frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Integer pixel rectangle, `x..x + width` by `y..y + height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn full(frame: FrameSize) -> Self {
        Self {
            x: 0,
            y: 0,
            width: frame.width,
            height: frame.height,
        }
    }

    /// Exclusive right edge.
    #[inline]
    pub fn x_max(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn y_max(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x_max() && y >= self.y && y < self.y_max()
    }
}

/// Pixel region handed to the cropper.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum CropRegion {
    Rect(PixelRect),
    Polygon { points: Vec<Point2<u32>> },
}

impl CropRegion {
    /// Smallest rectangle covering the region.
    pub fn bounding_rect(&self) -> PixelRect {
        match self {
            Self::Rect(rect) => *rect,
            Self::Polygon { points } => polygon_bounds(points),
        }
    }

    /// Whether the pixel `(x, y)` belongs to the region.
    ///
    /// Polygons are tested at pixel centres with the even-odd rule.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        match self {
            Self::Rect(rect) => rect.contains(x, y),
            Self::Polygon { points } => {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;
                let mut inside = false;
                let n = points.len();
                for i in 0..n {
                    let a = points[i];
                    let b = points[(i + n - 1) % n];
                    let (ax, ay) = (a.x as f64, a.y as f64);
                    let (bx, by) = (b.x as f64, b.y as f64);
                    if (ay > py) != (by > py) {
                        let cross_x = ax + (py - ay) * (bx - ax) / (by - ay);
                        if px < cross_x {
                            inside = !inside;
                        }
                    }
                }
                inside
            }
        }
    }
}

/// Projected crop plus whether the full-frame fallback was used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropProjection {
    pub region: CropRegion,
    pub fallback: bool,
}

impl CropProjection {
    fn full_frame(frame: FrameSize) -> Self {
        Self {
            region: CropRegion::Rect(PixelRect::full(frame)),
            fallback: true,
        }
    }
}

/// Map normalized corners onto the native pixel grid of `frame`.
///
/// Degenerate results (empty after clamping) fall back to the full frame.
pub fn project_crop(quad: &Quad, frame: FrameSize, mode: CropMode) -> CropProjection {
    let w = frame.width as f64;
    let h = frame.height as f64;
    match mode {
        CropMode::BoundingBox => {
            let (min, max) = quad.bounds();
            let x0 = floor_px(min.x as f64 * w, frame.width);
            let y0 = floor_px(min.y as f64 * h, frame.height);
            let x1 = ceil_px(max.x as f64 * w, frame.width);
            let y1 = ceil_px(max.y as f64 * h, frame.height);
            if x1 <= x0 || y1 <= y0 {
                return CropProjection::full_frame(frame);
            }
            CropProjection {
                region: CropRegion::Rect(PixelRect {
                    x: x0,
                    y: y0,
                    width: x1 - x0,
                    height: y1 - y0,
                }),
                fallback: false,
            }
        }
        CropMode::Polygon => {
            let points: Vec<Point2<u32>> = quad
                .corners
                .iter()
                .map(|p| {
                    Point2::new(
                        round_px(p.x as f64 * w, frame.width),
                        round_px(p.y as f64 * h, frame.height),
                    )
                })
                .collect();
            if polygon_bounds(&points).is_empty() {
                return CropProjection::full_frame(frame);
            }
            CropProjection {
                region: CropRegion::Polygon { points },
                fallback: false,
            }
        }
    }
}

fn clamp_px(v: f64, limit: u32) -> u32 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, limit as f64) as u32
}

fn floor_px(v: f64, limit: u32) -> u32 {
    clamp_px((v + EDGE_EPS).floor(), limit)
}

fn ceil_px(v: f64, limit: u32) -> u32 {
    clamp_px((v - EDGE_EPS).ceil(), limit)
}

fn round_px(v: f64, limit: u32) -> u32 {
    clamp_px(v.round(), limit)
}

fn polygon_bounds(points: &[Point2<u32>]) -> PixelRect {
    let Some(first) = points.first() else {
        return PixelRect {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        };
    };
    let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    PixelRect {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    }
}

//! Core types and utilities for finger-frame gesture capture.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete hand-landmark detector or image type: detectors
//! are adapted into [`HandObservation`] by the caller.

mod geometry;
mod hand;
mod logger;

pub use geometry::{clamp, distance, mean_point, midpoint, CanvasSize, Point, Quad};
pub use hand::{Fingertips, HandLandmark, HandObservation, Handedness, Landmark};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

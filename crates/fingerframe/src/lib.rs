//! High-level facade crate for the `fingerframe-*` workspace.
//!
//! This crate provides:
//! - re-exports of the geometry/landmark types and the gesture pipeline
//! - (feature `image`) extraction of a capture's crop region from an
//!   `image::RgbaImage`
//! - (feature `cli`) the `fingerframe` binary for replaying recorded
//!   detector traces
//!
//! ## Quickstart
//!
//! ```no_run
//! use fingerframe::{
//!     CaptureOutcome, FramePipeline, FramePipelineParams, FrameSize, HandObservation,
//!     PolicyKind,
//! };
//!
//! # fn detector_hands() -> Vec<HandObservation> { Vec::new() }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let params = FramePipelineParams::for_policy(PolicyKind::AdaptiveContact);
//! let mut pipeline = FramePipeline::new(params)?;
//! let frame = FrameSize::new(1280, 720);
//!
//! let result = pipeline.tick(&detector_hands(), frame, 16.0);
//! println!("{}", result.status);
//! if let Some(capture) = result.capture {
//!     // extract `capture.crop.region`, then report back
//!     pipeline.finish_capture(capture.ticket, CaptureOutcome::Completed, 60.0)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `fingerframe::core`: points, quads, hand landmarks, logger.
//! - `fingerframe::gesture`: candidate builders, classifiers, debouncer,
//!   crop projector, `FramePipeline`, JSON config and trace replay.
//! - `fingerframe::extract` (feature `image`): bitmap extraction.

pub use fingerframe_core as core;
pub use fingerframe_gesture as gesture;

pub use fingerframe_core::{HandObservation, Handedness, Landmark, Point, Quad};
pub use fingerframe_gesture::{
    CaptureEvent, CaptureFinished, CaptureOutcome, CropRegion, FramePipeline,
    FramePipelineParams, FrameSize, GestureState, PolicyKind, TickResult,
};

#[cfg(feature = "image")]
pub mod extract;

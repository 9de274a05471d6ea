//! The per-tick gesture pipeline.
//!
//! This module wires together hand selection, the policy's candidate
//! builder, corner smoothing, classification, the capture gate and the crop
//! projector.

mod error;
#[allow(clippy::module_inception)]
mod pipeline;
mod recognizer;
mod result;

pub use error::{CaptureError, ParamsError};
pub use pipeline::FramePipeline;
pub use result::{CaptureEvent, CaptureFinished, CaptureOutcome, TickResult};

use fingerframe_core::Quad;
use serde::{Deserialize, Serialize};

use crate::classify::GestureState;
use crate::crop::{CropProjection, FrameSize};
use crate::debounce::CaptureTicket;

/// A capture has started: extract `crop` from the current frame, then call
/// [`crate::FramePipeline::finish_capture`] with `ticket`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureEvent {
    pub ticket: CaptureTicket,
    /// Pipeline clock at the qualifying tick.
    pub timestamp_ms: f64,
    /// Smoothed frame corners in normalized space.
    pub normalized: Quad,
    /// Region in pixels of `frame`.
    pub crop: CropProjection,
    pub frame: FrameSize,
}

/// How the external export ended.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaptureOutcome {
    #[default]
    Completed,
    Failed {
        reason: String,
    },
    /// Released by the pipeline after the export never reported back.
    TimedOut,
}

/// A capture has finished and the gate is open again.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureFinished {
    pub ticket: CaptureTicket,
    pub duration_ms: f64,
    pub outcome: CaptureOutcome,
}

/// Everything the UI needs after one tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TickResult {
    pub state: GestureState,
    pub status: &'static str,
    /// Instability (pixels) or contact ratio; feedback only.
    pub score: Option<f32>,
    pub candidate_valid: bool,
    /// Smoothed corners when a frame is being tracked.
    pub smoothed: Option<Quad>,
    /// Set on the tick a capture starts.
    pub capture: Option<CaptureEvent>,
    /// Set on the tick a stuck capture was force-released.
    pub released: Option<CaptureFinished>,
}

//! Finger-frame gesture recognition.
//!
//! One [`FramePipeline`] per camera stream turns detector results (two
//! hands' fingertips per tick) into a discrete [`GestureState`] and, once per
//! deliberate gesture, a [`CaptureEvent`] carrying the pixel region to
//! extract from the current frame.
//!
//! The pipeline per tick:
//! - hand selection and left-to-right ordering,
//! - a policy-specific frame candidate ([`RecognitionPolicy`]),
//! - fixed-capacity corner history, smoothing and an instability metric,
//! - classification (hold dwell, twitch edge or contact hysteresis),
//! - a single-flight capture gate with cooldown and re-arm delay,
//! - crop projection into native pixels.
//!
//! ```no_run
//! use fingerframe_gesture::{
//!     CaptureOutcome, FramePipeline, FramePipelineParams, FrameSize, PolicyKind,
//! };
//!
//! let mut pipeline =
//!     FramePipeline::new(FramePipelineParams::for_policy(PolicyKind::ProximityRect))?;
//! let frame = FrameSize::new(1920, 1080);
//! let result = pipeline.tick(&[], frame, 0.0);
//! if let Some(capture) = result.capture {
//!     // crop `capture.crop.region` out of the frame, then:
//!     pipeline.finish_capture(capture.ticket, CaptureOutcome::Completed, 40.0)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod candidate;
mod classify;
mod crop;
mod debounce;
mod history;
mod io;
mod params;
mod pipeline;

pub use candidate::{
    adaptive_threshold, build_adaptive_contact, build_direct_connect, build_proximity_rect,
    select_hands, ContactHysteresis, ContactMeasure, FrameCandidate, HandPair, HandSelection,
    TipDistances,
};
pub use classify::{
    ContactClassifier, GestureState, HoldClassifier, JitterTracker, TwitchClassifier,
    TwitchSide, Verdict,
};
pub use crop::{project_crop, CropMode, CropProjection, CropRegion, FrameSize, PixelRect};
pub use debounce::{CaptureDebouncer, CaptureTicket, Suppressed};
pub use history::{CornerHistory, MAX_HISTORY};
pub use io::{
    replay_trace, DetectorTrace, IoError, PipelineConfig, ReplayCapture, ReplayReport,
    StateSample, TraceTick,
};
pub use params::{
    AdaptiveContactParams, DebounceParams, DirectConnectParams, FramePipelineParams,
    PointerClass, PolicyKind, ProximityRectParams, RecognitionPolicy, SmoothingParams,
    TwitchParams,
};
pub use pipeline::{
    CaptureError, CaptureEvent, CaptureFinished, CaptureOutcome, FramePipeline, ParamsError,
    TickResult,
};

pub use fingerframe_core::{CanvasSize, HandObservation, Handedness, Landmark, Point, Quad};

use crate::debounce::CaptureTicket;

/// Configuration rejected by [`crate::FramePipelineParams::validate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("unknown recognition policy `{0}`")]
    UnknownPolicy(String),
    #[error("history capacity {capacity} outside 1..={max}")]
    HistoryCapacity { capacity: usize, max: usize },
    #[error("invalid reference canvas {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },
    #[error("release multiplier must be finite and >= 1 (got {0})")]
    ReleaseMultiplier(f32),
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: f64 },
}

/// Errors from reporting the end of a capture.
///
/// None of these leave the gate stuck: the capture in flight (if any) is
/// unaffected and the pipeline keeps running.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    #[error("{ticket} is not in flight (current: {in_flight})")]
    StaleTicket {
        ticket: CaptureTicket,
        in_flight: CaptureTicket,
    },
    #[error("{ticket} finished but no capture is in flight")]
    NotInFlight { ticket: CaptureTicket },
}

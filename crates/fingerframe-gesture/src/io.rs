//! JSON configuration, detector traces and replay reports.

use std::{fs, path::Path};

use fingerframe_core::HandObservation;
use log::{debug, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::classify::GestureState;
use crate::crop::FrameSize;
use crate::debounce::CaptureTicket;
use crate::params::{FramePipelineParams, PolicyKind};
use crate::pipeline::{CaptureEvent, CaptureFinished, CaptureOutcome, FramePipeline, ParamsError};

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, IoError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn store<T: Serialize>(value: &T, path: &Path) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

fn default_export_latency_ms() -> f64 {
    120.0
}

/// Pipeline configuration as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub params: FramePipelineParams,
    /// Simulated export duration used by [`replay_trace`].
    #[serde(default = "default_export_latency_ms")]
    pub export_latency_ms: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::for_policy(PolicyKind::ProximityRect)
    }
}

impl PipelineConfig {
    pub fn for_policy(kind: PolicyKind) -> Self {
        Self {
            params: FramePipelineParams::for_policy(kind),
            export_latency_ms: default_export_latency_ms(),
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        load(path.as_ref())
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        store(self, path.as_ref())
    }

    /// Build a pipeline from the stored parameters.
    pub fn build_pipeline(&self) -> Result<FramePipeline, ParamsError> {
        FramePipeline::new(self.params.clone())
    }
}

/// One recorded detector result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceTick {
    pub t_ms: f64,
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}

/// A recorded stream of detector results for one camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorTrace {
    pub frame: FrameSize,
    pub ticks: Vec<TraceTick>,
}

impl DetectorTrace {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        load(path.as_ref())
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        store(self, path.as_ref())
    }
}

/// A capture started during replay and how it ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayCapture {
    pub event: CaptureEvent,
    #[serde(default)]
    pub finished: Option<CaptureFinished>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSample {
    pub t_ms: f64,
    pub state: GestureState,
    #[serde(default)]
    pub score: Option<f32>,
    pub candidate_valid: bool,
}

/// Outcome of replaying a [`DetectorTrace`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub policy: PolicyKind,
    pub frame: FrameSize,
    pub ticks: usize,
    pub captures: Vec<ReplayCapture>,
    pub states: Vec<StateSample>,
}

impl ReplayReport {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        load(path.as_ref())
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        store(self, path.as_ref())
    }

    fn record_finish(&mut self, finished: CaptureFinished) {
        match self
            .captures
            .iter_mut()
            .rev()
            .find(|c| c.event.ticket == finished.ticket)
        {
            Some(capture) => capture.finished = Some(finished),
            None => warn!("replay: finish for unknown {}", finished.ticket),
        }
    }
}

/// Run `trace` through `pipeline`, completing each export
/// `export_latency_ms` after it starts.
///
/// Ticks must be in non-decreasing time order. Exports due between two
/// ticks are completed at their due time, before the later tick runs.
pub fn replay_trace(
    pipeline: &mut FramePipeline,
    trace: &DetectorTrace,
    export_latency_ms: f64,
) -> ReplayReport {
    let mut report = ReplayReport {
        policy: pipeline.params().policy.kind(),
        frame: trace.frame,
        ticks: trace.ticks.len(),
        captures: Vec::new(),
        states: Vec::with_capacity(trace.ticks.len()),
    };
    let mut pending: Option<(CaptureTicket, f64)> = None;

    for tick in &trace.ticks {
        if let Some((ticket, due_ms)) = pending {
            if due_ms <= tick.t_ms {
                pending = None;
                complete(pipeline, &mut report, ticket, due_ms);
            }
        }

        let result = pipeline.tick(&tick.hands, trace.frame, tick.t_ms);
        if let Some(released) = result.released {
            if pending.is_some_and(|(ticket, _)| ticket == released.ticket) {
                pending = None;
            }
            report.record_finish(released);
        }
        if let Some(event) = result.capture {
            debug!("replay: {} at {:.0} ms", event.ticket, tick.t_ms);
            pending = Some((event.ticket, tick.t_ms + export_latency_ms.max(0.0)));
            report.captures.push(ReplayCapture {
                event,
                finished: None,
            });
        }
        report.states.push(StateSample {
            t_ms: tick.t_ms,
            state: result.state,
            score: result.score,
            candidate_valid: result.candidate_valid,
        });
    }

    if let Some((ticket, due_ms)) = pending {
        complete(pipeline, &mut report, ticket, due_ms);
    }
    report
}

fn complete(
    pipeline: &mut FramePipeline,
    report: &mut ReplayReport,
    ticket: CaptureTicket,
    now_ms: f64,
) {
    if let Ok(finished) = pipeline.finish_capture(ticket, CaptureOutcome::Completed, now_ms) {
        report.record_finish(finished);
    }
}

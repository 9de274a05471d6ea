use fingerframe_core::{HandObservation, Quad};
use log::{debug, info, warn};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::recognizer::Recognizer;
use super::{CaptureError, CaptureEvent, CaptureFinished, CaptureOutcome, ParamsError, TickResult};
use crate::candidate::{select_hands, HandSelection};
use crate::classify::{GestureState, Verdict};
use crate::crop::{project_crop, FrameSize};
use crate::debounce::{CaptureDebouncer, CaptureTicket};
use crate::history::CornerHistory;
use crate::params::FramePipelineParams;

/// Per-tick gesture pipeline for one camera stream.
///
/// Feed it every detector result with [`FramePipeline::tick`]; when a tick
/// returns a [`CaptureEvent`], extract the region and report back with
/// [`FramePipeline::finish_capture`].
#[derive(Clone, Debug)]
pub struct FramePipeline {
    params: FramePipelineParams,
    recognizer: Recognizer,
    history: CornerHistory,
    debouncer: CaptureDebouncer,
    state: GestureState,
    last_valid_ms: Option<f64>,
}

impl FramePipeline {
    /// Build a pipeline after validating `params`.
    pub fn new(params: FramePipelineParams) -> Result<Self, ParamsError> {
        params.validate()?;
        let recognizer = Recognizer::new(&params.policy, params.pointer);
        let history = CornerHistory::new(params.policy.smoothing().capacity);
        let debouncer = CaptureDebouncer::new(params.debounce.clone());
        Ok(Self {
            params,
            recognizer,
            history,
            debouncer,
            state: GestureState::NoHands,
            last_valid_ms: None,
        })
    }

    #[inline]
    pub fn params(&self) -> &FramePipelineParams {
        &self.params
    }

    /// State reported by the last tick.
    #[inline]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Ticket of the capture waiting for [`FramePipeline::finish_capture`].
    #[inline]
    pub fn capture_in_flight(&self) -> Option<CaptureTicket> {
        self.debouncer.in_flight()
    }

    /// Replace the configuration. All history and any capture in flight are
    /// dropped.
    pub fn reconfigure(&mut self, params: FramePipelineParams) -> Result<(), ParamsError> {
        *self = Self::new(params)?;
        Ok(())
    }

    /// Forget all gesture history. Ticket numbering continues.
    pub fn reset(&mut self) {
        self.recognizer = Recognizer::new(&self.params.policy, self.params.pointer);
        self.history.clear();
        self.debouncer.reset();
        self.state = GestureState::NoHands;
        self.last_valid_ms = None;
    }

    /// Process one detector result.
    ///
    /// `hands` may be empty or hold any number of observations; `frame` is
    /// the native resolution the crop is projected onto; `now_ms` is a
    /// monotonic clock.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, hands), fields(hands = hands.len()))
    )]
    pub fn tick(
        &mut self,
        hands: &[HandObservation],
        frame: FrameSize,
        now_ms: f64,
    ) -> TickResult {
        let released = self.release_stuck(now_ms);

        let selection = select_hands(hands, self.params.min_hand_confidence);
        let pair = selection.pair().copied();
        self.debouncer.observe_pair(pair.is_some(), now_ms);

        let Some(pair) = pair else {
            self.recognizer.lost_pair();
            self.history.clear();
            self.last_valid_ms = None;
            // Drop any pending ready edge.
            let _ = self.debouncer.offer(false, now_ms);
            let state = match selection {
                HandSelection::None => GestureState::NoHands,
                HandSelection::One => GestureState::OneHand,
                HandSelection::Crowd | HandSelection::Pair(_) => GestureState::Forming,
            };
            self.set_state(state);
            return TickResult {
                state,
                status: state.status_text(),
                score: None,
                candidate_valid: false,
                smoothed: None,
                capture: None,
                released,
            };
        };

        let recognition = self.recognizer.build(&pair);
        let candidate_valid = recognition.candidate.is_valid();
        match recognition.candidate.corners {
            Some(corners) => {
                self.history.push(corners);
                self.last_valid_ms = Some(now_ms);
            }
            None if self.within_gap(now_ms) => {}
            None => {
                self.history.clear();
                self.last_valid_ms = None;
            }
        }

        let instability = if candidate_valid {
            self.history.instability_px(self.params.reference_canvas)
        } else {
            None
        };
        let Verdict { ready, score } = self
            .recognizer
            .classify(&pair, &recognition, instability, now_ms);
        let ready = ready && candidate_valid;

        let mut state = match (candidate_valid, ready) {
            (false, _) => GestureState::Forming,
            (true, false) => GestureState::Holding,
            (true, true) => GestureState::Ready,
        };

        let smoothed = self.history.smoothed();
        let startable = ready && smoothed.is_some();
        let capture = match (self.debouncer.offer(startable, now_ms), smoothed) {
            (Ok(Some(ticket)), Some(normalized)) => {
                Some(self.start_capture(ticket, normalized, frame, now_ms))
            }
            (Ok(_), _) => None,
            (Err(reason), _) => {
                debug!("ready edge suppressed: {reason:?}");
                None
            }
        };

        if self.debouncer.is_busy() && candidate_valid {
            state = GestureState::Capturing;
        }
        self.set_state(state);

        TickResult {
            state,
            status: state.status_text(),
            score,
            candidate_valid,
            smoothed: if candidate_valid { smoothed } else { None },
            capture,
            released,
        }
    }

    /// Report that the export for `ticket` has ended, successfully or not.
    ///
    /// Either way the gate opens, the cooldown starts and the classifier
    /// needs a fresh gesture before the next capture.
    pub fn finish_capture(
        &mut self,
        ticket: CaptureTicket,
        outcome: CaptureOutcome,
        now_ms: f64,
    ) -> Result<CaptureFinished, CaptureError> {
        match self.debouncer.finish(ticket, now_ms) {
            Ok(duration_ms) => {
                self.recognizer.rearm();
                match &outcome {
                    CaptureOutcome::Failed { reason } => {
                        warn!("{ticket} failed after {duration_ms:.0} ms: {reason}")
                    }
                    _ => info!("{ticket} finished after {duration_ms:.0} ms"),
                }
                Ok(CaptureFinished {
                    ticket,
                    duration_ms,
                    outcome,
                })
            }
            Err(err) => {
                warn!("{err}");
                Err(err)
            }
        }
    }

    fn start_capture(
        &self,
        ticket: CaptureTicket,
        normalized: Quad,
        frame: FrameSize,
        now_ms: f64,
    ) -> CaptureEvent {
        let crop = project_crop(&normalized, frame, self.params.crop_mode());
        info!(
            "{ticket} started at {now_ms:.0} ms ({}x{} frame{})",
            frame.width,
            frame.height,
            if crop.fallback { ", full-frame fallback" } else { "" }
        );
        CaptureEvent {
            ticket,
            timestamp_ms: now_ms,
            normalized,
            crop,
            frame,
        }
    }

    fn release_stuck(&mut self, now_ms: f64) -> Option<CaptureFinished> {
        let (ticket, duration_ms) = self.debouncer.expire(now_ms)?;
        warn!("{ticket} timed out after {duration_ms:.0} ms; releasing capture gate");
        self.recognizer.rearm();
        Some(CaptureFinished {
            ticket,
            duration_ms,
            outcome: CaptureOutcome::TimedOut,
        })
    }

    fn within_gap(&self, now_ms: f64) -> bool {
        match (
            self.params.policy.smoothing().gap_tolerance_ms,
            self.last_valid_ms,
        ) {
            (Some(tolerance), Some(last)) => now_ms - last <= tolerance,
            _ => false,
        }
    }

    fn set_state(&mut self, state: GestureState) {
        if state != self.state {
            debug!("gesture state {} -> {}", self.state, state);
            self.state = state;
        }
    }
}

//! Closed set of recognition strategies behind one interface.

use crate::candidate::{
    build_adaptive_contact, build_direct_connect, build_proximity_rect, ContactMeasure,
    FrameCandidate, HandPair,
};
use crate::classify::{ContactClassifier, HoldClassifier, JitterTracker, TwitchClassifier, Verdict};
use crate::params::{
    AdaptiveContactParams, DirectConnectParams, PointerClass, ProximityRectParams,
    RecognitionPolicy,
};

/// Builder output for one tick.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Recognition {
    pub candidate: FrameCandidate,
    /// Contact measurement (adaptive-contact only).
    pub contact: Option<ContactMeasure>,
}

/// One recognition policy with the state its classifier keeps.
#[derive(Clone, Debug)]
pub(crate) enum Recognizer {
    ProximityRect {
        params: ProximityRectParams,
        hold: HoldClassifier,
    },
    DirectConnect {
        params: DirectConnectParams,
        twitch: TwitchClassifier,
    },
    AdaptiveContact {
        params: AdaptiveContactParams,
        pointer: PointerClass,
        contact: ContactClassifier,
        jitter: JitterTracker,
    },
}

impl Recognizer {
    pub(crate) fn new(policy: &RecognitionPolicy, pointer: PointerClass) -> Self {
        match policy {
            RecognitionPolicy::ProximityRect(params) => Self::ProximityRect {
                params: params.clone(),
                hold: HoldClassifier::new(),
            },
            RecognitionPolicy::DirectConnect(params) => Self::DirectConnect {
                params: params.clone(),
                twitch: TwitchClassifier::new(),
            },
            RecognitionPolicy::AdaptiveContact(params) => Self::AdaptiveContact {
                params: params.clone(),
                pointer,
                contact: ContactClassifier::new(),
                jitter: JitterTracker::default(),
            },
        }
    }

    /// Run the policy's candidate builder on an ordered pair.
    pub(crate) fn build(&mut self, pair: &HandPair) -> Recognition {
        match self {
            Self::ProximityRect { params, .. } => Recognition {
                candidate: build_proximity_rect(pair, params),
                contact: None,
            },
            Self::DirectConnect { params, .. } => Recognition {
                candidate: build_direct_connect(pair, params),
                contact: None,
            },
            Self::AdaptiveContact {
                params,
                pointer,
                contact,
                jitter,
            } => {
                let jitter = jitter.update(pair, params.jitter_alpha);
                let (candidate, measure) =
                    build_adaptive_contact(pair, jitter, *pointer, contact.hysteresis(), params);
                Recognition {
                    candidate,
                    contact: Some(measure),
                }
            }
        }
    }

    /// Classify a tick that had two hands.
    pub(crate) fn classify(
        &mut self,
        pair: &HandPair,
        recognition: &Recognition,
        instability_px: Option<f32>,
        now_ms: f64,
    ) -> Verdict {
        let valid = recognition.candidate.is_valid();
        match self {
            Self::ProximityRect { params, hold } => hold.update(
                valid,
                instability_px,
                params.smoothing.stable_delta_px,
                params.dwell_ms,
                now_ms,
            ),
            Self::DirectConnect { params, twitch } => {
                let edge = twitch.update(pair, now_ms, &params.twitch);
                Verdict {
                    ready: edge && valid,
                    score: instability_px,
                }
            }
            Self::AdaptiveContact {
                params,
                pointer,
                contact,
                ..
            } => match recognition.contact {
                Some(measure) => contact.update(
                    measure,
                    valid,
                    params.release_multiplier,
                    params.hold_for(*pointer),
                    now_ms,
                ),
                None => Verdict::default(),
            },
        }
    }

    /// Two hands are no longer visible.
    pub(crate) fn lost_pair(&mut self) {
        match self {
            Self::ProximityRect { hold, .. } => hold.reset(),
            Self::DirectConnect { twitch, .. } => twitch.reset(),
            Self::AdaptiveContact {
                contact, jitter, ..
            } => {
                contact.reset();
                jitter.reset();
            }
        }
    }

    /// A capture finished: the next one needs a fresh gesture.
    pub(crate) fn rearm(&mut self) {
        match self {
            Self::ProximityRect { hold, .. } => hold.rearm(),
            Self::DirectConnect { twitch, .. } => twitch.reset(),
            Self::AdaptiveContact { contact, .. } => contact.rearm(),
        }
    }
}

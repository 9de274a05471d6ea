use fingerframe_core::{clamp, Quad};
use serde::{Deserialize, Serialize};

use super::{FrameCandidate, HandPair};
use crate::params::{AdaptiveContactParams, PointerClass};

/// Contact distance of a tick together with the threshold it was judged by.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactMeasure {
    pub distance: f32,
    pub threshold: f32,
}

impl ContactMeasure {
    /// `distance / threshold`; below 1 means contact on entry.
    #[inline]
    pub fn ratio(&self) -> f32 {
        if self.threshold > 0.0 {
            self.distance / self.threshold
        } else {
            f32::INFINITY
        }
    }
}

/// Two-threshold contact latch.
///
/// Contact starts below `threshold` and is kept until the distance exceeds
/// `threshold * release_multiplier`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContactHysteresis {
    touching: bool,
}

impl ContactHysteresis {
    #[inline]
    pub fn is_touching(&self) -> bool {
        self.touching
    }

    /// Would `distance` count as contact given the current latch state?
    #[inline]
    pub fn admits(&self, distance: f32, threshold: f32, release_multiplier: f32) -> bool {
        if self.touching {
            distance <= threshold * release_multiplier
        } else {
            distance < threshold
        }
    }

    /// Feed one measurement and return the new latch state.
    pub fn update(&mut self, distance: f32, threshold: f32, release_multiplier: f32) -> bool {
        self.touching = self.admits(distance, threshold, release_multiplier);
        self.touching
    }

    pub fn reset(&mut self) {
        self.touching = false;
    }
}

/// Contact threshold scaled by hand size and detector jitter, inflated on
/// coarse pointers.
pub fn adaptive_threshold(
    pair: &HandPair,
    jitter: f32,
    pointer: PointerClass,
    params: &AdaptiveContactParams,
) -> f32 {
    let raw = params.base_threshold
        + params.size_gain * pair.mean_span()
        + params.jitter_gain * jitter;
    let t = clamp(raw, params.min_threshold, params.max_threshold);
    match pointer {
        PointerClass::Fine => t,
        PointerClass::Coarse => t * params.coarse_gain,
    }
}

/// Policy C: adaptive fingertip contact.
///
/// A frame needs the same-type pairing or the criss-cross pairing in
/// contact; on coarse pointers a single touching pair is enough. The frame
/// is the bounding box of the four tips. `hysteresis` is only read here; the
/// caller feeds the returned measure back into it.
pub fn build_adaptive_contact(
    pair: &HandPair,
    jitter: f32,
    pointer: PointerClass,
    hysteresis: &ContactHysteresis,
    params: &AdaptiveContactParams,
) -> (FrameCandidate, ContactMeasure) {
    let threshold = adaptive_threshold(pair, jitter, pointer, params);
    let d = pair.tip_distances();
    let distance = match pointer {
        PointerClass::Fine => d.same_pairing().min(d.cross_pairing()),
        PointerClass::Coarse => d.closest_single(),
    };
    let measure = ContactMeasure {
        distance,
        threshold,
    };

    if !hysteresis.admits(distance, threshold, params.release_multiplier) {
        return (FrameCandidate::INVALID, measure);
    }
    let candidate = match Quad::bounding(&pair.points()) {
        Some(quad) if quad.width() >= params.min_size && quad.height() >= params.min_size => {
            FrameCandidate::valid(quad)
        }
        _ => FrameCandidate::INVALID,
    };
    (candidate, measure)
}

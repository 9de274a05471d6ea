//! Frame candidates: does the current pair of hands describe a frame?
//!
//! Hands are paired and ordered by position first; each policy then applies
//! its own matching rule to the ordered pair.

mod adaptive;
mod direct;
mod proximity;

pub use adaptive::{
    adaptive_threshold, build_adaptive_contact, ContactHysteresis, ContactMeasure,
};
pub use direct::build_direct_connect;
pub use proximity::build_proximity_rect;

use std::cmp::Ordering;

use fingerframe_core::{distance, Fingertips, HandObservation, Point, Quad};
use serde::{Deserialize, Serialize};

/// Two hands ordered visually left-to-right by index-tip x.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandPair {
    pub left: Fingertips,
    pub right: Fingertips,
}

impl HandPair {
    /// Order two hands by position, ignoring detector handedness labels.
    pub fn ordered(a: Fingertips, b: Fingertips) -> Self {
        if visual_order(&a, &b) == Ordering::Greater {
            Self { left: b, right: a }
        } else {
            Self { left: a, right: b }
        }
    }

    /// Left index, right index, right thumb, left thumb.
    #[inline]
    pub fn points(&self) -> [Point; 4] {
        [
            self.left.index,
            self.right.index,
            self.right.thumb,
            self.left.thumb,
        ]
    }

    /// Mean index-to-thumb span of the two hands.
    #[inline]
    pub fn mean_span(&self) -> f32 {
        0.5 * (self.left.span() + self.right.span())
    }

    /// The four cross-hand fingertip distances.
    pub fn tip_distances(&self) -> TipDistances {
        TipDistances {
            same_index: distance(self.left.index, self.right.index),
            same_thumb: distance(self.left.thumb, self.right.thumb),
            cross_index_thumb: distance(self.left.index, self.right.thumb),
            cross_thumb_index: distance(self.left.thumb, self.right.index),
        }
    }
}

fn visual_order(a: &Fingertips, b: &Fingertips) -> Ordering {
    a.index
        .x
        .total_cmp(&b.index.x)
        .then(a.thumb.x.total_cmp(&b.thumb.x))
        .then(a.index.y.total_cmp(&b.index.y))
        .then(a.thumb.y.total_cmp(&b.thumb.y))
}

/// Distances between fingertips of different hands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TipDistances {
    /// Left index to right index.
    pub same_index: f32,
    /// Left thumb to right thumb.
    pub same_thumb: f32,
    /// Left index to right thumb.
    pub cross_index_thumb: f32,
    /// Left thumb to right index.
    pub cross_thumb_index: f32,
}

impl TipDistances {
    /// Worst distance of the same-type pairing.
    #[inline]
    pub fn same_pairing(&self) -> f32 {
        self.same_index.max(self.same_thumb)
    }

    /// Worst distance of the criss-cross pairing.
    #[inline]
    pub fn cross_pairing(&self) -> f32 {
        self.cross_index_thumb.max(self.cross_thumb_index)
    }

    /// Closest single pair.
    #[inline]
    pub fn closest_single(&self) -> f32 {
        self.same_index
            .min(self.same_thumb)
            .min(self.cross_index_thumb)
            .min(self.cross_thumb_index)
    }
}

/// Which hands are usable this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HandSelection {
    /// No hand with both tips.
    None,
    /// Exactly one usable hand.
    One,
    /// More than two hands reported; no frame is attempted.
    Crowd,
    Pair(HandPair),
}

impl HandSelection {
    pub fn pair(&self) -> Option<&HandPair> {
        match self {
            Self::Pair(pair) => Some(pair),
            _ => None,
        }
    }
}

/// Select the hands that can take part in a frame.
///
/// Hands missing a tip or below `min_confidence` are dropped. Input order
/// never matters.
pub fn select_hands(hands: &[HandObservation], min_confidence: f32) -> HandSelection {
    if hands.len() > 2 {
        return HandSelection::Crowd;
    }
    let mut usable = hands
        .iter()
        .filter(|h| h.confidence >= min_confidence)
        .filter_map(HandObservation::fingertips);
    match (usable.next(), usable.next()) {
        (Some(a), Some(b)) => HandSelection::Pair(HandPair::ordered(a, b)),
        (Some(_), None) => HandSelection::One,
        _ => HandSelection::None,
    }
}

/// Outcome of the candidate builder for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameCandidate {
    /// Frame corners, present only when the geometry is valid.
    pub corners: Option<Quad>,
}

impl FrameCandidate {
    pub const INVALID: FrameCandidate = FrameCandidate { corners: None };

    pub fn valid(corners: Quad) -> Self {
        Self {
            corners: Some(corners),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.corners.is_some()
    }
}

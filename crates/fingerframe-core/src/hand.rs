//! Per-hand landmark observations produced by an external detector.

use serde::{Deserialize, Serialize};

use crate::geometry::{distance, Point};

/// Landmark indices of the 21-point hand model.
pub struct HandLandmark;

impl HandLandmark {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_TIP: usize = 8;
    /// Number of landmarks a complete observation carries.
    pub const COUNT: usize = 21;
}

/// One tracked landmark in normalized coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Planar position, `None` if either coordinate is not finite.
    #[inline]
    pub fn point(&self) -> Option<Point> {
        (self.x.is_finite() && self.y.is_finite()).then(|| Point::new(self.x, self.y))
    }
}

/// Handedness label reported by the detector.
///
/// Only informational: hands are ordered by position, never by label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
    #[default]
    Unknown,
}

/// One hand's detected landmarks for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    pub landmarks: Vec<Landmark>,
    #[serde(default)]
    pub handedness: Handedness,
    /// Detection confidence in `[0, 1]`.
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    1.0
}

/// Index and thumb tips of one hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fingertips {
    pub index: Point,
    pub thumb: Point,
}

impl Fingertips {
    /// Index-to-thumb span, a proxy for apparent hand size.
    #[inline]
    pub fn span(&self) -> f32 {
        distance(self.index, self.thumb)
    }
}

impl HandObservation {
    pub fn new(landmarks: Vec<Landmark>, handedness: Handedness, confidence: f32) -> Self {
        Self {
            landmarks,
            handedness,
            confidence,
        }
    }

    /// Synthetic observation with every landmark parked on the wrist except
    /// the index and thumb tips.
    ///
    /// Handy for replay traces and tests where only the tips matter.
    pub fn from_tips(index: Point, thumb: Point, handedness: Handedness) -> Self {
        let wrist = Landmark::new((index.x + thumb.x) * 0.5, thumb.y.max(index.y), 0.0);
        let mut landmarks = vec![wrist; HandLandmark::COUNT];
        landmarks[HandLandmark::INDEX_TIP] = Landmark::new(index.x, index.y, 0.0);
        landmarks[HandLandmark::THUMB_TIP] = Landmark::new(thumb.x, thumb.y, 0.0);
        Self::new(landmarks, handedness, 1.0)
    }

    /// Planar position of landmark `idx`, if present and finite.
    #[inline]
    pub fn landmark(&self, idx: usize) -> Option<Point> {
        self.landmarks.get(idx).and_then(Landmark::point)
    }

    #[inline]
    pub fn index_tip(&self) -> Option<Point> {
        self.landmark(HandLandmark::INDEX_TIP)
    }

    #[inline]
    pub fn thumb_tip(&self) -> Option<Point> {
        self.landmark(HandLandmark::THUMB_TIP)
    }

    /// Both tips, or `None` when the hand cannot take part in a frame.
    pub fn fingertips(&self) -> Option<Fingertips> {
        Some(Fingertips {
            index: self.index_tip()?,
            thumb: self.thumb_tip()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_or_nan_landmarks_have_no_tips() {
        let short = HandObservation::new(vec![Landmark::default(); 5], Handedness::Left, 0.9);
        assert!(short.thumb_tip().is_some());
        assert!(short.index_tip().is_none());
        assert!(short.fingertips().is_none());

        let mut nan = HandObservation::from_tips(
            Point::new(0.3, 0.3),
            Point::new(0.3, 0.6),
            Handedness::Right,
        );
        nan.landmarks[HandLandmark::THUMB_TIP].y = f32::NAN;
        assert!(nan.fingertips().is_none());
    }

    #[test]
    fn deserializes_with_defaults() {
        let raw = r#"{"landmarks":[{"x":0.1,"y":0.2}]}"#;
        let hand: HandObservation = serde_json::from_str(raw).expect("parse");
        assert_eq!(hand.handedness, Handedness::Unknown);
        assert_eq!(hand.confidence, 1.0);
        assert_eq!(hand.landmarks[0].z, 0.0);
    }

    #[test]
    fn from_tips_places_tips() {
        let hand = HandObservation::from_tips(
            Point::new(0.2, 0.3),
            Point::new(0.25, 0.6),
            Handedness::Left,
        );
        let tips = hand.fingertips().expect("tips");
        assert_eq!(tips.index, Point::new(0.2, 0.3));
        assert_eq!(tips.thumb, Point::new(0.25, 0.6));
        assert_eq!(hand.landmarks.len(), HandLandmark::COUNT);
    }
}

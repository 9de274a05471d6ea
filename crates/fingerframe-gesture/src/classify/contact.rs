use fingerframe_core::{distance, Point};

use super::Verdict;
use crate::candidate::{ContactHysteresis, ContactMeasure, HandPair};

/// Exponential moving average of fingertip displacement between ticks.
#[derive(Clone, Debug, Default)]
pub struct JitterTracker {
    previous: Option<[Point; 4]>,
    ema: f32,
}

impl JitterTracker {
    /// Current jitter estimate (normalized units per tick).
    #[inline]
    pub fn value(&self) -> f32 {
        self.ema
    }

    pub fn update(&mut self, pair: &HandPair, alpha: f32) -> f32 {
        let points = pair.points();
        if let Some(prev) = self.previous {
            let moved = prev
                .iter()
                .zip(points.iter())
                .map(|(a, b)| distance(*a, *b))
                .sum::<f32>()
                / 4.0;
            self.ema = alpha * moved + (1.0 - alpha) * self.ema;
        }
        self.previous = Some(points);
        self.ema
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Contact-hysteresis classifier: ready once fingertip contact has been
/// held for the hold time.
#[derive(Clone, Debug, Default)]
pub struct ContactClassifier {
    hysteresis: ContactHysteresis,
    touching_since: Option<f64>,
    needs_release: bool,
}

impl ContactClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch state the candidate builder judges against.
    #[inline]
    pub fn hysteresis(&self) -> &ContactHysteresis {
        &self.hysteresis
    }

    #[inline]
    pub fn is_touching(&self) -> bool {
        self.hysteresis.is_touching()
    }

    pub fn update(
        &mut self,
        measure: ContactMeasure,
        valid: bool,
        release_multiplier: f32,
        hold_ms: f64,
        now_ms: f64,
    ) -> Verdict {
        let touching = self
            .hysteresis
            .update(measure.distance, measure.threshold, release_multiplier);
        let score = Some(measure.ratio());
        if !touching {
            self.touching_since = None;
            self.needs_release = false;
            return Verdict {
                ready: false,
                score,
            };
        }
        if !valid || self.needs_release {
            self.touching_since = None;
            return Verdict {
                ready: false,
                score,
            };
        }
        let since = *self.touching_since.get_or_insert(now_ms);
        Verdict {
            ready: now_ms - since >= hold_ms,
            score,
        }
    }

    /// Require the fingertips to separate before the next ready.
    pub fn rearm(&mut self) {
        self.touching_since = None;
        self.needs_release = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

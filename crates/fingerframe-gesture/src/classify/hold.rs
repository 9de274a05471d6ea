use super::Verdict;

/// Hold-to-capture: ready once the frame has been valid and stable for the
/// dwell time.
///
/// After a capture the classifier is re-armed: the frame has to become
/// unstable or invalid at least once before it can be ready again.
#[derive(Clone, Debug, Default)]
pub struct HoldClassifier {
    stable_since: Option<f64>,
    needs_release: bool,
}

impl HoldClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(
        &mut self,
        valid: bool,
        instability_px: Option<f32>,
        stable_delta_px: f32,
        dwell_ms: f64,
        now_ms: f64,
    ) -> Verdict {
        let stable = valid && instability_px.is_some_and(|m| m < stable_delta_px);
        if !stable {
            self.stable_since = None;
            self.needs_release = false;
            return Verdict {
                ready: false,
                score: instability_px,
            };
        }
        if self.needs_release {
            return Verdict {
                ready: false,
                score: instability_px,
            };
        }
        let since = *self.stable_since.get_or_insert(now_ms);
        Verdict {
            ready: now_ms - since >= dwell_ms,
            score: instability_px,
        }
    }

    /// Require a fresh gesture before the next ready.
    pub fn rearm(&mut self) {
        self.stable_since = None;
        self.needs_release = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

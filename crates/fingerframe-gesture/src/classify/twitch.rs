//! Index-tip twitch detection for the direct-connect policy.
//!
//! Each side (left / right index tip) runs a small state machine over its
//! vertical position: `Idle -> Down` on a fast downward move, `Down -> Idle`
//! either on timeout or on the upward rebound, which is the capture edge.
//! Normalized y grows downwards.

use std::collections::VecDeque;

use crate::candidate::HandPair;
use crate::params::TwitchParams;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Idle,
    Down { onset_ms: f64, peak_y: f32 },
}

/// Twitch state machine for one index tip.
#[derive(Clone, Debug)]
pub struct TwitchSide {
    window: VecDeque<(f64, f32)>,
    phase: Phase,
}

impl Default for TwitchSide {
    fn default() -> Self {
        Self {
            window: VecDeque::new(),
            phase: Phase::Idle,
        }
    }
}

impl TwitchSide {
    /// `true` while a downward move is waiting for its rebound.
    pub fn is_down(&self) -> bool {
        matches!(self.phase, Phase::Down { .. })
    }

    /// Feed one sample; returns `true` on the rebound edge.
    pub fn update(&mut self, now_ms: f64, y: f32, params: &TwitchParams) -> bool {
        let prev = self.window.back().copied();
        // Time must advance; repeated timestamps are dropped.
        if prev.is_some_and(|(prev_t, _)| now_ms <= prev_t) {
            return false;
        }
        self.window.push_back((now_ms, y));
        while let Some(&(t, _)) = self.window.front() {
            if now_ms - t > params.window_ms {
                self.window.pop_front();
            } else {
                break;
            }
        }

        match self.phase {
            Phase::Idle => {
                let Some((prev_t, prev_y)) = prev else {
                    return false;
                };
                let dt_s = (now_ms - prev_t) / 1000.0;
                let velocity = (y - prev_y) / dt_s as f32;
                // Latest sample at the window minimum.
                let rest = self
                    .window
                    .iter()
                    .rev()
                    .copied()
                    .min_by(|a, b| a.1.total_cmp(&b.1));
                if let Some((rest_t, rest_y)) = rest {
                    if y - rest_y >= params.down_amp && velocity >= params.down_velocity {
                        self.phase = Phase::Down {
                            onset_ms: rest_t,
                            peak_y: y,
                        };
                    }
                }
                false
            }
            Phase::Down { onset_ms, peak_y } => {
                if now_ms - onset_ms > params.timeout_ms {
                    self.phase = Phase::Idle;
                    return false;
                }
                let peak_y = peak_y.max(y);
                if peak_y - y >= params.up_amp {
                    self.reset();
                    return true;
                }
                self.phase = Phase::Down { onset_ms, peak_y };
                false
            }
        }
    }

    pub fn reset(&mut self) {
        self.window.clear();
        self.phase = Phase::Idle;
    }
}

/// Both index tips; a rebound on either side is one capture edge.
#[derive(Clone, Debug, Default)]
pub struct TwitchClassifier {
    left: TwitchSide,
    right: TwitchSide,
}

impl TwitchClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the raw index tips of this tick; `true` on a capture edge.
    pub fn update(&mut self, pair: &HandPair, now_ms: f64, params: &TwitchParams) -> bool {
        let left = self.left.update(now_ms, pair.left.index.y, params);
        let right = self.right.update(now_ms, pair.right.index.y, params);
        let fired = left || right;
        if fired {
            self.reset();
        }
        fired
    }

    pub fn left(&self) -> &TwitchSide {
        &self.left
    }

    pub fn right(&self) -> &TwitchSide {
        &self.right
    }

    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}

//! Gesture classification: turns per-tick geometry into a discrete state.

mod contact;
mod hold;
mod twitch;

pub use contact::{ContactClassifier, JitterTracker};
pub use hold::HoldClassifier;
pub use twitch::{TwitchClassifier, TwitchSide};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete gesture state of a pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    #[default]
    NoHands,
    OneHand,
    /// Two hands, but they do not describe a valid frame.
    Forming,
    /// Valid frame, not yet stable / touching long enough.
    Holding,
    /// Valid frame that qualifies for capture.
    Ready,
    /// A capture is in flight.
    Capturing,
}

impl GestureState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoHands => "no_hands",
            Self::OneHand => "one_hand",
            Self::Forming => "forming",
            Self::Holding => "holding",
            Self::Ready => "ready",
            Self::Capturing => "capturing",
        }
    }

    /// Human-readable status line for the UI.
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::NoHands => "Show both hands to the camera",
            Self::OneHand => "Bring in your other hand",
            Self::Forming => "Make a frame with your fingers",
            Self::Holding => "Hold the frame steady",
            Self::Ready => "Frame locked",
            Self::Capturing => "Capturing...",
        }
    }
}

impl fmt::Display for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-tick classifier output for a valid-or-not two-hand frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Verdict {
    /// The policy's capture condition holds this tick.
    pub ready: bool,
    /// Instability (pixels) or contact ratio, for UI feedback only.
    pub score: Option<f32>,
}

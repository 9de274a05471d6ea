//! Pipeline configuration.
//!
//! Every struct has tuned defaults and `#[serde(default)]`, so JSON configs
//! only need to name the values they override.

use std::fmt;
use std::str::FromStr;

use fingerframe_core::CanvasSize;
use serde::{Deserialize, Serialize};

use crate::crop::CropMode;
use crate::history::MAX_HISTORY;
use crate::pipeline::ParamsError;

/// Which recognition policy a pipeline runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    ProximityRect,
    DirectConnect,
    AdaptiveContact,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 3] = [
        PolicyKind::ProximityRect,
        PolicyKind::DirectConnect,
        PolicyKind::AdaptiveContact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProximityRect => "proximity_rect",
            Self::DirectConnect => "direct_connect",
            Self::AdaptiveContact => "adaptive_contact",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        match key.as_str() {
            "proximity_rect" | "a" => Ok(Self::ProximityRect),
            "direct_connect" | "b" => Ok(Self::DirectConnect),
            "adaptive_contact" | "c" => Ok(Self::AdaptiveContact),
            _ => Err(ParamsError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Device-class hint: coarse pointers (touch screens) get looser contact
/// thresholds and longer holds under the adaptive-contact policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerClass {
    #[default]
    Fine,
    Coarse,
}

/// Corner history and stability settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingParams {
    /// Number of recent corner sets averaged together (`1..=MAX_HISTORY`).
    pub capacity: usize,
    /// Instability (mean corner displacement, reference-canvas pixels) below
    /// which the frame counts as stable.
    pub stable_delta_px: f32,
    /// How long the history survives invalid ticks. `None` clears it on the
    /// first invalid tick.
    pub gap_tolerance_ms: Option<f64>,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            capacity: 3,
            stable_delta_px: 8.0,
            gap_tolerance_ms: None,
        }
    }
}

/// Policy A: fingertip pairs touching form an axis-aligned rectangle that
/// must be held still.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityRectParams {
    /// Maximum fingertip pair distance (normalized) to count as contact.
    pub contact_distance: f32,
    /// Minimum width and height of the resulting box (normalized).
    pub min_size: f32,
    /// Valid + stable time needed before the gesture is ready.
    pub dwell_ms: f64,
    pub smoothing: SmoothingParams,
}

impl Default for ProximityRectParams {
    fn default() -> Self {
        Self {
            contact_distance: 0.08,
            min_size: 0.05,
            dwell_ms: 100.0,
            smoothing: SmoothingParams::default(),
        }
    }
}

/// Index-tip twitch detector settings (policy B).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitchParams {
    /// Rolling window searched for the pre-twitch rest position.
    pub window_ms: f64,
    /// Downward displacement (normalized) needed to enter the down phase.
    pub down_amp: f32,
    /// Downward velocity (normalized units per second) needed as well.
    pub down_velocity: f32,
    /// Upward displacement from the down peak that completes the twitch.
    pub up_amp: f32,
    /// The twitch must complete within this time of its onset.
    pub timeout_ms: f64,
}

impl Default for TwitchParams {
    fn default() -> Self {
        Self {
            window_ms: 250.0,
            down_amp: 0.02,
            down_velocity: 0.15,
            up_amp: 0.025,
            timeout_ms: 350.0,
        }
    }
}

/// Policy B: the four tracked tips are the frame; an index-finger twitch
/// triggers capture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectConnectParams {
    /// Minimum horizontal span between the index tips.
    pub min_width: f32,
    /// Minimum vertical span between the index line and the thumb line.
    pub min_height: f32,
    pub twitch: TwitchParams,
    pub smoothing: SmoothingParams,
}

impl Default for DirectConnectParams {
    fn default() -> Self {
        Self {
            min_width: 0.08,
            min_height: 0.05,
            twitch: TwitchParams::default(),
            smoothing: SmoothingParams {
                capacity: 2,
                stable_delta_px: 6.0,
                gap_tolerance_ms: None,
            },
        }
    }
}

/// Policy C: contact thresholds adapt to hand size, detector jitter and the
/// pointer class; contact is held with hysteresis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveContactParams {
    pub base_threshold: f32,
    /// Threshold gain per unit of mean index-to-thumb span.
    pub size_gain: f32,
    /// Threshold gain per unit of fingertip jitter (EMA).
    pub jitter_gain: f32,
    pub min_threshold: f32,
    pub max_threshold: f32,
    /// Extra threshold factor on coarse pointers.
    pub coarse_gain: f32,
    /// Smoothing factor of the jitter EMA.
    pub jitter_alpha: f32,
    /// Contact is released only above `threshold * release_multiplier`.
    pub release_multiplier: f32,
    /// Minimum width and height of the fingertip bounding box.
    pub min_size: f32,
    pub hold_ms: f64,
    pub coarse_hold_ms: f64,
    pub smoothing: SmoothingParams,
}

impl Default for AdaptiveContactParams {
    fn default() -> Self {
        Self {
            base_threshold: 0.02,
            size_gain: 0.25,
            jitter_gain: 2.0,
            min_threshold: 0.03,
            max_threshold: 0.12,
            coarse_gain: 1.25,
            jitter_alpha: 0.3,
            release_multiplier: 1.4,
            min_size: 0.04,
            hold_ms: 150.0,
            coarse_hold_ms: 200.0,
            smoothing: SmoothingParams {
                capacity: 3,
                stable_delta_px: 7.0,
                gap_tolerance_ms: Some(250.0),
            },
        }
    }
}

impl AdaptiveContactParams {
    /// Hold time for the given pointer class.
    #[inline]
    pub fn hold_for(&self, pointer: PointerClass) -> f64 {
        match pointer {
            PointerClass::Fine => self.hold_ms,
            PointerClass::Coarse => self.coarse_hold_ms,
        }
    }
}

/// The active recognition policy with its thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecognitionPolicy {
    ProximityRect(ProximityRectParams),
    DirectConnect(DirectConnectParams),
    AdaptiveContact(AdaptiveContactParams),
}

impl RecognitionPolicy {
    pub fn kind(&self) -> PolicyKind {
        match self {
            Self::ProximityRect(_) => PolicyKind::ProximityRect,
            Self::DirectConnect(_) => PolicyKind::DirectConnect,
            Self::AdaptiveContact(_) => PolicyKind::AdaptiveContact,
        }
    }

    pub fn smoothing(&self) -> &SmoothingParams {
        match self {
            Self::ProximityRect(p) => &p.smoothing,
            Self::DirectConnect(p) => &p.smoothing,
            Self::AdaptiveContact(p) => &p.smoothing,
        }
    }

    /// Crop geometry the policy produces unless overridden.
    pub fn default_crop_mode(&self) -> CropMode {
        match self {
            Self::DirectConnect(_) => CropMode::Polygon,
            Self::ProximityRect(_) | Self::AdaptiveContact(_) => CropMode::BoundingBox,
        }
    }
}

impl From<PolicyKind> for RecognitionPolicy {
    fn from(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::ProximityRect => Self::ProximityRect(ProximityRectParams::default()),
            PolicyKind::DirectConnect => Self::DirectConnect(DirectConnectParams::default()),
            PolicyKind::AdaptiveContact => {
                Self::AdaptiveContact(AdaptiveContactParams::default())
            }
        }
    }
}

/// Capture debounce and single-flight settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceParams {
    /// Minimum time between the end of one capture and the start of the next.
    pub min_interval_ms: f64,
    /// Time two hands must have been continuously present before a capture.
    pub rearm_delay_ms: f64,
    /// Force-release an export that never reports back. `None` waits forever.
    pub capture_timeout_ms: Option<f64>,
}

impl Default for DebounceParams {
    fn default() -> Self {
        Self {
            min_interval_ms: 400.0,
            rearm_delay_ms: 0.0,
            capture_timeout_ms: Some(5000.0),
        }
    }
}

/// Full configuration of a [`crate::FramePipeline`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramePipelineParams {
    pub policy: RecognitionPolicy,
    pub pointer: PointerClass,
    /// Canvas that pixel thresholds (stability) are expressed in.
    pub reference_canvas: CanvasSize,
    pub debounce: DebounceParams,
    /// Crop geometry override; `None` uses the policy's default.
    pub crop_mode: Option<CropMode>,
    /// Hands reported below this confidence are ignored.
    pub min_hand_confidence: f32,
}

impl Default for FramePipelineParams {
    fn default() -> Self {
        Self::for_policy(PolicyKind::ProximityRect)
    }
}

impl FramePipelineParams {
    /// Tuned defaults for the given policy.
    pub fn for_policy(kind: PolicyKind) -> Self {
        let debounce = match kind {
            PolicyKind::DirectConnect => DebounceParams {
                min_interval_ms: 300.0,
                rearm_delay_ms: 600.0,
                ..DebounceParams::default()
            },
            PolicyKind::ProximityRect | PolicyKind::AdaptiveContact => DebounceParams::default(),
        };
        Self {
            policy: kind.into(),
            pointer: PointerClass::Fine,
            reference_canvas: CanvasSize::default(),
            debounce,
            crop_mode: None,
            min_hand_confidence: 0.0,
        }
    }

    pub fn with_pointer(mut self, pointer: PointerClass) -> Self {
        self.pointer = pointer;
        self
    }

    /// Crop geometry in effect.
    pub fn crop_mode(&self) -> CropMode {
        self.crop_mode
            .unwrap_or_else(|| self.policy.default_crop_mode())
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let canvas = self.reference_canvas;
        if !(canvas.width.is_finite() && canvas.height.is_finite())
            || canvas.width <= 0.0
            || canvas.height <= 0.0
        {
            return Err(ParamsError::InvalidCanvas {
                width: canvas.width,
                height: canvas.height,
            });
        }

        let smoothing = self.policy.smoothing();
        if smoothing.capacity == 0 || smoothing.capacity > MAX_HISTORY {
            return Err(ParamsError::HistoryCapacity {
                capacity: smoothing.capacity,
                max: MAX_HISTORY,
            });
        }
        positive("smoothing.stable_delta_px", smoothing.stable_delta_px as f64)?;
        if let Some(gap) = smoothing.gap_tolerance_ms {
            non_negative("smoothing.gap_tolerance_ms", gap)?;
        }

        match &self.policy {
            RecognitionPolicy::ProximityRect(p) => {
                positive("contact_distance", p.contact_distance as f64)?;
                positive("min_size", p.min_size as f64)?;
                non_negative("dwell_ms", p.dwell_ms)?;
            }
            RecognitionPolicy::DirectConnect(p) => {
                positive("min_width", p.min_width as f64)?;
                positive("min_height", p.min_height as f64)?;
                positive("twitch.window_ms", p.twitch.window_ms)?;
                positive("twitch.down_amp", p.twitch.down_amp as f64)?;
                non_negative("twitch.down_velocity", p.twitch.down_velocity as f64)?;
                positive("twitch.up_amp", p.twitch.up_amp as f64)?;
                positive("twitch.timeout_ms", p.twitch.timeout_ms)?;
            }
            RecognitionPolicy::AdaptiveContact(p) => {
                non_negative("base_threshold", p.base_threshold as f64)?;
                non_negative("size_gain", p.size_gain as f64)?;
                non_negative("jitter_gain", p.jitter_gain as f64)?;
                positive("min_threshold", p.min_threshold as f64)?;
                positive("max_threshold", p.max_threshold as f64)?;
                if p.max_threshold < p.min_threshold {
                    return Err(ParamsError::InvalidValue {
                        name: "max_threshold",
                        value: p.max_threshold as f64,
                    });
                }
                positive("coarse_gain", p.coarse_gain as f64)?;
                if !(p.jitter_alpha > 0.0 && p.jitter_alpha <= 1.0) {
                    return Err(ParamsError::InvalidValue {
                        name: "jitter_alpha",
                        value: p.jitter_alpha as f64,
                    });
                }
                if !(p.release_multiplier >= 1.0 && p.release_multiplier.is_finite()) {
                    return Err(ParamsError::ReleaseMultiplier(p.release_multiplier));
                }
                positive("min_size", p.min_size as f64)?;
                non_negative("hold_ms", p.hold_ms)?;
                non_negative("coarse_hold_ms", p.coarse_hold_ms)?;
            }
        }

        non_negative("debounce.min_interval_ms", self.debounce.min_interval_ms)?;
        non_negative("debounce.rearm_delay_ms", self.debounce.rearm_delay_ms)?;
        if let Some(timeout) = self.debounce.capture_timeout_ms {
            positive("debounce.capture_timeout_ms", timeout)?;
        }
        if !(0.0..=1.0).contains(&self.min_hand_confidence) {
            return Err(ParamsError::InvalidValue {
                name: "min_hand_confidence",
                value: self.min_hand_confidence as f64,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ParamsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParamsError::InvalidValue { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ParamsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ParamsError::InvalidValue { name, value })
    }
}

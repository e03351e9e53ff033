use serde::{Deserialize, Serialize};

use crate::extensions::easing::{EaseType, TransitionType};
use crate::extensions::tween::{TweenPauseMode, TweenProcessMode};

/// Defaults applied to every tween a `TweenManager` creates.
/// Loaded from a JSON file at runtime or built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenConfig {
    /// Curve family for tweeners that don't pick one.
    pub trans: TransitionType,
    /// Curve direction for tweeners that don't pick one.
    pub ease: EaseType,
    /// Number of loops (0 = infinite).
    pub loops: u32,
    /// Multiplier applied to every delta fed into the tween.
    pub speed_scale: f64,
    /// Whether appended tweeners run in parallel by default.
    pub parallel: bool,
    pub pause_mode: TweenPauseMode,
    pub process_mode: TweenProcessMode,
    /// Fixed delta for physics-phase ticking in seconds (default: 1/60).
    pub physics_dt: f64,
}

impl Default for TweenConfig {
    fn default() -> Self {
        Self {
            trans: TransitionType::Linear,
            ease: EaseType::InOut,
            loops: 1,
            speed_scale: 1.0,
            parallel: false,
            pause_mode: TweenPauseMode::Bound,
            process_mode: TweenProcessMode::Idle,
            physics_dt: 1.0 / 60.0,
        }
    }
}

impl TweenConfig {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

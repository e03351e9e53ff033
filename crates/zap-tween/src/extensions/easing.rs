// extensions/easing.rs
//
// Transition/ease equation table for tween interpolation.
// Every equation has the shape (time, initial, delta, duration) -> value.
// No dependencies on Scene, just math.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::api::error::TweenError;
use crate::core::value::Value;

/// Curve family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionType {
    #[default]
    Linear,
    Sine,
    Quint,
    Quart,
    Quad,
    Expo,
    Elastic,
    Cubic,
    Circ,
    Bounce,
    Back,
}

impl TransitionType {
    pub const ALL: [TransitionType; 11] = [
        TransitionType::Linear,
        TransitionType::Sine,
        TransitionType::Quint,
        TransitionType::Quart,
        TransitionType::Quad,
        TransitionType::Expo,
        TransitionType::Elastic,
        TransitionType::Cubic,
        TransitionType::Circ,
        TransitionType::Bounce,
        TransitionType::Back,
    ];
}

impl TryFrom<i64> for TransitionType {
    type Error = TweenError;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(TweenError::InvalidTransition(index))
    }
}

/// Curve direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EaseType {
    In,
    Out,
    #[default]
    InOut,
    OutIn,
}

impl EaseType {
    pub const ALL: [EaseType; 4] = [EaseType::In, EaseType::Out, EaseType::InOut, EaseType::OutIn];
}

impl TryFrom<i64> for EaseType {
    type Error = TweenError;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(TweenError::InvalidEase(index))
    }
}

/// `(time, initial, delta, duration) -> value`
pub type EasingFunction = fn(f64, f64, f64, f64) -> f64;

/// Indexed by `[TransitionType][EaseType]`. Linear is the same for every ease.
const EQUATIONS: [[EasingFunction; 4]; 11] = [
    [linear::ease, linear::ease, linear::ease, linear::ease],
    [sine::ease_in, sine::ease_out, sine::in_out, sine::out_in],
    [quint::ease_in, quint::ease_out, quint::in_out, quint::out_in],
    [quart::ease_in, quart::ease_out, quart::in_out, quart::out_in],
    [quad::ease_in, quad::ease_out, quad::in_out, quad::out_in],
    [expo::ease_in, expo::ease_out, expo::in_out, expo::out_in],
    [elastic::ease_in, elastic::ease_out, elastic::in_out, elastic::out_in],
    [cubic::ease_in, cubic::ease_out, cubic::in_out, cubic::out_in],
    [circ::ease_in, circ::ease_out, circ::in_out, circ::out_in],
    [bounce::ease_in, bounce::ease_out, bounce::in_out, bounce::out_in],
    [back::ease_in, back::ease_out, back::in_out, back::out_in],
];

/// Look up the equation for a transition/ease pair.
#[inline]
pub fn equation(trans: TransitionType, ease: EaseType) -> EasingFunction {
    EQUATIONS[trans as usize][ease as usize]
}

/// Evaluate a curve. A zero duration short-circuits to `initial + delta`.
#[inline]
pub fn run_equation(
    trans: TransitionType,
    ease: EaseType,
    time: f64,
    initial: f64,
    delta: f64,
    duration: f64,
) -> f64 {
    if duration == 0.0 {
        return initial + delta;
    }
    equation(trans, ease)(time, initial, delta, duration)
}

/// Interpolate any `Value` along a curve.
///
/// `delta` is `final - initial`. Booleans run the linear equation on 0/1
/// and switch at 0.5; every other type computes `initial + delta` and lerps
/// between the two endpoints by the curve's fractional position.
pub fn interpolate_value(
    initial: &Value,
    delta: &Value,
    time: f64,
    duration: f64,
    trans: TransitionType,
    ease: EaseType,
) -> Value {
    if let Value::Bool(b) = initial {
        let start = if *b { 1.0 } else { 0.0 };
        let change = delta.as_f64().unwrap_or(0.0);
        let v = run_equation(TransitionType::Linear, EaseType::In, time, start, change, duration);
        return Value::Bool(v >= 0.5);
    }

    let target = initial.add(delta);
    let fraction = run_equation(trans, ease, time, 0.0, 1.0, duration);
    Value::interpolate(initial, &target, fraction)
}

/// Same as `interpolate_value` but with raw table indices, for callers that
/// hold untyped curve selections.
pub fn interpolate_value_indexed(
    initial: &Value,
    delta: &Value,
    time: f64,
    duration: f64,
    trans: i64,
    ease: i64,
) -> Result<Value, TweenError> {
    let trans = TransitionType::try_from(trans)?;
    let ease = EaseType::try_from(ease)?;
    Ok(interpolate_value(initial, delta, time, duration, trans, ease))
}

// ── Equations ────────────────────────────────────────────────────────────

mod linear {
    pub fn ease(t: f64, b: f64, c: f64, d: f64) -> f64 {
        c * t / d + b
    }
}

/// `out` on the first half, `in` on the second.
macro_rules! out_in {
    () => {
        pub fn out_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
            if t < d / 2.0 {
                ease_out(t * 2.0, b, c / 2.0, d)
            } else {
                ease_in(t * 2.0 - d, b + c / 2.0, c / 2.0, d)
            }
        }
    };
}

mod sine {
    use super::PI;

    pub fn ease_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
        -c * (t / d * (PI / 2.0)).cos() + c + b
    }

    pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        c * (t / d * (PI / 2.0)).sin() + b
    }

    pub fn in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        -c / 2.0 * ((PI * t / d).cos() - 1.0) + b
    }

    out_in!();
}

mod quint {
    pub fn ease_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
        c * (t / d).powi(5) + b
    }

    pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / d - 1.0;
        c * (t.powi(5) + 1.0) + b
    }

    pub fn in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / d * 2.0;
        if t < 1.0 {
            return c / 2.0 * t.powi(5) + b;
        }
        let t = t - 2.0;
        c / 2.0 * (t.powi(5) + 2.0) + b
    }

    out_in!();
}

mod quart {
    pub fn ease_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
        c * (t / d).powi(4) + b
    }

    pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / d - 1.0;
        -c * (t.powi(4) - 1.0) + b
    }

    pub fn in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / (d / 2.0);
        if t < 1.0 {
            return c / 2.0 * t.powi(4) + b;
        }
        let t = t - 2.0;
        -c / 2.0 * (t.powi(4) - 2.0) + b
    }

    out_in!();
}

mod quad {
    pub fn ease_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
        c * (t / d).powi(2) + b
    }

    pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / d;
        -c * t * (t - 2.0) + b
    }

    pub fn in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / (d / 2.0);
        if t < 1.0 {
            return c / 2.0 * t * t + b;
        }
        -c / 2.0 * ((t - 1.0) * (t - 3.0) - 1.0) + b
    }

    out_in!();
}

mod expo {
    pub fn ease_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
        if t == 0.0 {
            return b;
        }
        c * 2.0_f64.powf(10.0 * (t / d - 1.0)) + b
    }

    pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        if t == d {
            return b + c;
        }
        c * (-(2.0_f64.powf(-10.0 * t / d)) + 1.0) + b
    }

    pub fn in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        if t == 0.0 {
            return b;
        }
        if t == d {
            return b + c;
        }
        let t = t / d * 2.0;
        if t < 1.0 {
            return c / 2.0 * 2.0_f64.powf(10.0 * (t - 1.0)) + b;
        }
        c / 2.0 * (-(2.0_f64.powf(-10.0 * (t - 1.0))) + 2.0) + b
    }

    out_in!();
}

mod elastic {
    use super::PI;

    pub fn ease_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
        if t == 0.0 {
            return b;
        }
        let t = t / d;
        if t == 1.0 {
            return b + c;
        }
        let p = d * 0.3;
        let s = p / 4.0;
        let t = t - 1.0;
        let post_fix = c * 2.0_f64.powf(10.0 * t);
        -(post_fix * ((t * d - s) * (2.0 * PI) / p).sin()) + b
    }

    pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        if t == 0.0 {
            return b;
        }
        let t = t / d;
        if t == 1.0 {
            return b + c;
        }
        let p = d * 0.3;
        let s = p / 4.0;
        c * 2.0_f64.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() + c + b
    }

    pub fn in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        if t == 0.0 {
            return b;
        }
        let t = t / (d / 2.0);
        if t == 2.0 {
            return b + c;
        }
        let p = d * (0.3 * 1.5);
        let s = p / 4.0;
        let t = t - 1.0;
        if t < 0.0 {
            let post_fix = c * 2.0_f64.powf(10.0 * t);
            return -0.5 * (post_fix * ((t * d - s) * (2.0 * PI) / p).sin()) + b;
        }
        let post_fix = c * 2.0_f64.powf(-10.0 * t);
        post_fix * ((t * d - s) * (2.0 * PI) / p).sin() * 0.5 + c + b
    }

    out_in!();
}

mod cubic {
    pub fn ease_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / d;
        c * t * t * t + b
    }

    pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / d - 1.0;
        c * (t * t * t + 1.0) + b
    }

    pub fn in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / (d / 2.0);
        if t < 1.0 {
            return c / 2.0 * t * t * t + b;
        }
        let t = t - 2.0;
        c / 2.0 * (t * t * t + 2.0) + b
    }

    out_in!();
}

mod circ {
    pub fn ease_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / d;
        -c * ((1.0 - t * t).sqrt() - 1.0) + b
    }

    pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / d - 1.0;
        c * (1.0 - t * t).sqrt() + b
    }

    pub fn in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / (d / 2.0);
        if t < 1.0 {
            return -c / 2.0 * ((1.0 - t * t).sqrt() - 1.0) + b;
        }
        let t = t - 2.0;
        c / 2.0 * ((1.0 - t * t).sqrt() + 1.0) + b
    }

    out_in!();
}

mod bounce {
    pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        const N1: f64 = 7.5625;
        const D1: f64 = 2.75;

        let t = t / d;
        if t < 1.0 / D1 {
            c * (N1 * t * t) + b
        } else if t < 2.0 / D1 {
            let t = t - 1.5 / D1;
            c * (N1 * t * t + 0.75) + b
        } else if t < 2.5 / D1 {
            let t = t - 2.25 / D1;
            c * (N1 * t * t + 0.9375) + b
        } else {
            let t = t - 2.625 / D1;
            c * (N1 * t * t + 0.984375) + b
        }
    }

    pub fn ease_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
        c - ease_out(d - t, 0.0, c, d) + b
    }

    pub fn in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        if t < d / 2.0 {
            ease_in(t * 2.0, b, c / 2.0, d)
        } else {
            ease_out(t * 2.0 - d, b + c / 2.0, c / 2.0, d)
        }
    }

    out_in!();
}

mod back {
    const S: f64 = 1.70158;

    pub fn ease_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / d;
        c * t * t * ((S + 1.0) * t - S) + b
    }

    pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / d - 1.0;
        c * (t * t * ((S + 1.0) * t + S) + 1.0) + b
    }

    pub fn in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let s = S * 1.525;
        let t = t / (d / 2.0);
        if t < 1.0 {
            return c / 2.0 * (t * t * ((s + 1.0) * t - s)) + b;
        }
        let t = t - 2.0;
        c / 2.0 * (t * t * ((s + 1.0) * t + s) + 2.0) + b
    }

    out_in!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const EPS: f64 = 1e-9;

    #[test]
    fn endpoints_are_exact_for_every_pair() {
        for trans in TransitionType::ALL {
            for ease in EaseType::ALL {
                let start = run_equation(trans, ease, 0.0, 3.0, 7.0, 2.0);
                let end = run_equation(trans, ease, 2.0, 3.0, 7.0, 2.0);
                assert!((start - 3.0).abs() < EPS, "{:?}/{:?} start = {}", trans, ease, start);
                assert!((end - 10.0).abs() < EPS, "{:?}/{:?} end = {}", trans, ease, end);
            }
        }
    }

    #[test]
    fn zero_duration_jumps_to_end() {
        for trans in TransitionType::ALL {
            for ease in EaseType::ALL {
                assert_eq!(run_equation(trans, ease, 0.0, 1.0, 4.0, 0.0), 5.0);
                assert_eq!(run_equation(trans, ease, 12.0, 1.0, 4.0, 0.0), 5.0);
            }
        }
    }

    #[test]
    fn linear_midpoint() {
        let v = run_equation(TransitionType::Linear, EaseType::OutIn, 0.5, 0.0, 10.0, 1.0);
        assert!((v - 5.0).abs() < EPS);
    }

    #[test]
    fn quad_out_faster_start() {
        let mid = run_equation(TransitionType::Quad, EaseType::Out, 0.5, 0.0, 1.0, 1.0);
        assert!(mid > 0.5, "quad out at 0.5 should be > 0.5, got {}", mid);
        let mid = run_equation(TransitionType::Quad, EaseType::In, 0.5, 0.0, 1.0, 1.0);
        assert!(mid < 0.5);
    }

    #[test]
    fn back_overshoots() {
        let early = run_equation(TransitionType::Back, EaseType::In, 0.2, 0.0, 1.0, 1.0);
        assert!(early < 0.0, "back in should dip below the start");
    }

    #[test]
    fn index_conversion() {
        assert_eq!(TransitionType::try_from(9), Ok(TransitionType::Bounce));
        assert_eq!(TransitionType::try_from(11), Err(TweenError::InvalidTransition(11)));
        assert_eq!(EaseType::try_from(-1), Err(TweenError::InvalidEase(-1)));
    }

    #[test]
    fn interpolate_bool_switches_at_half() {
        let delta = Value::Bool(true).subtract(&Value::Bool(false));
        let early = interpolate_value(&Value::Bool(false), &delta, 0.4, 1.0, TransitionType::Expo, EaseType::In);
        let late = interpolate_value(&Value::Bool(false), &delta, 0.5, 1.0, TransitionType::Expo, EaseType::In);
        assert_eq!(early, Value::Bool(false));
        assert_eq!(late, Value::Bool(true));
    }

    #[test]
    fn interpolate_vector_follows_curve() {
        let v = interpolate_value(
            &Value::Vec2(Vec2::ZERO),
            &Value::Vec2(Vec2::new(100.0, 0.0)),
            0.5,
            1.0,
            TransitionType::Linear,
            EaseType::In,
        );
        let v = v.as_vec2().unwrap();
        assert!((v.x - 50.0).abs() < 1e-4);
    }

    #[test]
    fn indexed_interpolation_rejects_bad_indices() {
        let r = interpolate_value_indexed(&Value::Float(0.0), &Value::Float(1.0), 0.5, 1.0, 42, 0);
        assert_eq!(r, Err(TweenError::InvalidTransition(42)));
        let r = interpolate_value_indexed(&Value::Float(0.0), &Value::Float(1.0), 0.5, 1.0, 0, 0).unwrap();
        assert_eq!(r, Value::Float(0.5));
    }
}

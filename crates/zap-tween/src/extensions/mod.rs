// extensions/mod.rs
//
// Tween engine: easing curves, tweeners, the Tween sequencer and the
// manager that schedules tweens against a Scene.

pub mod callable;
pub mod easing;
pub mod manager;
pub mod tween;
pub mod tweener;

pub use callable::Callable;
pub use easing::{interpolate_value, interpolate_value_indexed, run_equation, EaseType, TransitionType};
pub use manager::{ProcessPhase, TweenManager};
pub use tween::{Tween, TweenEvent, TweenPauseMode, TweenProcessMode};
pub use tweener::{CallbackTweener, IntervalTweener, MethodTweener, PropertyTweener, StepResult, Tweener};

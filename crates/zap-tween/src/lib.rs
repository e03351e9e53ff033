pub mod api;
pub mod core;
pub mod components;
pub mod config;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::error::{CallError, TweenError};
pub use api::types::{ObjectId, TweenId};
pub use components::entity::Entity;
pub use config::TweenConfig;
pub use core::scene::{Animatable, Scene, SceneObject};
pub use core::time::FixedTimestep;
pub use core::value::{Color, PropertyPath, Value, ValueKind};

pub use extensions::{
    Callable,
    EaseType, TransitionType, interpolate_value, interpolate_value_indexed, run_equation,
    Tween, TweenEvent, TweenPauseMode, TweenProcessMode,
    TweenManager, ProcessPhase,
    Tweener, PropertyTweener, IntervalTweener, CallbackTweener, MethodTweener, StepResult,
};

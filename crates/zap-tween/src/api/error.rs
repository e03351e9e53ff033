use thiserror::Error;

use crate::api::types::ObjectId;

/// Usage errors reported by the tween composition and control surface.
///
/// Returning one of these never leaves the tween in a half-modified state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TweenError {
    #[error("tween is invalid: either cleared or created outside a tween manager")]
    Invalid,

    #[error("can't append to a tween that has started, call stop() first")]
    AlreadyStarted,

    #[error("can't play a finished tween, call stop() first to reset its state")]
    Dead,

    #[error("tween started, but has no tweeners")]
    NoTweeners,

    #[error("target {0} does not exist")]
    TargetNotFound(ObjectId),

    #[error("property '{property}' not found on {target}")]
    PropertyNotFound { target: ObjectId, property: String },

    #[error("type mismatch between {context}: {expected} and {found}")]
    TypeMismatch {
        context: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid property path '{0}'")]
    InvalidPath(String),

    #[error("invalid transition type index {0}")]
    InvalidTransition(i64),

    #[error("invalid ease type index {0}")]
    InvalidEase(i64),

    #[error("tween {0} not found")]
    UnknownTween(crate::api::types::TweenId),
}

/// Failure raised while invoking a `Callable`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallError {
    #[error("instance {0} was freed")]
    InstanceFreed(ObjectId),

    #[error("method '{0}' does not exist")]
    InvalidMethod(String),

    #[error("method expected {expected} arguments, got {given}")]
    InvalidArgumentCount { expected: usize, given: usize },

    #[error("invalid argument {index}: expected {expected}, got {found}")]
    InvalidArgument {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0}")]
    Custom(String),
}

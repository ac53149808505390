//! Error types for drift_animation

use thiserror::Error;

/// Errors raised while building or registering animations
///
/// None of these ever reach the user: callers log them and carry on
/// without the animation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// A trigger position string could not be parsed (e.g. `"top 80%"`)
    #[error("invalid trigger position: {0:?}")]
    InvalidPosition(String),

    /// Toggle actions must be four known action names
    #[error("invalid toggle actions: {0:?}")]
    InvalidToggleActions(String),

    /// Unknown easing identifier
    #[error("unknown easing: {0:?}")]
    UnknownEasing(String),

    /// A stagger offset of zero would give siblings the same start time
    #[error("stagger offset must be greater than zero")]
    InvalidStagger,

    /// A registration referred to a target that does not exist
    #[error("no element matches target {0:?}")]
    MissingTarget(String),

    /// The scheduler or scroll runtime behind a handle has been dropped
    #[error("animation runtime is no longer alive")]
    RuntimeGone,

    /// The process-wide runtime was installed twice
    #[error("global {0} already installed")]
    AlreadyInstalled(&'static str),
}

/// Result type for drift_animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;

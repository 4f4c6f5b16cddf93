//! Configuration errors.
//!
//! Everything that can go wrong in this crate goes wrong at creation time:
//! an animated template with impossible parameters, or a spawn request that
//! points at nothing. Once entities exist, the per-tick update is total and
//! has no error path.
//!
//! [`AnimationError`] describes a bad [`AnimationState`](crate::components::animation::AnimationState)
//! in isolation. [`ConfigError`] is what callers see; it wraps animation
//! failures with the identity of the template that produced them.

use bevy_ecs::entity::Entity;
use thiserror::Error;

/// Invalid flipbook parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AnimationError {
    #[error("total_frames must be at least 1 (got {0})")]
    InvalidTotalFrames(i32),
    #[error("play_speed must be finite and non-negative (got {0})")]
    InvalidPlaySpeed(f32),
}

/// Rejected template registration or spawn request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("template '{name}': {source}")]
    Template {
        name: String,
        #[source]
        source: AnimationError,
    },
    #[error("spawn request: count must be >= 0 (got {0})")]
    NegativeCount(i32),
    #[error("spawn request: area extents must be finite (got {width} x {height})")]
    InvalidArea { width: f32, height: f32 },
    #[error("spawn request: template entity {0} does not exist or is not a registered template")]
    MissingTemplate(Entity),
    #[error("spawn request: no template registered under '{0}'")]
    UnknownTemplate(String),
    #[error("spawn request: another request is still pending")]
    AlreadyPending,
}

//! ECS components for entities.
//!
//! Submodules overview:
//! - [`animation`] – flipbook playback state and the render-facing frame index
//! - [`mapposition`] – world-space position, with depth derived from `y`
//! - [`prefab`] – template markers and template identity

pub mod animation;
pub mod mapposition;
pub mod prefab;

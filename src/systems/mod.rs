//! Engine systems.
//!
//! Submodules overview
//! - [`animation`] – advance flipbook timers and publish frame indices, in parallel
//! - [`spawner`] – one-shot deterministic bulk instantiation from a template
//! - [`time`] – update simulation time and delta

pub mod animation;
pub mod spawner;
pub mod time;

//! Flipswarm library.
//!
//! A large population of flipbook-animated sprites on a `bevy_ecs` world:
//! a one-shot deterministic spawner scatters clones of a template over an
//! area, and a parallel animation system advances every clone's frame each
//! tick. Rendering is left to the consumer, which reads
//! [`FrameIndex`](components::animation::FrameIndex) and
//! [`MapPosition`](components::mapposition::MapPosition).

pub mod components;
pub mod error;
pub mod resources;
pub mod simulation;
pub mod systems;

//! One-shot spawn trigger.
//!
//! Bulk instantiation is driven by a single [`SpawnTrigger`] resource. While
//! it holds [`SpawnTrigger::Pending`], the
//! [`spawner_system`](crate::systems::spawner::spawner_system) runs; the
//! system consumes the request in the same run and leaves the resource in a
//! terminal variant, so a request is processed at most once.
//!
//! ```text
//! Pending(request) ──► Consumed(report)
//!        │
//!        └──────────► Rejected(error)
//! ```
//!
//! An absent resource and both terminal variants all mean "nothing to do".

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::error::ConfigError;

/// Default number of instances per request.
pub const DEFAULT_SPAWN_COUNT: i32 = 3000;
/// Default placement area (full width and height, in world units).
pub const DEFAULT_SPAWN_AREA: Vec2 = Vec2::new(100.0, 100.0);

/// A bulk instantiation order.
///
/// `area_extents` is the FULL width and height of the placement rectangle,
/// centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub template_entity: Entity,
    pub count: i32,
    pub area_extents: Vec2,
}

impl SpawnRequest {
    /// Build a request, rejecting negative counts and non-finite areas.
    ///
    /// The template reference can only be checked against a world; the
    /// spawner does that before instantiating anything.
    pub fn new(template_entity: Entity, count: i32, area_extents: Vec2) -> Result<Self, ConfigError> {
        let request = Self {
            template_entity,
            count,
            area_extents,
        };
        request.validate()?;
        Ok(request)
    }

    /// Check the world-independent constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count < 0 {
            return Err(ConfigError::NegativeCount(self.count));
        }
        if !self.area_extents.is_finite() {
            return Err(ConfigError::InvalidArea {
                width: self.area_extents.x,
                height: self.area_extents.y,
            });
        }
        Ok(())
    }
}

/// Outcome of a consumed request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnReport {
    pub template_entity: Option<Entity>,
    /// Spawned entities in creation order.
    pub instances: Vec<Entity>,
}

impl SpawnReport {
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Trigger state for the bulk spawner.
#[derive(Resource, Debug, Clone, PartialEq)]
pub enum SpawnTrigger {
    Pending(SpawnRequest),
    Consumed(SpawnReport),
    Rejected(ConfigError),
}

impl SpawnTrigger {
    pub fn is_pending(&self) -> bool {
        matches!(self, SpawnTrigger::Pending(_))
    }

    /// The report, once the request has been consumed.
    pub fn report(&self) -> Option<&SpawnReport> {
        match self {
            SpawnTrigger::Consumed(report) => Some(report),
            _ => None,
        }
    }
}

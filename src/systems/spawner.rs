//! Bulk deterministic spawner.
//!
//! The [`spawner_system`] consumes a pending
//! [`SpawnTrigger`](crate::resources::spawntrigger::SpawnTrigger), clones the
//! referenced template `count` times, and scatters the clones over a
//! rectangle centered on the origin.
//!
//! # Determinism
//!
//! Placement draws come from a [`fastrand::Rng`] seeded with the fixed
//! [`SPAWN_SEED`] and are taken in creation order: `x`, `y`, then the
//! initial animation timer when the template is animated. The same request
//! therefore always produces the same positions and timers, bit for bit.
//!
//! # Coordinate System
//!
//! - `area_extents` is the full width/height; positions fall in
//!   `[-w/2, w/2) x [-h/2, h/2)`.
//! - Depth is `z = y * DEPTH_PER_Y`: a larger `y` is further back. Flip the
//!   sign of [`DEPTH_PER_Y`] for cameras looking down +Z.
//!
//! # Behavior
//!
//! - Runs only while [`spawn_pending`] holds.
//! - Validates the request and the template before creating anything.
//! - Clones keep every template component except the [`Prefab`] marker.
//! - Leaves the trigger `Consumed` (with the spawned entities) or `Rejected`.

use bevy_ecs::prelude::*;
use fastrand::Rng;
use glam::Vec2;
use log::{error, info};

use crate::components::animation::AnimationState;
use crate::components::mapposition::MapPosition;
use crate::components::prefab::{Prefab, TemplateName};
use crate::error::ConfigError;
use crate::resources::spawntrigger::{SpawnReport, SpawnRequest, SpawnTrigger};

/// Seed of the placement generator. Never varies between runs.
pub const SPAWN_SEED: u64 = 1234;
/// Depth added per world unit of `y`.
pub const DEPTH_PER_Y: f32 = 0.01;
/// Initial timers are drawn from `[0, MAX_INITIAL_TIMER)`.
pub const MAX_INITIAL_TIMER: f32 = 100.0;

/// Placement of one spawned instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Initial animation timer, for animated templates.
    pub timer: Option<f32>,
}

impl Placement {
    pub fn position(&self) -> MapPosition {
        MapPosition::new(self.x, self.y, self.z)
    }
}

/// Draw placements for `count` instances, in creation order.
///
/// This is the sequential half of the spawner; it owns the only generator
/// and is the single source of randomness for a request.
pub fn plan_placements(count: usize, area_extents: Vec2, with_timer: bool) -> Vec<Placement> {
    let mut rng = Rng::with_seed(SPAWN_SEED);
    (0..count)
        .map(|_| {
            let x = (rng.f32() - 0.5) * area_extents.x;
            let y = (rng.f32() - 0.5) * area_extents.y;
            let timer = with_timer.then(|| rng.f32() * MAX_INITIAL_TIMER);
            Placement {
                x,
                y,
                z: y * DEPTH_PER_Y,
                timer,
            }
        })
        .collect()
}

/// Run condition: a request is waiting.
pub fn spawn_pending(trigger: Option<Res<SpawnTrigger>>) -> bool {
    trigger.is_some_and(|trigger| trigger.is_pending())
}

/// Check the request and its template against the world.
///
/// Returns the template's animation state (if any) so the caller can seed
/// per-instance timers from it, plus a printable template identity.
fn validate_request(
    request: &SpawnRequest,
    templates: &Query<(Option<&AnimationState>, Option<&TemplateName>), With<Prefab>>,
) -> Result<(Option<AnimationState>, String), ConfigError> {
    request.validate()?;
    let (animation, name) = templates
        .get(request.template_entity)
        .map_err(|_| ConfigError::MissingTemplate(request.template_entity))?;
    let name = name
        .map(|n| n.as_str().to_string())
        .unwrap_or_else(|| request.template_entity.to_string());
    Ok((animation.copied(), name))
}

/// System that consumes a pending spawn request.
///
/// # Ordering
///
/// Should run **before** [`flipbook_animation`](crate::systems::animation::flipbook_animation)
/// so clones are animated on their spawn tick.
pub fn spawner_system(
    mut commands: Commands,
    trigger: Option<ResMut<SpawnTrigger>>,
    templates: Query<(Option<&AnimationState>, Option<&TemplateName>), With<Prefab>>,
) {
    let Some(mut trigger) = trigger else {
        return;
    };
    let SpawnTrigger::Pending(request) = *trigger else {
        return;
    };

    let (template_animation, template_name) = match validate_request(&request, &templates) {
        Ok(validated) => validated,
        Err(err) => {
            error!("Rejected spawn request: {}", err);
            *trigger = SpawnTrigger::Rejected(err);
            return;
        }
    };

    let placements = plan_placements(
        request.count as usize,
        request.area_extents,
        template_animation.is_some(),
    );

    let mut instances = Vec::with_capacity(placements.len());
    for placement in &placements {
        let mut source_commands = commands.entity(request.template_entity);
        let mut clone = source_commands.clone_and_spawn();
        clone.remove::<Prefab>().insert(placement.position());
        if let (Some(animation), Some(timer)) = (template_animation, placement.timer) {
            clone.insert(animation.with_timer(timer));
        }
        instances.push(clone.id());
    }

    info!(
        "Spawned {} instances of '{}' in {}x{}",
        instances.len(),
        template_name,
        request.area_extents.x,
        request.area_extents.y
    );

    *trigger = SpawnTrigger::Consumed(SpawnReport {
        template_entity: Some(request.template_entity),
        instances,
    });
}

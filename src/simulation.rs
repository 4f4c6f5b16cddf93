//! Simulation setup and the tick loop.
//!
//! [`Simulation`] owns the entity store (a `bevy_ecs` [`World`]) and the
//! per-tick [`Schedule`]. It is created at startup and dropped at shutdown;
//! there is no global state.
//!
//! # Tick
//!
//! 1. [`update_world_time`] scales the delta and advances the clock
//! 2. [`spawner_system`] consumes a pending spawn request, if any
//! 3. [`flipbook_animation`] advances every animated entity in parallel
//!
//! Commands queued by the spawner are applied before the animation runs,
//! so instances animate on the tick they appear.

use std::collections::BTreeMap;

use bevy_ecs::prelude::*;
use bevy_tasks::{ComputeTaskPool, TaskPoolBuilder};
use glam::Vec2;
use log::{debug, info, warn};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::components::animation::{AnimationState, FrameIndex};
use crate::components::mapposition::MapPosition;
use crate::components::prefab::{Prefab, TemplateName};
use crate::error::ConfigError;
use crate::resources::simconfig::{SimConfig, TemplateConfig};
use crate::resources::spawntrigger::{SpawnRequest, SpawnTrigger};
use crate::resources::templatestore::TemplateStore;
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::flipbook_animation;
use crate::systems::spawner::{spawn_pending, spawner_system};
use crate::systems::time::update_world_time;

/// Initialise the compute pool used by parallel queries.
///
/// `worker_threads == 0` leaves the size to the pool. Only the first call
/// in a process has any effect.
pub fn init_task_pool(worker_threads: usize) {
    ComputeTaskPool::get_or_init(|| {
        let mut builder = TaskPoolBuilder::new().thread_name("flipswarm compute".to_string());
        if worker_threads > 0 {
            builder = builder.num_threads(worker_threads);
        }
        builder.build()
    });
}

/// Build the per-tick schedule.
pub fn build_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(spawner_system.run_if(spawn_pending));
    update.add_systems(flipbook_animation.after(spawner_system));
    update
}

/// Render-facing state of one instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstanceFrame {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub frame: f32,
}

/// Every simulated instance at one tick.
///
/// Spawned instances come first, in creation order across all consumed
/// requests. Animated entities inserted by hand through
/// [`Simulation::world_mut`] follow, ordered by entity id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame_count: u64,
    pub elapsed: f32,
    pub instances: Vec<InstanceFrame>,
}

impl FrameSnapshot {
    /// Number of instances showing each frame.
    pub fn histogram(&self) -> BTreeMap<u32, usize> {
        let mut counts = BTreeMap::new();
        for instance in &self.instances {
            *counts.entry(instance.frame as u32).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub struct Simulation {
    world: World,
    schedule: Schedule,
    /// Instances from every consumed request, in creation order.
    spawned: Vec<Entity>,
    /// A submitted request has not been consumed or rejected yet.
    awaiting_report: bool,
}

impl Simulation {
    /// Create the world, its resources and the schedule.
    pub fn new(config: &SimConfig) -> Self {
        init_task_pool(config.worker_threads);

        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_time_scale(config.time_scale));
        world.insert_resource(TemplateStore::new());

        Self {
            world,
            schedule: build_schedule(),
            spawned: Vec::new(),
            awaiting_report: false,
        }
    }

    /// Validate a flipbook template and store it as a [`Prefab`] entity.
    pub fn register_template(&mut self, template: &TemplateConfig) -> Result<Entity, ConfigError> {
        let state = AnimationState::new(template.play_speed, template.total_frames).map_err(
            |source| ConfigError::Template {
                name: template.name.clone(),
                source,
            },
        )?;

        let entity = self
            .world
            .spawn((
                Prefab,
                TemplateName::new(&template.name),
                state,
                FrameIndex::default(),
                MapPosition::default(),
            ))
            .id();

        let replaced = self
            .world
            .resource_mut::<TemplateStore>()
            .insert(template.name.clone(), entity);
        if let Some(old) = replaced {
            warn!(
                "Template '{}' re-registered; {} is no longer reachable by name",
                template.name, old
            );
        }

        info!(
            "Registered template '{}' ({} frames @ {} fps) as {}",
            template.name, template.total_frames, template.play_speed, entity
        );
        Ok(entity)
    }

    /// Queue a bulk spawn of the template registered as `template_name`.
    ///
    /// Fails if the name is unknown, the request is malformed, or an earlier
    /// request has not been consumed yet.
    pub fn request_spawn(
        &mut self,
        template_name: &str,
        count: i32,
        area_extents: Vec2,
    ) -> Result<(), ConfigError> {
        let template = self.world.resource::<TemplateStore>().resolve(template_name)?;
        let request = SpawnRequest::new(template, count, area_extents)?;
        self.submit(request)
    }

    /// Queue an already built request.
    pub fn submit(&mut self, request: SpawnRequest) -> Result<(), ConfigError> {
        if self.spawn_trigger().is_some_and(SpawnTrigger::is_pending) {
            return Err(ConfigError::AlreadyPending);
        }
        debug!(
            "Queued spawn of {} from {}",
            request.count, request.template_entity
        );
        self.world.insert_resource(SpawnTrigger::Pending(request));
        self.awaiting_report = true;
        Ok(())
    }

    /// Advance the simulation by one tick of `dt` unscaled seconds.
    pub fn tick(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
        self.collect_report();
    }

    /// Append the instances of a freshly consumed request to the spawn log.
    fn collect_report(&mut self) {
        if !self.awaiting_report {
            return;
        }
        match self.world.get_resource::<SpawnTrigger>() {
            Some(SpawnTrigger::Pending(_)) => {}
            Some(SpawnTrigger::Consumed(report)) => {
                self.spawned.extend_from_slice(&report.instances);
                self.awaiting_report = false;
            }
            Some(SpawnTrigger::Rejected(_)) | None => self.awaiting_report = false,
        }
    }

    /// Advance `ticks` fixed steps.
    pub fn run(&mut self, ticks: u64, dt: f32) {
        for _ in 0..ticks {
            self.tick(dt);
        }
        let time = self.world.resource::<WorldTime>();
        debug!(
            "Ran {} ticks, frame {}, elapsed {:.3}s",
            ticks, time.frame_count, time.elapsed
        );
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Every instance spawned through [`Simulation::submit`], in creation order.
    pub fn spawned_instances(&self) -> &[Entity] {
        &self.spawned
    }

    pub fn spawn_trigger(&self) -> Option<&SpawnTrigger> {
        self.world.get_resource::<SpawnTrigger>()
    }

    /// Number of simulated (non-template) animated entities.
    pub fn instance_count(&mut self) -> usize {
        self.world
            .query_filtered::<(), (With<AnimationState>, Without<Prefab>)>()
            .iter(&self.world)
            .count()
    }

    /// Collect position and frame of every simulated instance.
    pub fn frame_snapshot(&mut self) -> FrameSnapshot {
        let mut query = self
            .world
            .query_filtered::<(Entity, &MapPosition, &FrameIndex), Without<Prefab>>();

        let mut instances = Vec::with_capacity(self.spawned.len());
        let mut listed = FxHashSet::default();
        for &entity in &self.spawned {
            if let Ok((_, position, frame)) = query.get(&self.world, entity) {
                instances.push(instance_frame(position, frame));
                listed.insert(entity);
            }
        }

        let mut others: Vec<(Entity, InstanceFrame)> = query
            .iter(&self.world)
            .filter(|(entity, _, _)| !listed.contains(entity))
            .map(|(entity, position, frame)| (entity, instance_frame(position, frame)))
            .collect();
        others.sort_by_key(|(entity, _)| *entity);
        instances.extend(others.into_iter().map(|(_, row)| row));

        let time = self.world.resource::<WorldTime>();
        FrameSnapshot {
            frame_count: time.frame_count,
            elapsed: time.elapsed,
            instances,
        }
    }
}

fn instance_frame(position: &MapPosition, frame: &FrameIndex) -> InstanceFrame {
    InstanceFrame {
        x: position.pos.x,
        y: position.pos.y,
        z: position.pos.z,
        frame: frame.value,
    }
}

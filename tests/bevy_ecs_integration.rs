//! Bevy ECS Integration Tests
//!
//! These tests pin the bevy_ecs behaviours Flipswarm relies on, so an
//! upgrade that changes them fails here first instead of deep inside the
//! spawner or the animation system.
//!
//! # Test Categories
//!
//! 1. **Resources** - Optional resources and run conditions on them
//! 2. **Parallel Queries** - `par_iter_mut` visits every entity exactly once
//! 3. **Commands** - `clone_and_spawn`, ordering of queued operations
//! 4. **Schedules** - Deferred commands applied between ordered systems
//!
//! # Usage
//!
//! ```sh
//! cargo test --test bevy_ecs_integration
//! ```

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;

use flipswarm::simulation::init_task_pool;

// =============================================================================
// Test Components and Resources
// =============================================================================

#[derive(Component, Debug, Clone, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Component, Debug, Clone, PartialEq)]
struct Timer(f32);

/// Marker component used like the crate's Prefab
#[derive(Component, Debug, Clone)]
struct Template;

#[derive(Resource, Debug, Default)]
struct Counter(i32);

#[derive(Resource, Debug, Clone, PartialEq)]
enum Trigger {
    Pending(i32),
    Done,
}

fn increment_counter(mut counter: ResMut<Counter>) {
    counter.0 += 1;
}

fn trigger_pending(trigger: Option<Res<Trigger>>) -> bool {
    trigger.is_some_and(|t| matches!(*t, Trigger::Pending(_)))
}

// =============================================================================
// CATEGORY 1: Resources
// =============================================================================

#[test]
fn run_if_on_missing_optional_resource_is_false() {
    let mut world = World::new();
    world.insert_resource(Counter(0));

    let mut schedule = Schedule::default();
    schedule.add_systems(increment_counter.run_if(trigger_pending));
    schedule.run(&mut world);

    assert_eq!(world.resource::<Counter>().0, 0);
}

#[test]
fn run_if_tracks_resource_variant() {
    let mut world = World::new();
    world.insert_resource(Counter(0));
    world.insert_resource(Trigger::Pending(3));

    fn consume(mut trigger: ResMut<Trigger>, mut counter: ResMut<Counter>) {
        if let Trigger::Pending(n) = *trigger {
            counter.0 += n;
        }
        *trigger = Trigger::Done;
    }

    let mut schedule = Schedule::default();
    schedule.add_systems(consume.run_if(trigger_pending));

    schedule.run(&mut world);
    schedule.run(&mut world);

    assert_eq!(*world.resource::<Trigger>(), Trigger::Done);
    assert_eq!(world.resource::<Counter>().0, 3);
}

// =============================================================================
// CATEGORY 2: Parallel Queries
// =============================================================================

#[test]
fn par_iter_mut_visits_every_entity_once() {
    init_task_pool(0);
    let mut world = World::new();
    let entities: Vec<Entity> = (0..5000).map(|i| world.spawn(Timer(i as f32)).id()).collect();

    let mut state = SystemState::<Query<&mut Timer>>::new(&mut world);
    let mut query = state.get_mut(&mut world);
    query.par_iter_mut().for_each(|mut timer| {
        timer.0 += 1.0;
    });
    state.apply(&mut world);

    for (i, entity) in entities.iter().enumerate() {
        assert_eq!(world.get::<Timer>(*entity).unwrap().0, i as f32 + 1.0);
    }
}

#[test]
fn par_iter_mut_respects_without_filter() {
    init_task_pool(0);
    let mut world = World::new();
    let template = world.spawn((Timer(0.0), Template)).id();
    let instance = world.spawn(Timer(0.0)).id();

    let mut state = SystemState::<Query<&mut Timer, Without<Template>>>::new(&mut world);
    let mut query = state.get_mut(&mut world);
    query.par_iter_mut().for_each(|mut timer| {
        timer.0 = 9.0;
    });

    assert_eq!(world.get::<Timer>(template).unwrap().0, 0.0);
    assert_eq!(world.get::<Timer>(instance).unwrap().0, 9.0);
}

// =============================================================================
// CATEGORY 3: Commands
// =============================================================================

#[test]
fn commands_clone_and_spawn_copies_components() {
    let mut world = World::new();
    let template = world
        .spawn((Position { x: 1.0, y: 2.0 }, Timer(5.0), Template))
        .id();

    let mut state = SystemState::<Commands>::new(&mut world);
    let mut commands = state.get_mut(&mut world);
    let clone = commands.entity(template).clone_and_spawn().id();
    state.apply(&mut world);

    assert_ne!(clone, template);
    assert_eq!(
        world.get::<Position>(clone),
        Some(&Position { x: 1.0, y: 2.0 })
    );
    assert_eq!(world.get::<Timer>(clone), Some(&Timer(5.0)));
    assert!(world.get::<Template>(clone).is_some());
}

#[test]
fn commands_after_clone_override_cloned_values() {
    let mut world = World::new();
    let template = world
        .spawn((Position { x: 1.0, y: 2.0 }, Timer(5.0), Template))
        .id();

    let mut state = SystemState::<Commands>::new(&mut world);
    let mut commands = state.get_mut(&mut world);
    let clone = commands
        .entity(template)
        .clone_and_spawn()
        .remove::<Template>()
        .insert(Timer(42.0))
        .id();
    state.apply(&mut world);

    assert_eq!(world.get::<Timer>(clone), Some(&Timer(42.0)));
    assert!(world.get::<Template>(clone).is_none());
    assert_eq!(world.get::<Timer>(template), Some(&Timer(5.0)));
    assert!(world.get::<Template>(template).is_some());
}

/// Ids reserved through `Commands` are distinct but carry no ordering
/// guarantee, so creation order has to be recorded by the caller.
#[test]
fn commands_reserved_ids_are_distinct_and_keep_their_overrides() {
    let mut world = World::new();
    let template = world.spawn((Timer(0.0), Template)).id();

    let mut state = SystemState::<Commands>::new(&mut world);
    let mut commands = state.get_mut(&mut world);
    let ids: Vec<Entity> = (0..10)
        .map(|i| {
            commands
                .entity(template)
                .clone_and_spawn()
                .insert(Timer(i as f32))
                .id()
        })
        .collect();
    state.apply(&mut world);

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
    assert!(!ids.contains(&template));
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(world.get::<Timer>(*id), Some(&Timer(i as f32)));
    }
}

// =============================================================================
// CATEGORY 4: Schedules
// =============================================================================

#[test]
fn ordered_systems_see_commands_from_earlier_system() {
    let mut world = World::new();

    fn spawn_one(mut commands: Commands) {
        commands.spawn(Timer(0.0));
    }

    fn bump(mut query: Query<&mut Timer>) {
        for mut timer in query.iter_mut() {
            timer.0 += 1.0;
        }
    }

    let mut schedule = Schedule::default();
    schedule.add_systems(spawn_one);
    schedule.add_systems(bump.after(spawn_one));
    schedule.run(&mut world);

    let mut state = SystemState::<Query<&Timer>>::new(&mut world);
    let query = state.get(&world);
    let timer = query.single().unwrap();
    assert_eq!(timer.0, 1.0);
}

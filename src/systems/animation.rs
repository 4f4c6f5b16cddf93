//! Flipbook animation system.
//!
//! Every tick, each entity carrying an [`AnimationState`] and a
//! [`FrameIndex`] advances its own timer and republishes its frame:
//!
//! ```text
//! timer'  = timer + delta * play_speed
//! frame   = floor(timer' mod total_frames)
//! ```
//!
//! The transform reads and writes only the entity's own two components, so
//! the query is walked with [`Query::par_iter_mut`] and batches run on the
//! compute task pool without any synchronization. Template entities
//! ([`Prefab`]) are excluded so their seed values stay untouched.
//!
//! Downstream readers of [`FrameIndex`] must be ordered after
//! [`flipbook_animation`] in the schedule.

use bevy_ecs::prelude::*;

use crate::components::animation::{AnimationState, FrameIndex};
use crate::components::prefab::Prefab;
use crate::resources::worldtime::WorldTime;

/// Advance one entity's flipbook by `delta` seconds.
///
/// `state.total_frames` is validated at creation, so the modulo and floor
/// are total over every reachable input.
#[inline]
pub fn advance_frame(state: &mut AnimationState, frame: &mut FrameIndex, delta: f32) {
    state.timer += delta * state.play_speed;
    let current_frame = state.timer % state.total_frames as f32;
    frame.value = current_frame.floor();
}

/// Advance all animated, non-template entities in parallel.
///
/// Contract
/// - Reads [`WorldTime`] for the already scaled delta.
/// - Mutates [`AnimationState::timer`] and [`FrameIndex::value`] only.
pub fn flipbook_animation(
    mut query: Query<(&mut AnimationState, &mut FrameIndex), Without<Prefab>>,
    time: Res<WorldTime>,
) {
    let delta = time.delta;
    query.par_iter_mut().for_each(|(mut state, mut frame)| {
        advance_frame(&mut state, &mut frame, delta);
    });
}

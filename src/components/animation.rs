//! Flipbook animation components.
//!
//! An animated entity carries two components:
//!
//! - [`AnimationState`] holds the playback parameters and the running timer.
//! - [`FrameIndex`] is the render-facing output: the whole-numbered slice of
//!   an indexed texture to draw this tick.
//!
//! Only [`flipbook_animation`](crate::systems::animation::flipbook_animation)
//! writes either component after creation. The spawner seeds `timer` once so
//! clones of the same template do not animate in lockstep.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// Default playback rate in frames per second.
pub const DEFAULT_PLAY_SPEED: f32 = 12.0;
/// Default loop length in frames.
pub const DEFAULT_TOTAL_FRAMES: i32 = 6;

/// Per-entity flipbook playback state.
///
/// `play_speed` and `total_frames` are fixed at creation; construct through
/// [`AnimationState::new`] so invalid loops never reach the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Component, Serialize, Deserialize)]
pub struct AnimationState {
    /// Frames advanced per second of simulated time.
    pub play_speed: f32,
    /// Length of the animation loop, always >= 1.
    pub total_frames: i32,
    /// Accumulated time scaled by `play_speed`, in frames.
    pub timer: f32,
}

impl AnimationState {
    /// Validate and build a state with `timer` at zero.
    pub fn new(play_speed: f32, total_frames: i32) -> Result<Self, AnimationError> {
        if total_frames < 1 {
            return Err(AnimationError::InvalidTotalFrames(total_frames));
        }
        if !play_speed.is_finite() || play_speed < 0.0 {
            return Err(AnimationError::InvalidPlaySpeed(play_speed));
        }
        Ok(Self {
            play_speed,
            total_frames,
            timer: 0.0,
        })
    }

    /// Builder-style override of the starting timer.
    pub fn with_timer(mut self, timer: f32) -> Self {
        self.timer = timer;
        self
    }

    /// Current frame as a whole-numbered float in `[0, total_frames)`.
    #[inline]
    pub fn frame(&self) -> f32 {
        (self.timer % self.total_frames as f32).floor()
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            play_speed: DEFAULT_PLAY_SPEED,
            total_frames: DEFAULT_TOTAL_FRAMES,
            timer: 0.0,
        }
    }
}

/// Frame index handed to the renderer.
///
/// Float-typed so it can be uploaded as a shader property unchanged, but
/// always holds an integer value in `[0, total_frames)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Component, Serialize, Deserialize)]
pub struct FrameIndex {
    pub value: f32,
}

//! Template (prefab) markers.
//!
//! Entities tagged [`Prefab`] hold initial component values for spawned
//! copies. They are skipped by the animation system and never reach the
//! renderer. The spawner strips the marker from every clone.

use bevy_ecs::prelude::Component;

/// Tag component used to mark template entities.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Prefab;

/// Human-readable template identity, used in diagnostics.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct TemplateName(pub String);

impl TemplateName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

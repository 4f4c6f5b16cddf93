//! Template registry.
//!
//! Maps configuration-facing template names to the [`Prefab`] entities that
//! hold their initial component values. Spawn requests are resolved through
//! this store so a typo in the config surfaces as
//! [`ConfigError::UnknownTemplate`] rather than a dangling entity.
//!
//! [`Prefab`]: crate::components::prefab::Prefab

use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;

use crate::error::ConfigError;

#[derive(Resource, Debug, Default)]
pub struct TemplateStore {
    pub templates: FxHashMap<String, Entity>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entity` under `name`, returning the entity it replaced.
    pub fn insert(&mut self, name: impl Into<String>, entity: Entity) -> Option<Entity> {
        self.templates.insert(name.into(), entity)
    }

    pub fn get(&self, name: &str) -> Option<Entity> {
        self.templates.get(name).copied()
    }

    /// Like [`get`](Self::get) but reports the missing name.
    pub fn resolve(&self, name: &str) -> Result<Entity, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownTemplate(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_reports_unknown_name() {
        let store = TemplateStore::new();
        assert_eq!(
            store.resolve("unit"),
            Err(ConfigError::UnknownTemplate("unit".to_string()))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn insert_replaces_and_returns_previous() {
        let mut world = World::new();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();

        let mut store = TemplateStore::new();
        assert_eq!(store.insert("unit", first), None);
        assert_eq!(store.insert("unit", second), Some(first));
        assert_eq!(store.resolve("unit"), Ok(second));
        assert_eq!(store.len(), 1);
    }
}

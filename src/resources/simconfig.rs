//! Simulation configuration resource.
//!
//! Holds the designer-facing settings that become initial entity state:
//! the flipbook template, the bulk spawn request, and the fixed-step clock.
//! Provides defaults for safe startup and methods to load/save the INI file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [flipbook]
//! name = unit
//! play_speed = 12.0
//! total_frames = 6
//!
//! [spawner]
//! count = 3000
//! area_width = 100.0
//! area_height = 100.0
//!
//! [simulation]
//! ticks = 600
//! fixed_delta = 0.016666668
//! time_scale = 1.0
//! worker_threads = 0
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec2;
use log::info;
use std::path::PathBuf;

use crate::components::animation::{DEFAULT_PLAY_SPEED, DEFAULT_TOTAL_FRAMES};
use crate::resources::spawntrigger::{DEFAULT_SPAWN_AREA, DEFAULT_SPAWN_COUNT};

const DEFAULT_TEMPLATE_NAME: &str = "unit";
const DEFAULT_TICKS: u64 = 600;
const DEFAULT_FIXED_DELTA: f32 = 1.0 / 60.0;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_WORKER_THREADS: usize = 0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Flipbook template settings, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateConfig {
    pub name: String,
    pub play_speed: f32,
    pub total_frames: i32,
}

/// Simulation configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Template name, also the key in the template store.
    pub template_name: String,
    /// Frames per second of the template's flipbook.
    pub play_speed: f32,
    /// Loop length of the template's flipbook.
    pub total_frames: i32,
    /// Number of instances to spawn.
    pub spawn_count: i32,
    /// Full width of the placement area.
    pub area_width: f32,
    /// Full height of the placement area.
    pub area_height: f32,
    /// Ticks the headless runner advances.
    pub ticks: u64,
    /// Seconds per tick.
    pub fixed_delta: f32,
    /// Multiplier applied to every delta.
    pub time_scale: f32,
    /// Compute pool size; 0 lets the pool pick.
    pub worker_threads: usize,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            template_name: DEFAULT_TEMPLATE_NAME.to_string(),
            play_speed: DEFAULT_PLAY_SPEED,
            total_frames: DEFAULT_TOTAL_FRAMES,
            spawn_count: DEFAULT_SPAWN_COUNT,
            area_width: DEFAULT_SPAWN_AREA.x,
            area_height: DEFAULT_SPAWN_AREA.y,
            ticks: DEFAULT_TICKS,
            fixed_delta: DEFAULT_FIXED_DELTA,
            time_scale: DEFAULT_TIME_SCALE,
            worker_threads: DEFAULT_WORKER_THREADS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [flipbook] section
        if let Some(name) = config.get("flipbook", "name") {
            self.template_name = name;
        }
        if let Some(speed) = config.getfloat("flipbook", "play_speed").ok().flatten() {
            self.play_speed = speed as f32;
        }
        if let Some(frames) = config.getint("flipbook", "total_frames").ok().flatten() {
            self.total_frames = frames as i32;
        }

        // [spawner] section
        if let Some(count) = config.getint("spawner", "count").ok().flatten() {
            self.spawn_count = count as i32;
        }
        if let Some(width) = config.getfloat("spawner", "area_width").ok().flatten() {
            self.area_width = width as f32;
        }
        if let Some(height) = config.getfloat("spawner", "area_height").ok().flatten() {
            self.area_height = height as f32;
        }

        // [simulation] section
        if let Some(ticks) = config.getuint("simulation", "ticks").ok().flatten() {
            self.ticks = ticks;
        }
        if let Some(dt) = config.getfloat("simulation", "fixed_delta").ok().flatten() {
            self.fixed_delta = dt as f32;
        }
        if let Some(scale) = config.getfloat("simulation", "time_scale").ok().flatten() {
            self.time_scale = scale as f32;
        }
        if let Some(threads) = config.getuint("simulation", "worker_threads").ok().flatten() {
            self.worker_threads = threads as usize;
        }

        info!(
            "Loaded config: template '{}' ({} frames @ {} fps), spawn {} in {}x{}, {} ticks of {}s",
            self.template_name,
            self.total_frames,
            self.play_speed,
            self.spawn_count,
            self.area_width,
            self.area_height,
            self.ticks,
            self.fixed_delta
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [flipbook] section
        config.set("flipbook", "name", Some(self.template_name.clone()));
        config.set("flipbook", "play_speed", Some(self.play_speed.to_string()));
        config.set("flipbook", "total_frames", Some(self.total_frames.to_string()));

        // [spawner] section
        config.set("spawner", "count", Some(self.spawn_count.to_string()));
        config.set("spawner", "area_width", Some(self.area_width.to_string()));
        config.set("spawner", "area_height", Some(self.area_height.to_string()));

        // [simulation] section
        config.set("simulation", "ticks", Some(self.ticks.to_string()));
        config.set("simulation", "fixed_delta", Some(self.fixed_delta.to_string()));
        config.set("simulation", "time_scale", Some(self.time_scale.to_string()));
        config.set(
            "simulation",
            "worker_threads",
            Some(self.worker_threads.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Flipbook template settings.
    pub fn template(&self) -> TemplateConfig {
        TemplateConfig {
            name: self.template_name.clone(),
            play_speed: self.play_speed,
            total_frames: self.total_frames,
        }
    }

    /// Placement area as full width and height.
    pub fn spawn_area(&self) -> Vec2 {
        Vec2::new(self.area_width, self.area_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "flipswarm-{}-{}-{}.ini",
            tag,
            std::process::id(),
            fastrand::u32(..)
        ))
    }

    #[test]
    fn defaults_match_authoring_defaults() {
        let config = SimConfig::new();
        assert_eq!(config.play_speed, 12.0);
        assert_eq!(config.total_frames, 6);
        assert_eq!(config.spawn_count, 3000);
        assert_eq!(config.spawn_area(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn missing_file_is_an_error_and_keeps_defaults() {
        let mut config = SimConfig::with_path(temp_path("missing"));
        assert!(config.load_from_file().is_err());
        assert_eq!(config.spawn_count, 3000);
    }

    #[test]
    fn save_then_load_restores_values() {
        let path = temp_path("roundtrip");
        let mut written = SimConfig::with_path(&path);
        written.template_name = "slime".to_string();
        written.total_frames = 8;
        written.spawn_count = 42;
        written.area_width = 20.0;
        written.worker_threads = 2;
        written.save_to_file().unwrap();

        let mut loaded = SimConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, written);
    }

    #[test]
    fn partial_file_only_overrides_present_keys() {
        let path = temp_path("partial");
        std::fs::write(&path, "[spawner]\ncount = 10\n").unwrap();

        let mut config = SimConfig::with_path(&path);
        config.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.spawn_count, 10);
        assert_eq!(config.total_frames, 6);
        assert_eq!(config.template_name, "unit");
    }
}

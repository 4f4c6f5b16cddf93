//! ECS resources made available to systems.
//!
//! Overview
//! - `simconfig` – INI-backed settings for the template, the spawn request and the clock
//! - `spawntrigger` – one-shot trigger state for the bulk spawner
//! - `templatestore` – template entities keyed by config-facing names
//! - `worldtime` – simulation time and delta
pub mod simconfig;
pub mod spawntrigger;
pub mod templatestore;
pub mod worldtime;

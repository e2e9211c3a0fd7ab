//! Shared configuration and reference data for the adintel workspace.

pub mod config;
pub mod locations;

pub use config::{load_config, load_config_from_env, ConfigError, IntelConfig};
pub use locations::{find_location_preset, location_presets, LocationPreset, SearchEngine};

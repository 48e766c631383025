// kinetrack_sim/src/simulation/config/mod.rs

//! This module handles loading, merging and validating the scenario
//! configuration from disk and the environment.

pub mod structs;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;
use tracing::info;

use crate::error::{SimError, SimResult};
pub use structs::ScenarioConfig;

/// Environment overrides use this prefix and `__` as the section separator,
/// e.g. `KINETRACK_SIMULATION__SEED=7`.
pub const ENV_PREFIX: &str = "KINETRACK_";

/// Builds the provider stack: built-in defaults, then the TOML file (if any),
/// then the environment.
pub fn scenario_figment(path: Option<&Path>) -> SimResult<Figment> {
    let mut figment = Figment::new();
    if let Some(path) = path {
        if !path.exists() {
            return Err(SimError::ScenarioNotFound(path.to_path_buf()));
        }
        info!("Loading scenario from: {}", path.display());
        figment = figment.merge(Toml::file(path));
    } else {
        info!("No scenario file given, using built-in defaults");
    }
    Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
}

/// Extracts and validates a [`ScenarioConfig`] from a provider stack.
pub fn extract_scenario(figment: &Figment) -> SimResult<ScenarioConfig> {
    let config: ScenarioConfig = figment.extract()?;
    config.validate()?;
    Ok(config)
}

pub fn load_scenario(path: Option<&Path>) -> SimResult<ScenarioConfig> {
    extract_scenario(&scenario_figment(path)?)
}

/// Renders the resolved scenario back to TOML.
pub fn render_scenario(config: &ScenarioConfig) -> SimResult<String> {
    Ok(toml::to_string_pretty(config)?)
}

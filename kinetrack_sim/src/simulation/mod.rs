// kinetrack_sim/src/simulation/mod.rs

pub mod config;
pub mod core;
pub mod pipeline;
pub mod report;
pub mod sampling;
pub mod trajectory;
pub mod utils;

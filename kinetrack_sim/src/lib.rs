// kinetrack_sim/src/lib.rs

// This prelude is for convenience for other files WITHIN the kinetrack_sim crate.
pub mod prelude;

pub mod cli;
pub mod error;
pub mod output;
// This module contains all the simulation-specific logic.
pub mod simulation;

// kinetrack_sim/src/prelude.rs

// Re-export the entire kinetrack_core prelude so you can easily access
// pure types like `StateVector`, `LinearSystemModel`, `filter`, etc.
pub use kinetrack_core::prelude::*;

// Re-export common simulation-specific types for easy access.
pub use crate::error::{SimError, SimResult};
pub use crate::output::{export_csv, write_csv};
pub use crate::simulation::config::{load_scenario, ScenarioConfig};
pub use crate::simulation::core::prng::SimulationRng;
pub use crate::simulation::pipeline::{run_scenario, ScenarioRun};
pub use crate::simulation::report::ErrorReport;
pub use crate::simulation::sampling::GaussianSampler;
pub use crate::simulation::trajectory::{simulate, Trajectory, TrajectorySimulator};

// kinetrack_sim/src/output/mod.rs

//! Hand-off of finished runs to the outside world.

pub mod csv_export;

pub use csv_export::{export_csv, write_csv, CSV_HEADER};

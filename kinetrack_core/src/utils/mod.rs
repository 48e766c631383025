// kinetrack_core/src/utils/mod.rs

pub mod linalg;

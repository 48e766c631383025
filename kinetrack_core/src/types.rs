// kinetrack_core/src/types.rs

use nalgebra::{Matrix2, Matrix2x4, Matrix4, Matrix4x2, Vector2, Vector4};

// --- Core Type Aliases ---
/// `[px, vx, py, vy]`: position and velocity on each axis.
pub type StateVector = Vector4<f64>;
/// `[zx, zy]`: an observed (noisy) position.
pub type Measurement = Vector2<f64>;
pub type StateCovariance = Matrix4<f64>;
pub type TransitionMatrix = Matrix4<f64>;
pub type InnovationCovariance = Matrix2<f64>;
pub type ObservationMatrix = Matrix2x4<f64>;
pub type GainMatrix = Matrix4x2<f64>;

/// Index of each state component inside a [`StateVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateIndex {
    Px = 0,
    Vx = 1,
    Py = 2,
    Vy = 3,
}

impl StateIndex {
    pub fn idx(self) -> usize {
        self as usize
    }
}

/// Extracts the `(x, y)` position from a state vector.
pub fn position_of(state: &StateVector) -> (f64, f64) {
    (state[StateIndex::Px.idx()], state[StateIndex::Py.idx()])
}

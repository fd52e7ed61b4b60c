use crate::error::ModelError;
use crate::neural_network::layer::rows_to_array2;
use crate::neural_network::layer::recurrent_layer::InitialState;
use crate::neural_network::layer::recurrent_layer::lstm_cell::LSTM_GATE_COUNT;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Weight dictionary of one LSTM layer as produced by the training pipeline.
///
/// The four gates are packed along the last axis of `Wi`, `Wh` and `b`
/// in the order input, forget, cell, output.
///
/// # Fields
///
/// - `wi` - Input kernel, (input_dim, 4 * units), stored under `Wi`
/// - `wh` - Recurrent kernel, (units, 4 * units), stored under `Wh`
/// - `b` - Bias, length 4 * units
/// - `state0` - Initial hidden state followed by initial cell state, each of length units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LSTMWeightDict {
    #[serde(rename = "Wi")]
    pub wi: Vec<Vec<f32>>,
    #[serde(rename = "Wh")]
    pub wh: Vec<Vec<f32>>,
    pub b: Vec<f32>,
    pub state0: Vec<Vec<f32>>,
}

/// Shape-checked LSTM weights ready to be assigned to a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LSTMWeights {
    pub kernel: Array2<f32>,
    pub recurrent_kernel: Array2<f32>,
    pub bias: Array1<f32>,
    pub initial_state: InitialState,
}

impl LSTMWeights {
    /// Number of input features
    pub fn input_dim(&self) -> usize {
        self.kernel.nrows()
    }

    /// Number of hidden units
    pub fn units(&self) -> usize {
        self.initial_state.units()
    }
}

impl LSTMWeightDict {
    /// Checks that every entry agrees on input_dim and units and converts the
    /// dictionary into arrays.
    ///
    /// `units` is derived from the column count of `Wi`, which must be a
    /// non-zero multiple of four.
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - Naming the first entry whose shape disagrees
    pub fn validate(&self) -> Result<LSTMWeights, ModelError> {
        let kernel = rows_to_array2("Wi", &self.wi)?;
        let (input_dim, packed) = kernel.dim();
        if input_dim == 0 || packed == 0 || packed % LSTM_GATE_COUNT != 0 {
            return Err(ModelError::ShapeMismatch(format!(
                "'Wi' must be (input_dim, 4 * units) with both non-zero, got {:?}",
                kernel.dim()
            )));
        }
        let units = packed / LSTM_GATE_COUNT;

        let recurrent_kernel = rows_to_array2("Wh", &self.wh)?;
        if recurrent_kernel.dim() != (units, packed) {
            return Err(ModelError::ShapeMismatch(format!(
                "'Wh' expects shape {:?}, got {:?}",
                (units, packed),
                recurrent_kernel.dim()
            )));
        }

        if self.b.len() != packed {
            return Err(ModelError::ShapeMismatch(format!(
                "'b' expects length {}, got {}",
                packed,
                self.b.len()
            )));
        }
        let bias = Array1::from(self.b.clone());

        let (hidden, cell) = match self.state0.as_slice() {
            [hidden, cell] => (hidden, cell),
            other => {
                return Err(ModelError::ShapeMismatch(format!(
                    "'state0' expects 2 arrays (hidden, cell), got {}",
                    other.len()
                )));
            }
        };
        if hidden.len() != units || cell.len() != units {
            return Err(ModelError::ShapeMismatch(format!(
                "'state0' arrays expect length {}, got {} and {}",
                units,
                hidden.len(),
                cell.len()
            )));
        }
        let initial_state =
            InitialState::new(Array1::from(hidden.clone()), Array1::from(cell.clone()))?;

        Ok(LSTMWeights {
            kernel,
            recurrent_kernel,
            bias,
            initial_state,
        })
    }
}

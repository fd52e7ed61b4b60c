use crate::error::{IoError, ModelError};
use crate::neural_network::layer::{array2_to_rows, rows_to_array2};
use crate::neural_network::layer::layer_weight::LSTMGateWeight;
use crate::neural_network::layer::recurrent_layer::GateParameters;
use serde::{Deserialize, Serialize};

/// Serializable representation of a single gate's weights.
///
/// # Fields
///
/// - `kernel` - 2D input kernel matrix stored as nested vectors
/// - `recurrent_kernel` - 2D recurrent kernel matrix stored as nested vectors
/// - `bias` - 2D bias matrix stored as nested vectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableGateWeight {
    pub kernel: Vec<Vec<f32>>,
    pub recurrent_kernel: Vec<Vec<f32>>,
    pub bias: Vec<Vec<f32>>,
}

impl SerializableGateWeight {
    /// Copies a gate's borrowed weights into nested vectors
    pub fn from_gate_weight(weight: &LSTMGateWeight) -> Self {
        Self {
            kernel: array2_to_rows(weight.kernel),
            recurrent_kernel: array2_to_rows(weight.recurrent_kernel),
            bias: array2_to_rows(weight.bias),
        }
    }

    /// Converts back into owned arrays ready for [`crate::neural_network::LSTMCell::set_weights`]
    pub fn to_gate_parameters(&self) -> Result<GateParameters, IoError> {
        let invalid = |e: ModelError| IoError::InvalidModel(e.to_string());
        Ok(GateParameters {
            kernel: rows_to_array2("kernel", &self.kernel).map_err(invalid)?,
            recurrent_kernel: rows_to_array2("recurrent_kernel", &self.recurrent_kernel)
                .map_err(invalid)?,
            bias: rows_to_array2("bias", &self.bias).map_err(invalid)?,
        })
    }
}

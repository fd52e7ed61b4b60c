use crate::error::IoError;
use crate::neural_network::layer::{array2_to_rows, rows_to_array2};
use crate::neural_network::layer::dense::Dense;
use crate::neural_network::layer::layer_weight::DenseLayerWeight;
use crate::neural_network::neural_network_trait::ApplyWeights;
use serde::{Deserialize, Serialize};

/// Serializable representation of Dense layer weights.
///
/// # Fields
///
/// - `weight` - 2D weight matrix stored as nested vectors
/// - `bias` - 2D bias matrix stored as nested vectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableDenseWeight {
    pub weight: Vec<Vec<f32>>,
    pub bias: Vec<Vec<f32>>,
}

impl SerializableDenseWeight {
    /// Copies a dense layer's borrowed weights into nested vectors
    pub fn from_layer_weight(weight: &DenseLayerWeight) -> Self {
        Self {
            weight: array2_to_rows(weight.weight),
            bias: array2_to_rows(weight.bias),
        }
    }
}

impl ApplyWeights<Dense> for SerializableDenseWeight {
    fn apply_to_layer(&self, layer: &mut Dense) -> Result<(), IoError> {
        let invalid = |e: crate::error::ModelError| IoError::InvalidModel(e.to_string());
        let weight_array = rows_to_array2("weight", &self.weight).map_err(invalid)?;
        let bias_array = rows_to_array2("bias", &self.bias).map_err(invalid)?;
        layer.set_weights(weight_array, bias_array).map_err(invalid)
    }
}

use super::serializable_gate_weight::SerializableGateWeight;
use crate::error::IoError;
use crate::neural_network::layer::layer_weight::LSTMLayerWeight;
use crate::neural_network::layer::recurrent_layer::{LSTM, LSTMCell, SeededLSTM};
use crate::neural_network::neural_network_trait::ApplyWeights;
use serde::{Deserialize, Serialize};

/// Serializable representation of LSTM layer weights.
///
/// # Fields
///
/// - `input` - Weights for the input gate
/// - `forget` - Weights for the forget gate
/// - `cell` - Weights for the cell gate
/// - `output` - Weights for the output gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableLSTMWeight {
    pub input: SerializableGateWeight,
    pub forget: SerializableGateWeight,
    pub cell: SerializableGateWeight,
    pub output: SerializableGateWeight,
}

impl SerializableLSTMWeight {
    /// Copies an LSTM layer's borrowed weights into nested vectors
    pub fn from_layer_weight(weight: &LSTMLayerWeight) -> Self {
        Self {
            input: SerializableGateWeight::from_gate_weight(&weight.input),
            forget: SerializableGateWeight::from_gate_weight(&weight.forget),
            cell: SerializableGateWeight::from_gate_weight(&weight.cell),
            output: SerializableGateWeight::from_gate_weight(&weight.output),
        }
    }

    fn apply_to_cell(&self, cell: &mut LSTMCell) -> Result<(), IoError> {
        cell.set_weights(
            self.input.to_gate_parameters()?,
            self.forget.to_gate_parameters()?,
            self.cell.to_gate_parameters()?,
            self.output.to_gate_parameters()?,
        )
        .map_err(|e| IoError::InvalidModel(e.to_string()))
    }
}

impl ApplyWeights<LSTM> for SerializableLSTMWeight {
    fn apply_to_layer(&self, layer: &mut LSTM) -> Result<(), IoError> {
        self.apply_to_cell(layer.cell_mut())
    }
}

impl ApplyWeights<SeededLSTM> for SerializableLSTMWeight {
    fn apply_to_layer(&self, layer: &mut SeededLSTM) -> Result<(), IoError> {
        self.apply_to_cell(layer.cell_mut())
    }
}

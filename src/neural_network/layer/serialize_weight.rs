use crate::error::IoError;
use crate::neural_network::activation::Activation;
use crate::neural_network::layer::dense::Dense;
use crate::neural_network::layer::layer_weight::LayerWeight;
use crate::neural_network::layer::recurrent_layer::{InitialState, LSTM, SeededLSTM};
use crate::neural_network::neural_network_trait::{ApplyWeights, Layer};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Version written into every exported model; loading rejects other versions
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Serializable weight container for all supported layer types.
///
/// # Variants
///
/// - `Dense` - Weights for a Dense layer
/// - `LSTM` - Weights for an LSTM or SeededLSTM layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SerializableLayerWeight {
    Dense(SerializableDenseWeight),
    LSTM(SerializableLSTMWeight),
}

impl SerializableLayerWeight {
    /// Converts a `LayerWeight` reference into an owned serializable weight.
    ///
    /// # Parameters
    ///
    /// - `weight` - Layer weights to convert into a serializable form
    ///
    /// # Returns
    ///
    /// - `SerializableLayerWeight` - Serializable representation of the provided weights
    pub fn from_layer_weight(weight: &LayerWeight) -> Self {
        match weight {
            LayerWeight::Dense(w) => {
                SerializableLayerWeight::Dense(SerializableDenseWeight::from_layer_weight(w))
            }
            LayerWeight::LSTM(w) => {
                SerializableLayerWeight::LSTM(SerializableLSTMWeight::from_layer_weight(w))
            }
        }
    }
}

/// Serializable initial state of a seeded LSTM layer.
///
/// # Fields
///
/// - `hidden` - Initial hidden state, one value per unit
/// - `cell` - Initial cell state, one value per unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableInitialState {
    pub hidden: Vec<f32>,
    pub cell: Vec<f32>,
}

/// Everything needed to rebuild a layer apart from its weights.
///
/// # Variants
///
/// - `SeededLSTM` - An LSTM layer with a fixed initial state
/// - `LSTM` - A standard LSTM layer
/// - `Dense` - A dense layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SerializableLayerConfig {
    SeededLSTM {
        input_dim: usize,
        units: usize,
        return_sequences: bool,
        initial_state: SerializableInitialState,
    },
    LSTM {
        input_dim: usize,
        units: usize,
        return_sequences: bool,
        stateful: bool,
    },
    Dense {
        input_dim: usize,
        output_dim: usize,
        activation: Activation,
    },
}

/// Serializable layer metadata.
///
/// # Fields
///
/// - `layer_type` - Layer type name
/// - `output_shape` - Layer output shape description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub layer_type: String,
    pub output_shape: String,
}

/// Serializable layer with metadata, configuration and weights.
///
/// # Fields
///
/// - `info` - Layer metadata describing type and output shape
/// - `config` - Constructor arguments of the layer
/// - `weights` - Layer weights in a serializable format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableLayer {
    pub info: LayerInfo,
    pub config: SerializableLayerConfig,
    pub weights: SerializableLayerWeight,
}

impl SerializableLayer {
    /// Captures a live layer
    pub fn from_layer(layer: &dyn Layer) -> Self {
        Self {
            info: LayerInfo {
                layer_type: layer.layer_type().to_string(),
                output_shape: layer.output_shape(),
            },
            config: layer.config(),
            weights: SerializableLayerWeight::from_layer_weight(&layer.get_weights()),
        }
    }

    /// Rebuilds the layer described by `config` and applies `weights` to it.
    ///
    /// # Errors
    ///
    /// - `IoError::InvalidModel` - If the configuration is invalid, or the weights
    ///   belong to a different layer type or have the wrong shapes
    pub fn to_layer(&self) -> Result<Box<dyn Layer>, IoError> {
        let invalid = |e: crate::error::ModelError| IoError::InvalidModel(e.to_string());

        match (&self.config, &self.weights) {
            (
                SerializableLayerConfig::SeededLSTM {
                    input_dim,
                    units,
                    return_sequences,
                    initial_state,
                },
                SerializableLayerWeight::LSTM(w),
            ) => {
                let state = InitialState::new(
                    Array1::from(initial_state.hidden.clone()),
                    Array1::from(initial_state.cell.clone()),
                )
                .map_err(invalid)?;
                let mut layer =
                    SeededLSTM::new(*input_dim, *units, state, *return_sequences).map_err(invalid)?;
                w.apply_to_layer(&mut layer)?;
                Ok(Box::new(layer))
            }
            (
                SerializableLayerConfig::LSTM {
                    input_dim,
                    units,
                    return_sequences,
                    stateful,
                },
                SerializableLayerWeight::LSTM(w),
            ) => {
                let mut layer = LSTM::new(*input_dim, *units, *return_sequences)
                    .map_err(invalid)?
                    .with_stateful(*stateful);
                w.apply_to_layer(&mut layer)?;
                Ok(Box::new(layer))
            }
            (
                SerializableLayerConfig::Dense {
                    input_dim,
                    output_dim,
                    activation,
                },
                SerializableLayerWeight::Dense(w),
            ) => {
                let mut layer = Dense::new(*input_dim, *output_dim, *activation).map_err(invalid)?;
                w.apply_to_layer(&mut layer)?;
                Ok(Box::new(layer))
            }
            _ => Err(IoError::InvalidModel(format!(
                "weights stored for layer '{}' do not match its configuration",
                self.info.layer_type
            ))),
        }
    }
}

/// Serializable representation of a Sequential model.
///
/// # Fields
///
/// - `format_version` - Version of this on-disk layout
/// - `layers` - Ordered list of layers with metadata, configuration and weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableSequential {
    pub format_version: u32,
    pub layers: Vec<SerializableLayer>,
}

/// Serializable representation of a Dense layer's weights
pub mod serializable_dense_weight;
/// Serializable representation of a single gate's weights
pub mod serializable_gate_weight;
/// Serializable representation of an LSTM layer's weights
pub mod serializable_lstm_weight;

pub use serializable_dense_weight::*;
pub use serializable_gate_weight::*;
pub use serializable_lstm_weight::*;

use crate::error::{IoError, ModelError};
use crate::neural_network::Tensor;
use crate::neural_network::layer::layer_weight::LayerWeight;
use crate::neural_network::layer::serialize_weight::SerializableLayerConfig;

/// Defines the interface for neural network layers.
///
/// Layers in this crate are inference-only: they own eagerly allocated
/// parameters and expose a forward pass, a description of themselves for
/// summaries, and borrowed access to their weights for export.
pub trait Layer: Send + Sync {
    /// Performs forward propagation through the layer.
    ///
    /// # Parameters
    ///
    /// - `input` - The input tensor to the layer
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - The output tensor after forward computation
    /// - `Err(ModelError)` - If the input shape does not fit the layer
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError>;

    /// Returns the type name of the layer (e.g. "Dense").
    ///
    /// # Returns
    ///
    /// * `&str` - A string slice representing the layer type
    fn layer_type(&self) -> &str {
        "Unknown"
    }

    /// Returns a description of the output shape of the layer.
    ///
    /// # Returns
    ///
    /// - `String` - A string describing the output dimensions
    fn output_shape(&self) -> String {
        "Unknown".to_string()
    }

    /// Number of features the layer expects on its last input axis.
    fn input_dim(&self) -> usize;

    /// Number of features the layer produces on its last output axis.
    fn output_dim(&self) -> usize;

    /// Returns the total number of parameters in the layer.
    fn param_count(&self) -> usize;

    /// Returns a reference to all weights in the layer.
    ///
    /// # Returns
    ///
    /// - `LayerWeight<'_>` - An enum containing references to layer weights:
    ///     - `LayerWeight::Dense` for Dense layers with weight and bias
    ///     - `LayerWeight::LSTM` for LSTM layers with weights for input, forget, cell, and output gates
    fn get_weights(&self) -> LayerWeight<'_>;

    /// Returns everything needed to rebuild this layer, apart from its weights.
    fn config(&self) -> SerializableLayerConfig;

    /// Clears any state the layer carries from one forward call to the next.
    ///
    /// Layers without such state use the default no-op implementation.
    fn reset_states(&mut self) {}
}

/// Trait for applying serialized weights to a specific layer type.
///
/// This trait is implemented by serializable weight structures to apply
/// their contained weights to the corresponding layer type.
///
/// # Type Parameters
///
/// - `L` - The layer type that these weights can be applied to
pub trait ApplyWeights<L> {
    /// Applies the serialized weights to a layer instance.
    ///
    /// # Parameters
    ///
    /// - `layer` - Mutable reference to the layer that will receive the weights
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Weights were successfully applied
    /// - `Err(IoError)` - Weight shape mismatch or conversion error
    fn apply_to_layer(&self, layer: &mut L) -> Result<(), IoError>;
}

use crate::error::ModelError;
use crate::neural_network::{Activation, Dense, SeededLSTM};
use crate::weight_store::{DenseWeightDict, LSTMWeightDict};
use log::debug;
use ndarray::Axis;

/// Builds a seeded LSTM layer from a weight dictionary.
///
/// input_dim and units are derived from the dictionary, the layer is
/// allocated with those shapes, and the packed weights are unpacked into the
/// four gates. `state0` becomes the layer's fixed initial state.
///
/// # Parameters
///
/// - `dict` - The layer's `Wi`, `Wh`, `b` and `state0`
/// - `return_sequences` - Whether the layer outputs every timestep
///
/// # Errors
///
/// - `ModelError::ShapeMismatch` - If the dictionary entries disagree on their shapes
pub fn build_seeded_lstm(
    dict: &LSTMWeightDict,
    return_sequences: bool,
) -> Result<SeededLSTM, ModelError> {
    let weights = dict.validate()?;

    let mut layer = SeededLSTM::new(
        weights.input_dim(),
        weights.units(),
        weights.initial_state.clone(),
        return_sequences,
    )?;
    layer.cell_mut().set_packed_weights(
        weights.kernel.view(),
        weights.recurrent_kernel.view(),
        weights.bias.view(),
    )?;

    debug!(
        "built SeededLSTM: input_dim={}, units={}, return_sequences={}",
        weights.input_dim(),
        weights.units(),
        return_sequences
    );
    Ok(layer)
}

/// Builds a dense layer with linear activation from a weight dictionary.
///
/// # Errors
///
/// - `ModelError::ShapeMismatch` - If `bias` does not have one value per column of `weight`
pub fn build_dense(dict: &DenseWeightDict) -> Result<Dense, ModelError> {
    let weights = dict.validate()?;

    let (input_dim, output_dim) = (weights.input_dim(), weights.output_dim());

    let mut layer = Dense::new(input_dim, output_dim, Activation::Linear)?;
    layer.set_weights(weights.weight, weights.bias.insert_axis(Axis(0)))?;

    debug!("built Dense: input_dim={}, output_dim={}", input_dim, output_dim);
    Ok(layer)
}

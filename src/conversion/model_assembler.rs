use crate::config::ConversionConfig;
use crate::conversion::layer_builder::{build_dense, build_seeded_lstm};
use crate::error::{ConversionError, IoError, ModelError};
use crate::neural_network::{Dense, SeededLSTM, Sequential};
use crate::weight_store::{load_dense_weights, load_lstm_weights};
use log::info;
use std::path::Path;

/// Stacks two recurrent layers and a dense head into a model.
///
/// After stacking, one forward pass over random input of shape
/// (1, 1, input_dim) checks that the layers chain and that the output is
/// (1, output_dim). Any recurrent state is then cleared so the returned model
/// is ready for inference.
///
/// # Parameters
///
/// - `lstm1` - First recurrent layer; should return full sequences
/// - `lstm2` - Second recurrent layer; should return only the last step
/// - `dense` - Output layer
///
/// # Errors
///
/// - `ModelError::ShapeMismatch` - If the layer widths do not chain or the output shape is wrong
/// - `ModelError::InputValidationError` - If a layer rejects the check input
pub fn assemble_model(
    lstm1: SeededLSTM,
    lstm2: SeededLSTM,
    dense: Dense,
) -> Result<Sequential, ModelError> {
    let mut model = Sequential::new();
    model.add(lstm1).add(lstm2).add(dense);

    model.build()?;
    model.reset_states();

    info!(
        "assembled model with {} layers ({:?} -> {:?})",
        model.len(),
        model.input_dim(),
        model.output_dim()
    );
    Ok(model)
}

/// Writes `model` to `dir`, replacing whatever the directory held before
pub fn export_model(model: &Sequential, dir: &Path) -> Result<(), IoError> {
    model.save_to_dir(dir)
}

/// Runs the whole conversion: read the three weight dictionaries, rebuild the
/// layers, assemble the model and export it to `config.output_dir`.
///
/// # Returns
///
/// - `Ok(Sequential)` - The exported model
/// - `Err(ConversionError)` - The first failure, from reading, building or writing
pub fn run_conversion(config: &ConversionConfig) -> Result<Sequential, ConversionError> {
    info!("reading weight dictionaries");
    let lstm1_weights = load_lstm_weights(&config.lstm1_path)?;
    let lstm2_weights = load_lstm_weights(&config.lstm2_path)?;
    let dense_weights = load_dense_weights(&config.dense_path)?;

    info!("building layers");
    let lstm1 = build_seeded_lstm(&lstm1_weights, true)?;
    let lstm2 = build_seeded_lstm(&lstm2_weights, false)?;
    let dense = build_dense(&dense_weights)?;

    let model = assemble_model(lstm1, lstm2, dense)?;

    info!("exporting model to {}", config.output_dir.display());
    export_model(&model, &config.output_dir)?;
    Ok(model)
}

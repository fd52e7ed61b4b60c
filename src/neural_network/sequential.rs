use crate::error::{IoError, ModelError};
use crate::neural_network::layer::layer_weight::LayerWeight;
use crate::neural_network::layer::serialize_weight::{
    MODEL_FORMAT_VERSION, SerializableLayer, SerializableSequential,
};
use crate::neural_network::{Layer, Tensor};
use log::{debug, info, warn};
use ndarray::{Array, Array3};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::StandardNormal;
use serde_json::{from_reader, to_writer_pretty};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

/// Name of the file holding the model inside an export directory
pub const MODEL_FILE_NAME: &str = "model.json";

/// A Sequential neural network model.
///
/// Layers are stacked in order; each layer feeds its output to the next one.
/// The model is used for inference only.
///
/// # Fields
///
/// - `layers` - A vector containing all the layers in the model, stored as boxed trait objects
///
/// # Example
/// ```rust
/// use ndarray::{Array, array};
/// use rl_rnn_convert::neural_network::*;
///
/// let state = InitialState::new(array![0.0, 0.0], array![0.0, 0.0]).unwrap();
///
/// let mut model = Sequential::new();
/// model
///     .add(SeededLSTM::new(4, 2, state, false).unwrap())
///     .add(Dense::new(2, 3, Activation::Linear).unwrap());
///
/// // Run the build check, then clear recurrent state
/// model.build().unwrap();
/// model.reset_states();
///
/// let prediction = model.predict(&Array::ones((1, 6, 4)).into_dyn()).unwrap();
/// assert_eq!(prediction.shape(), &[1, 3]);
/// ```
pub struct Sequential {
    layers: Vec<Box<dyn Layer>>,
}

impl Default for Sequential {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequential {
    /// Creates a new empty Sequential model
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Adds a layer to the model
    ///
    /// Supports method chaining pattern
    ///
    /// # Parameters
    ///
    /// * `layer` - The layer to add to the model
    ///
    /// # Returns
    ///
    /// * `&mut Sequential` - Mutable reference to self for method chaining
    pub fn add<L: 'static + Layer>(&mut self, layer: L) -> &mut Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Adds an already boxed layer to the model
    pub fn add_boxed(&mut self, layer: Box<dyn Layer>) -> &mut Self {
        self.layers.push(layer);
        self
    }

    /// The layers of the model, in order
    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the model has no layers
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of features the first layer expects, if there is one
    pub fn input_dim(&self) -> Option<usize> {
        self.layers.first().map(|layer| layer.input_dim())
    }

    /// Number of features the last layer produces, if there is one
    pub fn output_dim(&self) -> Option<usize> {
        self.layers.last().map(|layer| layer.output_dim())
    }

    /// Generates predictions for the input data
    ///
    /// # Parameters
    ///
    /// * `x` - Input tensor containing data to predict on
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - Tensor containing the model's predictions
    /// - `Err(ModelError)` - If the model is empty, the input is empty, or a layer rejects its input
    pub fn predict(&mut self, x: &Tensor) -> Result<Tensor, ModelError> {
        if self.layers.is_empty() {
            return Err(ModelError::InputValidationError(
                "Layers not specified".to_string(),
            ));
        }

        if x.is_empty() {
            return Err(ModelError::InputValidationError(
                "Input tensor cannot be empty".to_string(),
            ));
        }

        let mut output = x.clone();
        for layer in &mut self.layers {
            output = layer.forward(&output)?;
        }
        Ok(output)
    }

    /// Checks that the layer stack chains and runs one forward pass over
    /// standard-normal input of shape (1, 1, input_dim).
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - The output of the check pass, shaped (1, output_dim)
    /// - `Err(ModelError)` - If the model is empty, two neighbouring layers disagree
    ///   on their feature width, or the output does not have shape (1, output_dim)
    pub fn build(&mut self) -> Result<Tensor, ModelError> {
        let (input_dim, output_dim) = match (self.input_dim(), self.output_dim()) {
            (Some(input_dim), Some(output_dim)) => (input_dim, output_dim),
            _ => {
                return Err(ModelError::InputValidationError(
                    "Layers not specified".to_string(),
                ));
            }
        };

        for pair in self.layers.windows(2) {
            if pair[0].output_dim() != pair[1].input_dim() {
                return Err(ModelError::ShapeMismatch(format!(
                    "{} produces {} features but the following {} expects {}",
                    pair[0].layer_type(),
                    pair[0].output_dim(),
                    pair[1].layer_type(),
                    pair[1].input_dim()
                )));
            }
        }

        let x: Array3<f32> = Array::random((1, 1, input_dim), StandardNormal);
        let output = self.predict(&x.into_dyn())?;

        if output.shape() != [1, output_dim] {
            return Err(ModelError::ShapeMismatch(format!(
                "build check expected output shape [1, {}], got {:?}",
                output_dim,
                output.shape()
            )));
        }

        debug!("build check passed with output shape {:?}", output.shape());
        Ok(output)
    }

    /// Clears any state carried between forward calls by the layers
    pub fn reset_states(&mut self) {
        for layer in &mut self.layers {
            layer.reset_states();
        }
    }

    /// Prints a summary of the model's structure
    ///
    /// Displays each layer's information and parameter statistics in a tabular format
    pub fn summary(&self) {
        let col1_width = 33;
        let col2_width = 24;
        let col3_width = 15;
        println!("Model: \"sequential\"");
        println!(
            "┏{}┳{}┳{}┓",
            "━".repeat(col1_width),
            "━".repeat(col2_width),
            "━".repeat(col3_width)
        );
        println!(
            "┃ {:<31} ┃ {:<22} ┃ {:>13} ┃",
            "Layer (type)", "Output Shape", "Param #"
        );
        println!(
            "┡{}╇{}╇{}┩",
            "━".repeat(col1_width),
            "━".repeat(col2_width),
            "━".repeat(col3_width)
        );

        let mut total_params: usize = 0;
        for (i, layer) in self.layers.iter().enumerate() {
            // First layer is named "Layer", then "Layer_1", "Layer_2", etc.
            let layer_name = if i == 0 {
                "Layer".to_string()
            } else {
                format!("Layer_{}", i)
            };
            let param_count = layer.param_count();
            total_params += param_count;

            println!(
                "│ {:<31} │ {:<22} │ {:>13} │",
                format!("{} ({})", layer_name, layer.layer_type()),
                layer.output_shape(),
                param_count
            );
        }
        println!(
            "└{}┴{}┴{}┘",
            "─".repeat(col1_width),
            "─".repeat(col2_width),
            "─".repeat(col3_width)
        );
        println!(" Total params: {} ({} B)", total_params, total_params * 4); // f32, 4 bytes each
    }

    /// Returns all the weights from each layer in the model.
    ///
    /// # Returns
    ///
    /// * `Vec<LayerWeight>` - A vector containing weight references for each layer in the model
    pub fn get_weights(&self) -> Vec<LayerWeight<'_>> {
        self.layers.iter().map(|layer| layer.get_weights()).collect()
    }

    /// Captures the whole model in its serializable form
    pub fn to_serializable(&self) -> SerializableSequential {
        SerializableSequential {
            format_version: MODEL_FORMAT_VERSION,
            layers: self
                .layers
                .iter()
                .map(|layer| SerializableLayer::from_layer(layer.as_ref()))
                .collect(),
        }
    }

    /// Rebuilds a model from its serializable form
    ///
    /// # Errors
    ///
    /// - `IoError::InvalidModel` - If the format version is unknown or a layer cannot be rebuilt
    pub fn from_serializable(model: &SerializableSequential) -> Result<Self, IoError> {
        if model.format_version != MODEL_FORMAT_VERSION {
            return Err(IoError::InvalidModel(format!(
                "unsupported model format version {} (expected {})",
                model.format_version, MODEL_FORMAT_VERSION
            )));
        }

        let mut sequential = Sequential::new();
        for layer in &model.layers {
            sequential.add_boxed(layer.to_layer()?);
        }
        Ok(sequential)
    }

    /// Exports the model architecture and weights into `dir`.
    ///
    /// The directory is replaced as a whole: if it already exists it is
    /// removed first, so only this model is present afterwards.
    ///
    /// # Parameters
    ///
    /// * `dir` - Directory to write the model into (e.g., "models/rl_rnn_2/model")
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Model successfully saved
    /// - `Err(IoError::StdIoError)` - Directory or file operations failed, or `dir` is an
    ///   existing file (kind `NotADirectory`, the file is left untouched)
    /// - `Err(IoError::JsonError)` - Serialization to JSON failed
    pub fn save_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<(), IoError> {
        let dir = dir.as_ref();

        if dir.exists() && !dir.is_dir() {
            return Err(IoError::StdIoError(std::io::Error::new(
                ErrorKind::NotADirectory,
                format!("cannot export into {}: not a directory", dir.display()),
            )));
        }
        if dir.exists() {
            warn!("overwriting existing model at {}", dir.display());
            fs::remove_dir_all(dir).map_err(IoError::StdIoError)?;
        }
        fs::create_dir_all(dir).map_err(IoError::StdIoError)?;

        let file = File::create(dir.join(MODEL_FILE_NAME)).map_err(IoError::StdIoError)?;
        let mut writer = BufWriter::new(file);

        to_writer_pretty(&mut writer, &self.to_serializable()).map_err(IoError::JsonError)?;

        // Ensure all data is written to disk
        writer.flush().map_err(IoError::StdIoError)?;

        info!("saved {} layers to {}", self.layers.len(), dir.display());
        Ok(())
    }

    /// Loads a model previously written by [`Sequential::save_to_dir`].
    ///
    /// The architecture is read from the directory, so no model has to be built beforehand.
    ///
    /// # Returns
    ///
    /// - `Ok(Sequential)` - The reloaded model
    /// - `Err(IoError::FileNotFound)` - The directory has no model file
    /// - `Err(IoError::JsonError)` - Deserialization from JSON failed
    /// - `Err(IoError::InvalidModel)` - The file does not describe a usable model
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, IoError> {
        let path = dir.as_ref().join(MODEL_FILE_NAME);
        let reader = IoError::load_in_buf_reader(&path)?;

        let serializable_model: SerializableSequential =
            from_reader(reader).map_err(IoError::JsonError)?;

        let model = Self::from_serializable(&serializable_model)?;
        info!("loaded {} layers from {}", model.len(), path.display());
        Ok(model)
    }
}

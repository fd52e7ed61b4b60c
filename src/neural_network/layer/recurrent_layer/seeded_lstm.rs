use super::input_validation_function::validate_input_3d;
use super::lstm_cell::LSTMCell;
use super::LSTMState;
use crate::error::ModelError;
use crate::neural_network::layer::layer_weight::LayerWeight;
use crate::neural_network::layer::serialize_weight::{
    SerializableInitialState, SerializableLayerConfig,
};
use crate::neural_network::{Layer, Tensor};
use ndarray::Array1;

/// Fixed starting hidden and cell state for a [`SeededLSTM`].
///
/// Immutable once built: there are getters but no setters.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialState {
    hidden: Array1<f32>,
    cell: Array1<f32>,
}

impl InitialState {
    /// Creates an initial state from per-unit hidden and cell vectors.
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If the two vectors differ in length or are empty
    pub fn new(hidden: Array1<f32>, cell: Array1<f32>) -> Result<Self, ModelError> {
        if hidden.is_empty() || hidden.len() != cell.len() {
            return Err(ModelError::ShapeMismatch(format!(
                "initial hidden and cell state must have the same non-zero length, got {} and {}",
                hidden.len(),
                cell.len()
            )));
        }
        Ok(Self { hidden, cell })
    }

    /// Initial hidden state h0, one value per unit
    pub fn hidden(&self) -> &Array1<f32> {
        &self.hidden
    }

    /// Initial cell state c0, one value per unit
    pub fn cell(&self) -> &Array1<f32> {
        &self.cell
    }

    /// Number of units the state is sized for
    pub fn units(&self) -> usize {
        self.hidden.len()
    }

    /// The state repeated for every row of a batch
    pub fn for_batch(&self, batch: usize) -> LSTMState {
        LSTMState::broadcast(&self.hidden, &self.cell, batch)
    }
}

/// LSTM layer that always starts from a fixed, construction-time state.
///
/// The layer wraps a standard [`LSTMCell`] and, on every call, feeds it the
/// seeded constants as the previous hidden and cell state. A state passed in
/// by the caller is discarded and nothing is carried between calls, so two
/// calls with the same input always produce the same output.
///
/// # Fields
///
/// - `cell` - The four-gate cell holding the parameters
/// - `initial_state` - The seeded hidden and cell state
/// - `return_sequences` - Whether to output every timestep or only the last.
///   Every recurrent layer except the last one in a stack should set this.
///
/// # Example
/// ```rust
/// use ndarray::{Array, array};
/// use rl_rnn_convert::neural_network::*;
///
/// let state = InitialState::new(array![0.1, 0.2, 0.3], array![0.0, -0.1, 0.5]).unwrap();
/// let mut lstm = SeededLSTM::new(5, 3, state, true).unwrap();
/// let output = lstm.forward(&Array::ones((1, 4, 5)).into_dyn()).unwrap();
/// assert_eq!(output.shape(), &[1, 4, 3]);
/// ```
pub struct SeededLSTM {
    cell: LSTMCell,
    initial_state: InitialState,
    return_sequences: bool,
}

impl SeededLSTM {
    /// Creates a seeded LSTM layer with randomly initialised gate parameters.
    ///
    /// # Parameters
    ///
    /// - `input_dim` - Number of features per timestep
    /// - `units` - Number of LSTM units
    /// - `initial_state` - State every forward call starts from
    /// - `return_sequences` - Whether to output the full sequence or only the last timestep
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If either dimension is 0
    /// - `ModelError::ShapeMismatch` - If `initial_state` is not sized for `units`
    pub fn new(
        input_dim: usize,
        units: usize,
        initial_state: InitialState,
        return_sequences: bool,
    ) -> Result<Self, ModelError> {
        let cell = LSTMCell::new(input_dim, units)?;
        if initial_state.units() != units {
            return Err(ModelError::ShapeMismatch(format!(
                "initial state has {} units, layer has {}",
                initial_state.units(),
                units
            )));
        }
        Ok(Self {
            cell,
            initial_state,
            return_sequences,
        })
    }

    /// The cell holding this layer's parameters
    pub fn cell(&self) -> &LSTMCell {
        &self.cell
    }

    /// Mutable access to the cell, used to assign weights
    pub fn cell_mut(&mut self) -> &mut LSTMCell {
        &mut self.cell
    }

    /// The seeded starting state
    pub fn initial_state(&self) -> &InitialState {
        &self.initial_state
    }

    /// Whether the layer outputs every timestep
    pub fn return_sequences(&self) -> bool {
        self.return_sequences
    }

    /// Same signature as [`super::LSTM::forward_with_state`]; the state argument is ignored.
    pub fn forward_with_state(
        &mut self,
        input: &Tensor,
        _initial_state: Option<&LSTMState>,
    ) -> Result<Tensor, ModelError> {
        let x3 = validate_input_3d(input, self.cell.input_dim())?;
        let start = self.initial_state.for_batch(x3.shape()[0]);
        let (output, _) = self.cell.run(x3, start, self.return_sequences);
        Ok(output)
    }
}

impl Layer for SeededLSTM {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        self.forward_with_state(input, None)
    }

    fn layer_type(&self) -> &str {
        "SeededLSTM"
    }

    fn output_shape(&self) -> String {
        if self.return_sequences {
            format!("(None, None, {})", self.cell.units())
        } else {
            format!("(None, {})", self.cell.units())
        }
    }

    fn input_dim(&self) -> usize {
        self.cell.input_dim()
    }

    fn output_dim(&self) -> usize {
        self.cell.units()
    }

    fn param_count(&self) -> usize {
        self.cell.param_count()
    }

    fn get_weights(&self) -> LayerWeight<'_> {
        LayerWeight::LSTM(self.cell.weights())
    }

    fn config(&self) -> SerializableLayerConfig {
        SerializableLayerConfig::SeededLSTM {
            input_dim: self.cell.input_dim(),
            units: self.cell.units(),
            return_sequences: self.return_sequences,
            initial_state: SerializableInitialState {
                hidden: self.initial_state.hidden().to_vec(),
                cell: self.initial_state.cell().to_vec(),
            },
        }
    }
}

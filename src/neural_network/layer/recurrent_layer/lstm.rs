use super::input_validation_function::{validate_input_3d, validate_state};
use super::lstm_cell::LSTMCell;
use super::LSTMState;
use crate::error::ModelError;
use crate::neural_network::layer::layer_weight::LayerWeight;
use crate::neural_network::layer::serialize_weight::SerializableLayerConfig;
use crate::neural_network::{Layer, Tensor};

/// Long Short-Term Memory (LSTM) layer with the usual initial-state behaviour
///
/// Each forward call starts from one of, in order of precedence:
/// - a state passed to [`LSTM::forward_with_state`];
/// - the state left by the previous call, when the layer is `stateful` and the batch size matches;
/// - zeros.
///
/// # Fields
///
/// - `cell` - The four-gate cell holding the parameters
/// - `return_sequences` - Whether to output every timestep (batch, timesteps, units) or only the last (batch, units)
/// - `stateful` - Whether the final state of one call seeds the next
/// - `carried_state` - State left by the previous call when `stateful`
///
/// # Example
/// ```rust
/// use ndarray::Array;
/// use rl_rnn_convert::neural_network::*;
///
/// let mut lstm = LSTM::new(4, 3, false).unwrap();
/// let output = lstm.forward(&Array::ones((2, 5, 4)).into_dyn()).unwrap();
/// assert_eq!(output.shape(), &[2, 3]);
/// ```
pub struct LSTM {
    cell: LSTMCell,
    return_sequences: bool,
    stateful: bool,
    carried_state: Option<LSTMState>,
}

impl LSTM {
    /// Creates a new LSTM layer with randomly initialised parameters
    ///
    /// # Parameters
    ///
    /// - `input_dim` - Number of features per timestep
    /// - `units` - Number of LSTM units (determines output dimensionality)
    /// - `return_sequences` - Whether to output the full sequence or only the last timestep
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If either dimension is 0
    pub fn new(input_dim: usize, units: usize, return_sequences: bool) -> Result<Self, ModelError> {
        Ok(Self {
            cell: LSTMCell::new(input_dim, units)?,
            return_sequences,
            stateful: false,
            carried_state: None,
        })
    }

    /// Makes the layer carry its final state into the next forward call
    pub fn with_stateful(mut self, stateful: bool) -> Self {
        self.stateful = stateful;
        self
    }

    /// The cell holding this layer's parameters
    pub fn cell(&self) -> &LSTMCell {
        &self.cell
    }

    /// Mutable access to the cell, used to assign weights
    pub fn cell_mut(&mut self) -> &mut LSTMCell {
        &mut self.cell
    }

    /// Whether the layer outputs every timestep
    pub fn return_sequences(&self) -> bool {
        self.return_sequences
    }

    /// Whether the layer carries state between calls
    pub fn is_stateful(&self) -> bool {
        self.stateful
    }

    /// State left by the previous call, if the layer is stateful
    pub fn carried_state(&self) -> Option<&LSTMState> {
        self.carried_state.as_ref()
    }

    /// Runs the layer starting from `initial_state` when given.
    ///
    /// # Parameters
    ///
    /// - `input` - Input with shape (batch, timesteps, input_dim)
    /// - `initial_state` - Optional starting state with shape (batch, units)
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If the input is not (batch, timesteps, input_dim)
    /// - `ModelError::ShapeMismatch` - If `initial_state` does not match (batch, units)
    pub fn forward_with_state(
        &mut self,
        input: &Tensor,
        initial_state: Option<&LSTMState>,
    ) -> Result<Tensor, ModelError> {
        let x3 = validate_input_3d(input, self.cell.input_dim())?;
        let batch = x3.shape()[0];
        let units = self.cell.units();

        let start = match initial_state {
            Some(state) => {
                validate_state(state, batch, units)?;
                state.clone()
            }
            None => match self.carried_state.take() {
                Some(carried) if carried.batch_size() == batch => carried,
                _ => LSTMState::zeros(batch, units),
            },
        };

        let (output, final_state) = self.cell.run(x3, start, self.return_sequences);

        if self.stateful {
            self.carried_state = Some(final_state);
        }

        Ok(output)
    }
}

impl Layer for LSTM {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        self.forward_with_state(input, None)
    }

    fn layer_type(&self) -> &str {
        "LSTM"
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
        SerializableLayerConfig::LSTM {
            input_dim: self.cell.input_dim(),
            units: self.cell.units(),
            return_sequences: self.return_sequences,
            stateful: self.stateful,
        }
    }

    fn reset_states(&mut self) {
        self.carried_state = None;
    }
}

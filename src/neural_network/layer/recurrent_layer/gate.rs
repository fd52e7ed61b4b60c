use super::input_validation_function::validate_recurrent_dimensions;
use crate::error::ModelError;
use crate::neural_network::layer::check_parameter_shape;
use crate::neural_network::layer::layer_weight::LSTMGateWeight;
use ndarray::{Array, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;

/// Gate parameters for recurrent cells.
///
/// # Fields
///
/// - `kernel` - Weight matrix for input connections with shape (input_dim, units)
/// - `recurrent_kernel` - Weight matrix for recurrent connections with shape (units, units)
/// - `bias` - Bias vector with shape (1, units)
pub struct Gate {
    pub kernel: Array2<f32>,
    pub recurrent_kernel: Array2<f32>,
    pub bias: Array2<f32>,
}

/// Owned parameters for one gate, used to replace a gate's weights.
///
/// # Fields
///
/// - `kernel` - Weight matrix for input connections with shape (input_dim, units)
/// - `recurrent_kernel` - Weight matrix for recurrent connections with shape (units, units)
/// - `bias` - Bias vector with shape (1, units)
#[derive(Debug, Clone, PartialEq)]
pub struct GateParameters {
    pub kernel: Array2<f32>,
    pub recurrent_kernel: Array2<f32>,
    pub bias: Array2<f32>,
}

impl Gate {
    /// Creates a gate with randomly initialized weights.
    ///
    /// Uses Xavier/Glorot initialization for the input kernel, a column-normalized
    /// random initialization for the recurrent kernel, and a constant bias value.
    ///
    /// # Parameters
    ///
    /// - `input_dim` - Dimensionality of the input features
    /// - `units` - Number of units (neurons) in this gate
    /// - `bias_init_value` - Initial value for bias (0.0 for most gates, 1.0 for LSTM forget gate)
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If `input_dim` or `units` is 0
    pub fn new(input_dim: usize, units: usize, bias_init_value: f32) -> Result<Self, ModelError> {
        validate_recurrent_dimensions(input_dim, units)?;

        // Xavier/Glorot initialization for input kernel
        let limit = (6.0 / (input_dim + units) as f32).sqrt();
        let kernel: Array2<f32> = Array::random((input_dim, units), Uniform::new(-limit, limit));

        // Normalize each column of the recurrent kernel
        let mut recurrent_kernel: Array2<f32> =
            Array::random((units, units), Uniform::new(-1.0f32, 1.0f32));
        for mut col in recurrent_kernel.columns_mut() {
            let norm = col.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 1e-8 {
                col /= norm;
            }
        }

        let bias = Array::from_elem((1, units), bias_init_value);

        Ok(Self {
            kernel,
            recurrent_kernel,
            bias,
        })
    }

    /// Checks that `params` fits the shapes allocated for this gate
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - Naming the first parameter whose shape differs
    pub fn check(&self, gate_name: &str, params: &GateParameters) -> Result<(), ModelError> {
        check_parameter_shape(
            &format!("{} gate kernel", gate_name),
            &params.kernel,
            self.kernel.dim(),
        )?;
        check_parameter_shape(
            &format!("{} gate recurrent kernel", gate_name),
            &params.recurrent_kernel,
            self.recurrent_kernel.dim(),
        )?;
        check_parameter_shape(
            &format!("{} gate bias", gate_name),
            &params.bias,
            self.bias.dim(),
        )?;
        Ok(())
    }

    /// Replaces this gate's parameters; callers run [`Gate::check`] first
    pub fn assign(&mut self, params: GateParameters) {
        self.kernel = params.kernel;
        self.recurrent_kernel = params.recurrent_kernel;
        self.bias = params.bias;
    }

    /// Borrowed view of this gate's parameters
    pub fn weights(&self) -> LSTMGateWeight<'_> {
        LSTMGateWeight {
            kernel: &self.kernel,
            recurrent_kernel: &self.recurrent_kernel,
            bias: &self.bias,
        }
    }
}

/// Computes gate value: x_t @ kernel + h_prev @ recurrent_kernel + bias
///
/// # Parameters
///
/// - `gate` - Gate parameters used for the computation
/// - `x_t` - Input at the current timestep with shape (batch, input_dim)
/// - `h_prev` - Previous hidden state with shape (batch, units)
///
/// # Returns
///
/// - `Array2<f32>` - Pre-activation gate values with shape (batch, units)
#[inline]
pub fn compute_gate_value(gate: &Gate, x_t: &Array2<f32>, h_prev: &Array2<f32>) -> Array2<f32> {
    x_t.dot(&gate.kernel) + h_prev.dot(&gate.recurrent_kernel) + &gate.bias
}

use super::LSTMState;
use super::gate::{Gate, GateParameters, compute_gate_value};
use super::input_validation_function::validate_recurrent_dimensions;
use crate::error::ModelError;
use crate::neural_network::activation::{sigmoid, stable_tanh};
use crate::neural_network::layer::layer_weight::LSTMLayerWeight;
use crate::neural_network::Tensor;
use ndarray::{Array2, Array3, ArrayView1, ArrayView2, ArrayView3, Axis, s};

/// Threshold for using parallel computation in the LSTM cell.
/// When batch_size * units < this value, the four gates are evaluated sequentially.
/// When batch_size * units >= this value, they are evaluated with `rayon::join`.
const LSTM_PARALLEL_THRESHOLD: usize = 1024;

/// Number of gates packed side by side in the kernel, recurrent kernel and bias
pub const LSTM_GATE_COUNT: usize = 4;

/// Long Short-Term Memory cell
///
/// The cell owns the parameters of the four gates and computes a single
/// timestep. It holds no state of its own: the layers that wrap it decide
/// where each sequence starts.
///
/// # Mathematical Operations
///
/// For each timestep t:
/// 1. i_t = σ(x_t · W_i + h_{t-1} · U_i + b_i)  (Input gate)
/// 2. f_t = σ(x_t · W_f + h_{t-1} · U_f + b_f)  (Forget gate)
/// 3. g_t = tanh(x_t · W_g + h_{t-1} · U_g + b_g)  (Cell gate)
/// 4. o_t = σ(x_t · W_o + h_{t-1} · U_o + b_o)  (Output gate)
/// 5. C_t = f_t ⊙ C_{t-1} + i_t ⊙ g_t  (Cell state update)
/// 6. h_t = o_t ⊙ tanh(C_t)  (Hidden state update)
///
/// # Fields
///
/// - `input_dim` - Dimensionality of input features
/// - `units` - Number of LSTM units in the cell
/// - `input_gate` - Gate controlling what new information to store in cell state
/// - `forget_gate` - Gate controlling what information to discard from cell state
/// - `cell_gate` - Gate proposing new candidate values for cell state
/// - `output_gate` - Gate controlling what to output from cell state
pub struct LSTMCell {
    input_dim: usize,
    units: usize,
    input_gate: Gate,
    forget_gate: Gate,
    cell_gate: Gate,
    output_gate: Gate,
}

impl LSTMCell {
    /// Creates a cell with all gate parameters allocated and randomly initialised.
    ///
    /// # Parameters
    ///
    /// - `input_dim` - Number of features per timestep
    /// - `units` - Number of hidden units
    ///
    /// # Errors
    ///
    /// - `ModelError::InputValidationError` - If either dimension is 0
    pub fn new(input_dim: usize, units: usize) -> Result<Self, ModelError> {
        validate_recurrent_dimensions(input_dim, units)?;
        Ok(Self {
            input_dim,
            units,
            input_gate: Gate::new(input_dim, units, 0.0)?,
            forget_gate: Gate::new(input_dim, units, 1.0)?, // forget gate bias = 1.0
            cell_gate: Gate::new(input_dim, units, 0.0)?,
            output_gate: Gate::new(input_dim, units, 0.0)?,
        })
    }

    /// Number of features per timestep
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Number of hidden units
    pub fn units(&self) -> usize {
        self.units
    }

    /// Replaces the parameters of all four gates.
    ///
    /// All shapes are checked before anything is assigned, so a failed call
    /// leaves the cell unchanged.
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If any array differs from the allocated shape
    pub fn set_weights(
        &mut self,
        input: GateParameters,
        forget: GateParameters,
        cell: GateParameters,
        output: GateParameters,
    ) -> Result<(), ModelError> {
        self.input_gate.check("input", &input)?;
        self.forget_gate.check("forget", &forget)?;
        self.cell_gate.check("cell", &cell)?;
        self.output_gate.check("output", &output)?;

        self.input_gate.assign(input);
        self.forget_gate.assign(forget);
        self.cell_gate.assign(cell);
        self.output_gate.assign(output);
        Ok(())
    }

    /// Replaces the gate parameters from packed arrays.
    ///
    /// The packed layout concatenates the four gates along the last axis in
    /// the order input, forget, cell, output.
    ///
    /// # Parameters
    ///
    /// - `kernel` - Shape (input_dim, 4 * units)
    /// - `recurrent_kernel` - Shape (units, 4 * units)
    /// - `bias` - Length 4 * units
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If any packed array has the wrong shape
    pub fn set_packed_weights(
        &mut self,
        kernel: ArrayView2<f32>,
        recurrent_kernel: ArrayView2<f32>,
        bias: ArrayView1<f32>,
    ) -> Result<(), ModelError> {
        let packed = LSTM_GATE_COUNT * self.units;
        if kernel.dim() != (self.input_dim, packed) {
            return Err(ModelError::ShapeMismatch(format!(
                "packed kernel expects shape {:?}, got {:?}",
                (self.input_dim, packed),
                kernel.dim()
            )));
        }
        if recurrent_kernel.dim() != (self.units, packed) {
            return Err(ModelError::ShapeMismatch(format!(
                "packed recurrent kernel expects shape {:?}, got {:?}",
                (self.units, packed),
                recurrent_kernel.dim()
            )));
        }
        if bias.len() != packed {
            return Err(ModelError::ShapeMismatch(format!(
                "packed bias expects length {}, got {}",
                packed,
                bias.len()
            )));
        }

        let units = self.units;
        let unpack = |gate: usize| {
            let cols = gate * units..(gate + 1) * units;
            GateParameters {
                kernel: kernel.slice(s![.., cols.clone()]).to_owned(),
                recurrent_kernel: recurrent_kernel.slice(s![.., cols.clone()]).to_owned(),
                bias: bias.slice(s![cols]).to_owned().insert_axis(Axis(0)),
            }
        };

        self.set_weights(unpack(0), unpack(1), unpack(2), unpack(3))
    }

    /// Computes one timestep.
    ///
    /// # Parameters
    ///
    /// - `x_t` - Input at this timestep with shape (batch, input_dim)
    /// - `h_prev` - Previous hidden state with shape (batch, units)
    /// - `c_prev` - Previous cell state with shape (batch, units)
    ///
    /// # Returns
    ///
    /// - `(h_t, c_t)` - The next hidden state and cell state
    pub fn step(
        &self,
        x_t: &Array2<f32>,
        h_prev: &Array2<f32>,
        c_prev: &Array2<f32>,
    ) -> (Array2<f32>, Array2<f32>) {
        let use_parallel = x_t.nrows() * self.units >= LSTM_PARALLEL_THRESHOLD;

        let (i_raw, f_raw, g_raw, o_raw) = if use_parallel {
            let ((i_raw, f_raw), (g_raw, o_raw)) = rayon::join(
                || {
                    rayon::join(
                        || compute_gate_value(&self.input_gate, x_t, h_prev),
                        || compute_gate_value(&self.forget_gate, x_t, h_prev),
                    )
                },
                || {
                    rayon::join(
                        || compute_gate_value(&self.cell_gate, x_t, h_prev),
                        || compute_gate_value(&self.output_gate, x_t, h_prev),
                    )
                },
            );
            (i_raw, f_raw, g_raw, o_raw)
        } else {
            (
                compute_gate_value(&self.input_gate, x_t, h_prev),
                compute_gate_value(&self.forget_gate, x_t, h_prev),
                compute_gate_value(&self.cell_gate, x_t, h_prev),
                compute_gate_value(&self.output_gate, x_t, h_prev),
            )
        };

        let i_t = i_raw.mapv(sigmoid);
        let f_t = f_raw.mapv(sigmoid);
        let g_t = g_raw.mapv(stable_tanh);
        let o_t = o_raw.mapv(sigmoid);

        // c_t = f_t * c_prev + i_t * g_t
        let c_t = &f_t * c_prev + &i_t * &g_t;
        // h_t = o_t * tanh(c_t)
        let h_t = &o_t * &c_t.mapv(stable_tanh);

        (h_t, c_t)
    }

    /// Runs the cell over every timestep of `input`, starting from `state`.
    ///
    /// # Parameters
    ///
    /// - `input` - Input with shape (batch, timesteps, input_dim)
    /// - `state` - Starting state with shape (batch, units)
    /// - `return_sequences` - Whether to emit every timestep's hidden state or only the last
    ///
    /// # Returns
    ///
    /// - `(Tensor, LSTMState)` - The output, shaped (batch, timesteps, units) or (batch, units),
    ///   and the state after the last timestep
    pub fn run(
        &self,
        input: ArrayView3<f32>,
        state: LSTMState,
        return_sequences: bool,
    ) -> (Tensor, LSTMState) {
        let (batch, timesteps, _) = input.dim();
        let mut h_prev = state.hidden;
        let mut c_prev = state.cell;

        let mut sequence = if return_sequences {
            Some(Array3::<f32>::zeros((batch, timesteps, self.units)))
        } else {
            None
        };

        for t in 0..timesteps {
            let x_t = input.index_axis(Axis(1), t).to_owned(); // (batch, input_dim)
            let (h_t, c_t) = self.step(&x_t, &h_prev, &c_prev);

            if let Some(seq) = sequence.as_mut() {
                seq.index_axis_mut(Axis(1), t).assign(&h_t);
            }

            h_prev = h_t;
            c_prev = c_t;
        }

        let output = match sequence {
            Some(seq) => seq.into_dyn(),
            None => h_prev.clone().into_dyn(),
        };

        (
            output,
            LSTMState {
                hidden: h_prev,
                cell: c_prev,
            },
        )
    }

    /// Number of parameters across all four gates
    pub fn param_count(&self) -> usize {
        LSTM_GATE_COUNT * (self.input_dim * self.units + self.units * self.units + self.units)
    }

    /// Borrowed view of all gate parameters
    pub fn weights(&self) -> LSTMLayerWeight<'_> {
        LSTMLayerWeight {
            input: self.input_gate.weights(),
            forget: self.forget_gate.weights(),
            cell: self.cell_gate.weights(),
            output: self.output_gate.weights(),
        }
    }
}

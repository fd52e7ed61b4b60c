use ndarray::{Array1, Array2};

/// Gate structure for recurrent cell operations
pub mod gate;
/// Input validation functions for Recurrent layers
mod input_validation_function;
/// A standard LSTM layer: zero (or caller-supplied) initial state
pub mod lstm;
/// The four-gate LSTM cell shared by both LSTM layers
pub mod lstm_cell;
/// An LSTM layer whose initial state is fixed at construction
pub mod seeded_lstm;

pub use gate::GateParameters;
pub use lstm::LSTM;
pub use lstm_cell::LSTMCell;
pub use seeded_lstm::{InitialState, SeededLSTM};

/// Hidden and cell state of an LSTM for a whole batch.
///
/// # Fields
///
/// - `hidden` - Hidden state h with shape (batch, units)
/// - `cell` - Cell state c with shape (batch, units)
#[derive(Debug, Clone, PartialEq)]
pub struct LSTMState {
    pub hidden: Array2<f32>,
    pub cell: Array2<f32>,
}

impl LSTMState {
    /// All-zero state, the default starting point of a recurrent layer
    pub fn zeros(batch: usize, units: usize) -> Self {
        Self {
            hidden: Array2::zeros((batch, units)),
            cell: Array2::zeros((batch, units)),
        }
    }

    /// Repeats a single per-unit state across `batch` rows
    pub fn broadcast(hidden: &Array1<f32>, cell: &Array1<f32>, batch: usize) -> Self {
        Self {
            hidden: Array2::from_shape_fn((batch, hidden.len()), |(_, j)| hidden[j]),
            cell: Array2::from_shape_fn((batch, cell.len()), |(_, j)| cell[j]),
        }
    }

    /// Number of rows (batch entries) in this state
    pub fn batch_size(&self) -> usize {
        self.hidden.nrows()
    }
}

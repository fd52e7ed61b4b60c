//! Rebuilds a recurrent network (seeded LSTM, seeded LSTM, Dense) from weight
//! dictionaries exported by a training pipeline, writes it to a
//! self-describing model directory, and reloads it for a smoke test.

/// Error types shared by the whole crate
///
/// - `ModelError` - Raised while building or running layers
/// - `IoError` - Raised while reading weight dictionaries or reading and writing models
/// - `ConversionError` - Either of the above, returned by the end-to-end pipeline
pub mod error;

pub use error::{ConversionError, IoError, ModelError};

/// Fixed input and output locations used by the binaries
pub mod config;

/// Inference-only neural network building blocks.
///
/// # Core Components
///
/// - **Layers**: [`neural_network::Dense`], the standard [`neural_network::LSTM`]
///   and the [`neural_network::SeededLSTM`], whose initial state is fixed at construction
/// - **Model**: [`neural_network::Sequential`] stacks layers, checks that they
///   chain, prints a summary, and saves or loads a model directory
///
/// # Examples
/// ```rust
/// use rl_rnn_convert::neural_network::*;
/// use ndarray::{Array, array};
///
/// let state = InitialState::new(array![0.0, 0.5], array![0.0, -0.5]).unwrap();
///
/// let mut model = Sequential::new();
/// model
///     .add(SeededLSTM::new(3, 2, state, false).unwrap()) // 3 features -> 2 units
///     .add(Dense::new(2, 1, Activation::Linear).unwrap()); // 2 units -> 1 output
///
/// model.summary();
///
/// let prediction = model.predict(&Array::ones((1, 4, 3)).into_dyn()).unwrap();
/// assert_eq!(prediction.shape(), &[1, 1]);
/// ```
pub mod neural_network;

/// Readers for the per-layer weight dictionaries (pickle or JSON)
pub mod weight_store;

/// Turns weight dictionaries into an exported model
pub mod conversion;


/// Commonly used items in one import
pub mod prelude;

/// Module that contains activation function implementations
pub mod activation;
/// Module that contains neural network layer implementations
pub mod layer;
/// Module that contains the traits shared by all layers
pub mod neural_network_trait;
/// Module that contains implementations for sequential model architecture
pub mod sequential;

pub use activation::*;
pub use layer::*;
pub use neural_network_trait::*;
pub use sequential::*;

use ndarray::ArrayD;

/// Type alias for n-dimensional arrays used as tensors in the neural network
pub type Tensor = ArrayD<f32>;

pub use crate::config::*;
pub use crate::conversion::*;
pub use crate::error::{ConversionError, IoError, ModelError};
pub use crate::neural_network::layer::recurrent_layer::*;
pub use crate::neural_network::layer::{Dense, LayerWeight};
pub use crate::neural_network::{Activation, Layer, Sequential, Tensor};
pub use crate::smoke_test::*;
pub use crate::weight_store::*;

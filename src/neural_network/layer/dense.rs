use crate::error::ModelError;
use crate::neural_network::layer::check_parameter_shape;
use crate::neural_network::layer::layer_weight::{DenseLayerWeight, LayerWeight};
use crate::neural_network::layer::serialize_weight::SerializableLayerConfig;
use crate::neural_network::{Activation, Layer, Tensor};
use ndarray::{Array, Array2, Ix2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;

/// Dense (Fully Connected) layer implementation for neural networks.
///
/// This layer performs a linear transformation of the input data using a weight matrix and bias vector,
/// followed by an activation function: output = activation(input * weights + bias).
///
/// Parameters are allocated when the layer is constructed (small uniform weights, zero bias) and are
/// normally replaced right away through [`Dense::set_weights`].
///
/// # Dimensions
///
/// - Input shape: (batch_size, input_dim)
/// - Output shape: (batch_size, output_dim)
///
/// # Fields
///
/// - `input_dim` - Input dimension size
/// - `output_dim` - Output dimension size
/// - `weights` - Weight matrix with shape (input_dim, output_dim)
/// - `bias` - Bias vector with shape (1, output_dim)
/// - `activation` - Activation function for the layer
///
/// # Example
/// ```rust
/// use ndarray::Array;
/// use rl_rnn_convert::neural_network::*;
///
/// let mut dense = Dense::new(5, 2, Activation::Linear).unwrap();
/// let output = dense.forward(&Array::ones((1, 5)).into_dyn()).unwrap();
/// assert_eq!(output.shape(), &[1, 2]);
/// ```
pub struct Dense {
    input_dim: usize,
    output_dim: usize,
    weights: Array2<f32>,
    bias: Array2<f32>,
    activation: Activation,
}

impl Dense {
    /// Creates a new dense layer with freshly initialised parameters.
    ///
    /// # Parameters
    ///
    /// - `input_dim` - Number of input features
    /// - `output_dim` - Number of output features
    /// - `activation` - Activation applied to the affine output
    ///
    /// # Returns
    ///
    /// - `Ok(Dense)` - A new layer with weights of shape (input_dim, output_dim) and a zero bias
    /// - `Err(ModelError::InputValidationError)` - If either dimension is 0
    pub fn new(
        input_dim: usize,
        output_dim: usize,
        activation: Activation,
    ) -> Result<Self, ModelError> {
        if input_dim == 0 || output_dim == 0 {
            return Err(ModelError::InputValidationError(
                "input_dim and output_dim must be greater than 0".to_string(),
            ));
        }

        let weights = Array::random((input_dim, output_dim), Uniform::new(-0.05, 0.05));
        let bias = Array::zeros((1, output_dim));
        Ok(Self {
            input_dim,
            output_dim,
            weights,
            bias,
            activation,
        })
    }

    /// Replaces the weight matrix and bias of this layer.
    ///
    /// # Parameters
    ///
    /// - `weights` - Weight matrix with shape (input_dim, output_dim)
    /// - `bias` - Bias vector with shape (1, output_dim)
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If either array does not match the allocated shape.
    ///   Nothing is assigned in that case.
    pub fn set_weights(&mut self, weights: Array2<f32>, bias: Array2<f32>) -> Result<(), ModelError> {
        check_parameter_shape("Dense weight", &weights, self.weights.dim())?;
        check_parameter_shape("Dense bias", &bias, self.bias.dim())?;
        self.weights = weights;
        self.bias = bias;
        Ok(())
    }

    /// Returns the activation function used by this layer
    pub fn activation(&self) -> Activation {
        self.activation
    }
}

impl Layer for Dense {
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        let input_2d = input
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| {
                ModelError::InputValidationError(format!(
                    "Dense expects a 2D input (batch, {}), got shape {:?}",
                    self.input_dim,
                    input.shape()
                ))
            })?;

        if input_2d.ncols() != self.input_dim {
            return Err(ModelError::InputValidationError(format!(
                "Dense expects {} input features, got {}",
                self.input_dim,
                input_2d.ncols()
            )));
        }

        // ndarray itself will use parallel computation for large products when rayon feature is enabled
        let z = input_2d.dot(&self.weights) + &self.bias;

        Ok(Activation::apply_activation(&z, &self.activation).into_dyn())
    }

    fn layer_type(&self) -> &str {
        "Dense"
    }

    fn output_shape(&self) -> String {
        format!("(None, {})", self.output_dim)
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn param_count(&self) -> usize {
        // Parameter count = number of weight parameters + number of bias parameters
        self.input_dim * self.output_dim + self.output_dim
    }

    fn get_weights(&self) -> LayerWeight<'_> {
        LayerWeight::Dense(DenseLayerWeight {
            weight: &self.weights,
            bias: &self.bias,
        })
    }

    fn config(&self) -> SerializableLayerConfig {
        SerializableLayerConfig::Dense {
            input_dim: self.input_dim,
            output_dim: self.output_dim,
            activation: self.activation,
        }
    }
}

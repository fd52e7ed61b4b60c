use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Activation applied by a dense layer.
///
/// Exported models only ever carry `Linear`; the enum is kept so the model
/// file names the activation explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Linear,
}

impl Activation {
    /// Applies `activation` to the affine output `z`
    ///
    /// # Returns
    ///
    /// * `Array2<f32>` - A new tensor with the activation function applied
    pub fn apply_activation(z: &Array2<f32>, activation: &Activation) -> Array2<f32> {
        match activation {
            Activation::Linear => z.clone(),
        }
    }
}

/// Logistic sigmoid with the input clipped to avoid overflow in `exp`
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    let clipped_x = x.clamp(-500.0, 500.0);
    1.0 / (1.0 + (-clipped_x).exp())
}

/// Hyperbolic tangent with the same input clipping as [`sigmoid`]
#[inline]
pub fn stable_tanh(x: f32) -> f32 {
    x.clamp(-500.0, 500.0).tanh()
}

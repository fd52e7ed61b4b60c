use crate::error::ModelError;
use crate::neural_network::layer::rows_to_array2;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Weight dictionary of a dense layer.
///
/// # Fields
///
/// - `weight` - Kernel with shape (input_dim, output_dim)
/// - `bias` - Bias of length output_dim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseWeightDict {
    pub weight: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

/// Shape-checked dense weights ready to be assigned to a layer.
///
/// # Fields
///
/// - `weight` - Kernel with shape (input_dim, output_dim), both non-zero
/// - `bias` - Bias with one value per output column
#[derive(Debug, Clone, PartialEq)]
pub struct DenseWeights {
    pub weight: Array2<f32>,
    pub bias: Array1<f32>,
}

impl DenseWeights {
    /// Number of input features, the row count of `weight`
    pub fn input_dim(&self) -> usize {
        self.weight.nrows()
    }

    /// Number of output features, the column count of `weight`
    pub fn output_dim(&self) -> usize {
        self.weight.ncols()
    }
}

impl DenseWeightDict {
    /// Converts the dictionary into arrays after checking that `bias` has one
    /// value per output column.
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If `weight` is empty or ragged, or `bias` has the wrong length
    pub fn validate(&self) -> Result<DenseWeights, ModelError> {
        let weight = rows_to_array2("weight", &self.weight)?;
        if weight.nrows() == 0 || weight.ncols() == 0 {
            return Err(ModelError::ShapeMismatch(format!(
                "'weight' must be (input_dim, output_dim) with both non-zero, got {:?}",
                weight.dim()
            )));
        }

        if self.bias.len() != weight.ncols() {
            return Err(ModelError::ShapeMismatch(format!(
                "'bias' expects length {} to match 'weight' {:?}, got {}",
                weight.ncols(),
                weight.dim(),
                self.bias.len()
            )));
        }

        Ok(DenseWeights {
            weight,
            bias: Array1::from(self.bias.clone()),
        })
    }
}

/// Dense (fully connected) layer
pub mod dense;
/// Borrowed views of layer weights
pub mod layer_weight;
/// Recurrent layers: the LSTM cell, the standard LSTM layer and the seeded-state LSTM layer
pub mod recurrent_layer;
/// Serializable layer configurations and weights used by model export
pub mod serialize_weight;

pub use dense::*;
pub use layer_weight::*;
pub use recurrent_layer::*;
pub use serialize_weight::*;

use crate::error::ModelError;
use ndarray::Array2;

/// Checks that `value` has exactly the `expected` shape before it replaces a parameter.
///
/// # Parameters
///
/// - `name` - Parameter name used in the error message
/// - `value` - The incoming array
/// - `expected` - The shape the layer allocated for this parameter
///
/// # Errors
///
/// - `ModelError::ShapeMismatch` - If the shapes differ
pub(crate) fn check_parameter_shape(
    name: &str,
    value: &Array2<f32>,
    expected: (usize, usize),
) -> Result<(), ModelError> {
    if value.dim() != expected {
        return Err(ModelError::ShapeMismatch(format!(
            "{} expects shape {:?}, got {:?}",
            name,
            expected,
            value.dim()
        )));
    }
    Ok(())
}

/// Packs row-major nested lists into a matrix.
///
/// An empty list gives a 0 x 0 matrix. Rows of different lengths are rejected.
///
/// # Errors
///
/// - `ModelError::ShapeMismatch` - If the rows are ragged; `name` identifies the entry
pub(crate) fn rows_to_array2(name: &str, rows: &[Vec<f32>]) -> Result<Array2<f32>, ModelError> {
    let n_cols = rows.first().map_or(0, |row| row.len());

    if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n_cols) {
        return Err(ModelError::ShapeMismatch(format!(
            "'{}' row {} has {} values, expected {}",
            name,
            i,
            row.len(),
            n_cols
        )));
    }

    let flat: Vec<f32> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), n_cols), flat)
        .map_err(|e| ModelError::ShapeMismatch(format!("'{}': {}", name, e)))
}

/// Flattens a matrix into nested rows
pub(crate) fn array2_to_rows(array: &Array2<f32>) -> Vec<Vec<f32>> {
    array.outer_iter().map(|row| row.to_vec()).collect()
}

use crate::error::ModelError;
use crate::neural_network::Tensor;
use crate::neural_network::layer::recurrent_layer::LSTMState;
use ndarray::{ArrayView3, Ix3};

/// Validates that a dimension value is greater than 0
///
/// # Parameters
///
/// - `value` - The dimension value to validate
/// - `name` - The name of the dimension for error messages
///
/// # Returns
///
/// * `Ok(())` if validation passes
/// * `Err(ModelError)` if validation fails
pub(super) fn validate_dimension_greater_than_zero(
    value: usize,
    name: &str,
) -> Result<(), ModelError> {
    if value == 0 {
        return Err(ModelError::InputValidationError(format!(
            "{} must be greater than 0",
            name
        )));
    }
    Ok(())
}

/// Validates input dimensions for recurrent layers
///
/// # Parameters
///
/// - `input_dim` - The input dimension to validate
/// - `units` - The units dimension to validate
pub(super) fn validate_recurrent_dimensions(
    input_dim: usize,
    units: usize,
) -> Result<(), ModelError> {
    validate_dimension_greater_than_zero(input_dim, "input_dim")?;
    validate_dimension_greater_than_zero(units, "units")?;
    Ok(())
}

/// Views a recurrent layer input as (batch, timesteps, features)
///
/// # Parameters
///
/// - `input` - The input tensor to validate
/// - `input_dim` - Number of features the layer expects per timestep
///
/// # Returns
///
/// * `Ok(ArrayView3)` if the tensor is 3D with `input_dim` features and at least one timestep
/// * `Err(ModelError)` otherwise
pub(super) fn validate_input_3d(
    input: &Tensor,
    input_dim: usize,
) -> Result<ArrayView3<'_, f32>, ModelError> {
    let x3 = input.view().into_dimensionality::<Ix3>().map_err(|_| {
        ModelError::InputValidationError(format!(
            "recurrent input must be 3D (batch, timesteps, {}), got shape {:?}",
            input_dim,
            input.shape()
        ))
    })?;

    if x3.shape()[2] != input_dim {
        return Err(ModelError::InputValidationError(format!(
            "recurrent input expects {} features, got {}",
            input_dim,
            x3.shape()[2]
        )));
    }

    if x3.shape()[1] == 0 {
        return Err(ModelError::InputValidationError(
            "recurrent input must contain at least one timestep".to_string(),
        ));
    }

    Ok(x3)
}

/// Validates that a caller-supplied state matches the batch and unit count
pub(super) fn validate_state(
    state: &LSTMState,
    batch: usize,
    units: usize,
) -> Result<(), ModelError> {
    if state.hidden.dim() != (batch, units) || state.cell.dim() != (batch, units) {
        return Err(ModelError::ShapeMismatch(format!(
            "initial state must be ({}, {}), got hidden {:?} and cell {:?}",
            batch,
            units,
            state.hidden.dim(),
            state.cell.dim()
        )));
    }
    Ok(())
}

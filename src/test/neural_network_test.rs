use crate::error::{IoError, ModelError};
use crate::neural_network::*;
use approx::assert_relative_eq;
use ndarray::prelude::*;

mod dense_test;
mod lstm_test;
mod seeded_lstm_test;
mod sequential_test;
mod serialize_weight_test;

/// Small, distinct per-unit values so a seeded start is easy to tell apart from zeros
fn seeded_state(units: usize) -> InitialState {
    let hidden = Array1::from_shape_fn(units, |j| 0.1 * (j as f32 + 1.0));
    let cell = Array1::from_shape_fn(units, |j| -0.2 * (j as f32 + 1.0));
    InitialState::new(hidden, cell).unwrap()
}

/// Deterministic packed (kernel, recurrent kernel, bias) for an LSTM cell
fn packed_weights(input_dim: usize, units: usize) -> (Array2<f32>, Array2<f32>, Array1<f32>) {
    let kernel = Array2::from_shape_fn((input_dim, 4 * units), |(i, j)| {
        ((i * 7 + j * 3) % 11) as f32 * 0.05 - 0.25
    });
    let recurrent_kernel =
        Array2::from_shape_fn((units, 4 * units), |(i, j)| ((i * 5 + j) % 7) as f32 * 0.04 - 0.12);
    let bias = Array1::from_shape_fn(4 * units, |j| (j % 5) as f32 * 0.1 - 0.2);
    (kernel, recurrent_kernel, bias)
}

fn seeded_lstm(input_dim: usize, units: usize, return_sequences: bool) -> SeededLSTM {
    let mut layer =
        SeededLSTM::new(input_dim, units, seeded_state(units), return_sequences).unwrap();
    let (kernel, recurrent_kernel, bias) = packed_weights(input_dim, units);
    layer
        .cell_mut()
        .set_packed_weights(kernel.view(), recurrent_kernel.view(), bias.view())
        .unwrap();
    layer
}

/// Input whose values differ across batch, time and feature
fn ramp_input(batch: usize, timesteps: usize, input_dim: usize) -> Tensor {
    Array3::from_shape_fn((batch, timesteps, input_dim), |(b, t, f)| {
        ((b * 31 + t * 7 + f * 3) % 13) as f32 * 0.1 - 0.6
    })
    .into_dyn()
}

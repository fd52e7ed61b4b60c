use super::*;

fn lstm_with_weights(input_dim: usize, units: usize, return_sequences: bool) -> LSTM {
    let mut layer = LSTM::new(input_dim, units, return_sequences).unwrap();
    let (kernel, recurrent_kernel, bias) = packed_weights(input_dim, units);
    layer
        .cell_mut()
        .set_packed_weights(kernel.view(), recurrent_kernel.view(), bias.view())
        .unwrap();
    layer
}

#[test]
fn test_lstm_layer_basic() {
    // Create input data with batch_size=2, timesteps=5, input_dim=4
    let x = Array::ones((2, 5, 4)).into_dyn();

    let mut last_step = LSTM::new(4, 3, false).unwrap();
    assert_eq!(last_step.forward(&x).unwrap().shape(), &[2, 3]);

    let mut sequences = LSTM::new(4, 3, true).unwrap();
    assert_eq!(sequences.forward(&x).unwrap().shape(), &[2, 5, 3]);
    assert_eq!(sequences.output_shape(), "(None, None, 3)");
}

#[test]
fn test_lstm_param_count() {
    let layer = LSTM::new(4, 3, false).unwrap();
    // 4 gates * (kernel 4*3 + recurrent 3*3 + bias 3)
    assert_eq!(layer.param_count(), 4 * (12 + 9 + 3));
}

#[test]
fn test_lstm_rejects_zero_dimensions() {
    assert!(LSTM::new(0, 3, false).is_err());
    assert!(LSTM::new(4, 0, false).is_err());
}

#[test]
fn test_packed_weights_unpack_in_gate_order() {
    let (input_dim, units) = (3, 2);

    // Fill each gate's block of columns with its position + 1
    let kernel = Array2::from_shape_fn((input_dim, 4 * units), |(_, j)| (j / units + 1) as f32);
    let recurrent_kernel =
        Array2::from_shape_fn((units, 4 * units), |(_, j)| (j / units + 1) as f32 * 10.0);
    let bias = Array1::from_shape_fn(4 * units, |j| (j / units + 1) as f32 * 100.0);

    let mut cell = LSTMCell::new(input_dim, units).unwrap();
    cell.set_packed_weights(kernel.view(), recurrent_kernel.view(), bias.view())
        .unwrap();

    let weights = cell.weights();
    let gates = [
        &weights.input,
        &weights.forget,
        &weights.cell,
        &weights.output,
    ];
    for (position, gate) in gates.iter().enumerate() {
        let value = (position + 1) as f32;
        assert!(gate.kernel.iter().all(|&v| v == value));
        assert!(gate.recurrent_kernel.iter().all(|&v| v == value * 10.0));
        assert!(gate.bias.iter().all(|&v| v == value * 100.0));
        assert_eq!(gate.kernel.dim(), (input_dim, units));
        assert_eq!(gate.recurrent_kernel.dim(), (units, units));
        assert_eq!(gate.bias.dim(), (1, units));
    }
}

#[test]
fn test_packed_weights_shape_mismatch_leaves_cell_unchanged() {
    let mut cell = LSTMCell::new(3, 2).unwrap();
    let before_kernel = cell.weights().input.kernel.clone();

    // Kernel has 7 columns instead of 8
    let result = cell.set_packed_weights(
        Array2::<f32>::zeros((3, 7)).view(),
        Array2::<f32>::zeros((2, 8)).view(),
        Array1::<f32>::zeros(8).view(),
    );
    assert!(matches!(result, Err(ModelError::ShapeMismatch(_))));

    let result = cell.set_packed_weights(
        Array2::<f32>::zeros((3, 8)).view(),
        Array2::<f32>::zeros((2, 8)).view(),
        Array1::<f32>::zeros(6).view(),
    );
    assert!(matches!(result, Err(ModelError::ShapeMismatch(_))));

    assert_eq!(cell.weights().input.kernel, &before_kernel);
}

#[test]
fn test_lstm_stateless_calls_are_independent() {
    let x = ramp_input(2, 3, 4);
    let mut layer = lstm_with_weights(4, 3, false);

    let first = layer.forward(&x).unwrap();
    let second = layer.forward(&x).unwrap();

    assert_eq!(first, second);
    assert!(layer.carried_state().is_none());
}

#[test]
fn test_lstm_stateful_carries_state_until_reset() {
    let x = ramp_input(2, 3, 4);
    let mut layer = lstm_with_weights(4, 3, false).with_stateful(true);
    assert!(layer.is_stateful());

    let first = layer.forward(&x).unwrap();
    assert!(layer.carried_state().is_some());

    // The second call starts from the state left by the first
    let second = layer.forward(&x).unwrap();
    assert_ne!(first, second);

    layer.reset_states();
    assert!(layer.carried_state().is_none());

    let after_reset = layer.forward(&x).unwrap();
    assert_eq!(after_reset, first);
}

#[test]
fn test_lstm_explicit_state() {
    let x = ramp_input(2, 3, 4);
    let mut layer = lstm_with_weights(4, 3, false);

    // An explicit zero state is the same as the default start
    let zeros = LSTMState::zeros(2, 3);
    let with_zeros = layer.forward_with_state(&x, Some(&zeros)).unwrap();
    assert_eq!(with_zeros, layer.forward(&x).unwrap());

    // A non-zero state changes the result
    let seeded = seeded_state(3).for_batch(2);
    let with_seed = layer.forward_with_state(&x, Some(&seeded)).unwrap();
    assert_ne!(with_seed, with_zeros);

    // A state for the wrong batch size is rejected
    let wrong = LSTMState::zeros(3, 3);
    let result = layer.forward_with_state(&x, Some(&wrong));
    assert!(matches!(result, Err(ModelError::ShapeMismatch(_))));
}

#[test]
fn test_lstm_parallel_gates_match_sequential_gates() {
    // batch * units crosses the threshold for parallel gate evaluation
    let (batch, units) = (32, 40);
    let cell = {
        let mut cell = LSTMCell::new(6, units).unwrap();
        let (kernel, recurrent_kernel, bias) = packed_weights(6, units);
        cell.set_packed_weights(kernel.view(), recurrent_kernel.view(), bias.view())
            .unwrap();
        cell
    };

    let x_t = Array2::from_shape_fn((batch, 6), |(b, f)| ((b + f) % 5) as f32 * 0.2 - 0.4);
    let state = LSTMState::zeros(batch, units);
    let (h_all, c_all) = cell.step(&x_t, &state.hidden, &state.cell);

    // Row by row stays below the threshold
    for b in 0..batch {
        let x_row = x_t.slice(s![b..b + 1, ..]).to_owned();
        let (h_row, c_row) = cell.step(
            &x_row,
            &Array2::<f32>::zeros((1, units)),
            &Array2::<f32>::zeros((1, units)),
        );
        for j in 0..units {
            assert_relative_eq!(h_all[[b, j]], h_row[[0, j]], epsilon = 1e-6);
            assert_relative_eq!(c_all[[b, j]], c_row[[0, j]], epsilon = 1e-6);
        }
    }
}

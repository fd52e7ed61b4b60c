use super::*;

#[test]
fn test_seeded_lstm_runs_and_keeps_initial_state() {
    // input_dim=5, units=3, batch_size=2, timesteps=4
    let mut layer = seeded_lstm(5, 3, true);
    let before = layer.initial_state().clone();

    let output = layer.forward(&ramp_input(2, 4, 5)).unwrap();
    assert_eq!(output.shape(), &[2, 4, 3]);

    // The seeded constants are not touched by a forward pass
    assert_eq!(layer.initial_state(), &before);
}

#[test]
fn test_seeded_lstm_last_step_only() {
    let mut layer = seeded_lstm(5, 3, false);
    let output = layer.forward(&ramp_input(2, 4, 5)).unwrap();
    assert_eq!(output.shape(), &[2, 3]);
    assert_eq!(layer.output_shape(), "(None, 3)");
    assert_eq!(layer.layer_type(), "SeededLSTM");
}

#[test]
fn test_seeded_lstm_zero_weights_start_from_seed() {
    // With all parameters zero every gate sees a pre-activation of 0:
    // i = f = o = 0.5 and g = 0, so c1 = 0.5 * c0 and h1 = 0.5 * tanh(c1)
    let units = 3;
    let state = seeded_state(units);
    let mut layer = SeededLSTM::new(5, units, state.clone(), false).unwrap();
    layer
        .cell_mut()
        .set_packed_weights(
            Array2::<f32>::zeros((5, 4 * units)).view(),
            Array2::<f32>::zeros((units, 4 * units)).view(),
            Array1::<f32>::zeros(4 * units).view(),
        )
        .unwrap();

    let output = layer.forward(&ramp_input(2, 1, 5)).unwrap();
    assert_eq!(output.shape(), &[2, units]);

    for b in 0..2 {
        for j in 0..units {
            let c1 = 0.5 * state.cell()[j];
            assert_relative_eq!(output[[b, j]], 0.5 * c1.tanh(), epsilon = 1e-6);
        }
    }
}

#[test]
fn test_seeded_lstm_every_call_starts_from_seed() {
    let first_input = ramp_input(1, 3, 5);
    let second_input = ramp_input(1, 1, 5).mapv(|v| v * -2.0);

    // A layer that has already processed another input...
    let mut used = seeded_lstm(5, 3, false);
    used.forward(&first_input).unwrap();
    let from_used = used.forward(&second_input).unwrap();

    // ...matches a fresh layer with the same weights
    let mut fresh = seeded_lstm(5, 3, false);
    let from_fresh = fresh.forward(&second_input).unwrap();

    assert_eq!(from_used, from_fresh);
}

#[test]
fn test_seeded_lstm_ignores_supplied_state() {
    let x = ramp_input(2, 3, 5);
    let mut layer = seeded_lstm(5, 3, true);

    let expected = layer.forward(&x).unwrap();
    let supplied = LSTMState::zeros(2, 3);
    let output = layer.forward_with_state(&x, Some(&supplied)).unwrap();

    assert_eq!(output, expected);
}

#[test]
fn test_seeded_lstm_initial_state_must_match_units() {
    let result = SeededLSTM::new(5, 3, seeded_state(2), true);
    assert!(matches!(result, Err(ModelError::ShapeMismatch(_))));
}

#[test]
fn test_initial_state_rejects_mismatched_vectors() {
    let result = InitialState::new(array![0.1, 0.2], array![0.1, 0.2, 0.3]);
    assert!(matches!(result, Err(ModelError::ShapeMismatch(_))));

    let empty = InitialState::new(Array1::zeros(0), Array1::zeros(0));
    assert!(empty.is_err());
}

#[test]
fn test_initial_state_broadcast_over_batch() {
    let state = seeded_state(3);
    let batch_state = state.for_batch(4);

    assert_eq!(batch_state.batch_size(), 4);
    for row in batch_state.hidden.rows() {
        assert_eq!(row, state.hidden().view());
    }
    for row in batch_state.cell.rows() {
        assert_eq!(row, state.cell().view());
    }
}

#[test]
fn test_seeded_lstm_rejects_wrong_input() {
    let mut layer = seeded_lstm(5, 3, true);

    // Wrong feature width
    assert!(layer.forward(&ramp_input(1, 2, 4)).is_err());
    // Not 3D
    assert!(layer.forward(&Array2::<f32>::ones((1, 5)).into_dyn()).is_err());
}

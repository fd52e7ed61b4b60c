use super::*;

#[test]
fn test_seeded_lstm_config_carries_initial_state() {
    let layer = seeded_lstm(5, 3, true);

    match layer.config() {
        SerializableLayerConfig::SeededLSTM {
            input_dim,
            units,
            return_sequences,
            initial_state,
        } => {
            assert_eq!((input_dim, units, return_sequences), (5, 3, true));
            assert_eq!(initial_state.hidden, layer.initial_state().hidden().to_vec());
            assert_eq!(initial_state.cell, layer.initial_state().cell().to_vec());
        }
        other => panic!("unexpected config {:?}", other),
    }
}

#[test]
fn test_serializable_layer_round_trip() {
    let mut layer = seeded_lstm(5, 3, false);
    let serializable = SerializableLayer::from_layer(&layer);
    assert_eq!(serializable.info.layer_type, "SeededLSTM");
    assert_eq!(serializable.info.output_shape, "(None, 3)");

    let mut rebuilt = serializable.to_layer().unwrap();
    let x = ramp_input(2, 4, 5);
    assert_eq!(rebuilt.forward(&x).unwrap(), layer.forward(&x).unwrap());
}

#[test]
fn test_stateful_lstm_config_survives() {
    let layer = LSTM::new(4, 2, true).unwrap().with_stateful(true);
    let rebuilt = SerializableLayer::from_layer(&layer).to_layer().unwrap();

    assert_eq!(rebuilt.layer_type(), "LSTM");
    assert_eq!(rebuilt.config(), layer.config());
}

#[test]
fn test_config_and_weights_must_agree() {
    let lstm = seeded_lstm(5, 3, false);
    let dense = Dense::new(3, 2, Activation::Linear).unwrap();

    // Dense weights paired with an LSTM configuration
    let mut mixed = SerializableLayer::from_layer(&lstm);
    mixed.weights = SerializableLayer::from_layer(&dense).weights;

    assert!(matches!(mixed.to_layer(), Err(IoError::InvalidModel(_))));
}

#[test]
fn test_wrong_weight_shapes_are_rejected() {
    let mut serializable = SerializableLayer::from_layer(&Dense::new(3, 2, Activation::Linear).unwrap());
    if let SerializableLayerWeight::Dense(w) = &mut serializable.weights {
        w.bias = vec![vec![0.0, 0.0, 0.0]];
    }

    assert!(matches!(serializable.to_layer(), Err(IoError::InvalidModel(_))));
}

#[test]
fn test_ragged_rows_are_rejected() {
    let mut serializable = SerializableLayer::from_layer(&Dense::new(3, 2, Activation::Linear).unwrap());
    if let SerializableLayerWeight::Dense(w) = &mut serializable.weights {
        w.weight[1].push(1.0);
    }

    assert!(matches!(serializable.to_layer(), Err(IoError::InvalidModel(_))));
}

#[test]
fn test_rows_to_array2() {
    use crate::neural_network::layer::{array2_to_rows, rows_to_array2};

    let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
    let array = rows_to_array2("kernel", &rows).unwrap();
    assert_eq!(array, array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    assert_eq!(array2_to_rows(&array), rows);

    assert_eq!(rows_to_array2("kernel", &[]).unwrap().dim(), (0, 0));

    // The same check serves weight dictionaries and model files
    match rows_to_array2("kernel", &[vec![1.0, 2.0], vec![3.0]]) {
        Err(ModelError::ShapeMismatch(msg)) => {
            assert!(msg.contains("'kernel' row 1"), "unexpected message {}", msg)
        }
        other => panic!("expected ShapeMismatch, got {:?}", other),
    }
}

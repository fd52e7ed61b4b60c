use super::*;

#[test]
fn test_dense_forward_shape() {
    let mut layer = Dense::new(5, 2, Activation::Linear).unwrap();
    let output = layer.forward(&Array::ones((1, 5)).into_dyn()).unwrap();
    assert_eq!(output.shape(), &[1, 2]);
    assert_eq!(layer.param_count(), 5 * 2 + 2);
}

#[test]
fn test_dense_assigned_weights() {
    let mut layer = Dense::new(5, 2, Activation::Linear).unwrap();
    layer
        .set_weights(Array2::ones((5, 2)), array![[0.5, -0.5]])
        .unwrap();

    let output = layer.forward(&Array::ones((1, 5)).into_dyn()).unwrap();
    assert_relative_eq!(output[[0, 0]], 5.5);
    assert_relative_eq!(output[[0, 1]], 4.5);
}

#[test]
fn test_dense_bias_shape_mismatch() {
    let mut layer = Dense::new(5, 2, Activation::Linear).unwrap();
    let before = match layer.get_weights() {
        LayerWeight::Dense(w) => w.weight.clone(),
        _ => panic!("Dense layer should expose dense weights"),
    };

    // Weight is (5, 2) but the bias has 3 values
    let result = layer.set_weights(Array2::ones((5, 2)), Array2::zeros((1, 3)));
    assert!(matches!(result, Err(ModelError::ShapeMismatch(_))));

    // Nothing was assigned
    match layer.get_weights() {
        LayerWeight::Dense(w) => assert_eq!(w.weight, &before),
        _ => panic!("Dense layer should expose dense weights"),
    }
}

#[test]
fn test_dense_rejects_bad_input() {
    let mut layer = Dense::new(5, 2, Activation::Linear).unwrap();

    // Wrong feature count
    assert!(layer.forward(&Array::ones((1, 4)).into_dyn()).is_err());
    // 3D input
    assert!(layer.forward(&Array::ones((1, 1, 5)).into_dyn()).is_err());
}

#[test]
fn test_dense_rejects_zero_dimensions() {
    assert!(matches!(
        Dense::new(0, 2, Activation::Linear),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(Dense::new(5, 0, Activation::Linear).is_err());
}

#[test]
fn test_dense_activation_is_linear_only() {
    let layer = Dense::new(2, 2, Activation::Linear).unwrap();
    let config = serde_json::to_string(&layer.config()).unwrap();
    assert!(config.contains("\"activation\":\"Linear\""));

    // Model files naming any other activation are not accepted
    assert!(serde_json::from_str::<Activation>("\"Linear\"").is_ok());
    assert!(serde_json::from_str::<Activation>("\"ReLU\"").is_err());
    assert!(serde_json::from_str::<Activation>("\"Softmax\"").is_err());
}

use super::*;
use std::fs;
use tempfile::tempdir;

fn three_layer_model() -> Sequential {
    let mut dense = Dense::new(4, 2, Activation::Linear).unwrap();
    dense
        .set_weights(
            Array2::from_shape_fn((4, 2), |(i, j)| (i as f32 - j as f32) * 0.1),
            array![[0.05, -0.05]],
        )
        .unwrap();

    let mut model = Sequential::new();
    model
        .add(seeded_lstm(5, 3, true))
        .add(seeded_lstm(3, 4, false))
        .add(dense);
    model
}

#[test]
fn test_sequential_build_check() {
    let mut model = three_layer_model();
    assert_eq!(model.len(), 3);
    assert_eq!(model.input_dim(), Some(5));
    assert_eq!(model.output_dim(), Some(2));

    let output = model.build().unwrap();
    assert_eq!(output.shape(), &[1, 2]);

    model.summary();
}

#[test]
fn test_sequential_build_rejects_unchained_widths() {
    // LSTM produces 3 features, Dense expects 4
    let mut model = Sequential::new();
    model
        .add(seeded_lstm(5, 3, false))
        .add(Dense::new(4, 2, Activation::Linear).unwrap());

    assert!(matches!(model.build(), Err(ModelError::ShapeMismatch(_))));
}

#[test]
fn test_sequential_build_rejects_missing_return_sequences() {
    // Widths chain, but the first LSTM emits (batch, units) which the second cannot consume
    let mut model = Sequential::new();
    model
        .add(seeded_lstm(5, 3, false))
        .add(seeded_lstm(3, 3, false))
        .add(Dense::new(3, 1, Activation::Linear).unwrap());

    assert!(model.build().is_err());
}

#[test]
fn test_sequential_empty_model() {
    let mut model = Sequential::new();
    assert!(model.is_empty());
    assert!(model.build().is_err());
    assert!(model.predict(&Array::ones((1, 1, 5)).into_dyn()).is_err());
}

#[test]
fn test_sequential_reset_states() {
    let mut layer = LSTM::new(5, 3, false).unwrap().with_stateful(true);
    let (kernel, recurrent_kernel, bias) = packed_weights(5, 3);
    layer
        .cell_mut()
        .set_packed_weights(kernel.view(), recurrent_kernel.view(), bias.view())
        .unwrap();

    let mut model = Sequential::new();
    model.add(layer);

    let x = ramp_input(1, 2, 5);
    let first = model.predict(&x).unwrap();
    let carried = model.predict(&x).unwrap();
    assert_ne!(first, carried);

    model.reset_states();
    assert_eq!(model.predict(&x).unwrap(), first);
}

#[test]
fn test_sequential_save_and_load() {
    let dir = tempdir().unwrap();
    let model_dir = dir.path().join("model");

    let mut model = three_layer_model();
    model.save_to_dir(&model_dir).unwrap();
    assert!(model_dir.join(MODEL_FILE_NAME).is_file());

    let mut loaded = Sequential::load_from_dir(&model_dir).unwrap();
    assert_eq!(loaded.len(), model.len());

    let types: Vec<&str> = loaded.layers().iter().map(|l| l.layer_type()).collect();
    assert_eq!(types, vec!["SeededLSTM", "SeededLSTM", "Dense"]);

    // Same architecture, same weights, same output
    let x = ramp_input(2, 3, 5);
    assert_eq!(loaded.predict(&x).unwrap(), model.predict(&x).unwrap());
    assert_eq!(loaded.to_serializable(), model.to_serializable());
}

#[test]
fn test_sequential_save_replaces_directory() {
    let dir = tempdir().unwrap();
    let model_dir = dir.path().join("model");

    three_layer_model().save_to_dir(&model_dir).unwrap();
    fs::write(model_dir.join("stale.txt"), "left over").unwrap();

    let mut second = Sequential::new();
    second.add(Dense::new(3, 1, Activation::Linear).unwrap());
    second.save_to_dir(&model_dir).unwrap();

    let entries: Vec<String> = fs::read_dir(&model_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec![MODEL_FILE_NAME.to_string()]);

    let loaded = Sequential::load_from_dir(&model_dir).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.input_dim(), Some(3));
}

#[test]
fn test_sequential_load_missing_model() {
    let dir = tempdir().unwrap();
    let result = Sequential::load_from_dir(dir.path());
    assert!(matches!(result, Err(IoError::FileNotFound(_))));
}

#[test]
fn test_sequential_rejects_unknown_format_version() {
    let mut serializable = three_layer_model().to_serializable();
    serializable.format_version += 1;

    let result = Sequential::from_serializable(&serializable);
    assert!(matches!(result, Err(IoError::InvalidModel(_))));
}

#[test]
fn test_sequential_get_weights() {
    let model = three_layer_model();
    let weights = model.get_weights();
    assert_eq!(weights.len(), 3);
    assert!(matches!(weights[0], LayerWeight::LSTM(_)));
    assert!(matches!(weights[2], LayerWeight::Dense(_)));
}

#[test]
fn test_sequential_save_refuses_existing_file() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("model");
    fs::write(&target, "not a model directory").unwrap();

    match three_layer_model().save_to_dir(&target) {
        Err(IoError::StdIoError(e)) => {
            assert_eq!(e.kind(), std::io::ErrorKind::NotADirectory)
        }
        other => panic!("expected a NotADirectory error, got {:?}", other.err()),
    }

    // The file is left as it was
    assert_eq!(fs::read_to_string(&target).unwrap(), "not a model directory");
}

use ndarray::Array3;
use rl_rnn_convert::neural_network::MODEL_FILE_NAME;
use rl_rnn_convert::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn lstm_dict(input_dim: usize, units: usize, scale: f32) -> LSTMWeightDict {
    let row = |r: usize, width: usize| -> Vec<f32> {
        (0..width)
            .map(|c| ((r * 13 + c * 7) % 17) as f32 / 17.0 * scale - scale / 2.0)
            .collect()
    };
    LSTMWeightDict {
        wi: (0..input_dim).map(|r| row(r, 4 * units)).collect(),
        wh: (0..units).map(|r| row(r + input_dim, 4 * units)).collect(),
        b: row(input_dim + units, 4 * units),
        state0: vec![row(1, units), row(2, units)],
    }
}

fn dense_dict(input_dim: usize, output_dim: usize, bias: f32) -> DenseWeightDict {
    DenseWeightDict {
        weight: (0..input_dim)
            .map(|r| (0..output_dim).map(|c| (r + c) as f32 * 0.05).collect())
            .collect(),
        bias: vec![bias; output_dim],
    }
}

/// Writes the three weight dictionaries under `root` and returns a config pointing at them
fn write_inputs(root: &Path, dense: &DenseWeightDict) -> ConversionConfig {
    let tmp = root.join("tmp");
    fs::create_dir_all(&tmp).unwrap();

    let config = ConversionConfig {
        lstm1_path: tmp.join("lstm1.pickle"),
        lstm2_path: tmp.join("lstm2.pickle"),
        dense_path: tmp.join("dense.pickle"),
        output_dir: root.join("rl_rnn_2").join("model"),
    };

    save_weight_dict(&lstm_dict(7, 5, 0.8), &config.lstm1_path).unwrap();
    save_weight_dict(&lstm_dict(5, 4, 0.6), &config.lstm2_path).unwrap();
    save_weight_dict(dense, &config.dense_path).unwrap();
    config
}

#[test]
fn export_and_reload_test() {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = tempdir().unwrap();
    let config = write_inputs(dir.path(), &dense_dict(4, 3, 0.1));

    let mut model = run_conversion(&config).unwrap();
    assert!(config.output_dir.join(MODEL_FILE_NAME).is_file());

    let types: Vec<&str> = model.layers().iter().map(|l| l.layer_type()).collect();
    assert_eq!(types, vec!["SeededLSTM", "SeededLSTM", "Dense"]);

    // The reloaded model gives exactly the same output as the one that was exported
    let mut reloaded = Sequential::load_from_dir(&config.output_dir).unwrap();
    let x = Array3::from_shape_fn((2, 6, 7), |(b, t, f)| (b + t * f) as f32 * 0.01).into_dyn();
    let expected = model.predict(&x).unwrap();
    let actual = reloaded.predict(&x).unwrap();
    assert_eq!(actual.shape(), &[2, 3]);
    assert_eq!(actual, expected);

    let output = smoke_test(&config.output_dir).unwrap();
    assert_eq!(output.shape(), &[1, 3]);
}

#[test]
fn second_export_replaces_first_test() {
    let dir = tempdir().unwrap();

    let first = write_inputs(dir.path(), &dense_dict(4, 3, 0.1));
    run_conversion(&first).unwrap();

    // Same location, different dense head
    let second = write_inputs(dir.path(), &dense_dict(4, 2, -0.3));
    run_conversion(&second).unwrap();

    let entries: Vec<String> = fs::read_dir(&second.output_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec![MODEL_FILE_NAME.to_string()]);

    let reloaded = Sequential::load_from_dir(&second.output_dir).unwrap();
    assert_eq!(reloaded.output_dim(), Some(2));
    match reloaded.layers()[2].get_weights() {
        LayerWeight::Dense(w) => {
            assert!(w.bias.iter().all(|&b| b == -0.3))
        }
        _ => panic!("last layer should be Dense"),
    }
}

#[test]
fn missing_weight_file_test() {
    let dir = tempdir().unwrap();
    let config = write_inputs(dir.path(), &dense_dict(4, 3, 0.1));
    fs::remove_file(&config.lstm2_path).unwrap();

    match run_conversion(&config) {
        Err(ConversionError::Io(IoError::FileNotFound(path))) => {
            assert_eq!(path, config.lstm2_path)
        }
        Err(other) => panic!("expected FileNotFound, got {}", other),
        Ok(_) => panic!("conversion should fail without lstm2"),
    }
    assert!(!config.output_dir.exists());
}

#[test]
fn dense_bias_mismatch_test() {
    let dir = tempdir().unwrap();
    let mut dense = dense_dict(4, 2, 0.0);
    dense.bias.push(0.0);
    let config = write_inputs(dir.path(), &dense);

    assert!(matches!(
        run_conversion(&config),
        Err(ConversionError::Model(ModelError::ShapeMismatch(_)))
    ));
    assert!(!config.output_dir.exists());
}

#[test]
fn smoke_test_without_model_test() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        smoke_test(&dir.path().join("model")),
        Err(ConversionError::Io(IoError::FileNotFound(_)))
    ));
}

#[test]
fn probe_unseeded_stack_test() {
    let width = SmokeTestConfig::default().probe_input_width;
    let shapes = probe_unseeded_stack(width).unwrap();

    assert_eq!(shapes.single_unit, vec![1, 1]);
    assert_eq!(shapes.stacked, vec![1, 6]);
    assert!(probe_unseeded_stack(0).is_err());
}

#[test]
fn default_config_test() {
    let config = ConversionConfig::default();
    assert_eq!(config.lstm1_path, Path::new("models/tmp/lstm1.pickle"));
    assert_eq!(config.lstm2_path, Path::new("models/tmp/lstm2.pickle"));
    assert_eq!(config.dense_path, Path::new("models/tmp/dense.pickle"));
    assert_eq!(config.output_dir, Path::new("models/rl_rnn_2/model"));

    let smoke = SmokeTestConfig::default();
    assert_eq!(smoke.model_dir, config.output_dir);
    assert_eq!(smoke.probe_input_width, 115);
}

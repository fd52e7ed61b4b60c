use std::path::PathBuf;

/// Default location of the first recurrent layer's weight dictionary
pub const DEFAULT_LSTM1_PATH: &str = "models/tmp/lstm1.pickle";
/// Default location of the second recurrent layer's weight dictionary
pub const DEFAULT_LSTM2_PATH: &str = "models/tmp/lstm2.pickle";
/// Default location of the dense layer's weight dictionary
pub const DEFAULT_DENSE_PATH: &str = "models/tmp/dense.pickle";
/// Default export directory
pub const DEFAULT_OUTPUT_DIR: &str = "models/rl_rnn_2/model";
/// Input feature width of the probe layers built by the smoke test
pub const DEFAULT_PROBE_INPUT_WIDTH: usize = 115;

/// Paths used by the conversion pipeline.
///
/// The binaries always run with [`ConversionConfig::default`]; there are no
/// flags or environment variables that change these paths.
///
/// # Fields
///
/// - `lstm1_path` - Weight dictionary of the first recurrent layer (returns full sequences)
/// - `lstm2_path` - Weight dictionary of the second recurrent layer (returns the final step only)
/// - `dense_path` - Weight dictionary of the dense output layer
/// - `output_dir` - Directory the assembled model is exported to
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    pub lstm1_path: PathBuf,
    pub lstm2_path: PathBuf,
    pub dense_path: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            lstm1_path: PathBuf::from(DEFAULT_LSTM1_PATH),
            lstm2_path: PathBuf::from(DEFAULT_LSTM2_PATH),
            dense_path: PathBuf::from(DEFAULT_DENSE_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// Settings for the smoke test harness.
///
/// # Fields
///
/// - `model_dir` - Directory of a previously exported model
/// - `probe_input_width` - Feature width fed to the exploratory probe layers
#[derive(Debug, Clone, PartialEq)]
pub struct SmokeTestConfig {
    pub model_dir: PathBuf,
    pub probe_input_width: usize,
}

impl Default for SmokeTestConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            probe_input_width: DEFAULT_PROBE_INPUT_WIDTH,
        }
    }
}

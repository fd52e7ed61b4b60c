use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Error types that can occur while building or running a model
///
/// # Variants
///
/// - `InputValidationError` - Indicates the input data provided does not meet the expected format, type, or validation rules
/// - `ShapeMismatch` - Indicates a weight array whose shape is incompatible with the parameter it is assigned to
/// - `ProcessingError` - Indicates that something went wrong while processing
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    InputValidationError(String),
    ShapeMismatch(String),
    ProcessingError(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::InputValidationError(msg) => write!(f, "Input validation error: {}", msg),
            ModelError::ShapeMismatch(msg) => write!(f, "Shape mismatch: {}", msg),
            ModelError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}

/// Input/Output error types that can occur while reading weight dictionaries
/// or reading and writing exported models
///
/// # Variants
///
/// - `FileNotFound` - The expected file does not exist
/// - `StdIoError` - Wraps standard I/O errors from file system operations
/// - `JsonError` - Wraps JSON serialization/deserialization errors
/// - `PickleError` - Wraps pickle serialization/deserialization errors
/// - `NumpyPickleError` - A pickle holding numpy arrays could not be decoded
/// - `UnsupportedFormat` - The file extension does not name a known weight format
/// - `InvalidModel` - The file was parsed but does not describe a usable model
#[derive(Debug)]
pub enum IoError {
    FileNotFound(PathBuf),
    StdIoError(std::io::Error),
    JsonError(serde_json::Error),
    PickleError(serde_pickle::Error),
    NumpyPickleError(String),
    UnsupportedFormat(PathBuf),
    InvalidModel(String),
}

impl IoError {
    /// Opens `path` for buffered reading.
    ///
    /// A missing file is reported as `FileNotFound` rather than a bare I/O error.
    pub fn load_in_buf_reader(path: &Path) -> Result<BufReader<File>, IoError> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IoError::FileNotFound(path.to_path_buf())
            } else {
                IoError::StdIoError(e)
            }
        })?;
        Ok(BufReader::new(file))
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::FileNotFound(path) => write!(f, "File not found: {}", path.display()),
            IoError::StdIoError(e) => write!(f, "IO error: {}", e),
            IoError::JsonError(e) => write!(f, "JSON error: {}", e),
            IoError::PickleError(e) => write!(f, "Pickle error: {}", e),
            IoError::NumpyPickleError(msg) => write!(f, "Numpy pickle error: {}", msg),
            IoError::UnsupportedFormat(path) => {
                write!(f, "Unsupported weight file format: {}", path.display())
            }
            IoError::InvalidModel(msg) => write!(f, "Invalid model: {}", msg),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::StdIoError(e) => Some(e),
            IoError::JsonError(e) => Some(e),
            IoError::PickleError(e) => Some(e),
            _ => None,
        }
    }
}

/// Error returned by the conversion pipeline, which touches both the file
/// system and the model.
#[derive(Debug)]
pub enum ConversionError {
    Io(IoError),
    Model(ModelError),
}

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionError::Io(e) => write!(f, "{}", e),
            ConversionError::Model(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ConversionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConversionError::Io(e) => Some(e),
            ConversionError::Model(e) => Some(e),
        }
    }
}

impl From<IoError> for ConversionError {
    fn from(e: IoError) -> Self {
        ConversionError::Io(e)
    }
}

impl From<ModelError> for ConversionError {
    fn from(e: ModelError) -> Self {
        ConversionError::Model(e)
    }
}

use crate::error::IoError;
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_pickle::{DeOptions, SerOptions};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Dense layer weight dictionary and its validated form
pub mod dense_weight_dict;
/// LSTM layer weight dictionary and its validated form
pub mod lstm_weight_dict;
/// Decoder for pickles whose entries are numpy arrays
mod numpy_pickle;

pub use dense_weight_dict::*;
pub use lstm_weight_dict::*;

/// On-disk encodings a weight dictionary can be stored in.
///
/// # Variants
///
/// - `Pickle` - Python pickle, selected by the `.pickle` or `.pkl` extension
/// - `Json` - JSON, selected by the `.json` extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightFormat {
    Pickle,
    Json,
}

impl WeightFormat {
    /// Picks the encoding from the file extension.
    ///
    /// # Errors
    ///
    /// - `IoError::UnsupportedFormat` - If the extension is missing or unknown
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pickle") | Some("pkl") => Ok(WeightFormat::Pickle),
            Some("json") => Ok(WeightFormat::Json),
            _ => Err(IoError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Reads a weight dictionary of any shape from `path`.
///
/// The content is handed back exactly as stored; shape checks are left to
/// the caller (see [`LSTMWeightDict::validate`] and [`DenseWeightDict::validate`]).
///
/// Pickles may hold plain nested lists or numpy arrays. A pickle that
/// references numpy has its arrays rebuilt from their raw buffers; any other
/// pickle goes through `serde-pickle` directly.
///
/// # Parameters
///
/// - `path` - File holding the dictionary; the extension selects the decoder
///
/// # Returns
///
/// - `Ok(T)` - The decoded dictionary
/// - `Err(IoError::FileNotFound)` - The file does not exist
/// - `Err(IoError::UnsupportedFormat)` - The extension is not `.pickle`, `.pkl` or `.json`
/// - `Err(IoError::PickleError)` / `Err(IoError::JsonError)` - The content could not be decoded
/// - `Err(IoError::NumpyPickleError)` - A numpy pickle holds something other than float arrays
pub fn load_weight_dict<T: DeserializeOwned>(path: &Path) -> Result<T, IoError> {
    let format = WeightFormat::from_path(path)?;
    let mut reader = IoError::load_in_buf_reader(path)?;

    let dict = match format {
        WeightFormat::Pickle => {
            let mut bytes = Vec::new();
            reader
                .read_to_end(&mut bytes)
                .map_err(IoError::StdIoError)?;

            if numpy_pickle::references_numpy(&bytes) {
                debug!("decoding numpy arrays in {}", path.display());
                numpy_pickle::from_slice(&bytes)?
            } else {
                serde_pickle::from_slice(&bytes, DeOptions::new()).map_err(IoError::PickleError)?
            }
        }
        WeightFormat::Json => serde_json::from_reader(reader).map_err(IoError::JsonError)?,
    };

    debug!("read weight dictionary from {}", path.display());
    Ok(dict)
}

/// Writes a weight dictionary to `path`, encoded according to its extension.
///
/// # Errors
///
/// - `IoError::UnsupportedFormat` - If the extension is not `.pickle`, `.pkl` or `.json`
/// - `IoError::StdIoError` - If the file cannot be created or flushed
/// - `IoError::PickleError` / `IoError::JsonError` - If encoding fails
pub fn save_weight_dict<T: Serialize>(dict: &T, path: &Path) -> Result<(), IoError> {
    let format = WeightFormat::from_path(path)?;
    let file = File::create(path).map_err(IoError::StdIoError)?;
    let mut writer = BufWriter::new(file);

    match format {
        WeightFormat::Pickle => serde_pickle::to_writer(&mut writer, dict, SerOptions::new())
            .map_err(IoError::PickleError)?,
        WeightFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, dict).map_err(IoError::JsonError)?
        }
    }

    writer.flush().map_err(IoError::StdIoError)
}

/// Reads the weight dictionary of an LSTM layer (`Wi`, `Wh`, `b`, `state0`)
pub fn load_lstm_weights(path: &Path) -> Result<LSTMWeightDict, IoError> {
    load_weight_dict(path)
}

/// Reads the weight dictionary of a dense layer (`weight`, `bias`)
pub fn load_dense_weights(path: &Path) -> Result<DenseWeightDict, IoError> {
    load_weight_dict(path)
}

//! Opening, detecting and decoding files by path.

use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::detect::{Detection, DetectionConfig, detect_reader, is_binary_reader};
use crate::reader::{DecodedReader, DecodedText, ReadConfig, open_decoded_with_config};
use crate::{EncodingError, EncodingResult};

fn open(path: &Path) -> EncodingResult<File> {
    if path.as_os_str().is_empty() {
        return Err(EncodingError::MissingArgument("path"));
    }
    debug!(path = %path.display(), "opening file");
    Ok(File::open(path)?)
}

/// Detect the encoding of a file, reading at most the sample window.
pub fn detect_file<P: AsRef<Path>>(path: P, config: &DetectionConfig) -> EncodingResult<Detection> {
    let mut file = open(path.as_ref())?;
    Ok(detect_reader(&mut file, config))
}

/// Open a file as decoded text, positioned past its BOM.
pub fn open_file<P: AsRef<Path>>(path: P, config: &ReadConfig) -> EncodingResult<DecodedReader<File>> {
    let file = open(path.as_ref())?;
    open_decoded_with_config(file, config)
}

/// Decode a whole file.
pub fn read_file_text<P: AsRef<Path>>(path: P, config: &ReadConfig) -> EncodingResult<DecodedText> {
    let reader = open_file(path, config)?;
    let detection = reader.detection();
    let text = reader.read_to_text()?;
    Ok(DecodedText { text, detection })
}

/// Whether a file looks binary (see [`crate::is_binary`]).
pub fn is_binary_file<P: AsRef<Path>>(path: P, config: &DetectionConfig) -> EncodingResult<bool> {
    let mut file = open(path.as_ref())?;
    Ok(is_binary_reader(&mut file, config))
}

//! Detection engine: BOM first, then the verifier scan, then the ASCII fallback.

use std::io::{self, Read, Seek, SeekFrom};

use tracing::{debug, warn};

use crate::bom::{BomTable, detect_bom};
use crate::encoding::Encoding;
use crate::verify::VerifierSet;

/// Size of the sample window the verifiers look at.
pub const DEFAULT_SAMPLE_SIZE: usize = 50 * 1024;

/// Configuration for encoding detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionConfig {
    /// Maximum number of leading bytes fed to the verifiers (default: 50KiB)
    pub sample_size: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl DetectionConfig {
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Bytes to pull from a stream: the sample, but never less than the
    /// longest BOM.
    fn read_limit(&self) -> usize {
        self.sample_size.max(BomTable::global().max_len())
    }
}

/// Outcome of a detection call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub encoding: Encoding,
    /// Whether the input started with a byte-order mark
    pub had_bom: bool,
    /// Offset of the first content byte, i.e. the BOM length
    pub content_offset: usize,
}

impl Detection {
    /// Result used when nothing matched.
    pub const FALLBACK: Detection = Detection {
        encoding: Encoding::Ascii,
        had_bom: false,
        content_offset: 0,
    };

    pub fn is_fallback(&self) -> bool {
        *self == Detection::FALLBACK
    }
}

/// Detect the encoding of an in-memory buffer with the default sample size.
pub fn detect(bytes: &[u8]) -> Detection {
    detect_with_config(bytes, &DetectionConfig::default())
}

/// Detect the encoding of an in-memory buffer.
///
/// A BOM decides on its own. Without one, the verifiers run over at most
/// `config.sample_size` leading bytes and the first valid one in priority
/// order wins. Empty input and input every verifier rejects come back as
/// [`Detection::FALLBACK`].
pub fn detect_with_config(bytes: &[u8], config: &DetectionConfig) -> Detection {
    if let Some(bom) = detect_bom(bytes) {
        debug!(encoding = %bom.encoding, bom_length = bom.bom_length, "matched byte-order mark");
        return Detection {
            encoding: bom.encoding,
            had_bom: true,
            content_offset: bom.bom_length,
        };
    }

    match classify_sample(bytes, config) {
        Some(encoding) => {
            debug!(%encoding, "verifier accepted sample");
            Detection {
                encoding,
                had_bom: false,
                content_offset: 0,
            }
        }
        None => {
            debug!(len = bytes.len(), "no verifier accepted sample, falling back to ASCII");
            Detection::FALLBACK
        }
    }
}

/// Detect the encoding of a seekable stream from its current position.
///
/// The stream is rewound to where it started. Failing to read the sample is
/// logged and treated as ASCII; this never returns an error.
pub fn detect_reader<R: Read + Seek>(source: &mut R, config: &DetectionConfig) -> Detection {
    match read_sample(source, config.read_limit()) {
        Ok(sample) => detect_with_config(&sample, config),
        Err(err) => {
            warn!(error = %err, "failed to sample input, falling back to ASCII");
            Detection::FALLBACK
        }
    }
}

/// Whether `bytes` looks like binary data: no verifier accepts the sample.
///
/// BOMs are ignored. Empty input counts as binary, matching
/// [`detect`]'s fallback for it.
pub fn is_binary(bytes: &[u8]) -> bool {
    is_binary_with_config(bytes, &DetectionConfig::default())
}

pub fn is_binary_with_config(bytes: &[u8], config: &DetectionConfig) -> bool {
    classify_sample(bytes, config).is_none()
}

/// Stream flavour of [`is_binary`]. The stream is rewound afterwards.
pub fn is_binary_reader<R: Read + Seek>(source: &mut R, config: &DetectionConfig) -> bool {
    match read_sample(source, config.sample_size) {
        Ok(sample) => is_binary_with_config(&sample, config),
        Err(err) => {
            warn!(error = %err, "failed to sample input, treating it as binary");
            true
        }
    }
}

fn classify_sample(bytes: &[u8], config: &DetectionConfig) -> Option<Encoding> {
    let sample = &bytes[..bytes.len().min(config.sample_size)];
    if sample.is_empty() {
        return None;
    }
    VerifierSet::global().classify(sample)
}

/// Read up to `limit` bytes and seek back to the starting position.
fn read_sample<R: Read + Seek>(source: &mut R, limit: usize) -> io::Result<Vec<u8>> {
    let start = source.stream_position()?;
    let mut sample = Vec::with_capacity(limit.min(DEFAULT_SAMPLE_SIZE));
    let read = source.by_ref().take(limit as u64).read_to_end(&mut sample);
    // Rewind even when the read failed part way.
    source.seek(SeekFrom::Start(start))?;
    read.map(|_| sample)
}

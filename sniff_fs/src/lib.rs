//! # sniff_fs - Text encoding detection for files, streams and buffers
//!
//! Works out the encoding of raw bytes without outside hints and hands back
//! the decoded text.
//!
//! Modules:
//! - `bom` for byte-order mark matching (UTF-8/16/32)
//! - `verify` for the byte-grammar automatons (UTF-16LE/BE, UTF-8, windows-1252, IBM-858)
//! - `detect` for the detection engine (BOM, then verifiers, then ASCII)
//! - `reader` for decoded readers and whole-text helpers
//! - `file` for the same operations by path
//!
//! ```
//! let decoded = sniff_fs::read_all_text_with_info(b"caf\xE9 cr\xE8me", &Default::default())?;
//! assert_eq!(decoded.encoding(), sniff_fs::Encoding::Windows1252);
//! assert_eq!(decoded.text, "café crème");
//! # Ok::<(), sniff_fs::EncodingError>(())
//! ```

mod bom;
mod detect;
mod encoding;
mod file;
mod reader;
mod verify;

pub use bom::{BomDetectionResult, BomTable, Preamble, detect_bom};
pub use detect::{
    DEFAULT_SAMPLE_SIZE, Detection, DetectionConfig, detect, detect_reader, detect_with_config,
    is_binary, is_binary_reader, is_binary_with_config,
};
pub use encoding::Encoding;
pub use file::{detect_file, is_binary_file, open_file, read_file_text};
pub use reader::{
    DecodedReader, DecodedText, ReadConfig, open_decoded, open_decoded_with_config, read_all_text,
    read_all_text_from, read_all_text_from_with_info, read_all_text_with_info,
};
pub use verify::{
    CANDIDATES, Candidate, CodePageVerifier, Endian, ScanOutcome, State, TransitionTable,
    Utf16Verifier, Utf8Verifier, Verifier, VerifierSet,
};

use std::io;

use thiserror::Error;

/// Errors that can occur while detecting, decoding or transcoding text
#[derive(Debug, Error)]
pub enum EncodingError {
    /// A required input was not supplied
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    /// I/O error outside of sampling (opening, seeking, reading content)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Content is not valid in the selected encoding
    #[error("malformed {encoding} input at byte {offset}")]
    Malformed { encoding: Encoding, offset: u64 },
    /// Text holds a character the target encoding cannot represent
    #[error("{ch:?} cannot be represented in {encoding}")]
    Unmappable { encoding: Encoding, ch: char },
}

impl From<EncodingError> for io::Error {
    fn from(err: EncodingError) -> Self {
        match err {
            EncodingError::Io(err) => err,
            EncodingError::MissingArgument(_) => io::Error::new(io::ErrorKind::InvalidInput, err),
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

/// Result type for encoding operations
pub type EncodingResult<T> = Result<T, EncodingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EncodingError::Malformed { encoding: Encoding::Utf16Be, offset: 7 };
        assert_eq!(err.to_string(), "malformed UTF-16BE input at byte 7");

        let err = EncodingError::Unmappable { encoding: Encoding::Ascii, ch: 'é' };
        assert_eq!(err.to_string(), "'é' cannot be represented in US-ASCII");
    }

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let err: io::Error = EncodingError::Io(io::Error::new(io::ErrorKind::NotFound, "gone")).into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        let err: io::Error = EncodingError::Malformed { encoding: Encoding::Utf8, offset: 0 }.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_verifiers_through_public_api() {
        let set = VerifierSet::global();
        let order: Vec<Encoding> = set.iter().map(|candidate| candidate.encoding()).collect();
        assert_eq!(order.len(), CANDIDATES);
        assert_eq!(set.classify("h\0i\0".as_bytes()), Some(Encoding::Utf16Le));

        let utf16 = Utf16Verifier::big_endian();
        assert_eq!(utf16.endian(), Endian::Big);
        assert!(utf16.is_valid(utf16.run(b"\0h\0i")));
        assert!(!Utf8Verifier::new().is_valid(Utf8Verifier::new().run(&[0xC0, 0x80])));
    }

    #[test]
    fn test_bom_precedence_through_public_api() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("ünïcödé".as_bytes());
        let decoded = read_all_text_with_info(&bytes, &DetectionConfig::default()).unwrap();
        assert!(decoded.had_bom());
        assert_eq!(decoded.encoding(), Encoding::Utf8);
        assert_eq!(decoded.text, "ünïcödé");
        assert_eq!(read_all_text(&bytes).unwrap(), "ünïcödé");
    }
}

//! Decoded text facade over buffers and seekable streams.

use std::io::{self, BufRead, Read, Seek, SeekFrom};

use tracing::debug;

use crate::detect::{Detection, DetectionConfig, detect_reader, detect_with_config};
use crate::encoding::{Encoding, TextDecoder};
use crate::{EncodingError, EncodingResult};

/// Configuration for decoded reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadConfig {
    /// Raw bytes pulled from the source per decode step (default: 64KB)
    pub chunk_size: usize,
    /// Encoding detection configuration
    pub detection: DetectionConfig,
}

impl Default for ReadConfig {
    fn default() -> Self {
        ReadConfig {
            chunk_size: 64 * 1024,
            detection: DetectionConfig::default(),
        }
    }
}

/// Fully decoded text together with how it was decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub detection: Detection,
}

impl DecodedText {
    pub fn encoding(&self) -> Encoding {
        self.detection.encoding
    }

    pub fn had_bom(&self) -> bool {
        self.detection.had_bom
    }
}

/// UTF-8 view of a byte source in its detected encoding.
///
/// The reader owns the source; dropping it releases the source. It yields
/// UTF-8 bytes through [`Read`] and [`BufRead`], so `lines()` and
/// `read_to_string()` work as usual. Malformed input surfaces as an
/// `InvalidData` error wrapping [`EncodingError::Malformed`].
///
/// Decoding stops at the first malformed sequence. Text decoded before it is
/// still handed out, the error is returned once, and every later read sees
/// end of stream.
pub struct DecodedReader<R> {
    source: R,
    detection: Detection,
    decoder: TextDecoder,
    raw: Vec<u8>,
    text: String,
    pos: usize,
    finished: bool,
    /// Decode error waiting for the buffered text to drain
    failure: Option<EncodingError>,
}

impl<R: Read> DecodedReader<R> {
    fn new(source: R, detection: Detection, chunk_size: usize) -> Self {
        DecodedReader {
            source,
            detection,
            decoder: TextDecoder::new(detection.encoding),
            raw: vec![0u8; chunk_size.max(1)],
            text: String::new(),
            pos: 0,
            finished: false,
            failure: None,
        }
    }

    pub fn detection(&self) -> Detection {
        self.detection
    }

    pub fn encoding(&self) -> Encoding {
        self.decoder.encoding()
    }

    pub fn had_bom(&self) -> bool {
        self.detection.had_bom
    }

    /// Give the source back, dropping any decoded text not yet read.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Decode everything not read yet.
    pub fn read_to_text(mut self) -> EncodingResult<String> {
        let mut out = Vec::new();
        loop {
            let available = self.fill_text()?;
            if available.is_empty() {
                break;
            }
            out.extend_from_slice(available);
            self.pos = self.text.len();
        }
        // Only fails if a caller consumed part of a character through `Read`.
        String::from_utf8(out).map_err(|err| EncodingError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
    }

    /// Decode until there is unread text or the source is exhausted.
    fn fill_text(&mut self) -> EncodingResult<&[u8]> {
        while self.pos >= self.text.len() && !self.finished {
            self.text.clear();
            self.pos = 0;
            let read = read_chunk(&mut self.source, &mut self.raw)?;
            let last = read == 0;
            if let Err(err) = self.decoder.decode(&self.raw[..read], &mut self.text, last) {
                debug!(encoding = %self.decoder.encoding(), "decoding stopped: {}", err);
                self.failure = Some(err);
                self.finished = true;
                break;
            }
            self.finished = last;
        }
        if self.pos >= self.text.len() {
            if let Some(err) = self.failure.take() {
                return Err(err);
            }
        }
        Ok(&self.text.as_bytes()[self.pos..])
    }
}

impl<R: Read> Read for DecodedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<R: Read> BufRead for DecodedReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.fill_text().map_err(io::Error::from)
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.text.len());
    }
}

fn read_chunk<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match source.read(buf) {
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}

/// Detect the encoding of `source` and return a reader positioned past the
/// BOM, if there is one.
pub fn open_decoded<R: Read + Seek>(source: R) -> EncodingResult<DecodedReader<R>> {
    open_decoded_with_config(source, &ReadConfig::default())
}

pub fn open_decoded_with_config<R: Read + Seek>(
    mut source: R,
    config: &ReadConfig,
) -> EncodingResult<DecodedReader<R>> {
    let start = source.stream_position()?;
    let detection = detect_reader(&mut source, &config.detection);
    source.seek(SeekFrom::Start(start + detection.content_offset as u64))?;
    debug!(
        encoding = %detection.encoding,
        had_bom = detection.had_bom,
        "opened decoded reader"
    );
    Ok(DecodedReader::new(source, detection, config.chunk_size))
}

/// Decode a whole seekable stream.
pub fn read_all_text_from<R: Read + Seek>(source: R) -> EncodingResult<String> {
    open_decoded(source)?.read_to_text()
}

/// Decode a whole seekable stream, reporting the BOM and encoding used.
pub fn read_all_text_from_with_info<R: Read + Seek>(
    source: R,
    config: &ReadConfig,
) -> EncodingResult<DecodedText> {
    let reader = open_decoded_with_config(source, config)?;
    let detection = reader.detection();
    let text = reader.read_to_text()?;
    Ok(DecodedText { text, detection })
}

/// Decode an in-memory buffer.
pub fn read_all_text(bytes: &[u8]) -> EncodingResult<String> {
    read_all_text_with_info(bytes, &DetectionConfig::default()).map(|decoded| decoded.text)
}

/// Decode an in-memory buffer, reporting the BOM and encoding used.
pub fn read_all_text_with_info(bytes: &[u8], config: &DetectionConfig) -> EncodingResult<DecodedText> {
    let detection = detect_with_config(bytes, config);
    let text = detection.encoding.decode(&bytes[detection.content_offset..])?;
    Ok(DecodedText { text, detection })
}

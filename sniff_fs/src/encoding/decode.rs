//! Strict, resumable decoders feeding UTF-8 text.
//!
//! UTF-8, UTF-16 and windows-1252 go through `encoding_rs`; the encodings it
//! does not carry (ASCII, IBM-858, UTF-32) are decoded here directly.
//! Every decoder is strict except ASCII: it only ever decodes input no
//! verifier accepted, so bytes above 0x7F become U+FFFD.

use encoding_rs::{Decoder, DecoderResult};

use super::Encoding;
use super::oem::ibm858_to_char;
use crate::{EncodingError, EncodingResult};

/// Decoder for one encoding that can be fed input in arbitrary chunks.
pub(crate) struct TextDecoder {
    encoding: Encoding,
    kind: DecoderKind,
    /// Bytes fed so far, used to report where malformed input starts
    consumed: u64,
}

enum DecoderKind {
    Whatwg(Decoder),
    Ascii,
    Ibm858,
    Utf32 { big_endian: bool, pending: Vec<u8> },
}

impl TextDecoder {
    pub(crate) fn new(encoding: Encoding) -> Self {
        let kind = match encoding {
            Encoding::Utf8 => DecoderKind::Whatwg(encoding_rs::UTF_8.new_decoder_without_bom_handling()),
            Encoding::Utf16Le => {
                DecoderKind::Whatwg(encoding_rs::UTF_16LE.new_decoder_without_bom_handling())
            }
            Encoding::Utf16Be => {
                DecoderKind::Whatwg(encoding_rs::UTF_16BE.new_decoder_without_bom_handling())
            }
            Encoding::Windows1252 => {
                DecoderKind::Whatwg(encoding_rs::WINDOWS_1252.new_decoder_without_bom_handling())
            }
            Encoding::Ascii => DecoderKind::Ascii,
            Encoding::Ibm858 => DecoderKind::Ibm858,
            Encoding::Utf32Le => DecoderKind::Utf32 { big_endian: false, pending: Vec::with_capacity(4) },
            Encoding::Utf32Be => DecoderKind::Utf32 { big_endian: true, pending: Vec::with_capacity(4) },
        };
        TextDecoder { encoding, kind, consumed: 0 }
    }

    pub(crate) fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Decode `src`, appending the text to `dst`.
    ///
    /// `last` marks the end of the input: a sequence still incomplete at that
    /// point is malformed.
    ///
    /// On error `src` still counts as consumed and no partial unit is carried
    /// over, so feeding more input never decodes the same bytes twice.
    pub(crate) fn decode(&mut self, src: &[u8], dst: &mut String, last: bool) -> EncodingResult<()> {
        let encoding = self.encoding;
        let base = self.consumed;
        self.consumed += src.len() as u64;

        match &mut self.kind {
            DecoderKind::Whatwg(decoder) => decode_whatwg(decoder, encoding, base, src, dst, last)?,
            DecoderKind::Ascii => {
                dst.reserve(src.len());
                dst.extend(src.iter().map(|&byte| {
                    if byte.is_ascii() {
                        byte as char
                    } else {
                        char::REPLACEMENT_CHARACTER
                    }
                }));
            }
            DecoderKind::Ibm858 => {
                dst.reserve(src.len());
                dst.extend(src.iter().map(|&byte| ibm858_to_char(byte)));
            }
            DecoderKind::Utf32 { big_endian, pending } => {
                let unit_start = base - pending.len() as u64;
                pending.extend_from_slice(src);

                let buffered = std::mem::take(pending);
                let mut units = buffered.chunks_exact(4);
                for (i, unit) in (&mut units).enumerate() {
                    let raw = [unit[0], unit[1], unit[2], unit[3]];
                    let value = if *big_endian {
                        u32::from_be_bytes(raw)
                    } else {
                        u32::from_le_bytes(raw)
                    };
                    match char::from_u32(value) {
                        Some(ch) => dst.push(ch),
                        None => return Err(malformed(encoding, unit_start + 4 * i as u64)),
                    }
                }

                let rest = units.remainder();
                if last && !rest.is_empty() {
                    let offset = unit_start + (buffered.len() - rest.len()) as u64;
                    return Err(malformed(encoding, offset));
                }
                pending.extend_from_slice(rest);
            }
        }

        Ok(())
    }
}

fn decode_whatwg(
    decoder: &mut Decoder,
    encoding: Encoding,
    base: u64,
    src: &[u8],
    dst: &mut String,
    last: bool,
) -> EncodingResult<()> {
    let mut read_total = 0usize;
    loop {
        let remaining = &src[read_total..];
        let needed = decoder
            .max_utf8_buffer_length_without_replacement(remaining.len())
            .unwrap_or_else(|| remaining.len().saturating_mul(3));
        dst.reserve(needed);

        let (result, read) = decoder.decode_to_string_without_replacement(remaining, dst, last);
        read_total += read;
        match result {
            DecoderResult::InputEmpty => return Ok(()),
            DecoderResult::OutputFull => continue,
            DecoderResult::Malformed(bad, extra) => {
                let offset = (base + read_total as u64)
                    .saturating_sub(u64::from(bad) + u64::from(extra));
                return Err(malformed(encoding, offset));
            }
        }
    }
}

fn malformed(encoding: Encoding, offset: u64) -> EncodingError {
    EncodingError::Malformed { encoding, offset }
}

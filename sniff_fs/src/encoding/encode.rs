//! Transcoding text back into a detected encoding.

use super::Encoding;
use super::oem::char_to_ibm858;
use crate::{EncodingError, EncodingResult};

pub(super) fn encode(encoding: Encoding, text: &str, with_preamble: bool) -> EncodingResult<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() + 4);
    if with_preamble {
        out.extend_from_slice(encoding.preamble());
    }

    match encoding {
        Encoding::Utf8 => out.extend_from_slice(text.as_bytes()),
        Encoding::Utf16Le => {
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
        }
        Encoding::Utf16Be => {
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_be_bytes());
            }
        }
        Encoding::Utf32Le => {
            for ch in text.chars() {
                out.extend_from_slice(&u32::from(ch).to_le_bytes());
            }
        }
        Encoding::Utf32Be => {
            for ch in text.chars() {
                out.extend_from_slice(&u32::from(ch).to_be_bytes());
            }
        }
        Encoding::Ascii => {
            for ch in text.chars() {
                if !ch.is_ascii() {
                    return Err(EncodingError::Unmappable { encoding, ch });
                }
                out.push(ch as u8);
            }
        }
        Encoding::Windows1252 => {
            // encoding_rs substitutes numeric character references for
            // unmappable characters, so check each one on its own.
            let mut buf = [0u8; 4];
            for ch in text.chars() {
                let (bytes, _, unmappable) = encoding_rs::WINDOWS_1252.encode(ch.encode_utf8(&mut buf));
                if unmappable {
                    return Err(EncodingError::Unmappable { encoding, ch });
                }
                out.extend_from_slice(&bytes);
            }
        }
        Encoding::Ibm858 => {
            for ch in text.chars() {
                let byte = char_to_ibm858(ch).ok_or(EncodingError::Unmappable { encoding, ch })?;
                out.push(byte);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_with_preamble() {
        let bytes = Encoding::Utf16Be.encode("Hi", true).unwrap();
        assert_eq!(bytes, [0xFE, 0xFF, 0x00, b'H', 0x00, b'i']);

        let bytes = Encoding::Windows1252.encode("Hi", true).unwrap();
        assert_eq!(bytes, b"Hi");
    }

    #[test]
    fn test_encode_windows1252_specials() {
        let bytes = Encoding::Windows1252.encode("€“é”", false).unwrap();
        assert_eq!(bytes, [0x80, 0x93, 0xE9, 0x94]);
    }

    #[test]
    fn test_unmappable_characters() {
        match Encoding::Windows1252.encode("日本", false) {
            Err(EncodingError::Unmappable { ch, encoding }) => {
                assert_eq!(ch, '日');
                assert_eq!(encoding, Encoding::Windows1252);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(Encoding::Ascii.encode("é", false).is_err());
        assert!(Encoding::Ibm858.encode("ı", false).is_err());
    }

    #[test]
    fn test_encode_utf32() {
        let bytes = Encoding::Utf32Le.encode("A", true).unwrap();
        assert_eq!(bytes, [0xFF, 0xFE, 0, 0, 0x41, 0, 0, 0]);
    }
}

//! Encoding descriptors and the registry every other module draws from.

use std::fmt;

mod decode;
mod encode;
mod oem;

pub(crate) use decode::TextDecoder;

use crate::EncodingResult;

/// A character encoding the detector can select and decode.
///
/// Descriptors are plain values: comparing, copying and hashing them is free,
/// and everything that depends on an encoding (its preamble, its decoder)
/// is derived from the variant on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// 7-bit US-ASCII, the fallback when nothing else validates
    Ascii,
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
    Windows1252,
    /// IBM code page 858 (code page 850 with the euro sign at 0xD5)
    Ibm858,
}

impl Encoding {
    /// Every supported encoding, in registry order.
    ///
    /// The BOM table is built from this list.
    pub const ALL: [Encoding; 8] = [
        Encoding::Ascii,
        Encoding::Utf8,
        Encoding::Utf16Le,
        Encoding::Utf16Be,
        Encoding::Utf32Le,
        Encoding::Utf32Be,
        Encoding::Windows1252,
        Encoding::Ibm858,
    ];

    /// Canonical name of the encoding.
    pub const fn name(self) -> &'static str {
        match self {
            Encoding::Ascii => "US-ASCII",
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Utf32Le => "UTF-32LE",
            Encoding::Utf32Be => "UTF-32BE",
            Encoding::Windows1252 => "windows-1252",
            Encoding::Ibm858 => "IBM00858",
        }
    }

    /// Windows code page number of the encoding.
    pub const fn code_page(self) -> u16 {
        match self {
            Encoding::Ascii => 20127,
            Encoding::Utf8 => 65001,
            Encoding::Utf16Le => 1200,
            Encoding::Utf16Be => 1201,
            Encoding::Utf32Le => 12000,
            Encoding::Utf32Be => 12001,
            Encoding::Windows1252 => 1252,
            Encoding::Ibm858 => 858,
        }
    }

    /// Byte-order mark written in front of a document, empty when the
    /// encoding declares none.
    pub const fn preamble(self) -> &'static [u8] {
        match self {
            Encoding::Utf8 => &[0xEF, 0xBB, 0xBF],
            Encoding::Utf16Le => &[0xFF, 0xFE],
            Encoding::Utf16Be => &[0xFE, 0xFF],
            Encoding::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
            Encoding::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
            Encoding::Ascii | Encoding::Windows1252 | Encoding::Ibm858 => &[],
        }
    }

    /// Look an encoding up by name or code page, ignoring ASCII case.
    pub fn for_label(label: &str) -> Option<Encoding> {
        let label = label.trim();
        if let Ok(code_page) = label.parse::<u16>() {
            return Encoding::ALL.into_iter().find(|e| e.code_page() == code_page);
        }
        Encoding::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(label))
    }

    /// Decode a complete byte sequence (without its BOM) into text.
    ///
    /// Malformed input is reported, never replaced.
    pub fn decode(self, bytes: &[u8]) -> EncodingResult<String> {
        let mut text = String::with_capacity(bytes.len());
        let mut decoder = TextDecoder::new(self);
        decoder.decode(bytes, &mut text, true)?;
        Ok(text)
    }

    /// Transcode text into this encoding, optionally led by its preamble.
    pub fn encode(self, text: &str, with_preamble: bool) -> EncodingResult<Vec<u8>> {
        encode::encode(self, text, with_preamble)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_label() {
        assert_eq!(Encoding::for_label("utf-8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::for_label("858"), Some(Encoding::Ibm858));
        assert_eq!(Encoding::for_label(" Windows-1252 "), Some(Encoding::Windows1252));
        assert_eq!(Encoding::for_label("koi8-r"), None);
    }

    #[test]
    fn test_only_unicode_encodings_have_preambles() {
        let with_bom: Vec<_> = Encoding::ALL
            .into_iter()
            .filter(|e| !e.preamble().is_empty())
            .collect();
        assert_eq!(
            with_bom,
            vec![
                Encoding::Utf8,
                Encoding::Utf16Le,
                Encoding::Utf16Be,
                Encoding::Utf32Le,
                Encoding::Utf32Be
            ]
        );
    }

    #[test]
    fn test_code_pages_are_unique() {
        for (i, a) in Encoding::ALL.iter().enumerate() {
            for b in &Encoding::ALL[i + 1..] {
                assert_ne!(a.code_page(), b.code_page());
            }
        }
    }
}

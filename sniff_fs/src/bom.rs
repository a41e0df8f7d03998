use std::sync::LazyLock;

use crate::encoding::Encoding;

/// An encoding together with the byte-order mark that announces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preamble {
    pub encoding: Encoding,
    pub bytes: &'static [u8],
}

/// Result of BOM detection containing the detected encoding and BOM length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BomDetectionResult {
    pub encoding: Encoding,
    pub bom_length: usize,
}

/// Every preamble the registry declares, longest first.
///
/// Ordering by length settles prefixes: `FF FE 00 00` is UTF-32LE, not a
/// UTF-16LE BOM followed by a NUL character. Equal lengths keep registry order.
#[derive(Debug, Clone)]
pub struct BomTable {
    entries: Vec<Preamble>,
    max_len: usize,
}

static BOM_TABLE: LazyLock<BomTable> = LazyLock::new(|| BomTable::from_registry(&Encoding::ALL));

impl BomTable {
    /// Build a table from the encodings that declare a preamble.
    pub fn from_registry(encodings: &[Encoding]) -> Self {
        let mut entries: Vec<Preamble> = encodings
            .iter()
            .filter(|e| !e.preamble().is_empty())
            .map(|&encoding| Preamble { encoding, bytes: encoding.preamble() })
            .collect();
        entries.sort_by(|a, b| b.bytes.len().cmp(&a.bytes.len()));
        let max_len = entries.first().map_or(0, |p| p.bytes.len());
        BomTable { entries, max_len }
    }

    /// Process-wide table over [`Encoding::ALL`], built on first use.
    pub fn global() -> &'static BomTable {
        &BOM_TABLE
    }

    pub fn entries(&self) -> &[Preamble] {
        &self.entries
    }

    /// Length of the longest preamble, i.e. how many leading bytes matching
    /// ever needs.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Find the preamble `bytes` starts with, if any.
    pub fn find(&self, bytes: &[u8]) -> Option<Preamble> {
        let head = &bytes[..bytes.len().min(self.max_len)];
        self.entries
            .iter()
            .find(|p| head.starts_with(p.bytes))
            .copied()
    }
}

/// Detect Byte Order Mark (BOM) in the given byte slice.
pub fn detect_bom(bytes: &[u8]) -> Option<BomDetectionResult> {
    BomTable::global().find(bytes).map(|p| BomDetectionResult {
        encoding: p.encoding,
        bom_length: p.bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_longest_first() {
        let table = BomTable::global();
        assert_eq!(table.max_len(), 4);
        let lengths: Vec<_> = table.entries().iter().map(|p| p.bytes.len()).collect();
        assert_eq!(lengths, vec![4, 4, 3, 2, 2]);
    }

    #[test]
    fn test_detect_each_bom() {
        let cases: [(&[u8], Encoding, usize); 5] = [
            (&[0xEF, 0xBB, 0xBF, b'x'], Encoding::Utf8, 3),
            (&[0xFF, 0xFE, b'x', 0x00], Encoding::Utf16Le, 2),
            (&[0xFE, 0xFF, 0x00, b'x'], Encoding::Utf16Be, 2),
            (&[0xFF, 0xFE, 0x00, 0x00, b'x', 0, 0, 0], Encoding::Utf32Le, 4),
            (&[0x00, 0x00, 0xFE, 0xFF], Encoding::Utf32Be, 4),
        ];
        for (bytes, encoding, bom_length) in cases {
            assert_eq!(
                detect_bom(bytes),
                Some(BomDetectionResult { encoding, bom_length })
            );
        }
    }

    #[test]
    fn test_short_and_missing_boms() {
        assert_eq!(detect_bom(&[]), None);
        assert_eq!(detect_bom(&[0xEF, 0xBB]), None);
        assert_eq!(detect_bom(&[0xFF]), None);
        assert_eq!(detect_bom(b"no bom here"), None);
    }

    #[test]
    fn test_custom_registry_without_preambles() {
        let table = BomTable::from_registry(&[Encoding::Ascii, Encoding::Ibm858]);
        assert_eq!(table.max_len(), 0);
        assert_eq!(table.find(&[0xEF, 0xBB, 0xBF]), None);
    }
}

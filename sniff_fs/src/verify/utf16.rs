use super::{State, TransitionTable, Verifier};
use crate::encoding::Encoding;

/// Next byte sits at an even offset
const EVEN: State = 1;
const ODD: State = 2;
/// Same parities, after a NUL was seen where the high byte of a code unit
/// goes. Once entered these states never fall back to `EVEN`/`ODD`.
const EVEN_POSSIBLE: State = 3;
const ODD_POSSIBLE: State = 4;

const STATES: usize = 5;

/// Which end of a code unit carries the high byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// UTF-16 without a BOM, recognised by its NUL high bytes.
///
/// Any byte stream without NULs is syntactically UTF-16, so the verifier
/// only validates once it has seen a NUL at the high-byte position
/// (odd offsets for little endian, even offsets for big endian). A NUL at
/// the other parity rejects the input.
#[derive(Debug, Clone)]
pub struct Utf16Verifier {
    endian: Endian,
    table: TransitionTable,
}

impl Utf16Verifier {
    pub fn little_endian() -> Self {
        let mut table = TransitionTable::new(STATES);

        table.set(EVEN, 0x01..=0xFF, ODD);
        table.set_byte(ODD, 0x00, EVEN_POSSIBLE);
        table.set(ODD, 0x01..=0xFF, EVEN);

        table.set(EVEN_POSSIBLE, 0x01..=0xFF, ODD_POSSIBLE);
        table.set(ODD_POSSIBLE, 0x00..=0xFF, EVEN_POSSIBLE);

        Utf16Verifier { endian: Endian::Little, table }
    }

    pub fn big_endian() -> Self {
        let mut table = TransitionTable::new(STATES);

        table.set_byte(EVEN, 0x00, ODD_POSSIBLE);
        table.set(EVEN, 0x01..=0xFF, ODD);
        table.set(ODD, 0x01..=0xFF, EVEN);

        table.set(EVEN_POSSIBLE, 0x00..=0xFF, ODD_POSSIBLE);
        table.set(ODD_POSSIBLE, 0x01..=0xFF, EVEN_POSSIBLE);

        Utf16Verifier { endian: Endian::Big, table }
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }
}

impl Verifier for Utf16Verifier {
    fn encoding(&self) -> Encoding {
        match self.endian {
            Endian::Little => Encoding::Utf16Le,
            Endian::Big => Encoding::Utf16Be,
        }
    }

    fn initial_state(&self) -> State {
        EVEN
    }

    fn transition_table(&self) -> &TransitionTable {
        &self.table
    }

    fn is_valid(&self, state: State) -> bool {
        matches!(state, EVEN_POSSIBLE | ODD_POSSIBLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::ERROR;

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    fn utf16be(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_be_bytes).collect()
    }

    #[test]
    fn test_accepts_own_byte_order() {
        let le = Utf16Verifier::little_endian();
        let be = Utf16Verifier::big_endian();
        assert!(le.is_valid(le.run(&utf16le("Hello, wörld"))));
        assert!(be.is_valid(be.run(&utf16be("Hello, wörld"))));
    }

    #[test]
    fn test_rejects_other_byte_order() {
        let le = Utf16Verifier::little_endian();
        let be = Utf16Verifier::big_endian();
        assert_eq!(le.run(&utf16be("Hello")), ERROR);
        assert_eq!(be.run(&utf16le("Hello")), ERROR);
    }

    #[test]
    fn test_requires_a_nul_high_byte() {
        let noise: Vec<u8> = (1..=255u8).cycle().take(4096).collect();
        for v in [Utf16Verifier::little_endian(), Utf16Verifier::big_endian()] {
            let state = v.run(&noise);
            assert_ne!(state, ERROR);
            assert!(!v.is_valid(state), "{}", v.encoding());
        }
    }

    #[test]
    fn test_possible_states_are_sticky() {
        // One ASCII unit, then CJK text without any NUL bytes.
        let mut bytes = utf16le("a");
        bytes.extend(utf16le("日本語のテキスト"));
        let le = Utf16Verifier::little_endian();
        assert!(le.is_valid(le.run(&bytes)));
    }

    #[test]
    fn test_nul_at_wrong_parity_after_match() {
        let le = Utf16Verifier::little_endian();
        let mut bytes = utf16le("ab");
        bytes.push(0x00);
        assert_eq!(le.run(&bytes), ERROR);
    }
}

use super::{ERROR, State, TransitionTable, Verifier};
use crate::encoding::Encoding;

const VALID: State = 1;
const STATES: usize = 2;

/// Bytes left undefined by windows-1252.
const UNDEFINED_IN_1252: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// Single-byte code page: printable bytes plus text whitespace.
///
/// These are the low-confidence candidates; they only win when no
/// multi-byte encoding validates.
#[derive(Debug, Clone)]
pub struct CodePageVerifier {
    encoding: Encoding,
    table: TransitionTable,
}

impl CodePageVerifier {
    pub fn windows_1252() -> Self {
        let mut table = printable_table();
        for byte in UNDEFINED_IN_1252 {
            table.set_byte(VALID, byte, ERROR);
        }
        CodePageVerifier { encoding: Encoding::Windows1252, table }
    }

    pub fn ibm_858() -> Self {
        CodePageVerifier { encoding: Encoding::Ibm858, table: printable_table() }
    }
}

fn printable_table() -> TransitionTable {
    let mut table = TransitionTable::new(STATES);
    table.set(VALID, 0x20..=0xFF, VALID);
    for byte in [b'\t', b'\n', 0x0C, b'\r'] {
        table.set_byte(VALID, byte, VALID);
    }
    table
}

impl Verifier for CodePageVerifier {
    fn encoding(&self) -> Encoding {
        self.encoding
    }

    fn initial_state(&self) -> State {
        VALID
    }

    fn transition_table(&self) -> &TransitionTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_range_is_valid() {
        let bytes: Vec<u8> = (0x20..=0xFF).collect();
        let v = CodePageVerifier::ibm_858();
        assert!(v.is_valid(v.run(&bytes)));
        assert!(v.is_valid(v.run(b"line one\r\nline two\tcolumn\n")));
    }

    #[test]
    fn test_windows_1252_rejects_undefined_bytes() {
        let v = CodePageVerifier::windows_1252();
        let defined: Vec<u8> = (0x20..=0xFF).filter(|b| !UNDEFINED_IN_1252.contains(b)).collect();
        assert!(v.is_valid(v.run(&defined)));
        for byte in UNDEFINED_IN_1252 {
            assert_eq!(v.run(&[b'a', byte, b'b']), ERROR);
        }
    }

    #[test]
    fn test_control_bytes_are_rejected() {
        for v in [CodePageVerifier::windows_1252(), CodePageVerifier::ibm_858()] {
            assert_eq!(v.run(b"abc\0def"), ERROR);
            assert_eq!(v.run(&[0x1B, b'[', b'm']), ERROR);
        }
    }
}

use super::{State, TransitionTable, Verifier};
use crate::encoding::Encoding;

/// Between characters
const START: State = 1;
/// One continuation byte left
const TAIL_1: State = 2;
const TAIL_2: State = 3;
const TAIL_3: State = 4;
/// After 0xE0: the next byte must be 0xA0..=0xBF (no overlongs)
const AFTER_E0: State = 5;
/// After 0xED: the next byte must be 0x80..=0x9F (no surrogates)
const AFTER_ED: State = 6;
/// After 0xF0: the next byte must be 0x90..=0xBF (no overlongs)
const AFTER_F0: State = 7;
/// After 0xF4: the next byte must be 0x80..=0x8F (nothing above U+10FFFF)
const AFTER_F4: State = 8;

const STATES: usize = 9;

/// UTF-8 as defined by RFC 3629.
///
/// A scan that stops in the middle of a sequence still counts as valid: the
/// sample window may cut a character in two.
#[derive(Debug, Clone)]
pub struct Utf8Verifier {
    table: TransitionTable,
}

impl Utf8Verifier {
    pub fn new() -> Self {
        let mut table = TransitionTable::new(STATES);

        table.set(START, 0x00..=0x7F, START);
        table.set(START, 0xC2..=0xDF, TAIL_1);
        table.set_byte(START, 0xE0, AFTER_E0);
        table.set(START, 0xE1..=0xEC, TAIL_2);
        table.set_byte(START, 0xED, AFTER_ED);
        table.set(START, 0xEE..=0xEF, TAIL_2);
        table.set_byte(START, 0xF0, AFTER_F0);
        table.set(START, 0xF1..=0xF3, TAIL_3);
        table.set_byte(START, 0xF4, AFTER_F4);

        table.set(TAIL_1, 0x80..=0xBF, START);
        table.set(TAIL_2, 0x80..=0xBF, TAIL_1);
        table.set(TAIL_3, 0x80..=0xBF, TAIL_2);

        table.set(AFTER_E0, 0xA0..=0xBF, TAIL_1);
        table.set(AFTER_ED, 0x80..=0x9F, TAIL_1);
        table.set(AFTER_F0, 0x90..=0xBF, TAIL_2);
        table.set(AFTER_F4, 0x80..=0x8F, TAIL_2);

        // 0xC0, 0xC1 and 0xF5..=0xFF never appear in UTF-8 and were never
        // routed anywhere above, so they stay on ERROR from every state.
        Utf8Verifier { table }
    }
}

impl Default for Utf8Verifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Verifier for Utf8Verifier {
    fn encoding(&self) -> Encoding {
        Encoding::Utf8
    }

    fn initial_state(&self) -> State {
        START
    }

    fn transition_table(&self) -> &TransitionTable {
        &self.table
    }
}

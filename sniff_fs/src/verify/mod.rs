//! Byte-grammar verifiers: one deterministic automaton per candidate encoding.
//!
//! Every automaton shares the same shape. State `0` is the error state and
//! its row maps every byte back to `0`, so a rejected automaton stays rejected.
//! A scan runs all candidates in lockstep over a sample and the first
//! candidate in priority order that ends in a valid state wins.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use tracing::trace;

use crate::encoding::Encoding;

mod latin;
mod utf16;
mod utf8;

pub use latin::CodePageVerifier;
pub use utf16::{Endian, Utf16Verifier};
pub use utf8::Utf8Verifier;

/// Automaton state. `ERROR` is reserved.
pub type State = u8;

/// The dead state shared by every verifier.
pub const ERROR: State = 0;

/// Dense `state x byte -> state` table.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    rows: Vec<[State; 256]>,
}

impl TransitionTable {
    /// Create a table for `states` states (including `ERROR`) where every
    /// transition leads to `ERROR`.
    pub(crate) fn new(states: usize) -> Self {
        TransitionTable {
            rows: vec![[ERROR; 256]; states],
        }
    }

    /// Route every byte in `bytes` from `from` to `to`.
    pub(crate) fn set(&mut self, from: State, bytes: RangeInclusive<u8>, to: State) {
        debug_assert_ne!(from, ERROR, "the error state is absorbing");
        let row = &mut self.rows[usize::from(from)];
        for byte in bytes {
            row[usize::from(byte)] = to;
        }
    }

    pub(crate) fn set_byte(&mut self, from: State, byte: u8, to: State) {
        self.set(from, byte..=byte, to);
    }

    /// State reached from `state` on `byte`.
    #[inline]
    pub fn next(&self, state: State, byte: u8) -> State {
        self.rows[usize::from(state)][usize::from(byte)]
    }

    pub fn state_count(&self) -> usize {
        self.rows.len()
    }
}

/// Contract shared by all candidate automatons.
pub trait Verifier {
    /// Encoding selected when this automaton validates.
    fn encoding(&self) -> Encoding;

    fn initial_state(&self) -> State;

    fn transition_table(&self) -> &TransitionTable;

    /// Whether a scan that stopped in `state` counts as a match.
    fn is_valid(&self, state: State) -> bool {
        state != ERROR
    }

    /// Run this automaton alone over `bytes`, stopping once it dies.
    fn run(&self, bytes: &[u8]) -> State {
        let table = self.transition_table();
        let mut state = self.initial_state();
        for &byte in bytes {
            state = table.next(state, byte);
            if state == ERROR {
                break;
            }
        }
        state
    }
}

/// One member of the fixed candidate set.
#[derive(Debug, Clone)]
pub enum Candidate {
    Utf16(Utf16Verifier),
    Utf8(Utf8Verifier),
    CodePage(CodePageVerifier),
}

impl Verifier for Candidate {
    fn encoding(&self) -> Encoding {
        match self {
            Candidate::Utf16(v) => v.encoding(),
            Candidate::Utf8(v) => v.encoding(),
            Candidate::CodePage(v) => v.encoding(),
        }
    }

    fn initial_state(&self) -> State {
        match self {
            Candidate::Utf16(v) => v.initial_state(),
            Candidate::Utf8(v) => v.initial_state(),
            Candidate::CodePage(v) => v.initial_state(),
        }
    }

    fn transition_table(&self) -> &TransitionTable {
        match self {
            Candidate::Utf16(v) => v.transition_table(),
            Candidate::Utf8(v) => v.transition_table(),
            Candidate::CodePage(v) => v.transition_table(),
        }
    }

    fn is_valid(&self, state: State) -> bool {
        match self {
            Candidate::Utf16(v) => v.is_valid(state),
            Candidate::Utf8(v) => v.is_valid(state),
            Candidate::CodePage(v) => v.is_valid(state),
        }
    }
}

/// Number of candidates in the verifier set.
pub const CANDIDATES: usize = 5;

/// The candidate automatons in priority order.
#[derive(Debug, Clone)]
pub struct VerifierSet {
    candidates: [Candidate; CANDIDATES],
}

static VERIFIERS: LazyLock<VerifierSet> = LazyLock::new(VerifierSet::new);

/// Final automaton states of one lockstep scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Final state per candidate, in priority order
    pub states: [State; CANDIDATES],
    /// Bytes consumed before the scan ended
    pub bytes_scanned: usize,
}

impl ScanOutcome {
    /// Number of automatons that never entered the error state.
    pub fn alive(&self) -> usize {
        self.states.iter().filter(|&&s| s != ERROR).count()
    }
}

impl VerifierSet {
    /// Build the set: UTF-16LE, UTF-16BE, UTF-8, windows-1252, IBM-858.
    pub fn new() -> Self {
        VerifierSet {
            candidates: [
                Candidate::Utf16(Utf16Verifier::little_endian()),
                Candidate::Utf16(Utf16Verifier::big_endian()),
                Candidate::Utf8(Utf8Verifier::new()),
                Candidate::CodePage(CodePageVerifier::windows_1252()),
                Candidate::CodePage(CodePageVerifier::ibm_858()),
            ],
        }
    }

    /// Process-wide set, built on first use.
    pub fn global() -> &'static VerifierSet {
        &VERIFIERS
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    /// Run every candidate over `sample` one byte at a time.
    ///
    /// Dead automatons are skipped; the scan ends early once none is alive.
    pub fn scan(&self, sample: &[u8]) -> ScanOutcome {
        let mut states = [ERROR; CANDIDATES];
        for (state, candidate) in states.iter_mut().zip(&self.candidates) {
            *state = candidate.initial_state();
        }
        let mut alive = states.iter().filter(|&&s| s != ERROR).count();
        let mut bytes_scanned = 0;

        for &byte in sample {
            if alive == 0 {
                break;
            }
            for (state, candidate) in states.iter_mut().zip(&self.candidates) {
                if *state == ERROR {
                    continue;
                }
                *state = candidate.transition_table().next(*state, byte);
                if *state == ERROR {
                    alive -= 1;
                    trace!(
                        encoding = %candidate.encoding(),
                        offset = bytes_scanned,
                        byte,
                        "verifier rejected input"
                    );
                }
            }
            bytes_scanned += 1;
        }

        ScanOutcome { states, bytes_scanned }
    }

    /// First candidate, in priority order, whose final state is valid.
    pub fn resolve(&self, outcome: &ScanOutcome) -> Option<Encoding> {
        self.candidates
            .iter()
            .zip(outcome.states)
            .find(|(candidate, state)| *state != ERROR && candidate.is_valid(*state))
            .map(|(candidate, _)| candidate.encoding())
    }

    /// Scan `sample` and resolve the winner.
    pub fn classify(&self, sample: &[u8]) -> Option<Encoding> {
        self.resolve(&self.scan(sample))
    }
}

impl Default for VerifierSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let order: Vec<_> = VerifierSet::global().iter().map(|c| c.encoding()).collect();
        assert_eq!(
            order,
            vec![
                Encoding::Utf16Le,
                Encoding::Utf16Be,
                Encoding::Utf8,
                Encoding::Windows1252,
                Encoding::Ibm858
            ]
        );
    }

    #[test]
    fn test_error_row_is_absorbing() {
        for candidate in VerifierSet::global().iter() {
            let table = candidate.transition_table();
            for byte in 0..=255u8 {
                assert_eq!(table.next(ERROR, byte), ERROR, "{}", candidate.encoding());
            }
            assert!(!candidate.is_valid(ERROR));
        }
    }

    #[test]
    fn test_initial_states_are_alive() {
        for candidate in VerifierSet::global().iter() {
            assert_ne!(candidate.initial_state(), ERROR);
            assert!((candidate.initial_state() as usize) < candidate.transition_table().state_count());
        }
    }

    #[test]
    fn test_scan_stops_when_everything_is_dead() {
        // NUL kills both code pages and UTF-16LE, the second NUL kills
        // UTF-16BE, and 0xC0 kills UTF-8.
        let mut sample = vec![0x00, 0x00, 0xC0];
        sample.extend_from_slice(b"plenty of perfectly fine text afterwards");
        let outcome = VerifierSet::global().scan(&sample);
        assert_eq!(outcome.alive(), 0);
        assert_eq!(outcome.bytes_scanned, 3);
        assert_eq!(VerifierSet::global().resolve(&outcome), None);
    }

    #[test]
    fn test_empty_sample_leaves_initial_states() {
        // UTF-16 needs a NUL; the others are valid in their initial state.
        // The detector handles empty input before it gets here.
        let outcome = VerifierSet::global().scan(&[]);
        assert_eq!(outcome.bytes_scanned, 0);
        assert_eq!(VerifierSet::global().resolve(&outcome), Some(Encoding::Utf8));
    }

    #[test]
    fn test_code_page_tie_breaks_to_windows_1252() {
        // 0xE9 then space: invalid UTF-8, valid in both code pages.
        let sample = b"caf\xE9 au lait";
        let set = VerifierSet::global();
        let outcome = set.scan(sample);
        assert!(outcome.states[3] != ERROR && outcome.states[4] != ERROR);
        assert_eq!(set.resolve(&outcome), Some(Encoding::Windows1252));
    }

    #[test]
    fn test_undefined_1252_bytes_fall_through_to_858() {
        let sample = b"M\x81ller \x90tienne";
        assert_eq!(VerifierSet::global().classify(sample), Some(Encoding::Ibm858));
    }

    #[test]
    fn test_utf16_wins_over_utf8() {
        let sample = b"h\0e\0l\0l\0o\0";
        assert_eq!(VerifierSet::global().classify(sample), Some(Encoding::Utf16Le));
        let sample = b"\0h\0e\0l\0l\0o";
        assert_eq!(VerifierSet::global().classify(sample), Some(Encoding::Utf16Be));
    }
}

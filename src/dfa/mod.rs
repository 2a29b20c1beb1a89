// src/dfa/mod.rs
//! Turns an externally constructed automaton into the flat, word-addressable
//! tables an oblivious executor can walk with nothing but indexed loads and
//! shift/mask arithmetic.
//!
//! Pipeline: [`source`] adapts the construction engine's automaton into
//! per-state character-range edges; [`build`] totalizes them into a dense
//! `(N+1) × A` table with an absorbing fail row; [`pack`] serializes that
//! table plus the accept vector into two 16-bit-word images; [`eval`] is the
//! plain reference walk used as the executor's oracle; [`viz`] dumps a
//! Graphviz view for debugging.

pub mod build;
pub mod eval;
pub mod io;
pub mod pack;
pub mod source;
pub mod viz;

pub use pack::{DfaImages, unpack_next, word_addr};
pub use source::{AutomatonSource, Edge, RegexAutomaton};
pub use viz::write_dot;

/// Most real states a compiled automaton may have; the fail index
/// (== `num_states`) must still fit the single-byte cells of the packed
/// transition image.
pub const MAX_STATES: usize = 255;

/// A totalized DFA over a masked byte alphabet.
///
/// `next` is row-major `(num_states + 1) × alphabet_size()`, every cell
/// defined. Row `num_states` is the synthetic fail state: absorbing and
/// never accepting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    /// Real state count; the fail state is index `num_states`.
    pub num_states: usize,
    /// Alphabet bit width; input bytes are masked to this many bits.
    pub char_bits: u32,
    /// Flat transition table, entries in `0..=num_states`.
    pub next: Vec<u8>,
    /// Accept flag per state index, `num_states + 1` entries, last always false.
    pub accepting: Vec<bool>,
    /// Dense index of the start state.
    pub initial: u8,
}

impl Dfa {
    #[inline]
    pub fn alphabet_size(&self) -> usize {
        1 << self.char_bits
    }

    /// Index of the absorbing fail state.
    #[inline]
    pub fn fail_state(&self) -> u8 {
        self.num_states as u8
    }

    #[inline]
    pub fn is_accepting(&self, state: u8) -> bool {
        self.accepting[state as usize]
    }
}

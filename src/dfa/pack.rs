// src/dfa/pack.rs
// Packs the totalized table and accept vector into the two 16-bit-word
// images the oblivious executor indexes arithmetically.
//
// The transition table is viewed as a byte matrix (N+1) x A; two
// adjacent-by-character cells share one word so a single oblivious word
// load yields a character's transition and its odd neighbor's:
//
//   word(i, c even) = next[i][c+1] << 8 | next[i][c]
//   address(i, c)   = i * (A/2) + c/2       -- (i << 6) | (c >> 1) for A=128

use super::Dfa;

/// Word address of the pair of cells holding `next[state][ch]` and its odd
/// neighbor. The shift form used by the executor's program is derived from
/// `log2(alphabet / 2)`.
#[inline]
pub fn word_addr(state: usize, ch: usize, alphabet: usize) -> usize {
    state * (alphabet / 2) + ch / 2
}

/// Pull one cell back out of a packed word: low byte for even `ch`, high
/// byte for odd. A fixed shift/mask the executor can perform obliviously.
#[inline]
pub fn unpack_next(word: u16, ch: usize) -> u8 {
    if ch & 1 == 0 {
        (word & 0x00ff) as u8
    } else {
        (word >> 8) as u8
    }
}

/// The compiled artifacts handed to the executor: both images plus the
/// value for its state register. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaImages {
    /// `(num_states + 1) * A / 2` words, row-major over state then
    /// character pairs.
    pub transitions: Vec<u16>,
    /// One word per state index `0..=num_states`, low bit set when
    /// accepting. Uniform single-index addressing, no pairing.
    pub accept: Vec<u16>,
    /// Initial value of the executor's state register.
    pub initial: u16,
    /// Alphabet bit width the table was compiled for.
    pub char_bits: u32,
    /// Real states; the fail index equals `num_states`.
    pub num_states: u16,
}

impl DfaImages {
    /// Serialize `dfa` into the packed layout. Pure and total: the
    /// totalizer already guarantees every cell holds a valid index.
    pub fn pack(dfa: &Dfa) -> DfaImages {
        let alphabet = dfa.alphabet_size();
        let rows = dfa.num_states + 1;

        let mut transitions = Vec::with_capacity(rows * alphabet / 2);
        for i in 0..rows {
            let row = &dfa.next[i * alphabet..(i + 1) * alphabet];
            for pair in row.chunks_exact(2) {
                transitions.push((pair[1] as u16) << 8 | pair[0] as u16);
            }
        }

        let accept = dfa.accepting.iter().map(|&a| a as u16).collect();

        DfaImages {
            transitions,
            accept,
            initial: dfa.initial as u16,
            char_bits: dfa.char_bits,
            num_states: dfa.num_states as u16,
        }
    }

    #[inline]
    pub fn alphabet_size(&self) -> usize {
        1 << self.char_bits
    }

    /// Next state via the executor's primitive: one word load, then a
    /// shift/mask to pick the byte.
    #[inline]
    pub fn next_state(&self, state: u16, ch: usize) -> u16 {
        let word = self.transitions[word_addr(state as usize, ch, self.alphabet_size())];
        unpack_next(word, ch) as u16
    }

    /// Walk `input` exactly as the oblivious program would: address
    /// arithmetic and word loads only.
    pub fn run(&self, input: &[u8]) -> u16 {
        let mask = self.alphabet_size() - 1;
        let mut state = self.initial;
        for &b in input {
            state = self.next_state(state, b as usize & mask);
        }
        state
    }

    /// Acceptance through the accept image, one word load per query.
    #[inline]
    pub fn is_accepting(&self, state: u16) -> bool {
        self.accept[state as usize] & 1 == 1
    }
}

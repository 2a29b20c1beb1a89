// src/dfa/eval.rs
// Plain (non-oblivious) walk of the totalized table. This is the logical
// specification of what the oblivious executor computes, and the oracle the
// tests compare the packed images against.

use super::Dfa;

impl Dfa {
    /// Final state after consuming `input`, masking each byte to
    /// `char_bits` bits. Landing in the fail state is permanent: it is
    /// absorbing, so the walk never leaves it again.
    pub fn run(&self, input: &[u8]) -> u8 {
        let alphabet = self.alphabet_size();
        let mask = alphabet - 1;
        let mut state = self.initial as usize;
        for &b in input {
            state = self.next[state * alphabet + (b as usize & mask)] as usize;
        }
        state as u8
    }

    /// The state occupied *before* each byte is consumed; same length as
    /// `input`. Used to check an executor's state-register trace step by
    /// step.
    pub fn state_sequence(&self, input: &[u8]) -> Vec<u8> {
        let alphabet = self.alphabet_size();
        let mask = alphabet - 1;
        let mut states = Vec::with_capacity(input.len());
        let mut state = self.initial as usize;
        for &b in input {
            states.push(state as u8);
            state = self.next[state * alphabet + (b as usize & mask)] as usize;
        }
        states
    }
}

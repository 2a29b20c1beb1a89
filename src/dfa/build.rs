// src/dfa/build.rs
// Adapter + totalizer: external automaton -> dense total transition table.

use hashbrown::HashMap;

use super::source::{AutomatonSource, RegexAutomaton};
use super::{Dfa, MAX_STATES};
use crate::error::{CompileError, Result};

impl Dfa {
    /// All-fail table: every transition of every state goes to the fail
    /// index, nothing accepts, initial 0. The starting point for adaptation
    /// and for hand-built automatons in tests.
    pub fn empty(num_states: usize, char_bits: u32) -> Result<Dfa> {
        if !(1..=8).contains(&char_bits) {
            return Err(CompileError::InvalidCharWidth(char_bits));
        }
        if num_states > MAX_STATES {
            return Err(CompileError::TooManyStates {
                states: num_states,
                max: MAX_STATES,
            });
        }
        let alphabet = 1usize << char_bits;
        Ok(Dfa {
            num_states,
            char_bits,
            next: vec![num_states as u8; (num_states + 1) * alphabet],
            accepting: vec![false; num_states + 1],
            initial: 0,
        })
    }

    /// Compile `pattern` with the external regex engine, then adapt the
    /// resulting automaton. Equivalent inputs produce bit-identical tables.
    pub fn from_regex(pattern: &str, char_bits: u32, char_offset: u32) -> Result<Dfa> {
        let source = RegexAutomaton::new(pattern)?;
        Dfa::from_source(&source, char_bits, char_offset)
    }

    /// Adapt an external automaton into a totalized DFA.
    ///
    /// Each edge is clipped to `[char_offset, char_offset + A - 1]` and
    /// rebased by subtracting `char_offset`; edges entirely outside that
    /// window are dropped without error (they cover characters this
    /// position can never see). A state left with no live edges simply
    /// sends every character to the fail state.
    pub fn from_source(
        source: &impl AutomatonSource,
        char_bits: u32,
        char_offset: u32,
    ) -> Result<Dfa> {
        let states = source.states();
        let mut dfa = Dfa::empty(states.len(), char_bits)?;
        let alphabet = dfa.alphabet_size() as u32;

        let mut index: HashMap<u32, u8> = HashMap::with_capacity(states.len());
        for (i, &handle) in states.iter().enumerate() {
            if index.insert(handle, i as u8).is_some() {
                return Err(CompileError::MalformedAutomaton { state: handle });
            }
        }

        for (i, &handle) in states.iter().enumerate() {
            dfa.accepting[i] = source.is_accepting(handle);

            for edge in source.edges(handle) {
                let dest = *index
                    .get(&edge.dest)
                    .ok_or(CompileError::MalformedAutomaton { state: edge.dest })?;

                // Clip to the visible window, then rebase to [0, A).
                if edge.max < char_offset || edge.min >= char_offset.saturating_add(alphabet) {
                    continue;
                }
                let lo = edge.min.max(char_offset) - char_offset;
                let hi = edge.max.min(char_offset.saturating_add(alphabet - 1)) - char_offset;
                let row = i * alphabet as usize;
                for c in lo..=hi {
                    dfa.next[row + c as usize] = dest;
                }
            }
        }

        dfa.initial = *index
            .get(&source.initial())
            .ok_or(CompileError::MalformedAutomaton {
                state: source.initial(),
            })?;

        log::debug!(
            "adapted automaton: {} states + fail, {}-bit chars, offset {}",
            dfa.num_states,
            char_bits,
            char_offset
        );
        Ok(dfa)
    }
}

#[cfg(test)]
mod tests {
    use super::super::source::{AutomatonSource, Edge};
    use super::*;

    /// Hand-rolled source with sparse, unordered handles.
    struct FixedSource {
        states: Vec<u32>,
        initial: u32,
        accepting: Vec<u32>,
        edges: Vec<(u32, Edge)>,
    }

    impl AutomatonSource for FixedSource {
        fn states(&self) -> Vec<u32> {
            self.states.clone()
        }
        fn initial(&self) -> u32 {
            self.initial
        }
        fn is_accepting(&self, state: u32) -> bool {
            self.accepting.contains(&state)
        }
        fn edges(&self, state: u32) -> Vec<Edge> {
            self.edges
                .iter()
                .filter(|(s, _)| *s == state)
                .map(|(_, e)| *e)
                .collect()
        }
    }

    fn two_state_source() -> FixedSource {
        // handles 42 -> 'a'..'c' -> 7; 7 accepts
        FixedSource {
            states: vec![42, 7],
            initial: 42,
            accepting: vec![7],
            edges: vec![(
                42,
                Edge {
                    min: b'a' as u32,
                    max: b'c' as u32,
                    dest: 7,
                },
            )],
        }
    }

    #[test]
    fn rejects_bad_char_widths() {
        assert!(matches!(
            Dfa::empty(3, 0),
            Err(CompileError::InvalidCharWidth(0))
        ));
        assert!(matches!(
            Dfa::empty(3, 9),
            Err(CompileError::InvalidCharWidth(9))
        ));
    }

    #[test]
    fn rejects_oversized_automatons() {
        assert!(Dfa::empty(MAX_STATES, 8).is_ok());
        assert!(matches!(
            Dfa::empty(MAX_STATES + 1, 8),
            Err(CompileError::TooManyStates { .. })
        ));
    }

    #[test]
    fn dense_indices_follow_states_order() {
        let dfa = Dfa::from_source(&two_state_source(), 8, 0).unwrap();
        assert_eq!(dfa.num_states, 2);
        assert_eq!(dfa.initial, 0); // handle 42 came first
        assert!(!dfa.accepting[0]);
        assert!(dfa.accepting[1]); // handle 7
        assert_eq!(dfa.next[b'b' as usize], 1);
    }

    #[test]
    fn table_is_total_with_absorbing_fail_row() {
        let dfa = Dfa::from_source(&two_state_source(), 8, 0).unwrap();
        let alphabet = dfa.alphabet_size();
        let fail = dfa.fail_state();
        for i in 0..=dfa.num_states {
            for c in 0..alphabet {
                assert!(dfa.next[i * alphabet + c] <= fail);
            }
        }
        for c in 0..alphabet {
            assert_eq!(dfa.next[dfa.num_states * alphabet + c], fail);
        }
        assert!(!dfa.accepting[dfa.num_states]);
    }

    #[test]
    fn offset_clips_and_rebases_edges() {
        // window ['a', 'a'+3]; the 'a'..'c' edge becomes codes 0..=2
        let dfa = Dfa::from_source(&two_state_source(), 2, b'a' as u32).unwrap();
        assert_eq!(dfa.next[0], 1);
        assert_eq!(dfa.next[2], 1);
        assert_eq!(dfa.next[3], dfa.fail_state());

        // window entirely below the edge: edge is silently dropped
        let dfa = Dfa::from_source(&two_state_source(), 2, 0).unwrap();
        let fail = dfa.fail_state();
        assert!(dfa.next[..dfa.alphabet_size()].iter().all(|&d| d == fail));
    }

    #[test]
    fn overlapping_ranges_last_edge_wins() {
        let src = FixedSource {
            states: vec![1, 2, 3],
            initial: 1,
            accepting: vec![],
            edges: vec![
                (1, Edge { min: 0, max: 9, dest: 2 }),
                (1, Edge { min: 5, max: 9, dest: 3 }),
            ],
        };
        let dfa = Dfa::from_source(&src, 4, 0).unwrap();
        assert_eq!(dfa.next[4], 1);
        assert_eq!(dfa.next[5], 2);
    }

    #[test]
    fn dangling_edge_destination_is_malformed() {
        let src = FixedSource {
            states: vec![1],
            initial: 1,
            accepting: vec![],
            edges: vec![(1, Edge { min: 0, max: 1, dest: 99 })],
        };
        assert!(matches!(
            Dfa::from_source(&src, 8, 0),
            Err(CompileError::MalformedAutomaton { state: 99 })
        ));
    }

    #[test]
    fn duplicate_handles_are_malformed() {
        let src = FixedSource {
            states: vec![1, 1],
            initial: 1,
            accepting: vec![],
            edges: vec![],
        };
        assert!(matches!(
            Dfa::from_source(&src, 8, 0),
            Err(CompileError::MalformedAutomaton { state: 1 })
        ));
    }
}

// src/dfa/source.rs
// Boundary to the external automaton-construction engine.

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use regex_automata::{
    Anchored, Input, MatchKind,
    dfa::{Automaton, StartKind, dense},
    util::{primitives::StateID, syntax},
};

use crate::error::{CompileError, Result};

/// One character-range transition: every code in `min..=max` moves the
/// automaton to `dest`. Bounds are in the engine's character space, before
/// any offset rebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub min: u32,
    pub max: u32,
    pub dest: u32,
}

/// Narrow view of an externally built automaton.
///
/// State handles are opaque `u32`s: they need not be contiguous or ordered,
/// only distinct. Dense indices are assigned by the order of
/// [`states`](Self::states), so an implementation must return the same order
/// for the same automaton or downstream images stop being reproducible.
/// Where ranges returned by [`edges`](Self::edges) overlap, the later edge
/// wins.
pub trait AutomatonSource {
    /// Every state, in dense-index assignment order.
    fn states(&self) -> Vec<u32>;
    /// The start state. Must appear in [`states`](Self::states).
    fn initial(&self) -> u32;
    fn is_accepting(&self, state: u32) -> bool;
    fn edges(&self, state: u32) -> Vec<Edge>;
}

/// An [`AutomatonSource`] compiled from a regular expression by
/// `regex-automata`'s dense DFA engine.
///
/// The DFA is anchored at both ends, so running it over a whole input and
/// testing acceptance gives exact-match semantics. To search for a substring
/// instead, wrap the pattern as `.*pat.*`.
pub struct RegexAutomaton {
    states: Vec<u32>,
    edges: HashMap<u32, Vec<Edge>>,
    accepting: HashSet<u32>,
    initial: u32,
}

impl RegexAutomaton {
    pub fn new(pattern: &str) -> Result<Self> {
        let dfa = dense::Builder::new()
            .configure(
                dense::Config::new()
                    .start_kind(StartKind::Anchored)
                    // All-matches determinization: whole-input acceptance
                    // must survive alternations like `a|ab`.
                    .match_kind(MatchKind::All)
                    .minimize(true)
                    .byte_classes(false),
            )
            .syntax(syntax::Config::new().unicode(false).utf8(false))
            .build(pattern)?;

        let start = dfa
            .start_state_forward(&Input::new("").anchored(Anchored::Yes))
            .map_err(|e| CompileError::Start(e.to_string()))?;

        // Breadth-first discovery from the start state, bytes in increasing
        // order. This is the dense-index assignment order, so it has to stay
        // deterministic.
        let mut states = Vec::new();
        let mut edges: HashMap<u32, Vec<Edge>> = HashMap::new();
        let mut accepting: HashSet<u32> = HashSet::new();
        let mut seen: HashSet<u32> = HashSet::new();
        let mut queue: VecDeque<StateID> = VecDeque::new();

        seen.insert(start.as_usize() as u32);
        queue.push_back(start);

        while let Some(sid) = queue.pop_front() {
            let handle = sid.as_usize() as u32;
            states.push(handle);

            // Dense DFAs signal a whole-input match one step late, on the
            // end-of-input transition.
            if dfa.is_match_state(dfa.next_eoi_state(sid)) {
                accepting.insert(handle);
            }

            let mut out = Vec::new();
            let mut run: Option<(u8, u8, StateID)> = None;
            for b in 0..=255u8 {
                let next = dfa.next_state(sid, b);
                let live = !dfa.is_dead_state(next) && !dfa.is_quit_state(next);
                run = match run {
                    Some((min, _, dest)) if live && next == dest => Some((min, b, dest)),
                    prev => {
                        if let Some((min, max, dest)) = prev {
                            out.push(Edge {
                                min: min as u32,
                                max: max as u32,
                                dest: dest.as_usize() as u32,
                            });
                        }
                        if live { Some((b, b, next)) } else { None }
                    }
                };
                if live && seen.insert(next.as_usize() as u32) {
                    queue.push_back(next);
                }
            }
            if let Some((min, max, dest)) = run {
                out.push(Edge {
                    min: min as u32,
                    max: max as u32,
                    dest: dest.as_usize() as u32,
                });
            }
            edges.insert(handle, out);
        }

        log::debug!(
            "regex {:?}: {} reachable states, {} accepting",
            pattern,
            states.len(),
            accepting.len()
        );

        Ok(Self {
            states,
            edges,
            accepting,
            initial: start.as_usize() as u32,
        })
    }
}

impl AutomatonSource for RegexAutomaton {
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
        self.edges.get(&state).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_is_deterministic() {
        let a = RegexAutomaton::new("abcde|.*xyz.*").unwrap();
        let b = RegexAutomaton::new("abcde|.*xyz.*").unwrap();
        assert_eq!(a.states(), b.states());
        assert_eq!(a.initial(), b.initial());
        for &s in &a.states() {
            assert_eq!(a.edges(s), b.edges(s));
        }
    }

    #[test]
    fn edges_are_maximal_disjoint_ranges() {
        let src = RegexAutomaton::new("[a-z]+").unwrap();
        for &s in &src.states() {
            let edges = src.edges(s);
            for pair in edges.windows(2) {
                // ranges come out in increasing order and never touch when
                // they share a destination (touching runs are merged)
                assert!(pair[0].max < pair[1].min);
                if pair[0].max + 1 == pair[1].min {
                    assert_ne!(pair[0].dest, pair[1].dest);
                }
            }
        }
    }

    #[test]
    fn initial_state_is_listed_first() {
        let src = RegexAutomaton::new("ab*").unwrap();
        assert_eq!(src.states()[0], src.initial());
    }
}

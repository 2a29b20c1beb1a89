// src/error.rs
// Structural failures detected before any packed output is produced.

use thiserror::Error;

/// Errors raised while adapting an automaton into a packed DFA.
///
/// All variants are precondition failures: compilation is deterministic,
/// so retrying with the same input fails the same way. Either all three
/// artifacts (transition image, accept image, initial index) are
/// produced, or none are.
#[derive(Error, Debug)]
pub enum CompileError {
    /// Requested alphabet width cannot be packed two cells per word.
    #[error("char width must be 1..=8 bits, got {0}")]
    InvalidCharWidth(u32),

    /// The automaton (plus the fail state) does not fit the one-byte
    /// state pointer used by the packed image.
    #[error("automaton has {states} states; at most {max} fit an 8-bit state pointer")]
    TooManyStates { states: usize, max: usize },

    /// The source automaton references a state it never (uniquely)
    /// declared. A contract violation by the construction engine.
    #[error("automaton references undeclared or duplicated state {state}")]
    MalformedAutomaton { state: u32 },

    /// The external engine rejected the regular expression.
    #[error("regex compilation failed: {0}")]
    Build(#[from] regex_automata::dfa::dense::BuildError),

    /// The engine produced no usable anchored start state.
    #[error("no anchored start state: {0}")]
    Start(String),
}

pub type Result<T> = std::result::Result<T, CompileError>;

// src/lib.rs
//! Compiles regular expressions into packed DFA transition images for a
//! secure-computation executor that can only perform indexed word loads.

pub mod dfa;
pub mod error;

pub use error::{CompileError, Result};

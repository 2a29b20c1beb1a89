// src/main.rs
use obgrep::dfa::{Dfa, DfaImages};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // A search-anywhere wrapper around a literal, the way the secure grep
    // session frames its patterns.
    let pattern = ".*xyz.*";
    let dfa = Dfa::from_regex(pattern, 7, 0)?;
    let images = DfaImages::pack(&dfa);

    println!(
        "compiled /{}/: {} states + fail, {} transition words, initial state {}",
        pattern,
        dfa.num_states,
        images.transitions.len(),
        images.initial
    );

    for input in ["abcxyzdef", "abcdef", "xy"] {
        let state = dfa.run(input.as_bytes());
        println!(
            "  {:?} -> state {} ({})",
            input,
            state,
            if dfa.is_accepting(state) { "match" } else { "no match" }
        );
    }
    Ok(())
}

// src/bin/dfa_graph.rs
// Print a Graphviz view of the DFA compiled from a regex.
// Usage:
//   cargo run --bin dfa_graph -- <regex>            # to stdout
//   cargo run --bin dfa_graph -- <regex> <outfile>
// Env:
//   DFA_CHAR_BITS    alphabet width in bits (default 7)
//   DFA_CHAR_OFFSET  character offset (default 0)

use std::{env, fs, io::Write, path::Path};

use obgrep::dfa::{Dfa, write_dot};

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(default)
}

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(pattern) = args.next() else {
        eprintln!("usage: dfa_graph <regex> [outfile]");
        std::process::exit(2);
    };

    let dfa = match Dfa::from_regex(
        &pattern,
        env_u32("DFA_CHAR_BITS", 7),
        env_u32("DFA_CHAR_OFFSET", 0),
    ) {
        Ok(dfa) => dfa,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let name = format!("DFA /{pattern}/");
    let result = match args.next() {
        Some(path) => fs::File::create(Path::new(&path))
            .and_then(|mut f| write_dot(&dfa, &name, &mut f)),
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_dot(&dfa, &name, &mut out).and_then(|()| out.flush())
        }
    };
    if let Err(e) = result {
        eprintln!("error: failed to write graph: {e}");
        std::process::exit(1);
    }
}

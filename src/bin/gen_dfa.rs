// src/bin/gen_dfa.rs
// Compile a regex into packed DFA images and write them to disk.
// Usage:
//   cargo run --bin gen_dfa -- <regex> [out_base]   # writes <out_base>.bin/.json
// Env:
//   DFA_CHAR_BITS    alphabet width in bits (default 7)
//   DFA_CHAR_OFFSET  character offset (default 0)
//   DFA_GRAPH        also write a Graphviz dump to this path

use std::{env, fs, path::Path};

use obgrep::dfa::io::{save_images_bin, save_images_json};
use obgrep::dfa::{Dfa, DfaImages, write_dot};

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
        eprintln!("usage: gen_dfa <regex> [out_base]");
        std::process::exit(2);
    };
    let out_base = args.next().unwrap_or_else(|| "tables/dfa".to_string());

    let char_bits = env_u32("DFA_CHAR_BITS", 7);
    let char_offset = env_u32("DFA_CHAR_OFFSET", 0);

    let dfa = match Dfa::from_regex(&pattern, char_bits, char_offset) {
        Ok(dfa) => dfa,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let images = DfaImages::pack(&dfa);

    println!(
        "[gen_dfa] /{}/ -> {} states + fail, {} transition words ({} bytes), initial state {}",
        pattern,
        dfa.num_states,
        images.transitions.len(),
        images.transitions.len() * 2,
        images.initial
    );

    if let Some(parent) = Path::new(&out_base).parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("error: failed to create {}: {e}", parent.display());
            std::process::exit(1);
        }
    }

    let bin_path = format!("{out_base}.bin");
    if let Err(e) = save_images_bin(Path::new(&bin_path), &images) {
        eprintln!("error: failed to write {bin_path}: {e}");
        std::process::exit(1);
    }
    let json_path = format!("{out_base}.json");
    if let Err(e) = save_images_json(Path::new(&json_path), &images) {
        eprintln!("error: failed to write {json_path}: {e}");
        std::process::exit(1);
    }
    println!("[gen_dfa] wrote {bin_path} and {json_path}");

    // Visualization is best-effort: a bad sink must not discard the images
    // we just produced.
    if let Ok(graph_path) = env::var("DFA_GRAPH") {
        let result = fs::File::create(&graph_path)
            .and_then(|mut f| write_dot(&dfa, &pattern, &mut f));
        match result {
            Ok(()) => println!("[gen_dfa] wrote {graph_path}"),
            Err(e) => log::warn!("graph output failed (images unaffected): {e}"),
        }
    }
}

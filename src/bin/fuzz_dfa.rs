// src/bin/fuzz_dfa.rs
// Push random inputs through the reference evaluator and the packed-image
// walk; any divergence is a bug in the packer or the address scheme.
// Env:
//   FUZZ_SEED   u64 seed (default: derived from the clock)
//   FUZZ_ITERS  iterations per pattern (default 200)
//   FUZZ_LEN    max input length (default 64)

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::bail;
use obgrep::dfa::{Dfa, DfaImages};
use rand::{Rng, SeedableRng, rngs::StdRng};

const PATTERNS: &[&str] = &[
    "abcde",
    "abcde|.*xyz.*|(0x[0-9a-f]+).*",
    "[ab]{1,3}a(([a-f]+|8)9)+c",
    "(a|b)*abb",
    ".*",
];

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let clock = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let seed = env_u64("FUZZ_SEED", clock);
    let iters = env_u64("FUZZ_ITERS", 200);
    let max_len = env_u64("FUZZ_LEN", 64) as usize;

    let mut rng = StdRng::seed_from_u64(seed);
    println!("[fuzz_dfa] seed={seed} iters={iters} max_len={max_len}");

    for &pattern in PATTERNS {
        let dfa = Dfa::from_regex(pattern, 7, 0)?;
        let images = DfaImages::pack(&dfa);

        for _ in 0..iters {
            let len = rng.random_range(0..=max_len);
            let input: Vec<u8> = (0..len).map(|_| rng.random()).collect();

            let reference = dfa.run(&input);
            let via_image = images.run(&input);
            if reference as u16 != via_image {
                bail!(
                    "divergence on /{pattern}/: evaluator reached {reference}, \
                     image walk reached {via_image}; input {input:?}"
                );
            }
            if dfa.is_accepting(reference) != images.is_accepting(via_image) {
                bail!("accept flag divergence on /{pattern}/ at state {reference}");
            }

            let seq = dfa.state_sequence(&input);
            if seq.len() != input.len() {
                bail!("trace length mismatch on /{pattern}/");
            }
            if let Some(&first) = seq.first() {
                if first != dfa.initial {
                    bail!("trace does not start at the initial state on /{pattern}/");
                }
            }
        }
        println!("[fuzz_dfa] /{pattern}/ ok");
    }
    Ok(())
}

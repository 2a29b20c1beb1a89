//! Packed-image properties: cell round-trips, agreement between the
//! reference evaluator and the image walk, deterministic recompiles, and
//! on-disk round-trips of both file formats.

use std::fs;

use obgrep::dfa::io::{
    load_images_bin_bytes, load_images_json_bytes, save_images_bin, save_images_json,
};
use obgrep::dfa::{Dfa, DfaImages, unpack_next, word_addr};
use rand::{Rng, SeedableRng, rngs::StdRng};

const PATTERN: &str = "abcde|.*xyz.*|(0x[0-9a-f]+).*";

#[test]
fn every_packed_cell_round_trips() {
    let dfa = Dfa::from_regex(PATTERN, 7, 0).unwrap();
    let images = DfaImages::pack(&dfa);
    let alphabet = dfa.alphabet_size();

    assert_eq!(images.transitions.len(), (dfa.num_states + 1) * alphabet / 2);
    assert_eq!(images.accept.len(), dfa.num_states + 1);

    for i in 0..=dfa.num_states {
        for c in 0..alphabet {
            let word = images.transitions[word_addr(i, c, alphabet)];
            assert_eq!(unpack_next(word, c), dfa.next[i * alphabet + c]);
        }
        assert_eq!(images.accept[i] == 1, dfa.accepting[i]);
    }
    assert_eq!(*images.accept.last().unwrap(), 0);
}

#[test]
fn evaluator_agrees_with_image_walk() {
    let dfa = Dfa::from_regex(PATTERN, 7, 0).unwrap();
    let images = DfaImages::pack(&dfa);

    let mut rng = StdRng::seed_from_u64(0x0bdfa);
    for _ in 0..500 {
        let len = rng.random_range(0..64);
        let input: Vec<u8> = (0..len).map(|_| rng.random()).collect();
        assert_eq!(dfa.run(&input) as u16, images.run(&input));
    }
}

#[test]
fn image_walk_matches_on_hand_built_cycle() {
    let n = 103usize;
    let mut dfa = Dfa::empty(n, 8).unwrap();
    dfa.initial = 7;
    let alphabet = dfa.alphabet_size();
    for i in 0..n {
        for c in 0..alphabet {
            dfa.next[i * alphabet + c] = ((i + 1) % n) as u8;
        }
    }
    let images = DfaImages::pack(&dfa);

    let input = b"some bytes of arbitrary content, high or low";
    assert_eq!(images.run(input), ((7 + input.len()) % n) as u16);
    assert_eq!(dfa.run(input) as u16, images.run(input));
}

#[test]
fn recompilation_is_bit_identical() {
    let a = DfaImages::pack(&Dfa::from_regex(PATTERN, 7, 0).unwrap());
    let b = DfaImages::pack(&Dfa::from_regex(PATTERN, 7, 0).unwrap());
    assert_eq!(a, b);
}

#[test]
fn bin_format_round_trips() {
    let images = DfaImages::pack(&Dfa::from_regex(PATTERN, 7, 0).unwrap());

    let path = std::env::temp_dir().join(format!("obgrep_images_{}.bin", std::process::id()));
    save_images_bin(&path, &images).unwrap();
    let data = fs::read(&path).unwrap();
    let _ = fs::remove_file(&path);

    let loaded = load_images_bin_bytes(&data).unwrap();
    assert_eq!(loaded, images);
}

#[test]
fn bin_format_rejects_garbage() {
    let images = DfaImages::pack(&Dfa::from_regex("ab", 7, 0).unwrap());
    let path = std::env::temp_dir().join(format!("obgrep_garbage_{}.bin", std::process::id()));
    save_images_bin(&path, &images).unwrap();
    let mut data = fs::read(&path).unwrap();
    let _ = fs::remove_file(&path);

    // truncation
    assert!(load_images_bin_bytes(&data[..data.len() - 3]).is_err());
    // bad magic
    data[0] ^= 0xff;
    assert!(load_images_bin_bytes(&data).is_err());
    // empty
    assert!(load_images_bin_bytes(&[]).is_err());
}

#[test]
fn json_format_round_trips() {
    let images = DfaImages::pack(&Dfa::from_regex(PATTERN, 7, 0).unwrap());

    let path = std::env::temp_dir().join(format!("obgrep_images_{}.json", std::process::id()));
    save_images_json(&path, &images).unwrap();
    let data = fs::read(&path).unwrap();
    let _ = fs::remove_file(&path);

    let loaded = load_images_json_bytes(&data).unwrap();
    assert_eq!(loaded, images);

    assert!(load_images_json_bytes(b"{not json").is_err());
}

// src/dfa/io.rs
// On-disk forms of the packed images, for handing off to the executor's
// loader out of process:
//   bin:  magic "OBDFA001", u32 num_states, u32 char_bits, u32 initial,
//         u32 reserved, then transition words, then accept words (LE u16)
//   json: serde mirror of the same fields

use std::io::{BufWriter, Write};

use serde::{Deserialize, Serialize};

use super::pack::DfaImages;
use super::MAX_STATES;

const BIN_MAGIC: &[u8; 8] = b"OBDFA001";

// -------------------- JSON (de)serialization --------------------

#[derive(Serialize, Deserialize)]
struct ImagesDisk {
    num_states: u16,
    char_bits: u32,
    initial: u16,
    transitions: Vec<u16>,
    accept: Vec<u16>,
}

impl From<&DfaImages> for ImagesDisk {
    fn from(images: &DfaImages) -> Self {
        Self {
            num_states: images.num_states,
            char_bits: images.char_bits,
            initial: images.initial,
            transitions: images.transitions.clone(),
            accept: images.accept.clone(),
        }
    }
}

impl ImagesDisk {
    fn into_images(self) -> DfaImages {
        DfaImages {
            transitions: self.transitions,
            accept: self.accept,
            initial: self.initial,
            char_bits: self.char_bits,
            num_states: self.num_states,
        }
    }
}

pub fn save_images_json(path: &std::path::Path, images: &DfaImages) -> std::io::Result<()> {
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, &ImagesDisk::from(images))?;
    w.flush()
}

pub fn load_images_json_bytes(data: &[u8]) -> Result<DfaImages, String> {
    serde_json::from_slice::<ImagesDisk>(data)
        .map(ImagesDisk::into_images)
        .map_err(|e| format!("failed to parse images JSON: {e}"))
}

// -------------------- Compact binary --------------------

pub fn save_images_bin(path: &std::path::Path, images: &DfaImages) -> std::io::Result<()> {
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);

    w.write_all(BIN_MAGIC)?;
    w.write_all(&(images.num_states as u32).to_le_bytes())?;
    w.write_all(&images.char_bits.to_le_bytes())?;
    w.write_all(&(images.initial as u32).to_le_bytes())?;
    w.write_all(&0u32.to_le_bytes())?;

    let mut buf = Vec::with_capacity((images.transitions.len() + images.accept.len()) * 2);
    for &word in &images.transitions {
        buf.extend_from_slice(&word.to_le_bytes());
    }
    for &word in &images.accept {
        buf.extend_from_slice(&word.to_le_bytes());
    }
    w.write_all(&buf)?;
    w.flush()
}

#[inline]
fn take_u32(buf: &mut &[u8]) -> Result<u32, String> {
    if buf.len() < 4 {
        return Err("truncated u32".into());
    }
    let mut le = [0u8; 4];
    le.copy_from_slice(&buf[..4]);
    *buf = &buf[4..];
    Ok(u32::from_le_bytes(le))
}

#[inline]
fn take_u16(buf: &mut &[u8]) -> Result<u16, String> {
    if buf.len() < 2 {
        return Err("truncated u16".into());
    }
    let mut le = [0u8; 2];
    le.copy_from_slice(&buf[..2]);
    *buf = &buf[2..];
    Ok(u16::from_le_bytes(le))
}

pub fn load_images_bin_bytes(mut data: &[u8]) -> Result<DfaImages, String> {
    if data.len() < 8 + 16 {
        return Err("images bin too short".into());
    }
    let mut magic = [0u8; 8];
    magic.copy_from_slice(&data[..8]);
    if &magic != BIN_MAGIC {
        return Err("bad magic in images .bin".into());
    }
    data = &data[8..];

    let num_states = take_u32(&mut data)? as usize;
    let char_bits = take_u32(&mut data)?;
    let initial = take_u32(&mut data)?;
    let _reserved = take_u32(&mut data)?;

    if !(1..=8).contains(&char_bits) {
        return Err(format!("bad char width {char_bits} in images .bin"));
    }
    if num_states > MAX_STATES {
        return Err(format!("num_states {num_states} out of range"));
    }
    if initial as usize > num_states {
        return Err(format!("initial state {initial} out of range"));
    }

    let alphabet = 1usize << char_bits;
    let n_transitions = (num_states + 1) * alphabet / 2;
    let mut transitions = Vec::with_capacity(n_transitions);
    for _ in 0..n_transitions {
        transitions.push(take_u16(&mut data)?);
    }

    let mut accept = Vec::with_capacity(num_states + 1);
    for _ in 0..=num_states {
        accept.push(take_u16(&mut data)?);
    }

    Ok(DfaImages {
        transitions,
        accept,
        initial: initial as u16,
        char_bits,
        num_states: num_states as u16,
    })
}

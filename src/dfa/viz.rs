// src/dfa/viz.rs
// Graphviz dump of a compiled DFA for debugging. Edges into the fail state
// are not drawn: with a totalized table they would dominate the picture
// while saying nothing.

use std::collections::BTreeMap;
use std::io::{self, Write};

use super::Dfa;

fn format_char(ch: usize) -> String {
    if ch == '"' as usize {
        return "\\\"".to_string();
    }
    if (0x21..0x7f).contains(&ch) {
        // leading space keeps single printables visually distinct from
        // control labels like 0x0a
        format!(" {}", ch as u8 as char)
    } else {
        format!("0x{ch:02x}")
    }
}

fn push_label(labels: &mut BTreeMap<u8, String>, fail: u8, dest: u8, lo: usize, hi: usize) {
    if dest == fail {
        return;
    }
    let mut label = format_char(lo);
    if hi > lo {
        // two adjacent codes join with ',', three or more collapse to a range
        label.push_str(if hi - lo > 1 { "-" } else { "," });
        label.push_str(&format_char(hi));
    }
    labels
        .entry(dest)
        .and_modify(|cur| {
            cur.push(',');
            cur.push_str(&label);
        })
        .or_insert(label);
}

/// Scan one row of the totalized table and collapse consecutive characters
/// with the same destination into one label per destination.
fn row_labels(dfa: &Dfa, state: usize) -> BTreeMap<u8, String> {
    let alphabet = dfa.alphabet_size();
    let row = &dfa.next[state * alphabet..(state + 1) * alphabet];

    let mut labels = BTreeMap::new();
    let mut range_start = 0usize;
    let mut current = row[0];
    for (c, &dest) in row.iter().enumerate().skip(1) {
        if dest != current {
            push_label(&mut labels, dfa.fail_state(), current, range_start, c - 1);
            range_start = c;
            current = dest;
        }
    }
    push_label(
        &mut labels,
        dfa.fail_state(),
        current,
        range_start,
        alphabet - 1,
    );
    labels
}

/// Write a `digraph` description of `dfa`: nodes labeled with their dense
/// index, the initial state tagged `[Start]`, accepting states drawn with a
/// double periphery. Destinations are emitted in ascending index order so
/// dumps are diffable. Best-effort debug output; a failure here must never
/// abort the compilation whose result is being drawn.
pub fn write_dot(dfa: &Dfa, name: &str, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "digraph \"{}\" {{", name.replace('"', "\\\""))?;
    for i in 0..dfa.num_states {
        let start = if i == dfa.initial as usize {
            "\\n[Start]"
        } else {
            ""
        };
        let accepts = if dfa.accepting[i] {
            ",peripheries=2"
        } else {
            ""
        };
        writeln!(out, "  n{i} [label=\"{i}{start}\"{accepts}];")?;

        for (dest, label) in row_labels(dfa, i) {
            writeln!(out, "    n{i} -> n{dest} [label=\"{label}\"];")?;
        }
    }
    writeln!(out, "}}")
}

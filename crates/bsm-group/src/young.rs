//! Littlewood–Richardson products of Young diagrams with at most `n` rows.

use std::collections::BTreeMap;

/// Skew tableau under construction: current shape plus, for every row, how
/// many boxes carry each label.
#[derive(Clone)]
struct Filling {
    shape: Vec<u32>,
    counts: Vec<Vec<u32>>,
}

/// Littlewood–Richardson coefficients of `lambda ⊗ mu`, restricted to
/// diagrams with at most `n` rows. Both inputs have length `n`.
pub(crate) fn lr_product(lambda: &[u32], mu: &[u32], n: usize) -> BTreeMap<Vec<u32>, u64> {
    let labels: Vec<u32> = mu.iter().copied().take_while(|&len| len > 0).collect();
    let mut states = vec![Filling {
        shape: lambda.to_vec(),
        counts: vec![vec![0; labels.len()]; n],
    }];
    for (label, &size) in labels.iter().enumerate() {
        let mut next = Vec::new();
        for state in &states {
            let mut added = vec![0u32; n];
            add_strip(state, label, size, 0, &mut added, &mut next);
        }
        states = next;
    }

    let mut product = BTreeMap::new();
    for state in states {
        if is_lattice(&state.counts) {
            *product.entry(state.shape).or_insert(0u64) += 1;
        }
    }
    product
}

/// Adds a horizontal strip of `remaining` boxes labelled `label`, row by row.
/// Label `r` never lands above row `r`, and rows beyond `n` are discarded.
fn add_strip(
    state: &Filling,
    label: usize,
    remaining: u32,
    row: usize,
    added: &mut [u32],
    out: &mut Vec<Filling>,
) {
    if remaining == 0 {
        let mut filled = state.clone();
        for (idx, &extra) in added.iter().enumerate() {
            filled.shape[idx] += extra;
            filled.counts[idx][label] += extra;
        }
        out.push(filled);
        return;
    }
    if row >= state.shape.len() {
        return;
    }
    let cap = if row < label {
        0
    } else if row == 0 {
        remaining
    } else {
        // new row length may not pass the old row above
        (state.shape[row - 1] - state.shape[row]).min(remaining)
    };
    for extra in (0..=cap).rev() {
        added[row] = extra;
        add_strip(state, label, remaining - extra, row + 1, added, out);
    }
    added[row] = 0;
}

/// Reading word (rows top to bottom, each right to left) must be a lattice word.
fn is_lattice(counts: &[Vec<u32>]) -> bool {
    let width = counts.first().map_or(0, Vec::len);
    let mut seen = vec![0u32; width];
    for row in counts {
        for label in (0..width).rev() {
            for _ in 0..row[label] {
                seen[label] += 1;
                if label > 0 && seen[label] > seen[label - 1] {
                    return false;
                }
            }
        }
    }
    true
}

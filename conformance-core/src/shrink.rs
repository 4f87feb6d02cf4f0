//! Choice-sequence shrinking.
//!
//! A failing case is identified with the choices it drew. Shrinking edits
//! that sequence (deleting blocks, lowering individual choices), replays the
//! edited sequence, and keeps the edit when the replay still fails and the
//! choices it actually drew are smaller in shortlex order.

use std::cmp::Ordering;

/// Block sizes tried by deletion passes, largest first.
const DELETION_BLOCKS: [usize; 4] = [8, 4, 2, 1];

/// Result of a shrinking run.
#[derive(Debug, Clone)]
pub struct Shrunk<F> {
    /// Choice sequence of the smallest failure found.
    pub choices: Vec<u64>,
    /// The smallest failure found.
    pub failure: F,
    /// Every accepted failure, in order.
    pub accepted: Vec<F>,
    /// Number of replays spent.
    pub replays: usize,
}

/// Shortlex order: shorter sequences first, then lexicographic.
pub fn shortlex(a: &[u64], b: &[u64]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Candidate edits of `choices`, roughly most-promising first.
pub fn candidates(choices: &[u64]) -> Vec<Vec<u64>> {
    let mut result = Vec::new();

    for block in DELETION_BLOCKS {
        if block > choices.len() {
            continue;
        }
        for start in 0..=(choices.len() - block) {
            let mut candidate = choices[..start].to_vec();
            candidate.extend_from_slice(&choices[start + block..]);
            result.push(candidate);
        }
    }

    for (index, &value) in choices.iter().enumerate() {
        if value == 0 {
            continue;
        }
        for lowered in [0, value / 2, value - 1] {
            if lowered < value {
                let mut candidate = choices.to_vec();
                candidate[index] = lowered;
                result.push(candidate);
            }
        }
    }

    result
}

/// Greedily shrink a failing choice sequence.
///
/// `replay` runs the case on a candidate sequence and returns the choices it
/// drew together with the failure, or `None` when the case did not fail.
pub fn shrink<F, R>(initial: Vec<u64>, failure: F, limit: usize, mut replay: R) -> Shrunk<F>
where
    F: Clone,
    R: FnMut(&[u64]) -> Option<(Vec<u64>, F)>,
{
    let mut current = initial;
    let mut best = failure;
    let mut accepted = Vec::new();
    let mut replays = 0;

    'search: loop {
        let mut improved = false;
        for candidate in candidates(&current) {
            if replays >= limit {
                break 'search;
            }
            replays += 1;

            if let Some((recorded, found)) = replay(&candidate) {
                if shortlex(&recorded, &current) == Ordering::Less {
                    tracing::trace!(choices = recorded.len(), "shrink accepted");
                    current = recorded;
                    best = found.clone();
                    accepted.push(found);
                    improved = true;
                    break;
                }
            }
        }
        if !improved {
            break;
        }
    }

    Shrunk {
        choices: current,
        failure: best,
        accepted,
        replays,
    }
}

//! Shot sampling from a final probability distribution.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Measurement counts keyed by bitstring, qubit 0 rightmost.
pub type Counts = BTreeMap<String, u64>;

/// Draw `shots` basis states from `probabilities`.
///
/// A fixed `seed` makes the draw reproducible.
pub fn sample_counts(
    probabilities: &[f64],
    num_qubits: u32,
    shots: u32,
    seed: Option<u64>,
) -> Counts {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let cumulative: Vec<f64> = probabilities
        .iter()
        .scan(0.0, |acc, p| {
            *acc += p;
            Some(*acc)
        })
        .collect();
    let total = cumulative.last().copied().unwrap_or(0.0);

    let mut hits: FxHashMap<usize, u64> = FxHashMap::default();
    if total > 0.0 {
        for _ in 0..shots {
            let r = rng.r#gen::<f64>() * total;
            let outcome = cumulative
                .partition_point(|&c| c <= r)
                .min(cumulative.len() - 1);
            *hits.entry(outcome).or_default() += 1;
        }
    }

    hits.into_iter()
        .map(|(outcome, n)| (outcome_to_bitstring(outcome, num_qubits), n))
        .collect()
}

/// Render a basis-state index as a bitstring with qubit 0 rightmost.
pub fn outcome_to_bitstring(outcome: usize, num_qubits: u32) -> String {
    format!("{:0width$b}", outcome, width = num_qubits as usize)
}

//! Measurement probabilities and circuit metrics.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use qvis_ir::{Circuit, QubitId};

use crate::statevector::Statevector;

/// Outcome probabilities of a single qubit, summed over all others.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginalProbability {
    /// Qubit index.
    pub qubit: u32,
    /// P(qubit = 0).
    pub prob_0: f64,
    /// P(qubit = 1).
    pub prob_1: f64,
}

/// Structural metrics of a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitMetrics {
    /// Longest chain of operations ordered by shared qubits.
    pub depth: usize,
    /// Number of operations.
    pub size: usize,
}

/// `|a_i|²` for every basis state `i`.
pub fn probabilities(sv: &Statevector) -> Vec<f64> {
    let amps = sv.amplitudes();
    if sv.is_parallel() {
        amps.par_iter().map(|a| a.norm_sqr()).collect()
    } else {
        amps.iter().map(|a| a.norm_sqr()).collect()
    }
}

/// Marginal outcome probabilities of `qubit`.
pub fn marginal(sv: &Statevector, qubit: QubitId) -> MarginalProbability {
    let mask = qubit.mask();
    let (mut prob_0, mut prob_1) = (0.0, 0.0);
    for (i, a) in sv.amplitudes().iter().enumerate() {
        if i & mask == 0 {
            prob_0 += a.norm_sqr();
        } else {
            prob_1 += a.norm_sqr();
        }
    }
    MarginalProbability {
        qubit: qubit.0,
        prob_0,
        prob_1,
    }
}

/// Marginals of every qubit, from precomputed basis-state probabilities.
///
/// `probabilities.len()` must be `2^num_qubits`.
pub fn marginals(probabilities: &[f64], num_qubits: u32) -> Vec<MarginalProbability> {
    (0..num_qubits)
        .map(|q| {
            let mask = QubitId(q).mask();
            let (mut prob_0, mut prob_1) = (0.0, 0.0);
            for (i, p) in probabilities.iter().enumerate() {
                if i & mask == 0 {
                    prob_0 += p;
                } else {
                    prob_1 += p;
                }
            }
            MarginalProbability {
                qubit: q,
                prob_0,
                prob_1,
            }
        })
        .collect()
}

/// Depth and size of a circuit.
///
/// Each operation lands one layer after the deepest of the qubits it touches,
/// and moves all of them to that layer.
pub fn metrics(circuit: &Circuit) -> CircuitMetrics {
    let mut depths = vec![0usize; circuit.num_qubits() as usize];
    let mut depth = 0;
    for op in circuit.operations() {
        let layer = op
            .qubits()
            .iter()
            .map(|q| depths[q.index()])
            .max()
            .unwrap_or(0)
            + 1;
        for q in op.qubits() {
            depths[q.index()] = layer;
        }
        depth = depth.max(layer);
    }
    CircuitMetrics {
        depth,
        size: circuit.size(),
    }
}

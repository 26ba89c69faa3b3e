//! Simulation results.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::analytics::{self, CircuitMetrics, MarginalProbability};
use crate::statevector::Statevector;

/// Everything produced by one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Number of qubits.
    pub num_qubits: u32,
    /// Final amplitudes, indexed by basis state.
    pub statevector: Vec<Complex64>,
    /// `|a_i|²` for each basis state.
    pub probabilities: Vec<f64>,
    /// Per-qubit marginals, in qubit order.
    pub marginals: Vec<MarginalProbability>,
    /// Depth and size of the simulated circuit.
    pub metrics: CircuitMetrics,
}

impl SimulationResult {
    /// Combine a final statevector with the metrics of its circuit.
    pub fn assemble(statevector: Statevector, metrics: CircuitMetrics) -> Self {
        let num_qubits = statevector.num_qubits();
        let probabilities = analytics::probabilities(&statevector);
        let marginals = analytics::marginals(&probabilities, num_qubits);
        Self {
            num_qubits,
            statevector: statevector.into_amplitudes(),
            probabilities,
            marginals,
            metrics,
        }
    }

    /// Basis states with non-negligible probability, most likely first.
    pub fn top_outcomes(&self, threshold: f64) -> Vec<(usize, f64)> {
        let mut outcomes: Vec<_> = self
            .probabilities
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, p)| p > threshold)
            .collect();
        outcomes.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_assemble_bell() {
        let r = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let z = Complex64::new(0.0, 0.0);
        let sv = Statevector::from_amplitudes(vec![r, z, z, r]).unwrap();
        let result = SimulationResult::assemble(sv, CircuitMetrics { depth: 2, size: 2 });

        assert_eq!(result.num_qubits, 2);
        assert_eq!(result.statevector.len(), 4);
        assert_eq!(result.marginals.len(), 2);
        assert!((result.marginals[1].prob_1 - 0.5).abs() < 1e-12);
        assert_eq!(result.metrics.depth, 2);

        let top = result.top_outcomes(1e-9);
        assert_eq!(top.iter().map(|(i, _)| *i).collect::<Vec<_>>(), [0, 3]);
    }
}

//! Simulator entry points: admission, evolution and result assembly.

use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, error, instrument};

use qvis_ir::gate::UNITARITY_TOLERANCE;
use qvis_ir::{Circuit, IrError, Operation};

use crate::analytics;
use crate::config::{AMPLITUDE_BYTES, SimulatorConfig};
use crate::error::{SimError, SimResult};
use crate::result::SimulationResult;
use crate::statevector::Statevector;

/// Local statevector simulator.
///
/// Holds only immutable configuration; every run owns its amplitude array, so
/// one `Simulator` can serve any number of concurrent runs.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a simulator, rejecting an invalid configuration.
    pub fn new(config: SimulatorConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Validate raw operations against this simulator's limits.
    pub fn validate(&self, num_qubits: u32, operations: Vec<Operation>) -> SimResult<Circuit> {
        Ok(Circuit::validate(
            num_qubits,
            operations,
            &self.config.circuit_limits(),
        )?)
    }

    /// Check a circuit against the qubit, memory and drift limits before
    /// allocating.
    pub fn admit(&self, circuit: &Circuit) -> SimResult<()> {
        let limits = &self.config.limits;
        let num_qubits = circuit.num_qubits();
        if num_qubits > limits.max_qubits {
            return Err(IrError::QubitCountOutOfRange {
                num_qubits,
                max: limits.max_qubits,
            }
            .into());
        }
        let required_bytes = u128::from(AMPLITUDE_BYTES) << num_qubits;
        if required_bytes > u128::from(limits.memory_budget_bytes) {
            return Err(SimError::ResourceLimit {
                num_qubits,
                required_bytes,
                budget_bytes: limits.memory_budget_bytes,
            });
        }
        self.admit_custom_matrices(circuit)
    }

    /// Reject a shot count above the configured maximum.
    pub fn admit_shots(&self, shots: u32) -> SimResult<()> {
        let max = self.config.limits.max_shots;
        if shots > max {
            return Err(SimError::ShotLimit { shots, max });
        }
        Ok(())
    }

    /// Largest unitarity deviation allowed for each of `custom_gates` custom
    /// matrices in one circuit.
    ///
    /// A matrix within `d` of unitary scales Σ|a|² by at most `1 + 2d`, so
    /// `k` gates bounded by `norm_tolerance / 4k` drift by less than half the
    /// norm tolerance.
    pub fn unitarity_tolerance(&self, custom_gates: usize) -> f64 {
        if custom_gates == 0 {
            return UNITARITY_TOLERANCE;
        }
        let share = self.config.engine.norm_tolerance / (4.0 * custom_gates as f64);
        share.min(UNITARITY_TOLERANCE)
    }

    fn admit_custom_matrices(&self, circuit: &Circuit) -> SimResult<()> {
        let custom: Vec<_> = circuit
            .operations()
            .iter()
            .enumerate()
            .filter_map(|(i, op)| op.gate().matrix().map(|m| (i, op, m)))
            .collect();
        let tolerance = self.unitarity_tolerance(custom.len());
        for (op_index, op, matrix) in custom {
            let deviation = matrix.unitarity_deviation();
            if deviation > tolerance {
                return Err(IrError::NonUnitaryMatrix {
                    op_index,
                    gate: op.name().to_string(),
                    deviation,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Fail with [`SimError::NormViolation`] when Σ|a|² is off by more than
    /// the configured tolerance.
    pub fn check_norm(&self, sv: &Statevector) -> SimResult<()> {
        let norm = sv.norm_sqr();
        let tolerance = self.config.engine.norm_tolerance;
        if (norm - 1.0).abs() > tolerance {
            error!(norm, tolerance, "Statevector norm check failed");
            return Err(SimError::NormViolation { norm, tolerance });
        }
        Ok(())
    }

    /// Evolve |0…0⟩ through every operation of `circuit`, in order.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn simulate(&self, circuit: &Circuit) -> SimResult<Statevector> {
        self.admit(circuit)?;

        let start = Instant::now();
        let num_qubits = circuit.num_qubits();
        let mut sv = Statevector::with_parallel_threshold(
            num_qubits,
            self.config.engine.parallel_threshold_qubits,
        );
        debug!(
            "Starting simulation: {} qubits, {} operations, parallel={}",
            num_qubits,
            circuit.size(),
            sv.is_parallel()
        );

        for op in circuit.operations() {
            sv.apply(op);
        }

        debug!("Simulation completed in {:?}", start.elapsed());
        Ok(sv)
    }

    /// Simulate `circuit`, check the norm and compute analytics.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn run(&self, circuit: &Circuit) -> SimResult<SimulationResult> {
        let sv = self.simulate(circuit)?;
        self.check_norm(&sv)?;

        let metrics = analytics::metrics(circuit);
        debug!(
            "Circuit depth {}, size {}",
            metrics.depth, metrics.size
        );
        Ok(SimulationResult::assemble(sv, metrics))
    }

    /// Run independent circuits in parallel. Results keep the input order.
    #[instrument(skip_all, fields(batch = circuits.len()))]
    pub fn run_batch(&self, circuits: &[Circuit]) -> Vec<SimResult<SimulationResult>> {
        circuits.par_iter().map(|c| self.run(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;
    use qvis_ir::{CircuitBuilder, CircuitLimits, library};

    #[test]
    fn test_run_bell() {
        let sim = Simulator::default();
        let circuit = library::find("bell_state")
            .unwrap()
            .build(&CircuitLimits::default())
            .unwrap();
        let result = sim.run(&circuit).unwrap();
        assert!((result.probabilities[0] - 0.5).abs() < 1e-10);
        assert!((result.probabilities[3] - 0.5).abs() < 1e-10);
        assert_eq!(result.metrics.size, 2);
    }

    #[test]
    fn test_memory_budget_rejects_before_allocation() {
        let mut config = SimulatorConfig::default();
        config.limits.memory_budget_bytes = 16 * 8; // 3 qubits
        let sim = Simulator::new(config).unwrap();

        let small = CircuitBuilder::new("ok", 3).build(&CircuitLimits::default()).unwrap();
        assert!(sim.run(&small).is_ok());

        let big = CircuitBuilder::new("big", 4).build(&CircuitLimits::default()).unwrap();
        assert!(matches!(
            sim.run(&big),
            Err(SimError::ResourceLimit {
                num_qubits: 4,
                required_bytes: 256,
                budget_bytes: 128
            })
        ));
    }

    #[test]
    fn test_qubit_limit_applies_to_prevalidated_circuits() {
        let mut config = SimulatorConfig::default();
        config.limits.max_qubits = 2;
        let sim = Simulator::new(config).unwrap();

        let circuit = CircuitBuilder::new("wide", 3).build(&CircuitLimits::default()).unwrap();
        assert!(matches!(
            sim.simulate(&circuit),
            Err(SimError::Validation(IrError::QubitCountOutOfRange { num_qubits: 3, max: 2 }))
        ));
    }

    #[test]
    fn test_norm_check() {
        let sim = Simulator::default();
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);

        let unit = Statevector::from_amplitudes(vec![zero, one]).unwrap();
        assert!(sim.check_norm(&unit).is_ok());

        let doubled = Statevector::from_amplitudes(vec![one, one]).unwrap();
        match sim.check_norm(&doubled) {
            Err(SimError::NormViolation { norm, tolerance }) => {
                assert!((norm - 2.0).abs() < 1e-12);
                assert_eq!(tolerance, 1e-6);
            }
            other => panic!("expected norm violation, got {other:?}"),
        }
    }

    #[test]
    fn test_unitarity_tolerance_shrinks_with_custom_gate_count() {
        let sim = Simulator::default();
        assert_eq!(sim.unitarity_tolerance(0), UNITARITY_TOLERANCE);
        assert_eq!(sim.unitarity_tolerance(1), UNITARITY_TOLERANCE);
        assert!((sim.unitarity_tolerance(10_000) - 2.5e-11).abs() < 1e-20);
    }

    #[test]
    fn test_drifting_matrices_rejected_as_validation() {
        let sim = Simulator::default();
        let g = Complex64::new(1.0 + 4e-9, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        let drifting = qvis_ir::Matrix2([[g, zero], [zero, g]]);
        assert!(drifting.is_unitary());

        let one = CircuitBuilder::new("one", 1)
            .unitary(drifting, 0)
            .build(&CircuitLimits::default())
            .unwrap();
        assert!(sim.run(&one).is_ok());

        let many = (0..1000)
            .fold(CircuitBuilder::new("many", 1), |b, _| b.unitary(drifting, 0))
            .build(&CircuitLimits::default())
            .unwrap();
        assert!(matches!(
            sim.run(&many),
            Err(SimError::Validation(IrError::NonUnitaryMatrix { op_index: 0, .. }))
        ));
    }

    #[test]
    fn test_shot_limit() {
        let mut config = SimulatorConfig::default();
        config.limits.max_shots = 100;
        let sim = Simulator::new(config).unwrap();
        assert!(sim.admit_shots(100).is_ok());
        let err = sim.admit_shots(101).unwrap_err();
        assert!(matches!(err, SimError::ShotLimit { shots: 101, max: 100 }));
        assert_eq!(err.kind(), crate::error::ErrorKind::ResourceLimit);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SimulatorConfig::default();
        config.limits.max_operations = 0;
        assert!(matches!(Simulator::new(config), Err(SimError::Config(_))));
    }

    #[test]
    fn test_batch_preserves_order() {
        let sim = Simulator::default();
        let limits = CircuitLimits::default();
        let circuits: Vec<_> = library::EXAMPLES
            .iter()
            .map(|e| e.build(&limits).unwrap())
            .collect();
        let results = sim.run_batch(&circuits);
        assert_eq!(results.len(), circuits.len());
        for (circuit, result) in circuits.iter().zip(&results) {
            assert_eq!(result.as_ref().unwrap().num_qubits, circuit.num_qubits());
        }
    }
}

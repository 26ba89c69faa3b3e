//! Gate applications: a gate kind bound to its qubits.

use num_complex::Complex64;
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::{GateAction, GateKind, Matrix2, SingleQubitGate, UNITARITY_TOLERANCE};
use crate::qubit::QubitId;

/// One gate applied to specific qubits.
///
/// For controlled gates the qubit order is `[control, target]`; for SWAP it
/// is the two exchanged qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    gate: GateKind,
    qubits: Vec<QubitId>,
}

impl Operation {
    /// Create a single-qubit gate operation.
    pub fn single(gate: SingleQubitGate, target: QubitId) -> Self {
        Self {
            gate: GateKind::Single(gate),
            qubits: vec![target],
        }
    }

    /// Create a controlled single-qubit gate operation.
    pub fn controlled(gate: SingleQubitGate, control: QubitId, target: QubitId) -> Self {
        Self {
            gate: GateKind::Controlled(gate),
            qubits: vec![control, target],
        }
    }

    /// Create a controlled-phase operation.
    pub fn controlled_phase(theta: f64, control: QubitId, target: QubitId) -> Self {
        Self {
            gate: GateKind::ControlledPhase(theta),
            qubits: vec![control, target],
        }
    }

    /// Create a SWAP operation.
    pub fn swap(a: QubitId, b: QubitId) -> Self {
        Self {
            gate: GateKind::Swap,
            qubits: vec![a, b],
        }
    }

    /// Build an operation from its wire form: a gate name, qubit indices,
    /// angle parameters and an optional custom matrix.
    ///
    /// Names are case-insensitive. `op_index` is only used for error context.
    pub fn from_parts(
        op_index: usize,
        name: &str,
        qubits: &[u32],
        params: &[f64],
        matrix: Option<Matrix2>,
    ) -> IrResult<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let gate_name = lower.as_str();

        let param = |idx: usize, expected: usize| -> IrResult<f64> {
            if params.len() != expected {
                return Err(IrError::ParameterCountMismatch {
                    op_index,
                    gate: gate_name.to_string(),
                    expected,
                    got: params.len(),
                });
            }
            Ok(params[idx])
        };
        let no_params = || -> IrResult<()> {
            if params.is_empty() {
                Ok(())
            } else {
                Err(IrError::ParameterCountMismatch {
                    op_index,
                    gate: gate_name.to_string(),
                    expected: 0,
                    got: params.len(),
                })
            }
        };
        let custom = || -> IrResult<Matrix2> {
            matrix.ok_or_else(|| IrError::MissingMatrix {
                op_index,
                gate: gate_name.to_string(),
            })
        };

        let single = |suffix: &str| -> IrResult<Option<SingleQubitGate>> {
            let gate = match suffix {
                "h" => SingleQubitGate::H,
                "x" | "not" => SingleQubitGate::X,
                "y" => SingleQubitGate::Y,
                "z" => SingleQubitGate::Z,
                "s" => SingleQubitGate::S,
                "sdg" => SingleQubitGate::Sdg,
                "t" => SingleQubitGate::T,
                "tdg" => SingleQubitGate::Tdg,
                "rx" => SingleQubitGate::Rx(param(0, 1)?),
                "ry" => SingleQubitGate::Ry(param(0, 1)?),
                "rz" => SingleQubitGate::Rz(param(0, 1)?),
                "p" | "phase" | "u1" => SingleQubitGate::P(param(0, 1)?),
                "u" | "u3" => SingleQubitGate::U(param(0, 3)?, param(1, 3)?, param(2, 3)?),
                "unitary" => SingleQubitGate::Unitary(custom()?),
                _ => return Ok(None),
            };
            if gate.params().is_empty() {
                no_params()?;
            }
            Ok(Some(gate))
        };

        let gate = match gate_name {
            "swap" => {
                no_params()?;
                GateKind::Swap
            }
            "cp" | "cphase" | "cu1" => GateKind::ControlledPhase(param(0, 1)?),
            "cnot" => {
                no_params()?;
                GateKind::Controlled(SingleQubitGate::X)
            }
            other => {
                if let Some(g) = single(other)? {
                    GateKind::Single(g)
                } else if let Some(g) = other.strip_prefix('c').map(single).transpose()?.flatten() {
                    GateKind::Controlled(g)
                } else {
                    return Err(IrError::UnknownGate {
                        op_index,
                        name: name.to_string(),
                    });
                }
            }
        };

        if qubits.len() != gate.num_qubits() {
            return Err(IrError::QubitCountMismatch {
                op_index,
                gate: gate.name().to_string(),
                expected: gate.num_qubits(),
                got: qubits.len(),
            });
        }

        Ok(Self {
            gate,
            qubits: qubits.iter().copied().map(QubitId).collect(),
        })
    }

    /// The gate kind.
    pub fn gate(&self) -> &GateKind {
        &self.gate
    }

    /// Get the name of the gate.
    pub fn name(&self) -> &'static str {
        self.gate.name()
    }

    /// Qubits this operation touches, `[control, target]` for controlled gates.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// The target qubit (the second qubit of a SWAP).
    pub fn target(&self) -> QubitId {
        self.qubits[self.qubits.len() - 1]
    }

    /// The control qubit of a controlled gate.
    pub fn control(&self) -> Option<QubitId> {
        match self.gate {
            GateKind::Controlled(_) | GateKind::ControlledPhase(_) => Some(self.qubits[0]),
            GateKind::Single(_) | GateKind::Swap => None,
        }
    }

    /// Check this operation against a circuit of `num_qubits` qubits.
    ///
    /// Verifies qubit ranges, distinct qubits for two-qubit gates, finite
    /// angles and unitarity of custom matrices.
    pub fn validate(&self, op_index: usize, num_qubits: u32) -> IrResult<()> {
        let gate = self.name();

        for &qubit in &self.qubits {
            if qubit.0 >= num_qubits {
                return Err(IrError::QubitOutOfRange {
                    op_index,
                    gate: gate.to_string(),
                    qubit,
                    num_qubits,
                });
            }
        }

        if let [a, b] = self.qubits.as_slice() {
            if a == b {
                return Err(IrError::ControlEqualsTarget {
                    op_index,
                    gate: gate.to_string(),
                    qubit: *a,
                });
            }
        }

        if let Some(&value) = self.gate.params().iter().find(|p| !p.is_finite()) {
            return Err(IrError::NonFiniteParameter {
                op_index,
                gate: gate.to_string(),
                value,
            });
        }

        if let Some(matrix) = self.gate.matrix() {
            let deviation = matrix.unitarity_deviation();
            if deviation > UNITARITY_TOLERANCE {
                return Err(IrError::NonUnitaryMatrix {
                    op_index,
                    gate: gate.to_string(),
                    deviation,
                });
            }
        }

        Ok(())
    }

    /// The catalog action of this operation on a statevector.
    pub fn action(&self) -> GateAction {
        match self.gate {
            GateKind::Single(g) => single_action(g, self.qubits[0], 0),
            GateKind::Controlled(g) => single_action(g, self.qubits[1], self.qubits[0].mask()),
            GateKind::ControlledPhase(theta) => GateAction::Phase {
                mask: self.qubits[0].mask() | self.qubits[1].mask(),
                phase: Complex64::from_polar(1.0, theta),
            },
            GateKind::Swap => {
                let (a, b) = (self.qubits[0].index(), self.qubits[1].index());
                GateAction::Swap {
                    low: a.min(b),
                    high: a.max(b),
                }
            }
        }
    }
}

fn single_action(gate: SingleQubitGate, target: QubitId, control_mask: usize) -> GateAction {
    if gate == SingleQubitGate::X {
        GateAction::Flip {
            target: target.index(),
            control_mask,
        }
    } else if let Some(phase) = gate.phase_only() {
        GateAction::Phase {
            mask: control_mask | target.mask(),
            phase,
        }
    } else {
        GateAction::Pair {
            target: target.index(),
            control_mask,
            matrix: gate.matrix(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        let params = self.gate.params();
        if !params.is_empty() {
            let rendered: Vec<_> = params.iter().map(|p| format!("{p:.4}")).collect();
            write!(f, "({})", rendered.join(", "))?;
        }
        let qubits: Vec<_> = self.qubits.iter().map(ToString::to_string).collect();
        write!(f, " {}", qubits.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::PAULI_Y;
    use std::f64::consts::PI;

    #[test]
    fn test_from_parts_named_gates() {
        let op = Operation::from_parts(0, "H", &[0], &[], None).unwrap();
        assert_eq!(op.gate(), &GateKind::Single(SingleQubitGate::H));

        let op = Operation::from_parts(0, "cx", &[0, 1], &[], None).unwrap();
        assert_eq!(op.control(), Some(QubitId(0)));
        assert_eq!(op.target(), QubitId(1));

        let op = Operation::from_parts(0, "cnot", &[2, 1], &[], None).unwrap();
        assert_eq!(op.gate(), &GateKind::Controlled(SingleQubitGate::X));

        let op = Operation::from_parts(0, "cp", &[0, 1], &[PI / 2.0], None).unwrap();
        assert_eq!(op.gate(), &GateKind::ControlledPhase(PI / 2.0));

        let op = Operation::from_parts(0, "crz", &[0, 1], &[0.5], None).unwrap();
        assert_eq!(op.gate(), &GateKind::Controlled(SingleQubitGate::Rz(0.5)));

        let op = Operation::from_parts(0, "u", &[0], &[0.1, 0.2, 0.3], None).unwrap();
        assert_eq!(op.gate(), &GateKind::Single(SingleQubitGate::U(0.1, 0.2, 0.3)));

        let op = Operation::from_parts(0, "unitary", &[0], &[], Some(PAULI_Y)).unwrap();
        assert_eq!(op.gate().matrix(), Some(PAULI_Y));
    }

    #[test]
    fn test_from_parts_rejects_bad_input() {
        assert!(matches!(
            Operation::from_parts(4, "toffoli", &[0, 1, 2], &[], None),
            Err(IrError::UnknownGate { op_index: 4, .. })
        ));
        assert!(matches!(
            Operation::from_parts(0, "cx", &[0], &[], None),
            Err(IrError::QubitCountMismatch { expected: 2, got: 1, .. })
        ));
        assert!(matches!(
            Operation::from_parts(0, "rx", &[0], &[], None),
            Err(IrError::ParameterCountMismatch { expected: 1, got: 0, .. })
        ));
        assert!(matches!(
            Operation::from_parts(0, "h", &[0], &[1.0], None),
            Err(IrError::ParameterCountMismatch { expected: 0, got: 1, .. })
        ));
        assert!(matches!(
            Operation::from_parts(0, "unitary", &[0], &[], None),
            Err(IrError::MissingMatrix { .. })
        ));
    }

    #[test]
    fn test_validate_ranges() {
        let op = Operation::controlled(SingleQubitGate::X, QubitId(0), QubitId(2));
        assert!(op.validate(0, 3).is_ok());
        assert!(matches!(
            op.validate(7, 2),
            Err(IrError::QubitOutOfRange { op_index: 7, qubit: QubitId(2), .. })
        ));

        let op = Operation::controlled_phase(0.3, QubitId(1), QubitId(1));
        assert!(matches!(
            op.validate(0, 2),
            Err(IrError::ControlEqualsTarget { qubit: QubitId(1), .. })
        ));

        let op = Operation::single(SingleQubitGate::Rx(f64::NAN), QubitId(0));
        assert!(matches!(op.validate(0, 1), Err(IrError::NonFiniteParameter { .. })));
    }

    #[test]
    fn test_action_selection() {
        let x = Operation::single(SingleQubitGate::X, QubitId(1));
        assert_eq!(x.action(), GateAction::Flip { target: 1, control_mask: 0 });

        let cx = Operation::controlled(SingleQubitGate::X, QubitId(2), QubitId(0));
        assert_eq!(cx.action(), GateAction::Flip { target: 0, control_mask: 0b100 });

        let cz = Operation::controlled(SingleQubitGate::Z, QubitId(0), QubitId(1));
        assert!(matches!(cz.action(), GateAction::Phase { mask: 0b11, .. }));

        let swap = Operation::swap(QubitId(3), QubitId(1));
        assert_eq!(swap.action(), GateAction::Swap { low: 1, high: 3 });

        let h = Operation::single(SingleQubitGate::H, QubitId(0));
        assert!(matches!(h.action(), GateAction::Pair { target: 0, control_mask: 0, .. }));
    }

    #[test]
    fn test_display() {
        let op = Operation::controlled_phase(0.5, QubitId(0), QubitId(1));
        assert_eq!(op.to_string(), "cp(0.5000) q0, q1");
    }
}

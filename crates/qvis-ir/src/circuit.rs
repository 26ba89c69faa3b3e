//! Validated circuit model and builder API.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::{Matrix2, SingleQubitGate};
use crate::operation::Operation;
use crate::qubit::QubitId;

/// Default maximum qubit count.
pub const DEFAULT_MAX_QUBITS: u32 = 24;

/// Default maximum number of operations per circuit.
pub const DEFAULT_MAX_OPERATIONS: usize = 10_000;

/// Largest qubit count a basis-state index can address on this platform.
pub const ADDRESSABLE_QUBITS: u32 = usize::BITS - 2;

/// Admission limits applied when validating a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitLimits {
    /// Maximum qubit count (inclusive).
    pub max_qubits: u32,
    /// Maximum operation count (inclusive).
    pub max_operations: usize,
}

impl Default for CircuitLimits {
    fn default() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            max_operations: DEFAULT_MAX_OPERATIONS,
        }
    }
}

/// A validated quantum circuit.
///
/// A `Circuit` can only be obtained through [`Circuit::validate`] (or the
/// [`CircuitBuilder`], which calls it), so every value satisfies: the qubit
/// count is within limits, every operation references qubits in
/// `[0, num_qubits)`, two-qubit operations use distinct qubits, angles are
/// finite and custom matrices are unitary. It is never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    operations: Vec<Operation>,
}

impl Circuit {
    /// Validate `operations` over `num_qubits` qubits against `limits`.
    pub fn validate(
        num_qubits: u32,
        operations: Vec<Operation>,
        limits: &CircuitLimits,
    ) -> IrResult<Self> {
        Self::validate_named("circuit", num_qubits, operations, limits)
    }

    /// Same as [`Circuit::validate`], attaching a display name.
    pub fn validate_named(
        name: impl Into<String>,
        num_qubits: u32,
        operations: Vec<Operation>,
        limits: &CircuitLimits,
    ) -> IrResult<Self> {
        let max = limits.max_qubits.min(ADDRESSABLE_QUBITS);
        if num_qubits == 0 || num_qubits > max {
            return Err(IrError::QubitCountOutOfRange { num_qubits, max });
        }
        if operations.len() > limits.max_operations {
            return Err(IrError::TooManyOperations {
                count: operations.len(),
                max: limits.max_operations,
            });
        }
        for (op_index, op) in operations.iter().enumerate() {
            op.validate(op_index, num_qubits)?;
        }
        Ok(Self {
            name: name.into(),
            num_qubits,
            operations,
        })
    }

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of amplitudes in this circuit's statevector (`2^n`).
    pub fn dimension(&self) -> usize {
        1usize << self.num_qubits
    }

    /// The operations, in application order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Total gate count.
    pub fn size(&self) -> usize {
        self.operations.len()
    }

    /// Whether the circuit has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} qubits, {} ops)", self.name, self.num_qubits, self.size())?;
        for (i, op) in self.operations.iter().enumerate() {
            writeln!(f, "  {i:>4}: {op}")?;
        }
        Ok(())
    }
}

/// Fluent builder for [`Circuit`].
///
/// Gate methods only record operations; all checks run once in
/// [`CircuitBuilder::build`].
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    name: String,
    num_qubits: u32,
    operations: Vec<Operation>,
}

impl CircuitBuilder {
    /// Start a circuit over `num_qubits` qubits.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            operations: vec![],
        }
    }

    /// Replace the circuit name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append an arbitrary operation.
    #[must_use]
    pub fn op(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    fn single(self, gate: SingleQubitGate, qubit: u32) -> Self {
        self.op(Operation::single(gate, QubitId(qubit)))
    }

    fn controlled(self, gate: SingleQubitGate, control: u32, target: u32) -> Self {
        self.op(Operation::controlled(gate, QubitId(control), QubitId(target)))
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    #[must_use]
    pub fn h(self, qubit: u32) -> Self {
        self.single(SingleQubitGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    #[must_use]
    pub fn x(self, qubit: u32) -> Self {
        self.single(SingleQubitGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    #[must_use]
    pub fn y(self, qubit: u32) -> Self {
        self.single(SingleQubitGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    #[must_use]
    pub fn z(self, qubit: u32) -> Self {
        self.single(SingleQubitGate::Z, qubit)
    }

    /// Apply S gate.
    #[must_use]
    pub fn s(self, qubit: u32) -> Self {
        self.single(SingleQubitGate::S, qubit)
    }

    /// Apply T gate.
    #[must_use]
    pub fn t(self, qubit: u32) -> Self {
        self.single(SingleQubitGate::T, qubit)
    }

    /// Apply Rx rotation gate.
    #[must_use]
    pub fn rx(self, theta: f64, qubit: u32) -> Self {
        self.single(SingleQubitGate::Rx(theta), qubit)
    }

    /// Apply Ry rotation gate.
    #[must_use]
    pub fn ry(self, theta: f64, qubit: u32) -> Self {
        self.single(SingleQubitGate::Ry(theta), qubit)
    }

    /// Apply Rz rotation gate.
    #[must_use]
    pub fn rz(self, theta: f64, qubit: u32) -> Self {
        self.single(SingleQubitGate::Rz(theta), qubit)
    }

    /// Apply phase gate.
    #[must_use]
    pub fn p(self, theta: f64, qubit: u32) -> Self {
        self.single(SingleQubitGate::P(theta), qubit)
    }

    /// Apply an arbitrary 2×2 unitary.
    #[must_use]
    pub fn unitary(self, matrix: Matrix2, qubit: u32) -> Self {
        self.single(SingleQubitGate::Unitary(matrix), qubit)
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    #[must_use]
    pub fn cx(self, control: u32, target: u32) -> Self {
        self.controlled(SingleQubitGate::X, control, target)
    }

    /// Apply CY gate.
    #[must_use]
    pub fn cy(self, control: u32, target: u32) -> Self {
        self.controlled(SingleQubitGate::Y, control, target)
    }

    /// Apply CZ gate.
    #[must_use]
    pub fn cz(self, control: u32, target: u32) -> Self {
        self.controlled(SingleQubitGate::Z, control, target)
    }

    /// Apply controlled-Hadamard gate.
    #[must_use]
    pub fn ch(self, control: u32, target: u32) -> Self {
        self.controlled(SingleQubitGate::H, control, target)
    }

    /// Apply controlled-phase gate.
    #[must_use]
    pub fn cp(self, theta: f64, control: u32, target: u32) -> Self {
        self.op(Operation::controlled_phase(
            theta,
            QubitId(control),
            QubitId(target),
        ))
    }

    /// Apply SWAP gate.
    #[must_use]
    pub fn swap(self, q1: u32, q2: u32) -> Self {
        self.op(Operation::swap(QubitId(q1), QubitId(q2)))
    }

    /// Validate and freeze the circuit.
    pub fn build(self, limits: &CircuitLimits) -> IrResult<Circuit> {
        Circuit::validate_named(self.name, self.num_qubits, self.operations, limits)
    }
}

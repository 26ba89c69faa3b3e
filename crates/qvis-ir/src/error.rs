//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Reasons a circuit is rejected before simulation.
///
/// Operation-level variants carry the position of the offending operation in
/// the circuit and its gate name so callers can point at the exact input.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Declared qubit count is zero or above the configured maximum.
    #[error("Circuit declares {num_qubits} qubits; supported range is 1..={max}")]
    QubitCountOutOfRange {
        /// The declared qubit count.
        num_qubits: u32,
        /// The configured maximum.
        max: u32,
    },

    /// Operation list exceeds the configured maximum length.
    #[error("Circuit has {count} operations; at most {max} are allowed")]
    TooManyOperations {
        /// Number of operations supplied.
        count: usize,
        /// The configured maximum.
        max: usize,
    },

    /// An operation references a qubit outside `[0, n)`.
    #[error("{} references {qubit}, but the circuit only has {num_qubits} qubits", op_context(.op_index, .gate))]
    QubitOutOfRange {
        /// Position of the operation in the circuit.
        op_index: usize,
        /// Gate name.
        gate: String,
        /// The offending qubit.
        qubit: QubitId,
        /// Qubit count of the circuit.
        num_qubits: u32,
    },

    /// A two-qubit operation uses the same qubit twice.
    #[error("{} uses {qubit} as both control and target", op_context(.op_index, .gate))]
    ControlEqualsTarget {
        /// Position of the operation in the circuit.
        op_index: usize,
        /// Gate name.
        gate: String,
        /// The duplicated qubit.
        qubit: QubitId,
    },

    /// Gate name is not in the catalog.
    #[error("Operation #{op_index}: unknown gate '{name}'")]
    UnknownGate {
        /// Position of the operation in the circuit.
        op_index: usize,
        /// The unrecognised name.
        name: String,
    },

    /// Gate received the wrong number of qubits.
    #[error("{} requires {expected} qubits, got {got}", op_context(.op_index, .gate))]
    QubitCountMismatch {
        /// Position of the operation in the circuit.
        op_index: usize,
        /// Gate name.
        gate: String,
        /// Qubits the gate acts on.
        expected: usize,
        /// Qubits supplied.
        got: usize,
    },

    /// Gate received the wrong number of angle parameters.
    #[error("{} requires {expected} parameters, got {got}", op_context(.op_index, .gate))]
    ParameterCountMismatch {
        /// Position of the operation in the circuit.
        op_index: usize,
        /// Gate name.
        gate: String,
        /// Parameters the gate takes.
        expected: usize,
        /// Parameters supplied.
        got: usize,
    },

    /// An angle parameter is NaN or infinite.
    #[error("{} has non-finite parameter {value}", op_context(.op_index, .gate))]
    NonFiniteParameter {
        /// Position of the operation in the circuit.
        op_index: usize,
        /// Gate name.
        gate: String,
        /// The offending value.
        value: f64,
    },

    /// A custom matrix is not unitary.
    #[error("{} matrix is not unitary (max deviation from identity {deviation:.3e})", op_context(.op_index, .gate))]
    NonUnitaryMatrix {
        /// Position of the operation in the circuit.
        op_index: usize,
        /// Gate name.
        gate: String,
        /// Largest entry of |U·U† − I|.
        deviation: f64,
    },

    /// A `unitary` gate was supplied without its matrix.
    #[error("{} requires a 2x2 matrix", op_context(.op_index, .gate))]
    MissingMatrix {
        /// Position of the operation in the circuit.
        op_index: usize,
        /// Gate name.
        gate: String,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn op_context(op_index: &usize, gate: &str) -> String {
    format!("Operation #{op_index} ({gate})")
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

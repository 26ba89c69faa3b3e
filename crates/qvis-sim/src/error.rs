//! Error types for the simulation crate.

use qvis_ir::IrError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced while running a simulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The circuit was rejected by validation; nothing was allocated.
    #[error(transparent)]
    Validation(#[from] IrError),

    /// The statevector would not fit the configured memory budget.
    #[error(
        "Statevector for {num_qubits} qubits needs {required_bytes} bytes, exceeding the budget of {budget_bytes} bytes"
    )]
    ResourceLimit {
        /// Qubit count of the rejected circuit.
        num_qubits: u32,
        /// Bytes the amplitude array would occupy.
        required_bytes: u128,
        /// Configured budget.
        budget_bytes: u64,
    },

    /// The request asks for more measurement shots than allowed.
    #[error("Requested {shots} shots; at most {max} are allowed")]
    ShotLimit {
        /// Shots requested.
        shots: u32,
        /// Configured maximum.
        max: u32,
    },

    /// The final state drifted from unit norm; the result is discarded.
    #[error("Statevector norm {norm} deviates from 1 by more than {tolerance}")]
    NormViolation {
        /// Observed Σ|a|².
        norm: f64,
        /// Configured tolerance.
        tolerance: f64,
    },

    /// Invalid simulator configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SimError {
    /// Stable short label for the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimError::Validation(_) => ErrorKind::Validation,
            SimError::ResourceLimit { .. } | SimError::ShotLimit { .. } => ErrorKind::ResourceLimit,
            SimError::NormViolation { .. } | SimError::Config(_) => ErrorKind::Internal,
        }
    }
}

/// Error categories reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// Input is well-formed but too large to simulate.
    ResourceLimit,
    /// An internal invariant failed.
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorKind::Validation => "validation",
            ErrorKind::ResourceLimit => "resource_limit",
            ErrorKind::Internal => "internal",
        })
    }
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

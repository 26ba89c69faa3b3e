//! Request and response types of the simulation service.
//!
//! These mirror the JSON contract consumed by visualization clients:
//! amplitudes as `[re, im]` pairs, qubit 0 as the least-significant bit of
//! every basis-state index.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use qvis_ir::{Circuit, Matrix2, Operation};

use crate::analytics::MarginalProbability;
use crate::error::{ErrorKind, SimError, SimResult};
use crate::result::SimulationResult;
use crate::sampling::{self, Counts};
use crate::simulator::Simulator;

/// One operation in wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationSpec {
    /// Gate name, e.g. `h`, `cx`, `cp`.
    pub gate: String,
    /// Qubit indices; `[control, target]` for controlled gates.
    pub qubits: Vec<u32>,
    /// Angle parameters in radians.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
    /// Matrix for `unitary` and `cunitary`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Matrix2>,
}

impl From<&Operation> for OperationSpec {
    fn from(op: &Operation) -> Self {
        Self {
            gate: op.name().to_string(),
            qubits: op.qubits().iter().map(|q| q.0).collect(),
            params: op.gate().params(),
            matrix: op.gate().matrix(),
        }
    }
}

/// A simulation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Number of qubits.
    pub num_qubits: u32,
    /// Operations, in application order.
    #[serde(default)]
    pub operations: Vec<OperationSpec>,
    /// Measurement shots to sample from the final state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots: Option<u32>,
    /// Seed for shot sampling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SimulationRequest {
    /// The request document for an already-built circuit.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        Self {
            num_qubits: circuit.num_qubits(),
            operations: circuit.operations().iter().map(OperationSpec::from).collect(),
            shots: None,
            seed: None,
        }
    }

    /// Parse the wire operations and validate the circuit.
    pub fn to_circuit(&self, simulator: &Simulator) -> SimResult<Circuit> {
        // Bound the work before parsing individual operations.
        let max = simulator.config().limits.max_operations;
        if self.operations.len() > max {
            return Err(qvis_ir::IrError::TooManyOperations {
                count: self.operations.len(),
                max,
            }
            .into());
        }
        let operations = self
            .operations
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                Operation::from_parts(i, &spec.gate, &spec.qubits, &spec.params, spec.matrix)
            })
            .collect::<Result<Vec<_>, _>>()?;
        simulator.validate(self.num_qubits, operations)
    }
}

/// A simulation response.
///
/// On success every payload field is present and `error` is absent; on
/// failure only `success`, `error` and `error_kind` are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    /// Whether the circuit was simulated.
    pub success: bool,
    /// Final amplitudes as `[re, im]` pairs, indexed by basis state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statevector: Option<Vec<[f64; 2]>>,
    /// Qubit count of the simulated circuit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_qubits: Option<u32>,
    /// Outcome probabilities, indexed by basis state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<Vec<f64>>,
    /// Per-qubit marginals, in qubit order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marginal_probabilities: Option<Vec<MarginalProbability>>,
    /// Longest chain of operations sharing qubits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_depth: Option<usize>,
    /// Number of operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circuit_size: Option<usize>,
    /// Sampled bitstring counts, when shots were requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<Counts>,
    /// Failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl SimulationResponse {
    /// A successful response carrying `result`.
    pub fn success(result: SimulationResult) -> Self {
        Self {
            success: true,
            statevector: Some(result.statevector.iter().map(|a| [a.re, a.im]).collect()),
            num_qubits: Some(result.num_qubits),
            probabilities: Some(result.probabilities),
            marginal_probabilities: Some(result.marginals),
            circuit_depth: Some(result.metrics.depth),
            circuit_size: Some(result.metrics.size),
            counts: None,
            error: None,
            error_kind: None,
        }
    }

    /// A failed response describing `err`.
    pub fn failure(err: &SimError) -> Self {
        Self::rejected(err.to_string(), err.kind())
    }

    fn rejected(error: String, kind: ErrorKind) -> Self {
        Self {
            success: false,
            statevector: None,
            num_qubits: None,
            probabilities: None,
            marginal_probabilities: None,
            circuit_depth: None,
            circuit_size: None,
            counts: None,
            error: Some(error),
            error_kind: Some(kind),
        }
    }

    /// The statevector as complex amplitudes.
    pub fn amplitudes(&self) -> Option<Vec<Complex64>> {
        self.statevector
            .as_ref()
            .map(|sv| sv.iter().map(|[re, im]| Complex64::new(*re, *im)).collect())
    }
}

/// Request processing boundary.
///
/// [`SimulationService::handle`] never fails: every error becomes a response
/// with `success = false`.
#[derive(Debug, Clone, Default)]
pub struct SimulationService {
    simulator: Simulator,
}

impl SimulationService {
    /// Wrap a configured simulator.
    pub fn new(simulator: Simulator) -> Self {
        Self { simulator }
    }

    /// The underlying simulator.
    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// Validate, simulate and package one request.
    pub fn handle(&self, request: &SimulationRequest) -> SimulationResponse {
        match self.process(request) {
            Ok(response) => response,
            Err(err) => {
                // internal failures are logged where detected
                if err.kind() != ErrorKind::Internal {
                    warn!(kind = ?err.kind(), "Rejected request: {err}");
                }
                SimulationResponse::failure(&err)
            }
        }
    }

    /// Parse a JSON request and handle it; malformed JSON is a validation
    /// failure.
    pub fn handle_json(&self, body: &str) -> SimulationResponse {
        match serde_json::from_str::<SimulationRequest>(body) {
            Ok(request) => self.handle(&request),
            Err(e) => {
                warn!("Malformed request: {e}");
                SimulationResponse::rejected(format!("Malformed request: {e}"), ErrorKind::Validation)
            }
        }
    }

    fn process(&self, request: &SimulationRequest) -> SimResult<SimulationResponse> {
        if let Some(shots) = request.shots {
            self.simulator.admit_shots(shots)?;
        }
        let circuit = request.to_circuit(&self.simulator)?;
        let result = self.simulator.run(&circuit)?;
        info!(
            num_qubits = result.num_qubits,
            depth = result.metrics.depth,
            size = result.metrics.size,
            "Simulated circuit"
        );

        let counts = request.shots.filter(|&s| s > 0).map(|shots| {
            sampling::sample_counts(&result.probabilities, result.num_qubits, shots, request.seed)
        });
        Ok(SimulationResponse {
            counts,
            ..SimulationResponse::success(result)
        })
    }
}

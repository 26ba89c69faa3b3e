//! qvis Statevector Simulator
//!
//! This crate evolves a validated [`qvis_ir::Circuit`] from |0…0⟩ by explicit
//! statevector simulation and reports amplitudes, basis-state probabilities,
//! per-qubit marginals and circuit metrics.
//!
//! # Features
//!
//! - **Exact Simulation**: full statevector, no sampling noise
//! - **In-place Kernels**: gates touch only the amplitudes they act on; no
//!   `2^n × 2^n` matrix is ever built
//! - **Data Parallel**: above a configurable width, each gate's updates are
//!   split across the rayon pool; independent circuits run concurrently via
//!   [`Simulator::run_batch`]
//! - **Admission Control**: qubit and memory limits are checked before the
//!   amplitude array is allocated
//! - **Measurement Sampling**: optional seeded shot counts
//!
//! # Memory
//!
//! | Qubits | Amplitude array |
//! |--------|-----------------|
//! | 10 | 16 KiB |
//! | 16 | 1 MiB |
//! | 20 | 16 MiB |
//! | 24 | 256 MiB (default budget) |
//!
//! # Example
//!
//! ```rust
//! use qvis_sim::{SimulationRequest, SimulationService};
//!
//! let service = SimulationService::default();
//! let request: SimulationRequest = serde_json::from_str(
//!     r#"{"num_qubits": 2, "operations": [
//!         {"gate": "h", "qubits": [0]},
//!         {"gate": "cx", "qubits": [0, 1]}
//!     ]}"#,
//! )
//! .unwrap();
//!
//! let response = service.handle(&request);
//! assert!(response.success);
//! assert_eq!(response.circuit_depth, Some(2));
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod result;
pub mod sampling;
pub mod simulator;
pub mod statevector;

pub use analytics::{CircuitMetrics, MarginalProbability};
pub use api::{OperationSpec, SimulationRequest, SimulationResponse, SimulationService};
pub use config::{ConfigError, SimulatorConfig};
pub use error::{ErrorKind, SimError, SimResult};
pub use result::SimulationResult;
pub use simulator::Simulator;
pub use statevector::Statevector;

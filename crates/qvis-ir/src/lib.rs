//! qvis Circuit Model
//!
//! This crate holds the input side of the qvis statevector simulator: the gate
//! catalog and the validated, immutable circuit representation the engine
//! consumes.
//!
//! # Overview
//!
//! Gates are never expanded into `2^n × 2^n` matrices. Each [`Operation`]
//! resolves to a [`GateAction`] naming the amplitudes it touches (pairs
//! differing in the target bit, a phase mask, or a bit exchange) and the
//! transform applied to them.
//!
//! A [`Circuit`] is only obtainable through validation, so downstream code can
//! rely on every qubit index being in range and every two-qubit gate having
//! distinct qubits.
//!
//! # Bit convention
//!
//! Bit `i` of a basis-state index is the value of qubit `i`; qubit 0 is the
//! least-significant bit.
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qvis_ir::{CircuitBuilder, CircuitLimits};
//!
//! let circuit = CircuitBuilder::new("bell_state", 2)
//!     .h(0)
//!     .cx(0, 1)
//!     .build(&CircuitLimits::default())
//!     .unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.size(), 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `h` | 1 | Hadamard gate |
//! | `x`, `y`, `z` | 1 | Pauli gates |
//! | `s`, `sdg`, `t`, `tdg` | 1 | Phase-family gates |
//! | `rx`, `ry`, `rz` | 1 | Rotation gates |
//! | `p` | 1 | Phase gate `diag(1, e^{iθ})` |
//! | `u` | 1 | Universal single-qubit gate U(θ,φ,λ) |
//! | `unitary` | 1 | Arbitrary 2×2 unitary |
//! | `cx`, `cy`, `cz`, `ch`, `crx`, `cry`, `crz`, `cu`, `cunitary` | 2 | Controlled versions, qubits `[control, target]` |
//! | `cp` | 2 | Controlled phase |
//! | `swap` | 2 | SWAP gate |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod library;
pub mod operation;
pub mod qubit;

pub use circuit::{Circuit, CircuitBuilder, CircuitLimits};
pub use error::{IrError, IrResult};
pub use gate::{GateAction, GateKind, Matrix2, SingleQubitGate};
pub use library::ExampleCircuit;
pub use operation::Operation;
pub use qubit::QubitId;

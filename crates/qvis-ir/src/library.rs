//! Built-in example circuits.
//!
//! The named examples reproduce the demonstration circuits offered to
//! clients for testing; [`ghz`] and [`qft`] generalize two of them to any
//! qubit count.

use std::f64::consts::PI;

use crate::circuit::{Circuit, CircuitBuilder, CircuitLimits};
use crate::error::IrResult;

/// A named demonstration circuit.
#[derive(Debug, Clone, Copy)]
pub struct ExampleCircuit {
    /// Lookup key, e.g. `bell_state`.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    builder: fn() -> CircuitBuilder,
}

impl ExampleCircuit {
    /// A fresh builder holding this example's operations.
    pub fn builder(&self) -> CircuitBuilder {
        (self.builder)()
    }

    /// Build and validate the example.
    pub fn build(&self, limits: &CircuitLimits) -> IrResult<Circuit> {
        self.builder().build(limits)
    }
}

/// All built-in examples, in display order.
pub const EXAMPLES: [ExampleCircuit; 5] = [
    ExampleCircuit {
        name: "bell_state",
        description: "Bell state (entanglement)",
        builder: || CircuitBuilder::new("bell_state", 2).h(0).cx(0, 1),
    },
    ExampleCircuit {
        name: "ghz_state",
        description: "GHZ state (3-qubit entanglement)",
        builder: || ghz(3).named("ghz_state"),
    },
    ExampleCircuit {
        name: "superposition",
        description: "Single qubit superposition",
        builder: || CircuitBuilder::new("superposition", 1).h(0),
    },
    ExampleCircuit {
        name: "x_gate",
        description: "Simple X gate (bit flip)",
        builder: || CircuitBuilder::new("x_gate", 1).x(0),
    },
    ExampleCircuit {
        name: "quantum_fourier_transform",
        description: "QFT on 3 qubits",
        builder: || qft(3).named("quantum_fourier_transform"),
    },
];

/// Look up an example by name.
pub fn find(name: &str) -> Option<&'static ExampleCircuit> {
    EXAMPLES.iter().find(|e| e.name == name)
}

/// GHZ state preparation on `n` qubits: H on q0, then CX from q0 to every
/// other qubit.
pub fn ghz(n: u32) -> CircuitBuilder {
    let mut builder = CircuitBuilder::new(format!("ghz_{n}"), n).h(0);
    for target in 1..n {
        builder = builder.cx(0, target);
    }
    builder
}

/// Quantum Fourier transform on `n` qubits, with the final qubit reversal.
pub fn qft(n: u32) -> CircuitBuilder {
    let mut builder = CircuitBuilder::new(format!("qft_{n}"), n);
    for i in 0..n {
        builder = builder.h(i);
        for j in (i + 1)..n {
            let theta = PI / f64::from(1u32 << (j - i).min(31));
            builder = builder.cp(theta, i, j);
        }
    }
    for i in 0..n / 2 {
        builder = builder.swap(i, n - 1 - i);
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateKind;

    #[test]
    fn test_all_examples_validate() {
        for example in &EXAMPLES {
            let circuit = example.build(&CircuitLimits::default()).unwrap();
            assert_eq!(circuit.name(), example.name);
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find("x_gate").map(|e| e.name), Some("x_gate"));
        assert!(find("teleportation").is_none());
    }

    #[test]
    fn test_ghz_shape() {
        let circuit = ghz(4).build(&CircuitLimits::default()).unwrap();
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.size(), 4);
        assert!(circuit.operations()[1..].iter().all(|op| op.name() == "cx"));
    }

    #[test]
    fn test_qft3_matches_reference_sequence() {
        let circuit = find("quantum_fourier_transform")
            .unwrap()
            .build(&CircuitLimits::default())
            .unwrap();
        let names: Vec<_> = circuit.operations().iter().map(|op| op.name()).collect();
        assert_eq!(names, ["h", "cp", "cp", "h", "cp", "h", "swap"]);

        assert_eq!(
            circuit.operations()[1].gate(),
            &GateKind::ControlledPhase(PI / 2.0)
        );
        assert_eq!(
            circuit.operations()[2].gate(),
            &GateKind::ControlledPhase(PI / 4.0)
        );
    }
}

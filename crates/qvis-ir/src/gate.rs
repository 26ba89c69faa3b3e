//! Gate catalog.
//!
//! Every supported gate is described by the amplitudes it touches and the
//! transform it applies to them ([`GateAction`]), never by a full
//! `2^n × 2^n` matrix. Named gates carry compile-time constant 2×2 matrices.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

/// Tolerance on `|U·U† − I|` when accepting a user-supplied matrix.
pub const UNITARITY_TOLERANCE: f64 = 1e-8;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// A row-major 2×2 complex matrix.
///
/// Serialized as `[[[re, im], [re, im]], [[re, im], [re, im]]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix2(pub [[Complex64; 2]; 2]);

/// Identity.
pub const IDENTITY: Matrix2 = Matrix2([[ONE, ZERO], [ZERO, ONE]]);

/// Normalized Hadamard matrix.
pub const HADAMARD: Matrix2 = Matrix2([
    [
        Complex64::new(FRAC_1_SQRT_2, 0.0),
        Complex64::new(FRAC_1_SQRT_2, 0.0),
    ],
    [
        Complex64::new(FRAC_1_SQRT_2, 0.0),
        Complex64::new(-FRAC_1_SQRT_2, 0.0),
    ],
]);

/// Pauli-X.
pub const PAULI_X: Matrix2 = Matrix2([[ZERO, ONE], [ONE, ZERO]]);

/// Pauli-Y.
pub const PAULI_Y: Matrix2 = Matrix2([[ZERO, Complex64::new(0.0, -1.0)], [I, ZERO]]);

/// Pauli-Z.
pub const PAULI_Z: Matrix2 = Matrix2([[ONE, ZERO], [ZERO, Complex64::new(-1.0, 0.0)]]);

impl Matrix2 {
    /// Build a matrix from rows.
    pub const fn new(rows: [[Complex64; 2]; 2]) -> Self {
        Self(rows)
    }

    /// Apply the matrix to the amplitude pair `(a0, a1)`.
    #[inline]
    pub fn apply(&self, a0: Complex64, a1: Complex64) -> (Complex64, Complex64) {
        let m = &self.0;
        (m[0][0] * a0 + m[0][1] * a1, m[1][0] * a0 + m[1][1] * a1)
    }

    /// Conjugate transpose.
    pub fn dagger(&self) -> Self {
        let m = &self.0;
        Self([
            [m[0][0].conj(), m[1][0].conj()],
            [m[0][1].conj(), m[1][1].conj()],
        ])
    }

    /// Matrix product `self · rhs`.
    pub fn matmul(&self, rhs: &Self) -> Self {
        let (a, b) = (&self.0, &rhs.0);
        let mut out = [[ZERO; 2]; 2];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = a[r][0] * b[0][c] + a[r][1] * b[1][c];
            }
        }
        Self(out)
    }

    /// Largest entry magnitude of `U·U† − I`. Zero for an exact unitary.
    ///
    /// Non-finite entries yield `f64::INFINITY`.
    pub fn unitarity_deviation(&self) -> f64 {
        if self.0.iter().flatten().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
            return f64::INFINITY;
        }
        let product = self.matmul(&self.dagger());
        let mut max = 0.0_f64;
        for (r, row) in product.0.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                max = max.max((cell - IDENTITY.0[r][c]).norm());
            }
        }
        max
    }

    /// Whether the matrix is unitary within [`UNITARITY_TOLERANCE`].
    pub fn is_unitary(&self) -> bool {
        self.unitarity_deviation() <= UNITARITY_TOLERANCE
    }
}

/// Single-qubit gates with known semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SingleQubitGate {
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate `diag(1, e^{iθ})`.
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),
    /// Arbitrary 2×2 unitary.
    Unitary(Matrix2),
}

impl SingleQubitGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            SingleQubitGate::H => "h",
            SingleQubitGate::X => "x",
            SingleQubitGate::Y => "y",
            SingleQubitGate::Z => "z",
            SingleQubitGate::S => "s",
            SingleQubitGate::Sdg => "sdg",
            SingleQubitGate::T => "t",
            SingleQubitGate::Tdg => "tdg",
            SingleQubitGate::Rx(_) => "rx",
            SingleQubitGate::Ry(_) => "ry",
            SingleQubitGate::Rz(_) => "rz",
            SingleQubitGate::P(_) => "p",
            SingleQubitGate::U(_, _, _) => "u",
            SingleQubitGate::Unitary(_) => "unitary",
        }
    }

    /// Angle parameters, in declaration order.
    pub fn params(&self) -> Vec<f64> {
        match *self {
            SingleQubitGate::Rx(t)
            | SingleQubitGate::Ry(t)
            | SingleQubitGate::Rz(t)
            | SingleQubitGate::P(t) => vec![t],
            SingleQubitGate::U(theta, phi, lambda) => vec![theta, phi, lambda],
            _ => vec![],
        }
    }

    /// The 2×2 matrix of this gate.
    pub fn matrix(&self) -> Matrix2 {
        match *self {
            SingleQubitGate::H => HADAMARD,
            SingleQubitGate::X => PAULI_X,
            SingleQubitGate::Y => PAULI_Y,
            SingleQubitGate::Z => PAULI_Z,
            SingleQubitGate::S
            | SingleQubitGate::Sdg
            | SingleQubitGate::T
            | SingleQubitGate::Tdg
            | SingleQubitGate::P(_) => {
                let phase = self.phase_only().unwrap_or(ONE);
                Matrix2([[ONE, ZERO], [ZERO, phase]])
            }
            SingleQubitGate::Rx(theta) => {
                let (c, s) = half_angle(theta);
                let neg_i_s = Complex64::new(0.0, -s);
                Matrix2([[Complex64::new(c, 0.0), neg_i_s], [neg_i_s, Complex64::new(c, 0.0)]])
            }
            SingleQubitGate::Ry(theta) => {
                let (c, s) = half_angle(theta);
                Matrix2([
                    [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
                    [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
                ])
            }
            SingleQubitGate::Rz(theta) => Matrix2([
                [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
                [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
            ]),
            SingleQubitGate::U(theta, phi, lambda) => {
                let (c, s) = half_angle(theta);
                Matrix2([
                    [
                        Complex64::new(c, 0.0),
                        -Complex64::from_polar(1.0, lambda) * s,
                    ],
                    [
                        Complex64::from_polar(1.0, phi) * s,
                        Complex64::from_polar(1.0, phi + lambda) * c,
                    ],
                ])
            }
            SingleQubitGate::Unitary(m) => m,
        }
    }

    /// For gates of the form `diag(1, e^{iφ})`, the phase `e^{iφ}`.
    ///
    /// These only touch amplitudes whose target bit is 1, so the engine can
    /// apply them without pairing.
    pub fn phase_only(&self) -> Option<Complex64> {
        match *self {
            SingleQubitGate::Z => Some(Complex64::new(-1.0, 0.0)),
            SingleQubitGate::S => Some(I),
            SingleQubitGate::Sdg => Some(-I),
            SingleQubitGate::T => Some(Complex64::from_polar(1.0, FRAC_PI_4)),
            SingleQubitGate::Tdg => Some(Complex64::from_polar(1.0, -FRAC_PI_4)),
            SingleQubitGate::P(theta) => Some(Complex64::from_polar(1.0, theta)),
            _ => None,
        }
    }
}

fn half_angle(theta: f64) -> (f64, f64) {
    let (s, c) = (theta / 2.0).sin_cos();
    (c, s)
}

/// Gate kinds accepted by the circuit model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A single-qubit unitary on the target.
    Single(SingleQubitGate),
    /// A single-qubit unitary on the target, applied where the control is 1.
    Controlled(SingleQubitGate),
    /// Phase `e^{iθ}` on amplitudes where control and target are both 1.
    ControlledPhase(f64),
    /// Exchange of two qubits.
    Swap,
}

impl GateKind {
    /// Get the name of this gate.
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Single(g) => g.name(),
            GateKind::Controlled(g) => match g {
                SingleQubitGate::H => "ch",
                SingleQubitGate::X => "cx",
                SingleQubitGate::Y => "cy",
                SingleQubitGate::Z => "cz",
                SingleQubitGate::S => "cs",
                SingleQubitGate::Sdg => "csdg",
                SingleQubitGate::T => "ct",
                SingleQubitGate::Tdg => "ctdg",
                SingleQubitGate::Rx(_) => "crx",
                SingleQubitGate::Ry(_) => "cry",
                SingleQubitGate::Rz(_) => "crz",
                SingleQubitGate::P(_) => "cp",
                SingleQubitGate::U(_, _, _) => "cu",
                SingleQubitGate::Unitary(_) => "cunitary",
            },
            GateKind::ControlledPhase(_) => "cp",
            GateKind::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        match self {
            GateKind::Single(_) => 1,
            GateKind::Controlled(_) | GateKind::ControlledPhase(_) | GateKind::Swap => 2,
        }
    }

    /// Angle parameters, in declaration order.
    pub fn params(&self) -> Vec<f64> {
        match self {
            GateKind::Single(g) | GateKind::Controlled(g) => g.params(),
            GateKind::ControlledPhase(theta) => vec![*theta],
            GateKind::Swap => vec![],
        }
    }

    /// The custom matrix, for `unitary` and `cunitary`.
    pub fn matrix(&self) -> Option<Matrix2> {
        match self {
            GateKind::Single(SingleQubitGate::Unitary(m))
            | GateKind::Controlled(SingleQubitGate::Unitary(m)) => Some(*m),
            _ => None,
        }
    }
}

/// The amplitudes a gate touches and the transform applied to them.
///
/// Bit positions and masks index into basis-state integers: bit `q` is
/// qubit `q`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateAction {
    /// Exchange the pair `(i, i | 1 << target)` for every `i` with the target
    /// bit clear and all `control_mask` bits set.
    Flip {
        /// Target bit position.
        target: usize,
        /// Bits that must be set (0 for an uncontrolled gate).
        control_mask: usize,
    },
    /// Multiply every amplitude whose index has all `mask` bits set.
    Phase {
        /// Bits that must be set.
        mask: usize,
        /// Unit-modulus factor.
        phase: Complex64,
    },
    /// Apply `matrix` to the pair `(i, i | 1 << target)` for every `i` with
    /// the target bit clear and all `control_mask` bits set.
    Pair {
        /// Target bit position.
        target: usize,
        /// Bits that must be set (0 for an uncontrolled gate).
        control_mask: usize,
        /// The 2×2 transform.
        matrix: Matrix2,
    },
    /// Exchange amplitudes whose bits `low` and `high` differ.
    Swap {
        /// Lower bit position.
        low: usize,
        /// Higher bit position.
        high: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: &Matrix2, b: &Matrix2) -> bool {
        a.0.iter()
            .flatten()
            .zip(b.0.iter().flatten())
            .all(|(x, y)| (x - y).norm() < 1e-12)
    }

    #[test]
    fn test_named_matrices_are_unitary() {
        for m in [IDENTITY, HADAMARD, PAULI_X, PAULI_Y, PAULI_Z] {
            assert!(m.is_unitary());
        }
    }

    #[test]
    fn test_parameterized_matrices_are_unitary() {
        let gates = [
            SingleQubitGate::Rx(0.3),
            SingleQubitGate::Ry(-1.7),
            SingleQubitGate::Rz(2.2),
            SingleQubitGate::P(PI / 3.0),
            SingleQubitGate::U(0.4, 1.1, -0.6),
            SingleQubitGate::S,
            SingleQubitGate::Tdg,
        ];
        for g in gates {
            assert!(g.matrix().is_unitary(), "{} not unitary", g.name());
        }
    }

    #[test]
    fn test_hadamard_is_self_inverse() {
        assert!(approx_eq(&HADAMARD.matmul(&HADAMARD), &IDENTITY));
    }

    #[test]
    fn test_pauli_relations() {
        // XY = iZ
        let xy = PAULI_X.matmul(&PAULI_Y);
        let iz = Matrix2(PAULI_Z.0.map(|row| row.map(|z| z * I)));
        assert!(approx_eq(&xy, &iz));
    }

    #[test]
    fn test_phase_gates_match_their_matrix() {
        for g in [SingleQubitGate::Z, SingleQubitGate::S, SingleQubitGate::T, SingleQubitGate::P(0.7)] {
            let phase = g.phase_only().unwrap();
            let m = g.matrix();
            assert!((m.0[1][1] - phase).norm() < 1e-12);
            assert!((m.0[0][0] - ONE).norm() < 1e-12);
        }
        assert!(SingleQubitGate::H.phase_only().is_none());
        assert!(SingleQubitGate::Rz(0.5).phase_only().is_none());
    }

    #[test]
    fn test_rx_pi_is_x_up_to_phase() {
        let rx = SingleQubitGate::Rx(PI).matrix();
        let minus_i_x = Matrix2(PAULI_X.0.map(|row| row.map(|z| z * -I)));
        assert!(approx_eq(&rx, &minus_i_x));
    }

    #[test]
    fn test_non_unitary_rejected() {
        let m = Matrix2([[ONE, ONE], [ZERO, ONE]]);
        assert!(!m.is_unitary());
        let nan = Matrix2([[Complex64::new(f64::NAN, 0.0), ZERO], [ZERO, ONE]]);
        assert_eq!(nan.unitarity_deviation(), f64::INFINITY);
    }

    #[test]
    fn test_gate_names() {
        assert_eq!(GateKind::Single(SingleQubitGate::H).name(), "h");
        assert_eq!(GateKind::Controlled(SingleQubitGate::X).name(), "cx");
        assert_eq!(GateKind::ControlledPhase(0.1).name(), "cp");
        assert_eq!(GateKind::Swap.name(), "swap");
        assert_eq!(GateKind::Swap.num_qubits(), 2);
        assert_eq!(GateKind::Single(SingleQubitGate::U(0.1, 0.2, 0.3)).params().len(), 3);
    }

    #[test]
    fn test_matrix_serializes_as_nested_pairs() {
        let json = serde_json::to_string(&PAULI_X).unwrap();
        assert_eq!(json, "[[[0.0,0.0],[1.0,0.0]],[[1.0,0.0],[0.0,0.0]]]");
        let back: Matrix2 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PAULI_X);
    }
}

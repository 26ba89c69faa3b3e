//! Statevector simulation engine.
//!
//! Each gate is applied in place by visiting only the amplitudes its
//! [`GateAction`] names. Above the parallel threshold the visit is split
//! across the rayon pool: by outer block when there are enough blocks to keep
//! every worker busy, otherwise element-wise within each block. Operations are
//! applied one after another; a kernel returns only after all of its writes
//! are done.

use num_complex::Complex64;
use rayon::prelude::*;

use qvis_ir::{GateAction, Matrix2, Operation};

/// Qubit count from which kernels run on the rayon pool by default.
pub const DEFAULT_PARALLEL_THRESHOLD: u32 = 14;

/// A statevector representing a quantum state.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: u32,
    /// Whether kernels use the rayon pool.
    parallel: bool,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: u32) -> Self {
        Self::with_parallel_threshold(num_qubits, DEFAULT_PARALLEL_THRESHOLD)
    }

    /// Create |0...0⟩, running kernels in parallel when
    /// `num_qubits >= threshold`.
    pub fn with_parallel_threshold(num_qubits: u32, threshold: u32) -> Self {
        let size = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
            parallel: num_qubits >= threshold,
        }
    }

    /// Wrap existing amplitudes. Returns `None` unless the length is a
    /// power of two.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> Option<Self> {
        if !amplitudes.len().is_power_of_two() {
            return None;
        }
        let num_qubits = amplitudes.len().trailing_zeros();
        Some(Self {
            amplitudes,
            num_qubits,
            parallel: num_qubits >= DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Force parallel or sequential kernels.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of amplitudes (`2^n`).
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Whether kernels run on the rayon pool.
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// The amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume the statevector, returning its amplitudes.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Σ|a|² over all amplitudes.
    pub fn norm_sqr(&self) -> f64 {
        if self.parallel {
            self.amplitudes.par_iter().map(Complex64::norm_sqr).sum()
        } else {
            self.amplitudes.iter().map(Complex64::norm_sqr).sum()
        }
    }

    /// Apply an operation.
    ///
    /// The operation must come from a validated circuit of the same width;
    /// indices are not checked here.
    pub fn apply(&mut self, op: &Operation) {
        self.apply_action(op.action());
    }

    /// Apply a gate action directly.
    pub fn apply_action(&mut self, action: GateAction) {
        let parallel = self.parallel;
        let amps = self.amplitudes.as_mut_slice();
        match action {
            GateAction::Flip {
                target,
                control_mask,
            } => pair_kernel(amps, target, control_mask, parallel, std::mem::swap),
            GateAction::Pair {
                target,
                control_mask,
                matrix,
            } => pair_kernel(amps, target, control_mask, parallel, move |a0, a1| {
                apply_matrix(&matrix, a0, a1);
            }),
            GateAction::Phase { mask, phase } => phase_kernel(amps, mask, phase, parallel),
            GateAction::Swap { low, high } => swap_kernel(amps, low, high, parallel),
        }
    }
}

#[inline]
fn apply_matrix(matrix: &Matrix2, a0: &mut Complex64, a1: &mut Complex64) {
    let (b0, b1) = matrix.apply(*a0, *a1);
    *a0 = b0;
    *a1 = b1;
}

/// Enough outer blocks to give every worker its own share.
fn blocks_saturate_pool(len: usize, block: usize) -> bool {
    len / block >= rayon::current_num_threads()
}

// =========================================================================
// Kernels
// =========================================================================

/// Visit every pair `(i, i | 1 << target)` with the target bit of `i` clear
/// and all `control_mask` bits of `i` set.
fn pair_kernel<F>(amps: &mut [Complex64], target: usize, control_mask: usize, parallel: bool, f: F)
where
    F: Fn(&mut Complex64, &mut Complex64) + Send + Sync,
{
    let stride = 1usize << target;
    let block = stride << 1;

    if !parallel {
        for (k, chunk) in amps.chunks_mut(block).enumerate() {
            let (lo, hi) = chunk.split_at_mut(stride);
            visit_pairs(k * block, lo, hi, control_mask, &f);
        }
    } else if blocks_saturate_pool(amps.len(), block) {
        amps.par_chunks_mut(block).enumerate().for_each(|(k, chunk)| {
            let (lo, hi) = chunk.split_at_mut(stride);
            visit_pairs(k * block, lo, hi, control_mask, &f);
        });
    } else {
        for (k, chunk) in amps.chunks_mut(block).enumerate() {
            let base = k * block;
            let (lo, hi) = chunk.split_at_mut(stride);
            lo.par_iter_mut()
                .zip(hi.par_iter_mut())
                .enumerate()
                .for_each(|(i, (a0, a1))| {
                    if (base + i) & control_mask == control_mask {
                        f(a0, a1);
                    }
                });
        }
    }
}

#[inline]
fn visit_pairs<F>(base: usize, lo: &mut [Complex64], hi: &mut [Complex64], control_mask: usize, f: &F)
where
    F: Fn(&mut Complex64, &mut Complex64),
{
    for (i, (a0, a1)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
        if (base + i) & control_mask == control_mask {
            f(a0, a1);
        }
    }
}

/// Multiply every amplitude whose index has all `mask` bits set.
fn phase_kernel(amps: &mut [Complex64], mask: usize, phase: Complex64, parallel: bool) {
    let step = |(i, a): (usize, &mut Complex64)| {
        if i & mask == mask {
            *a *= phase;
        }
    };
    if parallel {
        amps.par_iter_mut().enumerate().for_each(step);
    } else {
        amps.iter_mut().enumerate().for_each(step);
    }
}

/// Exchange amplitudes whose bits `low` and `high` differ (`low < high`).
///
/// Within a block of `2 << high` amplitudes, the lower half has the high bit
/// clear. Cutting both halves into runs of `2 << low`, the upper part of each
/// lower-half run (low bit set) pairs with the lower part of the matching
/// upper-half run (low bit clear).
fn swap_kernel(amps: &mut [Complex64], low: usize, high: usize, parallel: bool) {
    let half = 1usize << high;
    let block = half << 1;
    let run = 2usize << low;
    let quarter = 1usize << low;

    let exchange = |l: &mut [Complex64], h: &mut [Complex64]| {
        l[quarter..].swap_with_slice(&mut h[..quarter]);
    };

    if !parallel {
        for chunk in amps.chunks_mut(block) {
            let (lo, hi) = chunk.split_at_mut(half);
            for (l, h) in lo.chunks_mut(run).zip(hi.chunks_mut(run)) {
                exchange(l, h);
            }
        }
    } else if blocks_saturate_pool(amps.len(), block) {
        amps.par_chunks_mut(block).for_each(|chunk| {
            let (lo, hi) = chunk.split_at_mut(half);
            for (l, h) in lo.chunks_mut(run).zip(hi.chunks_mut(run)) {
                exchange(l, h);
            }
        });
    } else {
        for chunk in amps.chunks_mut(block) {
            let (lo, hi) = chunk.split_at_mut(half);
            lo.par_chunks_mut(run)
                .zip(hi.par_chunks_mut(run))
                .for_each(|(l, h)| exchange(l, h));
        }
    }
}

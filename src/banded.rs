//! Interface to external banded-matrix kernels.
//!
//! Banded operands never go through the dense [`Tensor`](crate::Tensor)
//! path. A kernel crate wraps its matrix type in [`BandedOps`], and the
//! simple semirings route products of such operands to the matching
//! multiply through [`BandedMatmul`].

use crate::algebra::{Counting, Log, Max};

/// Operations an accelerated banded-matrix type must provide.
///
/// All three products follow the same convention:
/// `x.multiply(y)` computes `yᵀ ⊗ x`, so `b.multiply(&a.transpose())` is
/// `a ⊗ b`.
pub trait BandedOps: Sized {
    /// Transposed band.
    fn transpose(&self) -> Self;

    /// Standard `(+, ×)` product.
    fn multiply(&self, other: &Self) -> Self;

    /// Log-space `(logsumexp, +)` product.
    fn multiply_log(&self, other: &Self) -> Self;

    /// Max-plus `(max, +)` product.
    fn multiply_max(&self, other: &Self) -> Self;
}

/// Semiring matrix product over banded operands.
pub trait BandedMatmul {
    /// `a ⊗ b` computed by the banded kernel.
    fn banded_matmul<M: BandedOps>(&self, a: &M, b: &M) -> M;
}

impl BandedMatmul for Counting {
    fn banded_matmul<M: BandedOps>(&self, a: &M, b: &M) -> M {
        tracing::trace!("banded matmul (+, ×)");
        b.multiply(&a.transpose())
    }
}

impl BandedMatmul for Log {
    fn banded_matmul<M: BandedOps>(&self, a: &M, b: &M) -> M {
        tracing::trace!("banded matmul (logsumexp, +)");
        b.multiply_log(&a.transpose())
    }
}

impl BandedMatmul for Max {
    fn banded_matmul<M: BandedOps>(&self, a: &M, b: &M) -> M {
        tracing::trace!("banded matmul (max, +)");
        b.multiply_max(&a.transpose())
    }
}

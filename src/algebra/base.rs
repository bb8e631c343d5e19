//! Shared arithmetic of the two semiring families.
//!
//! Concrete semirings delegate to these instead of repeating the same
//! `mul`/`prod`/identity definitions.

use super::{Real, NEGINF};
use crate::backend::Backend;
use crate::tensor::Tensor;

/// Real-valued arithmetic: `(+, ×, 0, 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountingFamily;

impl CountingFamily {
    /// Additive identity.
    pub const ZERO: f64 = 0.0;
    /// Multiplicative identity.
    pub const ONE: f64 = 1.0;

    /// Element-wise product.
    pub fn mul<T: Real, B: Backend>(a: &Tensor<T, B>, b: &Tensor<T, B>) -> Tensor<T, B> {
        a * b
    }

    /// Product-reduce along `dim`.
    pub fn prod<T: Real, B: Backend>(xs: &Tensor<T, B>, dim: isize) -> Tensor<T, B> {
        xs.prod_axis(dim)
    }
}

/// Log-space arithmetic: `(logsumexp, +, -∞, 0)`, with `-∞` as [`NEGINF`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFamily;

impl LogFamily {
    /// Additive identity.
    pub const ZERO: f64 = NEGINF;
    /// Multiplicative identity.
    pub const ONE: f64 = 0.0;

    /// Numerically stable log-sum-exp along `dim`.
    pub fn sum<T: Real, B: Backend>(xs: &Tensor<T, B>, dim: isize) -> Tensor<T, B> {
        xs.logsumexp(dim)
    }

    /// Multiplication in log space is addition.
    pub fn mul<T: Real, B: Backend>(a: &Tensor<T, B>, b: &Tensor<T, B>) -> Tensor<T, B> {
        a + b
    }

    /// Sum-reduce along `dim`.
    pub fn prod<T: Real, B: Backend>(xs: &Tensor<T, B>, dim: isize) -> Tensor<T, B> {
        xs.sum_axis(dim)
    }
}

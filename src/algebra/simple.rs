//! The single-component semirings: [`Counting`], [`Log`] and [`Max`].

use super::base::{CountingFamily, LogFamily};
use super::semiring::{generic_matmul, Semiring, SparseSum};
use super::Real;
use crate::backend::accel::{self, Kernel};
use crate::backend::Backend;
use crate::error::Result;
use crate::tensor::Tensor;

/// Sum-of-products semiring `(+, ×, 0, 1)`.
///
/// A dynamic program run under `Counting` returns the total (unnormalized)
/// score of all structures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counting;

impl Semiring for Counting {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn zero_element(&self) -> Vec<f64> {
        vec![CountingFamily::ZERO]
    }

    fn one_element(&self) -> Vec<f64> {
        vec![CountingFamily::ONE]
    }

    fn sum<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Result<Tensor<T, B>> {
        Ok(xs.sum_axis(dim))
    }

    fn mul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Tensor<T, B> {
        CountingFamily::mul(a, b)
    }

    fn prod<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Tensor<T, B> {
        CountingFamily::prod(xs, dim)
    }

    fn matmul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        if let Some(c) = accel::try_matmul(Kernel::Plain, a, b) {
            return Ok(c);
        }
        Ok(a.matmul_dense(b))
    }
}

/// Log-space semiring `(logsumexp, +, -∞, 0)`.
///
/// Returns the log-partition function; its gradient w.r.t. the potentials
/// gives the marginals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Log;

impl Semiring for Log {
    fn name(&self) -> &'static str {
        "log"
    }

    fn zero_element(&self) -> Vec<f64> {
        vec![LogFamily::ZERO]
    }

    fn one_element(&self) -> Vec<f64> {
        vec![LogFamily::ONE]
    }

    fn sum<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Result<Tensor<T, B>> {
        Ok(LogFamily::sum(xs, dim))
    }

    fn mul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Tensor<T, B> {
        LogFamily::mul(a, b)
    }

    fn prod<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Tensor<T, B> {
        LogFamily::prod(xs, dim)
    }

    fn matmul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        if let Some(c) = accel::try_matmul(Kernel::Log, a, b) {
            return Ok(c);
        }
        generic_matmul(self, a, b)
    }
}

/// Viterbi semiring `(max, +, -∞, 0)`.
///
/// Returns the best-structure score; its (sub)gradient is the indicator of
/// the argmax structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Max;

impl Semiring for Max {
    fn name(&self) -> &'static str {
        "max"
    }

    fn zero_element(&self) -> Vec<f64> {
        vec![LogFamily::ZERO]
    }

    fn one_element(&self) -> Vec<f64> {
        vec![LogFamily::ONE]
    }

    fn sum<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Result<Tensor<T, B>> {
        Ok(xs.max_axis(dim).0)
    }

    fn mul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Tensor<T, B> {
        LogFamily::mul(a, b)
    }

    fn prod<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Tensor<T, B> {
        LogFamily::prod(xs, dim)
    }

    fn matmul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        if let Some(c) = accel::try_matmul(Kernel::Max, a, b) {
            return Ok(c);
        }
        generic_matmul(self, a, b)
    }
}

impl SparseSum for Max {
    /// `(zeros, argmax)`, both shaped like the reduced values.
    type Pointers<T: Real, B: Backend> = (Tensor<u32, B>, Tensor<u32, B>);

    fn sparse_sum<T: Real, B: Backend>(
        &self,
        xs: &Tensor<T, B>,
        dim: isize,
    ) -> Result<(Tensor<T, B>, Self::Pointers<T, B>)> {
        let (m, argmax) = xs.max_axis(dim);
        let zeros = argmax.full_like(0u32);
        Ok((m, (zeros, argmax)))
    }
}

//! Max forward pass with a temperature-softmax sparse reduction.

use super::base::LogFamily;
use super::semiring::{Semiring, SparseSum};
use super::Real;
use crate::backend::Backend;
use crate::error::{Result, SemiringError};
use crate::tensor::Tensor;

/// Temperature-max semiring.
///
/// Only [`sparse_sum`](SparseSum::sparse_sum) reduces: it returns the hard
/// max together with `softmax(alpha * xs)` as soft backpointers. Plain
/// [`sum`](Semiring::sum) is not defined and always errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempMax {
    alpha: f64,
}

impl TempMax {
    /// Create a temperature-max semiring with inverse temperature `alpha`.
    pub fn new(alpha: f64) -> Result<Self> {
        if !alpha.is_finite() {
            tracing::warn!(alpha, "rejected temperature-max semiring");
            return Err(SemiringError::InvalidParameter(format!(
                "temperature-max alpha must be finite, got {}",
                alpha
            )));
        }
        tracing::debug!(alpha, "constructed temperature-max semiring");
        Ok(Self { alpha })
    }

    /// Inverse temperature.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Semiring for TempMax {
    fn name(&self) -> &'static str {
        "tempmax"
    }

    fn zero_element(&self) -> Vec<f64> {
        vec![LogFamily::ZERO]
    }

    fn one_element(&self) -> Vec<f64> {
        vec![LogFamily::ONE]
    }

    fn sum<T: Real, B: Backend>(&self, _xs: &Tensor<T, B>, _dim: isize) -> Result<Tensor<T, B>> {
        tracing::warn!("temperature-max has no plain sum");
        Err(SemiringError::Unsupported {
            semiring: self.name(),
            op: "sum",
        })
    }

    fn mul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Tensor<T, B> {
        LogFamily::mul(a, b)
    }

    fn prod<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Tensor<T, B> {
        LogFamily::prod(xs, dim)
    }
}

impl SparseSum for TempMax {
    /// `(zeros, softmax(alpha * xs))`; the zeros are shaped like the reduced
    /// values, the weights like the input.
    type Pointers<T: Real, B: Backend> = (Tensor<u32, B>, Tensor<T, B>);

    fn sparse_sum<T: Real, B: Backend>(
        &self,
        xs: &Tensor<T, B>,
        dim: isize,
    ) -> Result<(Tensor<T, B>, Self::Pointers<T, B>)> {
        let (m, _) = xs.max_axis(dim);
        let weights = xs.scale(T::cast(self.alpha)).softmax(dim);
        let zeros = m.full_like(0u32);
        Ok((m, (zeros, weights)))
    }
}

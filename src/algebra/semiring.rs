//! Core semiring traits for batched dynamic programs.

use std::fmt::Debug;

use super::Real;
use crate::backend::Backend;
use crate::error::Result;
use crate::tensor::Tensor;

/// A semiring acting on batched tensors of potentials.
///
/// Values live in a "converted" representation with one extra leading axis
/// of width [`size`](Semiring::size). Dynamic programs enter it with
/// [`convert`](Semiring::convert), combine sub-structures with
/// [`mul`](Semiring::mul) / [`times`](Semiring::times), aggregate
/// alternatives with [`sum`](Semiring::sum) / [`plus`](Semiring::plus), and
/// leave with [`unconvert`](Semiring::unconvert).
///
/// # Semiring Laws
///
/// For a semiring (S, ⊕, ⊗, 0, 1):
/// - (S, ⊕, 0) is a commutative monoid
/// - (S, ⊗, 1) is a monoid
/// - ⊗ distributes over ⊕
///
/// # Examples
///
/// | Semiring | ⊕ | ⊗ | 0 | 1 |
/// |----------|---|---|---|---|
/// | Counting | + | × | 0 | 1 |
/// | Log      | logsumexp | + | -∞ | 0 |
/// | Max      | max | + | -∞ | 0 |
/// | KMax     | top-k merge | top-k of pairwise + | [-∞..] | [0, -∞..] |
///
/// ```rust
/// use semiring_dp::{Cpu, Log, Max, Semiring, Tensor};
///
/// fn total<S: Semiring>(s: &S, scores: &Tensor<f64, Cpu>) -> f64 {
///     let x = s.convert(scores).unwrap();
///     s.unconvert(&s.sum(&x, -1).unwrap()).item()
/// }
///
/// let scores = Tensor::<f64, Cpu>::from_data(&[1.0, 2.0, 3.0], &[3]);
/// assert!((total(&Log, &scores) - 3.4076).abs() < 1e-4);
/// assert_eq!(total(&Max, &scores), 3.0);
/// ```
pub trait Semiring: Clone + Send + Sync + Debug + 'static {
    /// Short identifier used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Width of the leading semiring axis of converted values.
    fn size(&self) -> usize {
        1
    }

    /// Per-component additive identity.
    ///
    /// Either one value applied to every component, or exactly
    /// [`size`](Semiring::size) values.
    fn zero_element(&self) -> Vec<f64>;

    /// Per-component multiplicative identity.
    fn one_element(&self) -> Vec<f64>;

    /// ⊕-reduce `xs` along `dim`.
    fn sum<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Result<Tensor<T, B>>;

    /// `a ⊕ b`: stack on a new last axis and reduce it.
    fn plus<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        self.sum(&Tensor::stack(&[a, b], -1), -1)
    }

    /// `a ⊗ b` with broadcasting.
    fn mul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Tensor<T, B>;

    /// Left fold of [`mul`](Semiring::mul) over `ts`.
    ///
    /// # Panics
    ///
    /// Panics if `ts` is empty.
    fn times<T: Real, B: Backend>(&self, ts: &[&Tensor<T, B>]) -> Tensor<T, B> {
        assert!(!ts.is_empty(), "times requires at least one operand");
        ts[1..]
            .iter()
            .fold(ts[0].clone(), |acc, t| self.mul(&acc, t))
    }

    /// ⊗-reduce `xs` along `dim`.
    fn prod<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Tensor<T, B>;

    /// Generalized matrix product over the trailing two axes.
    fn matmul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        generic_matmul(self, a, b)
    }

    /// Generalized inner product over the last axis.
    fn dot<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        let c = self.matmul(&a.unsqueeze(-2), &b.unsqueeze(-1))?;
        Ok(c.squeeze(-1).squeeze(-1))
    }

    /// Lift raw potentials into the semiring representation.
    fn convert<T: Real, B: Backend>(&self, potentials: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        Ok(potentials.unsqueeze(0))
    }

    /// Extract the user-facing value from a converted tensor.
    fn unconvert<T: Real, B: Backend>(&self, xs: &Tensor<T, B>) -> Tensor<T, B> {
        xs.squeeze(0)
    }

    /// Fill `xs` with the additive identity, component by component.
    fn zero_<'t, T: Real, B: Backend>(&self, xs: &'t mut Tensor<T, B>) -> &'t mut Tensor<T, B> {
        fill_components(xs, &self.zero_element());
        xs
    }

    /// Fill `xs` with the multiplicative identity, component by component.
    fn one_<'t, T: Real, B: Backend>(&self, xs: &'t mut Tensor<T, B>) -> &'t mut Tensor<T, B> {
        fill_components(xs, &self.one_element());
        xs
    }

    /// Fill masked positions of `xs` with the additive identity.
    ///
    /// `mask` has no leading semiring axis; it is broadcast against
    /// `xs.shape()[1..]` and applied to every component.
    fn zero_mask_<'t, T: Real, B: Backend>(
        &self,
        xs: &'t mut Tensor<T, B>,
        mask: &Tensor<bool, B>,
    ) -> &'t mut Tensor<T, B> {
        let zeros = self.zero_element();
        let n = xs.shape().first().copied().unwrap_or(0);
        if zeros.len() != 1 {
            assert_leading_axis(xs, zeros.len());
        }
        for i in 0..n {
            let v = if zeros.len() == 1 { zeros[0] } else { zeros[i] };
            xs.masked_fill_component_(i, mask, T::cast(v));
        }
        xs
    }
}

/// Semirings whose reduction also reports which inputs were selected.
pub trait SparseSum: Semiring {
    /// Backpointers returned next to the reduced values.
    type Pointers<T: Real, B: Backend>;

    /// Like [`Semiring::sum`], additionally returning backpointers.
    fn sparse_sum<T: Real, B: Backend>(
        &self,
        xs: &Tensor<T, B>,
        dim: isize,
    ) -> Result<(Tensor<T, B>, Self::Pointers<T, B>)>;
}

/// Matrix product built from the semiring's own `times` and `sum`.
///
/// Computes `sum(transpose(times(a[.., :, :, None], b[.., None, :, :]), -2, -1), -1)`,
/// so `a: (.., m, k)` and `b: (.., k, n)` give `(.., m, n)`.
pub fn generic_matmul<S: Semiring + ?Sized, T: Real, B: Backend>(
    semiring: &S,
    a: &Tensor<T, B>,
    b: &Tensor<T, B>,
) -> Result<Tensor<T, B>> {
    let c = semiring.times(&[&a.unsqueeze(-1), &b.unsqueeze(-3)]);
    semiring.sum(&c.transpose(-2, -1), -1)
}

fn fill_components<T: Real, B: Backend>(xs: &mut Tensor<T, B>, values: &[f64]) {
    if let [v] = values {
        xs.fill_(T::cast(*v));
        return;
    }
    assert_leading_axis(xs, values.len());
    for (i, &v) in values.iter().enumerate() {
        xs.fill_component_(i, T::cast(v));
    }
}

fn assert_leading_axis<T: Real, B: Backend>(xs: &Tensor<T, B>, components: usize) {
    assert!(
        xs.ndim() >= 1 && xs.shape()[0] == components,
        "expected a leading semiring axis of size {}, got shape {:?}",
        components,
        xs.shape()
    );
}

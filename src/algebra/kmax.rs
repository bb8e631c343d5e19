//! The k-max semiring: the `k` best scores of every sub-problem.

use super::base::LogFamily;
use super::semiring::{Semiring, SparseSum};
use super::{Real, NEGINF};
use crate::backend::Backend;
use crate::error::{Result, SemiringError};
use crate::tensor::{broadcast_coords, broadcast_shapes, for_each_coord, normalize_dim, ravel, top_k, Tensor};

/// Top-k semiring `(kmax, +, [-∞, -∞, ..], [0, -∞, ..])`.
///
/// A converted value has shape `(k, ...)`; slot `i` holds the `i`-th best
/// score, sorted descending. Gradients of the slots give the k-argmax
/// structures.
///
/// # Example
///
/// ```rust
/// use semiring_dp::{Cpu, KMax, Semiring, Tensor};
///
/// let kmax = KMax::new(2).unwrap();
/// let x = kmax.convert(&Tensor::<f64, Cpu>::from_data(&[1.0, 2.0, 3.0], &[3])).unwrap();
/// assert_eq!(kmax.sum(&x, -1).unwrap().to_vec(), vec![3.0, 2.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMax {
    k: usize,
}

impl KMax {
    /// Create a k-max semiring. `k` must be at least 1.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            tracing::warn!("rejected k-max semiring with k = 0");
            return Err(SemiringError::InvalidParameter(
                "k-max requires k >= 1".to_string(),
            ));
        }
        tracing::debug!(k, "constructed k-max semiring");
        Ok(Self { k })
    }

    /// Number of scores kept per sub-problem.
    pub fn k(&self) -> usize {
        self.k
    }

    fn check_components(&self, shape: &[usize]) {
        assert!(
            !shape.is_empty() && shape[0] == self.k,
            "k-max value must have leading size {}, got shape {:?}",
            self.k,
            shape
        );
    }

    /// Top-k over the last axis, candidates ordered `j * k + i` for slot `i`
    /// at position `j`. Returns the output shape `(k, rest..)` and per-position
    /// picks in column-major order of `rest`.
    fn reduce_last<T: Real, B: Backend>(
        &self,
        xs: &Tensor<T, B>,
        dim: isize,
    ) -> Result<(Vec<usize>, Vec<Vec<(u32, T)>>)> {
        let nd = xs.ndim();
        if nd < 2 || !(dim == -1 || dim == nd as isize - 1) {
            tracing::warn!(dim, ndim = nd, "k-max reduction over a non-last axis");
            return Err(SemiringError::UnsupportedAxis {
                semiring: self.name(),
                dim,
                ndim: nd,
            });
        }
        self.check_components(xs.shape());
        let n = xs.shape()[nd - 1];
        assert!(n > 0, "k-max reduction over an empty axis");
        let rest = xs.shape()[1..nd - 1].to_vec();

        let mut picks = Vec::with_capacity(rest.iter().product());
        let mut full = vec![0usize; nd];
        for_each_coord(&rest, |pos| {
            full[1..nd - 1].copy_from_slice(pos);
            let mut candidates = Vec::with_capacity(n * self.k);
            for j in 0..n {
                full[nd - 1] = j;
                for i in 0..self.k {
                    full[0] = i;
                    candidates.push(xs.get(&full));
                }
            }
            picks.push(top_k(&candidates, self.k));
        });

        let mut out_shape = vec![self.k];
        out_shape.extend_from_slice(&rest);
        Ok((out_shape, picks))
    }
}

impl Semiring for KMax {
    fn name(&self) -> &'static str {
        "kmax"
    }

    fn size(&self) -> usize {
        self.k
    }

    fn zero_element(&self) -> Vec<f64> {
        vec![LogFamily::ZERO; self.k]
    }

    fn one_element(&self) -> Vec<f64> {
        let mut one = vec![LogFamily::ZERO; self.k];
        one[0] = LogFamily::ONE;
        one
    }

    fn sum<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Result<Tensor<T, B>> {
        let (out_shape, picks) = self.reduce_last(xs, dim)?;
        let rest = &out_shape[1..];
        Ok(Tensor::from_fn_with_backend(&out_shape, xs.backend().clone(), |ix| {
            picks[ravel(&ix[1..], rest)][ix[0]].1
        }))
    }

    /// Pairwise sums of the two k-lists, keeping the best k.
    fn mul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Tensor<T, B> {
        self.check_components(a.shape());
        self.check_components(b.shape());
        let (a_rest, b_rest) = (&a.shape()[1..], &b.shape()[1..]);
        let rest = broadcast_shapes(a_rest, b_rest);

        let k = self.k;
        let mut picks = Vec::with_capacity(rest.iter().product());
        for_each_coord(&rest, |pos| {
            let mut ai = vec![0usize];
            ai.extend(broadcast_coords(a_rest, pos));
            let mut bi = vec![0usize];
            bi.extend(broadcast_coords(b_rest, pos));

            let mut candidates = Vec::with_capacity(k * k);
            for i in 0..k {
                ai[0] = i;
                let x = a.get(&ai);
                for j in 0..k {
                    bi[0] = j;
                    candidates.push(x + b.get(&bi));
                }
            }
            picks.push(top_k(&candidates, k));
        });

        let mut out_shape = vec![k];
        out_shape.extend_from_slice(&rest);
        Tensor::from_fn_with_backend(&out_shape, a.backend().clone(), |ix| {
            picks[ravel(&ix[1..], &rest)][ix[0]].1
        })
    }

    /// Fold of [`mul`](Semiring::mul) over the slices along `dim`.
    fn prod<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Tensor<T, B> {
        let d = normalize_dim(dim, xs.ndim());
        assert!(d != 0, "k-max prod cannot reduce the slot axis");
        let n = xs.shape()[d];
        if n == 0 {
            let mut shape = xs.shape().to_vec();
            shape.remove(d);
            let mut one = Tensor::zeros_with_backend(&shape, xs.backend().clone());
            self.one_(&mut one);
            return one;
        }
        (1..n).fold(xs.select(d as isize, 0), |acc, i| {
            self.mul(&acc, &xs.select(d as isize, i))
        })
    }

    fn convert<T: Real, B: Backend>(&self, potentials: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        let mut shape = vec![self.k];
        shape.extend_from_slice(potentials.shape());
        let neginf = T::cast(NEGINF);
        Ok(Tensor::from_fn_with_backend(&shape, potentials.backend().clone(), |ix| {
            if ix[0] == 0 {
                potentials.get(&ix[1..])
            } else {
                neginf
            }
        }))
    }

    fn unconvert<T: Real, B: Backend>(&self, xs: &Tensor<T, B>) -> Tensor<T, B> {
        xs.select(0, 0)
    }
}

impl SparseSum for KMax {
    /// `(slot, position)` of every kept candidate, shaped like the values.
    type Pointers<T: Real, B: Backend> = (Tensor<u32, B>, Tensor<u32, B>);

    fn sparse_sum<T: Real, B: Backend>(
        &self,
        xs: &Tensor<T, B>,
        dim: isize,
    ) -> Result<(Tensor<T, B>, Self::Pointers<T, B>)> {
        let (out_shape, picks) = self.reduce_last(xs, dim)?;
        let rest = &out_shape[1..];
        let backend = xs.backend().clone();
        let k = self.k as u32;
        let pick = |ix: &[usize]| picks[ravel(&ix[1..], rest)][ix[0]];

        let values = Tensor::from_fn_with_backend(&out_shape, backend.clone(), |ix| pick(ix).1);
        let slots = Tensor::from_fn_with_backend(&out_shape, backend.clone(), |ix| pick(ix).0 % k);
        let positions = Tensor::from_fn_with_backend(&out_shape, backend, |ix| pick(ix).0 / k);
        Ok((values, (slots, positions)))
    }
}

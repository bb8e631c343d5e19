//! Numeric tensor operations: arithmetic, reductions, top-k and dense matmul.

use std::cmp::Ordering;
use std::ops::{Add, Mul, Sub};

use super::{broadcast_coords, broadcast_shapes, for_each_coord, normalize_dim, ravel, Tensor};
use crate::algebra::Real;
use crate::backend::Backend;

impl<'a, T: Real, B: Backend> Add<&'a Tensor<T, B>> for &'a Tensor<T, B> {
    type Output = Tensor<T, B>;

    fn add(self, rhs: &'a Tensor<T, B>) -> Tensor<T, B> {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<'a, T: Real, B: Backend> Sub<&'a Tensor<T, B>> for &'a Tensor<T, B> {
    type Output = Tensor<T, B>;

    fn sub(self, rhs: &'a Tensor<T, B>) -> Tensor<T, B> {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<'a, T: Real, B: Backend> Mul<&'a Tensor<T, B>> for &'a Tensor<T, B> {
    type Output = Tensor<T, B>;

    fn mul(self, rhs: &'a Tensor<T, B>) -> Tensor<T, B> {
        self.zip_with(rhs, |a, b| a * b)
    }
}

impl<T: Real, B: Backend> Tensor<T, B> {
    /// Element-wise exponential.
    pub fn exp(&self) -> Self {
        self.map(|x| x.exp())
    }

    /// Multiply every element by `factor`.
    pub fn scale(&self, factor: T) -> Self {
        self.map(|x| x * factor)
    }

    // ========================================================================
    // Reductions
    // ========================================================================

    /// Plain sum along `dim`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use semiring_dp::{Cpu, Tensor};
    ///
    /// // Column-major: [[1, 3], [2, 4]]
    /// let t = Tensor::<f32, Cpu>::from_data(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    /// assert_eq!(t.sum_axis(1).to_vec(), vec![4.0, 6.0]);
    /// assert_eq!(t.sum_axis(0).to_vec(), vec![3.0, 7.0]);
    /// ```
    pub fn sum_axis(&self, dim: isize) -> Self {
        self.reduce_axis(dim, |lane| lane.iter().fold(T::zero(), |acc, &x| acc + x))
    }

    /// Plain product along `dim`.
    pub fn prod_axis(&self, dim: isize) -> Self {
        self.reduce_axis(dim, |lane| lane.iter().fold(T::one(), |acc, &x| acc * x))
    }

    /// Maximum along `dim` together with the position of the first maximum.
    pub fn max_axis(&self, dim: isize) -> (Self, Tensor<u32, B>) {
        let values = self.reduce_axis(dim, |lane| argmax(lane).1);
        let indices = self.reduce_axis(dim, |lane| argmax(lane).0);
        (values, indices)
    }

    /// Numerically stable `log Σ exp` along `dim`.
    ///
    /// The lane maximum is subtracted before exponentiating; a lane whose
    /// maximum is infinite reduces to that infinity.
    pub fn logsumexp(&self, dim: isize) -> Self {
        self.reduce_axis(dim, |lane| log_sum_exp(lane))
    }

    /// Softmax along `dim`.
    pub fn softmax(&self, dim: isize) -> Self {
        let d = normalize_dim(dim, self.ndim()) as isize;
        let lse = self.logsumexp(d).unsqueeze(d);
        (self - &lse).exp()
    }

    /// The `k` largest values along `dim`, sorted descending, with their
    /// positions along `dim`.
    ///
    /// Ties keep the lower position first.
    ///
    /// # Panics
    ///
    /// Panics if `k` exceeds the size of `dim`.
    pub fn topk(&self, k: usize, dim: isize) -> (Self, Tensor<u32, B>) {
        let d = normalize_dim(dim, self.ndim());
        assert!(
            k <= self.shape()[d],
            "topk k={} exceeds size {} of dim {}",
            k,
            self.shape()[d],
            dim
        );
        let (reduced_shape, lanes) = self.lanes(d);
        let picks: Vec<Vec<(u32, T)>> = lanes.iter().map(|lane| top_k(lane, k)).collect();

        let mut out_shape = self.shape().to_vec();
        out_shape[d] = k;
        let mut rest = vec![0usize; reduced_shape.len()];
        let mut pick_at = |ix: &[usize]| {
            rest[..d].copy_from_slice(&ix[..d]);
            rest[d..].copy_from_slice(&ix[d + 1..]);
            picks[ravel(&rest, &reduced_shape)][ix[d]]
        };
        let values = Self::from_fn_with_backend(&out_shape, self.backend().clone(), |ix| pick_at(ix).1);
        let indices =
            Tensor::<u32, B>::from_fn_with_backend(&out_shape, self.backend().clone(), |ix| pick_at(ix).0);
        (values, indices)
    }

    // ========================================================================
    // Matrix Multiplication
    // ========================================================================

    /// Standard `(+, ×)` matrix product over the last two axes.
    ///
    /// Leading axes are batch axes and broadcast against each other.
    ///
    /// # Example
    ///
    /// ```rust
    /// use semiring_dp::{Cpu, Tensor};
    ///
    /// let a = Tensor::<f64, Cpu>::from_fn(&[2, 2], |ix| [[1.0, 2.0], [3.0, 4.0]][ix[0]][ix[1]]);
    /// let c = a.matmul_dense(&a);
    /// assert_eq!(c.get(&[0, 0]), 7.0);
    /// assert_eq!(c.get(&[1, 1]), 22.0);
    /// ```
    pub fn matmul_dense(&self, other: &Self) -> Self {
        assert!(
            self.ndim() >= 2 && other.ndim() >= 2,
            "matmul requires tensors with at least 2 dims, got {:?} and {:?}",
            self.shape(),
            other.shape()
        );
        let (a_batch, a_mat) = self.shape().split_at(self.ndim() - 2);
        let (b_batch, b_mat) = other.shape().split_at(other.ndim() - 2);
        assert_eq!(
            a_mat[1], b_mat[0],
            "matmul dimension mismatch: {:?} × {:?}",
            self.shape(),
            other.shape()
        );
        let (m, k, n) = (a_mat[0], a_mat[1], b_mat[1]);
        let batch = broadcast_shapes(a_batch, b_batch);

        let mut out_shape = batch.clone();
        out_shape.extend_from_slice(&[m, n]);
        let nb = batch.len();

        Self::from_fn_with_backend(&out_shape, self.backend().clone(), |ix| {
            let mut ai = broadcast_coords(a_batch, &ix[..nb]);
            let mut bi = broadcast_coords(b_batch, &ix[..nb]);
            ai.extend_from_slice(&[ix[nb], 0]);
            bi.extend_from_slice(&[0, ix[nb + 1]]);
            let mut acc = T::zero();
            for kk in 0..k {
                ai[nb + 1] = kk;
                bi[nb] = kk;
                acc = acc + self.get(&ai) * other.get(&bi);
            }
            acc
        })
    }

    /// Row-major copies of every `[m, k]` matrix in the trailing two axes.
    ///
    /// Batches are returned in column-major order of the leading axes.
    pub(crate) fn row_major_matrices(&self) -> Vec<Vec<T>> {
        let nd = self.ndim();
        let (batch, mat) = self.shape().split_at(nd - 2);
        let (m, k) = (mat[0], mat[1]);
        let mut out = Vec::with_capacity(batch.iter().product());
        let mut full = vec![0usize; nd];
        for_each_coord(batch, |bix| {
            full[..nd - 2].copy_from_slice(bix);
            let mut buf = Vec::with_capacity(m * k);
            for i in 0..m {
                for j in 0..k {
                    full[nd - 2] = i;
                    full[nd - 1] = j;
                    buf.push(self.get(&full));
                }
            }
            out.push(buf);
        });
        out
    }
}

/// Total order on a lane entry with NaN above every number.
fn rank<T: Real>(a: T, b: T) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Position and value of the first maximum in a lane. NaN wins.
fn argmax<T: Real>(lane: &[T]) -> (u32, T) {
    let mut best = (0u32, T::neg_infinity());
    for (i, &x) in lane.iter().enumerate() {
        if i == 0 || rank(x, best.1) == Ordering::Greater {
            best = (i as u32, x);
        }
    }
    best
}

/// Stable log-sum-exp of one lane.
pub(crate) fn log_sum_exp<T: Real>(lane: &[T]) -> T {
    let m = lane.iter().fold(T::neg_infinity(), |acc, &x| acc.max(x));
    if m.is_infinite() {
        return m;
    }
    let s = lane.iter().fold(T::zero(), |acc, &x| acc + (x - m).exp());
    m + s.ln()
}

/// The `k` largest entries of `values`, descending, as `(position, value)`.
///
/// Sorting is stable, so equal values keep ascending positions. NaN ranks
/// above every number, as in [`argmax`].
pub(crate) fn top_k<T: Real>(values: &[T], k: usize) -> Vec<(u32, T)> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&x, &y| rank(values[y], values[x]));
    order
        .into_iter()
        .take(k)
        .map(|i| (i as u32, values[i]))
        .collect()
}

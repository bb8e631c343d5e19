//! Stride-based tensor type with zero-copy views.
//!
//! The [`Tensor`] type supports:
//! - Zero-copy `permute`, `transpose` and `reshape` operations
//! - Broadcasting element-wise operations and axis reductions
//! - Copy-on-write in-place fills used by the semirings' `*_` methods
//!
//! Axes passed as `isize` follow the usual convention that negative values
//! count from the end (`-1` is the last axis).

mod index;
mod ops;

use std::sync::Arc;

use crate::algebra::Scalar;
use crate::backend::{Backend, Storage};

pub(crate) use index::{broadcast_coords, broadcast_shapes, for_each_coord, ravel};
pub(crate) use ops::top_k;
pub use index::normalize_dim;

/// A multi-dimensional tensor with stride-based layout.
///
/// # Type Parameters
///
/// * `T` - The element type (f32, f64, u32, bool, ...)
/// * `B` - The backend type
///
/// # Example
///
/// ```rust
/// use semiring_dp::{Cpu, Tensor};
///
/// let a = Tensor::<f32, Cpu>::from_data(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
/// let b = a.permute(&[1, 0]); // Zero-copy transpose
/// let c = b.contiguous();     // Make contiguous copy
/// assert_eq!(c.shape(), &[3, 2]);
/// ```
#[derive(Clone)]
pub struct Tensor<T: Scalar, B: Backend> {
    /// Shared storage (reference counted)
    storage: Arc<B::Storage<T>>,

    /// Shape of this view
    shape: Vec<usize>,

    /// Strides for each dimension (in elements)
    strides: Vec<usize>,

    /// Offset into storage
    offset: usize,

    /// Backend instance
    backend: B,
}

impl<T: Scalar, B: Backend> Tensor<T, B> {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a tensor from data with the given shape.
    ///
    /// Data is assumed to be in column-major (Fortran) order.
    pub fn from_data(data: &[T], shape: &[usize]) -> Self
    where
        B: Default,
    {
        Self::from_data_with_backend(data, shape, B::default())
    }

    /// Create a tensor from data with explicit backend.
    pub fn from_data_with_backend(data: &[T], shape: &[usize], backend: B) -> Self {
        let numel: usize = shape.iter().product();
        assert_eq!(
            data.len(),
            numel,
            "Data length {} doesn't match shape {:?} (expected {})",
            data.len(),
            shape,
            numel
        );

        let storage = backend.from_slice(data);
        let strides = compute_contiguous_strides(shape);

        Self {
            storage: Arc::new(storage),
            shape: shape.to_vec(),
            strides,
            offset: 0,
            backend,
        }
    }

    /// Create a tensor by evaluating `f` at every multi-index.
    ///
    /// This is layout independent: `f` receives logical coordinates.
    ///
    /// ```rust
    /// use semiring_dp::{Cpu, Tensor};
    ///
    /// let t = Tensor::<f64, Cpu>::from_fn(&[2, 3], |ix| (ix[0] * 10 + ix[1]) as f64);
    /// assert_eq!(t.get(&[1, 2]), 12.0);
    /// ```
    pub fn from_fn(shape: &[usize], f: impl FnMut(&[usize]) -> T) -> Self
    where
        B: Default,
    {
        Self::from_fn_with_backend(shape, B::default(), f)
    }

    /// Create a tensor by evaluating `f` at every multi-index, with explicit backend.
    pub fn from_fn_with_backend(shape: &[usize], backend: B, mut f: impl FnMut(&[usize]) -> T) -> Self {
        let numel: usize = shape.iter().product();
        let mut data = Vec::with_capacity(numel);
        for_each_coord(shape, |ix| data.push(f(ix)));
        Self::from_data_with_backend(&data, shape, backend)
    }

    /// Create a tensor filled with `value`.
    pub fn full(shape: &[usize], value: T) -> Self
    where
        B: Default,
    {
        Self::full_with_backend(shape, value, B::default())
    }

    /// Create a tensor filled with `value`, with explicit backend.
    pub fn full_with_backend(shape: &[usize], value: T, backend: B) -> Self {
        let numel: usize = shape.iter().product();
        Self {
            storage: Arc::new(backend.filled(numel, value)),
            shape: shape.to_vec(),
            strides: compute_contiguous_strides(shape),
            offset: 0,
            backend,
        }
    }

    /// Create a default-filled (zero) tensor.
    pub fn zeros(shape: &[usize]) -> Self
    where
        B: Default,
    {
        Self::zeros_with_backend(shape, B::default())
    }

    /// Create a default-filled (zero) tensor with explicit backend.
    pub fn zeros_with_backend(shape: &[usize], backend: B) -> Self {
        Self::full_with_backend(shape, T::default(), backend)
    }

    /// Create a tensor with the same shape and backend, filled with `value`.
    pub fn full_like<U: Scalar>(&self, value: U) -> Tensor<U, B> {
        Tensor::full_with_backend(&self.shape, value, self.backend.clone())
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Get the shape of the tensor.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the strides of the tensor.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Get the number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Get the total number of elements.
    #[inline]
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// Get the backend.
    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Check if the tensor is contiguous in memory (column-major).
    pub fn is_contiguous(&self) -> bool {
        if self.offset != 0 {
            return false;
        }
        let expected = compute_contiguous_strides(&self.shape);
        self.strides == expected
    }

    // ========================================================================
    // Data Access
    // ========================================================================

    /// Copy all data to a Vec (column-major order).
    pub fn to_vec(&self) -> Vec<T> {
        if self.is_contiguous() {
            self.storage.to_vec()
        } else {
            self.contiguous().storage.to_vec()
        }
    }

    /// Read the element at a multi-index.
    ///
    /// # Panics
    ///
    /// Panics if the index rank or any coordinate is out of range.
    pub fn get(&self, index: &[usize]) -> T {
        assert_eq!(
            index.len(),
            self.ndim(),
            "Index {:?} has wrong rank for shape {:?}",
            index,
            self.shape
        );
        let mut pos = self.offset;
        for (d, (&i, &s)) in index.iter().zip(self.strides.iter()).enumerate() {
            assert!(
                i < self.shape[d],
                "Index {:?} out of bounds for shape {:?}",
                index,
                self.shape
            );
            pos += i * s;
        }
        self.storage.get(pos)
    }

    /// Read the single element of a one-element tensor.
    pub fn item(&self) -> T {
        assert_eq!(self.numel(), 1, "item() requires one element, shape is {:?}", self.shape);
        self.to_vec()[0]
    }

    // ========================================================================
    // View Operations (zero-copy)
    // ========================================================================

    /// Permute dimensions (zero-copy).
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let a = Tensor::<f32, Cpu>::from_data(&data, &[2, 3, 4]);
    /// let b = a.permute(&[2, 0, 1]);  // Shape becomes [4, 2, 3]
    /// ```
    pub fn permute(&self, axes: &[usize]) -> Self {
        assert_eq!(
            axes.len(),
            self.ndim(),
            "Permutation axes length {} doesn't match ndim {}",
            axes.len(),
            self.ndim()
        );

        let mut seen = vec![false; self.ndim()];
        for &ax in axes {
            assert!(ax < self.ndim(), "Axis {} out of range for ndim {}", ax, self.ndim());
            assert!(!seen[ax], "Duplicate axis {} in permutation", ax);
            seen[ax] = true;
        }

        let new_shape: Vec<usize> = axes.iter().map(|&i| self.shape[i]).collect();
        let new_strides: Vec<usize> = axes.iter().map(|&i| self.strides[i]).collect();

        Self {
            storage: Arc::clone(&self.storage),
            shape: new_shape,
            strides: new_strides,
            offset: self.offset,
            backend: self.backend.clone(),
        }
    }

    /// Transpose (2D shorthand for permute).
    pub fn t(&self) -> Self {
        assert_eq!(self.ndim(), 2, "transpose requires 2D tensor, got {}D", self.ndim());
        self.permute(&[1, 0])
    }

    /// Swap two axes (zero-copy).
    pub fn transpose(&self, dim0: isize, dim1: isize) -> Self {
        let a = normalize_dim(dim0, self.ndim());
        let b = normalize_dim(dim1, self.ndim());
        let mut axes: Vec<usize> = (0..self.ndim()).collect();
        axes.swap(a, b);
        self.permute(&axes)
    }

    /// Reshape to a new shape (zero-copy if contiguous).
    ///
    /// Elements keep their column-major order.
    pub fn reshape(&self, new_shape: &[usize]) -> Self {
        let old_numel: usize = self.shape.iter().product();
        let new_numel: usize = new_shape.iter().product();
        assert_eq!(
            old_numel, new_numel,
            "Cannot reshape from {:?} ({} elements) to {:?} ({} elements)",
            self.shape, old_numel, new_shape, new_numel
        );

        if self.is_contiguous() {
            Self {
                storage: Arc::clone(&self.storage),
                shape: new_shape.to_vec(),
                strides: compute_contiguous_strides(new_shape),
                offset: self.offset,
                backend: self.backend.clone(),
            }
        } else {
            self.contiguous().reshape(new_shape)
        }
    }

    /// Insert a size-1 axis at `dim`.
    ///
    /// `dim` ranges over `-(ndim + 1)..=ndim`.
    pub fn unsqueeze(&self, dim: isize) -> Self {
        let ndim = self.ndim() as isize;
        let d = if dim < 0 { dim + ndim + 1 } else { dim };
        assert!(
            (0..=ndim).contains(&d),
            "unsqueeze dim {} out of range for {}D tensor",
            dim,
            ndim
        );
        let mut new_shape = self.shape.clone();
        new_shape.insert(d as usize, 1);
        self.reshape(&new_shape)
    }

    /// Remove the size-1 axis at `dim`.
    pub fn squeeze(&self, dim: isize) -> Self {
        let d = normalize_dim(dim, self.ndim());
        assert_eq!(
            self.shape[d], 1,
            "squeeze dim {} has size {}, expected 1",
            dim, self.shape[d]
        );
        let mut new_shape = self.shape.clone();
        new_shape.remove(d);
        self.reshape(&new_shape)
    }

    /// Make tensor contiguous in memory.
    ///
    /// If already contiguous, returns a clone (shared storage).
    /// Otherwise, copies data to a new contiguous buffer.
    pub fn contiguous(&self) -> Self {
        if self.is_contiguous() {
            self.clone()
        } else {
            let storage = self.backend.copy_strided(
                &self.storage,
                &self.shape,
                &self.strides,
                self.offset,
            );
            Self {
                storage: Arc::new(storage),
                shape: self.shape.clone(),
                strides: compute_contiguous_strides(&self.shape),
                offset: 0,
                backend: self.backend.clone(),
            }
        }
    }

    // ========================================================================
    // Indexing and Structural Operations
    // ========================================================================

    /// Select index `index` along `dim`, dropping that axis (copies).
    pub fn select(&self, dim: isize, index: usize) -> Self {
        let d = normalize_dim(dim, self.ndim());
        assert!(
            index < self.shape[d],
            "select index {} out of range for dim {} of size {}",
            index,
            dim,
            self.shape[d]
        );
        let mut out_shape = self.shape.clone();
        out_shape.remove(d);

        let mut full = vec![0usize; self.ndim()];
        Self::from_fn_with_backend(&out_shape, self.backend.clone(), |ix| {
            full[..d].copy_from_slice(&ix[..d]);
            full[d] = index;
            full[d + 1..].copy_from_slice(&ix[d..]);
            self.get(&full)
        })
    }

    /// Stack equally-shaped tensors along a new axis `dim`.
    ///
    /// # Panics
    ///
    /// Panics if `tensors` is empty or the shapes differ.
    pub fn stack(tensors: &[&Self], dim: isize) -> Self {
        assert!(!tensors.is_empty(), "stack requires at least one tensor");
        let first = tensors[0];
        for t in tensors {
            assert_eq!(
                t.shape(),
                first.shape(),
                "stack requires equal shapes, got {:?} and {:?}",
                first.shape(),
                t.shape()
            );
        }
        let ndim = first.ndim() as isize;
        let d = if dim < 0 { dim + ndim + 1 } else { dim };
        assert!((0..=ndim).contains(&d), "stack dim {} out of range", dim);
        let d = d as usize;

        let mut out_shape = first.shape.clone();
        out_shape.insert(d, tensors.len());

        let mut inner = vec![0usize; first.ndim()];
        Self::from_fn_with_backend(&out_shape, first.backend.clone(), |ix| {
            inner[..d].copy_from_slice(&ix[..d]);
            inner[d..].copy_from_slice(&ix[d + 1..]);
            tensors[ix[d]].get(&inner)
        })
    }

    /// Apply `f` to every element.
    pub fn map<U: Scalar>(&self, mut f: impl FnMut(T) -> U) -> Tensor<U, B> {
        let data: Vec<U> = self.to_vec().into_iter().map(&mut f).collect();
        Tensor::from_data_with_backend(&data, &self.shape, self.backend.clone())
    }

    /// Combine two tensors element-wise with numpy-style broadcasting.
    pub fn zip_with<U: Scalar, V: Scalar>(
        &self,
        other: &Tensor<U, B>,
        mut f: impl FnMut(T, U) -> V,
    ) -> Tensor<V, B> {
        let out_shape = broadcast_shapes(self.shape(), other.shape());
        Tensor::from_fn_with_backend(&out_shape, self.backend.clone(), |ix| {
            let a = self.get(&broadcast_coords(self.shape(), ix));
            let b = other.get(&broadcast_coords(other.shape(), ix));
            f(a, b)
        })
    }

    /// Reduce along `dim` with `f`, which receives one lane at a time.
    ///
    /// The output drops the reduced axis (a 1D input gives a 0D tensor).
    pub fn reduce_axis<U: Scalar>(&self, dim: isize, mut f: impl FnMut(&[T]) -> U) -> Tensor<U, B> {
        let d = normalize_dim(dim, self.ndim());
        let (out_shape, lanes) = self.lanes(d);
        let data: Vec<U> = lanes.iter().map(|lane| f(lane.as_slice())).collect();
        Tensor::from_data_with_backend(&data, &out_shape, self.backend.clone())
    }

    /// Collect the lanes along axis `d`, in column-major order of the
    /// remaining axes.
    pub(crate) fn lanes(&self, d: usize) -> (Vec<usize>, Vec<Vec<T>>) {
        let n = self.shape[d];
        let mut out_shape = self.shape.clone();
        out_shape.remove(d);

        let mut lanes = Vec::with_capacity(out_shape.iter().product());
        let mut full = vec![0usize; self.ndim()];
        for_each_coord(&out_shape, |ix| {
            full[..d].copy_from_slice(&ix[..d]);
            full[d + 1..].copy_from_slice(&ix[d..]);
            let mut lane = Vec::with_capacity(n);
            for j in 0..n {
                full[d] = j;
                lane.push(self.get(&full));
            }
            lanes.push(lane);
        });
        (out_shape, lanes)
    }

    // ========================================================================
    // In-place Operations
    // ========================================================================

    /// Exclusive access to contiguous storage, copying if shared or strided.
    fn storage_mut(&mut self) -> &mut B::Storage<T> {
        if !self.is_contiguous() {
            *self = self.contiguous();
        }
        Arc::make_mut(&mut self.storage)
    }

    /// Write `value` at every position where `pred` holds.
    fn fill_where_(&mut self, value: T, mut pred: impl FnMut(&[usize]) -> bool) {
        let shape = self.shape.clone();
        let strides = compute_contiguous_strides(&shape);
        let storage = self.storage_mut();
        for_each_coord(&shape, |ix| {
            if pred(ix) {
                let pos: usize = ix.iter().zip(strides.iter()).map(|(i, s)| i * s).sum();
                storage.set(pos, value);
            }
        });
    }

    /// Fill every element with `value`.
    ///
    /// Views sharing storage with `self` are not affected.
    pub fn fill_(&mut self, value: T) -> &mut Self {
        self.fill_where_(value, |_| true);
        self
    }

    /// Fill the slice `self[index, ...]` of the leading axis with `value`.
    pub fn fill_component_(&mut self, index: usize, value: T) -> &mut Self {
        assert!(self.ndim() >= 1, "fill_component_ requires at least one axis");
        assert!(
            index < self.shape[0],
            "component {} out of range for leading size {}",
            index,
            self.shape[0]
        );
        self.fill_where_(value, |ix| ix[0] == index);
        self
    }

    /// Fill `self[index, ...]` with `value` where `mask` is true.
    ///
    /// `mask` is broadcast against the trailing shape `self.shape()[1..]`.
    pub fn masked_fill_component_(&mut self, index: usize, mask: &Tensor<bool, B>, value: T) -> &mut Self {
        assert!(self.ndim() >= 1, "masked_fill_component_ requires at least one axis");
        assert!(
            index < self.shape[0],
            "component {} out of range for leading size {}",
            index,
            self.shape[0]
        );
        let rest = self.shape[1..].to_vec();
        assert_eq!(
            broadcast_shapes(mask.shape(), &rest),
            rest,
            "mask shape {:?} does not broadcast to {:?}",
            mask.shape(),
            rest
        );
        self.fill_where_(value, |ix| {
            ix[0] == index && mask.get(&broadcast_coords(mask.shape(), &ix[1..]))
        });
        self
    }
}

/// Compute contiguous strides for column-major (Fortran) layout.
///
/// For shape [m, n], returns strides [1, m] (first dimension is contiguous).
pub fn compute_contiguous_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }

    let mut strides = vec![1; shape.len()];
    for i in 1..shape.len() {
        strides[i] = strides[i - 1] * shape[i - 1];
    }
    strides
}

impl<T: Scalar, B: Backend> std::fmt::Debug for Tensor<T, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .field("contiguous", &self.is_contiguous())
            .field("backend", &B::name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Cpu;

    #[test]
    fn test_tensor_creation() {
        // Column-major: data [1,2,3,4,5,6] for shape [2,3] represents:
        // [[1, 3, 5],
        //  [2, 4, 6]]
        let t = Tensor::<f32, Cpu>::from_data(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.strides(), &[1, 2]);
        assert!(t.is_contiguous());
        assert_eq!(t.numel(), 6);
        assert_eq!(t.get(&[0, 1]), 3.0);
        assert_eq!(t.get(&[1, 2]), 6.0);
    }

    #[test]
    fn test_from_fn_matches_get() {
        let t = Tensor::<f64, Cpu>::from_fn(&[2, 3, 4], |ix| (ix[0] * 100 + ix[1] * 10 + ix[2]) as f64);
        assert_eq!(t.get(&[1, 2, 3]), 123.0);
        assert_eq!(t.get(&[0, 0, 2]), 2.0);
    }

    #[test]
    fn test_permute() {
        let t = Tensor::<f32, Cpu>::from_data(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
        let p = t.permute(&[1, 0]);

        assert_eq!(p.shape(), &[3, 2]);
        assert_eq!(p.strides(), &[2, 1]);
        assert!(!p.is_contiguous());

        let c = p.contiguous();
        assert!(c.is_contiguous());
        assert_eq!(c.to_vec(), vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_transpose_negative_dims() {
        let t = Tensor::<f64, Cpu>::from_fn(&[2, 3, 4], |ix| (ix[0] * 100 + ix[1] * 10 + ix[2]) as f64);
        let p = t.transpose(-2, -1);
        assert_eq!(p.shape(), &[2, 4, 3]);
        assert_eq!(p.get(&[1, 3, 2]), 123.0);
    }

    #[test]
    fn test_reshape() {
        let t = Tensor::<f32, Cpu>::from_data(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
        let r = t.reshape(&[3, 2]);

        assert_eq!(r.shape(), &[3, 2]);
        assert!(r.is_contiguous());
        assert_eq!(r.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_unsqueeze_squeeze() {
        let t = Tensor::<f64, Cpu>::from_fn(&[2, 3], |ix| (ix[0] * 10 + ix[1]) as f64);
        let u = t.unsqueeze(0);
        assert_eq!(u.shape(), &[1, 2, 3]);
        assert_eq!(u.get(&[0, 1, 2]), 12.0);

        let v = t.unsqueeze(-1);
        assert_eq!(v.shape(), &[2, 3, 1]);
        assert_eq!(v.get(&[1, 1, 0]), 11.0);

        let w = t.unsqueeze(-3);
        assert_eq!(w.shape(), &[1, 2, 3]);

        assert_eq!(u.squeeze(0).to_vec(), t.to_vec());
        // Squeezing a non-contiguous view copies first
        let p = t.permute(&[1, 0]).unsqueeze(1);
        assert_eq!(p.shape(), &[3, 1, 2]);
        assert_eq!(p.get(&[2, 0, 1]), 12.0);
    }

    #[test]
    fn test_select_and_stack() {
        let t = Tensor::<f64, Cpu>::from_fn(&[2, 3], |ix| (ix[0] * 10 + ix[1]) as f64);
        let row = t.select(0, 1);
        assert_eq!(row.shape(), &[3]);
        assert_eq!(row.to_vec(), vec![10.0, 11.0, 12.0]);

        let col = t.select(-1, 2);
        assert_eq!(col.to_vec(), vec![2.0, 12.0]);

        let s = Tensor::stack(&[&row, &row], -1);
        assert_eq!(s.shape(), &[3, 2]);
        assert_eq!(s.get(&[2, 1]), 12.0);

        let s0 = Tensor::stack(&[&t, &t, &t], 0);
        assert_eq!(s0.shape(), &[3, 2, 3]);
        assert_eq!(s0.select(0, 2).to_vec(), t.to_vec());
    }

    #[test]
    fn test_zip_with_broadcast() {
        let a = Tensor::<f64, Cpu>::from_data(&[1.0, 2.0], &[2, 1]);
        let b = Tensor::<f64, Cpu>::from_data(&[10.0, 20.0, 30.0], &[3]);
        let c = a.zip_with(&b, |x, y| x + y);
        assert_eq!(c.shape(), &[2, 3]);
        assert_eq!(c.get(&[0, 0]), 11.0);
        assert_eq!(c.get(&[1, 2]), 32.0);
    }

    #[test]
    #[should_panic(expected = "broadcast")]
    fn test_zip_with_incompatible_shapes() {
        let a = Tensor::<f64, Cpu>::zeros(&[2, 3]);
        let b = Tensor::<f64, Cpu>::zeros(&[4]);
        let _ = a.zip_with(&b, |x, y| x + y);
    }

    #[test]
    fn test_reduce_axis_to_scalar() {
        let t = Tensor::<f64, Cpu>::from_data(&[1.0, 2.0, 3.0], &[3]);
        let s = t.reduce_axis(-1, |lane| lane.iter().sum::<f64>());
        assert_eq!(s.shape(), &[] as &[usize]);
        assert_eq!(s.item(), 6.0);
    }

    #[test]
    fn test_fill_is_copy_on_write() {
        let t = Tensor::<f64, Cpu>::from_data(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
        let mut u = t.clone();
        u.fill_(7.0);
        assert_eq!(u.to_vec(), vec![7.0; 4]);
        assert_eq!(t.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_fill_component() {
        let mut t = Tensor::<f64, Cpu>::zeros(&[3, 2]);
        t.fill_component_(1, 5.0).fill_component_(2, -1.0);
        assert_eq!(t.select(0, 0).to_vec(), vec![0.0, 0.0]);
        assert_eq!(t.select(0, 1).to_vec(), vec![5.0, 5.0]);
        assert_eq!(t.select(0, 2).to_vec(), vec![-1.0, -1.0]);
    }

    #[test]
    fn test_masked_fill_component_broadcasts_mask() {
        let mut t = Tensor::<f64, Cpu>::zeros(&[2, 2, 3]);
        // Mask over the last axis only, broadcast along axis 1
        let mask = Tensor::<bool, Cpu>::from_data(&[true, false, true], &[3]);
        t.masked_fill_component_(1, &mask, 9.0);

        assert_eq!(t.select(0, 0).to_vec(), vec![0.0; 6]);
        let c1 = t.select(0, 1);
        assert_eq!(c1.get(&[0, 0]), 9.0);
        assert_eq!(c1.get(&[1, 0]), 9.0);
        assert_eq!(c1.get(&[0, 1]), 0.0);
        assert_eq!(c1.get(&[1, 2]), 9.0);
    }

    #[test]
    fn test_fill_on_strided_view() {
        let t = Tensor::<f64, Cpu>::from_fn(&[2, 3], |ix| (ix[0] * 10 + ix[1]) as f64);
        let mut p = t.permute(&[1, 0]);
        p.fill_component_(0, -5.0);
        assert_eq!(p.shape(), &[3, 2]);
        assert_eq!(p.get(&[0, 1]), -5.0);
        assert_eq!(p.get(&[1, 1]), 11.0);
        assert_eq!(t.get(&[1, 0]), 10.0);
    }
}

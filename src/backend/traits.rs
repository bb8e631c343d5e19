//! Storage and backend abstractions underneath [`Tensor`](crate::Tensor).

use crate::algebra::Scalar;

/// Flat, column-major element buffer owned by a backend.
///
/// Tensors share a buffer through an `Arc`; `Clone` is only invoked by
/// copy-on-write when a shared buffer is about to be filled in place.
pub trait Storage<T: Scalar>: Clone + Send + Sync + Sized {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> T;

    fn set(&mut self, index: usize, value: T);

    fn to_vec(&self) -> Vec<T>;
}

/// Where semiring values live.
///
/// The semirings never touch a backend directly: every reduction and
/// elementwise product is written against [`Tensor`](crate::Tensor), which
/// only needs buffers and a way to gather strided views into fresh ones.
/// Accelerated kernels are looked up separately in
/// [`accel`](crate::backend::accel).
pub trait Backend: Clone + Send + Sync + std::fmt::Debug + 'static {
    type Storage<T: Scalar>: Storage<T>;

    /// Short identifier shown in `Debug` output.
    fn name() -> &'static str;

    /// Buffer of `len` copies of `value`.
    fn filled<T: Scalar>(&self, len: usize, value: T) -> Self::Storage<T>;

    /// Buffer holding `data` as-is.
    #[allow(clippy::wrong_self_convention)]
    fn from_slice<T: Scalar>(&self, data: &[T]) -> Self::Storage<T>;

    /// Gather the view `(shape, strides, offset)` of `src` into a new
    /// contiguous column-major buffer.
    fn copy_strided<T: Scalar>(
        &self,
        src: &Self::Storage<T>,
        shape: &[usize],
        strides: &[usize],
        offset: usize,
    ) -> Self::Storage<T>;
}

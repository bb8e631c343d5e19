//! Semiring algebras for structured-prediction dynamic programs.
//!
//! This module defines the [`Semiring`] trait and implementations for:
//! - [`Counting`]: sum-of-products `(+, ×, 0, 1)`
//! - [`Log`]: log-space `(logsumexp, +, -∞, 0)`, gradients give marginals
//! - [`Max`]: Viterbi `(max, +, -∞, 0)`, gradients give the argmax structure
//! - [`KMax`]: top-k `(kmax, +, [-∞..], [0, -∞..])`
//! - [`KlDivergence`], [`CrossEntropy`], [`Entropy`], [`Risk`]: expectation semirings
//! - [`TempMax`]: hard max forward with a temperature-softmax sparse reduction
//!
//! In every log-domain semiring, `-∞` is represented by the finite sentinel [`NEGINF`].

mod base;
mod expectation;
mod kmax;
mod semiring;
mod simple;
mod tempmax;

pub use base::{CountingFamily, LogFamily};
pub use expectation::{CrossEntropy, Entropy, KlDivergence, Risk};
pub use kmax::KMax;
pub use semiring::{generic_matmul, Semiring, SparseSum};
pub use simple::{Counting, Log, Max};
pub use tempmax::TempMax;

/// Additive identity of the log-domain semirings.
///
/// A large negative number instead of `-inf` so that `inf - inf` never
/// shows up in a backward pass.
pub const NEGINF: f64 = -1e12;

/// Marker trait for element types that can be stored in tensors.
pub trait Scalar: Copy + Clone + Send + Sync + Default + PartialEq + std::fmt::Debug + 'static {}

impl Scalar for f32 {}
impl Scalar for f64 {}
impl Scalar for i32 {}
impl Scalar for i64 {}
impl Scalar for u32 {}
impl Scalar for u64 {}
impl Scalar for bool {}

/// Floating-point scalars the semirings compute with.
pub trait Real: Scalar + num_traits::Float + bytemuck::Pod {
    /// Lossy conversion from an `f64` constant.
    fn cast(v: f64) -> Self;
}

impl Real for f32 {
    #[inline]
    fn cast(v: f64) -> Self {
        v as f32
    }
}

impl Real for f64 {
    #[inline]
    fn cast(v: f64) -> Self {
        v
    }
}

//! # semiring-dp
//!
//! Pluggable semiring algebras for structured-prediction dynamic programs.
//!
//! A dynamic program (linear-chain, tree, alignment, ...) is written once,
//! generically over [`Semiring`]. Swapping the semiring changes what it
//! computes:
//!
//! | Semiring | Result |
//! |----------|--------|
//! | [`Counting`] | total score |
//! | [`Log`] | log-partition function |
//! | [`Max`] | best-structure score |
//! | [`KMax`] | k best scores |
//! | [`Entropy`], [`CrossEntropy`], [`KlDivergence`] | distributional expectations |
//! | [`Risk`] | expected cost |
//!
//! ## Quick Start
//!
//! ```rust
//! use semiring_dp::{Cpu, KMax, Log, Max, Semiring, Tensor};
//!
//! // Forward pass of a length-3 chain with 2 states.
//! fn chain<S: Semiring>(s: &S) -> Tensor<f64, Cpu> {
//!     let edge = Tensor::<f64, Cpu>::from_fn(&[2, 2], |ix| (ix[0] + 2 * ix[1]) as f64 * 0.5);
//!     let edge = s.convert(&edge).unwrap();
//!     let mut alpha = s.convert(&Tensor::<f64, Cpu>::zeros(&[1, 2])).unwrap();
//!     for _ in 0..3 {
//!         alpha = s.matmul(&alpha, &edge).unwrap();
//!     }
//!     s.unconvert(&s.sum(&alpha, -1).unwrap())
//! }
//!
//! let log_z = chain(&Log).to_vec()[0];
//! let best = chain(&Max).to_vec()[0];
//! let kbest = chain(&KMax::new(2).unwrap()).to_vec();
//! assert!(log_z >= best);
//! assert_eq!(kbest[0], best);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Dynamic program (caller)                  │
//! │   convert → times / matmul → sum → unconvert                │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Semiring dispatch                        │
//! │   Counting / Log / Max / KMax / TempMax / expectations      │
//! │   AnySemiring ← SemiringSpec ("kmax:3", JSON)               │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Kernels and tensors                       │
//! │   faer / tropical-gemm (dense), BandedOps (external)        │
//! │   Tensor<T, Cpu>: broadcast, logsumexp, topk, fills         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and installs no subscriber.

pub mod algebra;
pub mod backend;
pub mod banded;
pub mod config;
pub mod error;
pub mod tensor;

// Re-exports
pub use algebra::{
    generic_matmul, Counting, CrossEntropy, Entropy, KMax, KlDivergence, Log, Max, Real, Risk,
    Scalar, Semiring, SparseSum, TempMax, NEGINF,
};
pub use backend::{Backend, Capabilities, Cpu, Kernel};
pub use banded::{BandedMatmul, BandedOps};
pub use config::{AnySemiring, SemiringSpec};
pub use error::{Result, SemiringError};
pub use tensor::Tensor;

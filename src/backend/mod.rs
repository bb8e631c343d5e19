//! Backend abstractions for tensor storage and accelerated kernels.
//!
//! This module defines the [`Backend`] trait and implementations:
//! - [`Cpu`]: CPU backend with `Vec` storage
//!
//! [`accel`] holds the optional accelerated matmul kernels used by the
//! simple semirings, with capability detection cached on first use.

pub mod accel;
mod cpu;
mod traits;

pub use accel::{Capabilities, Kernel};
pub use cpu::Cpu;
pub use traits::{Backend, Storage};

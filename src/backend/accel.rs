//! Optional accelerated dense matmul kernels.
//!
//! The simple semirings ask [`try_matmul`] for an accelerated product before
//! falling back to their dense definition. A kernel is used only when:
//! - the [`Capabilities`] resolved on first use allow it,
//! - the scalar type is `f32` or `f64`,
//! - both operands share the same batch shape.
//!
//! Otherwise `None` is returned and the caller takes the dense path.
//! Nothing here can fail.
//!
//! | Kernel  | Semiring | Implementation                     |
//! |---------|----------|------------------------------------|
//! | `Plain` | Counting | faer GEMM                          |
//! | `Max`   | Max      | tropical-gemm `(max, +)` (feature) |
//! | `Log`   | Log      | none, always dense                 |

use std::any::TypeId;
use std::sync::OnceLock;

use crate::algebra::Real;
use crate::backend::Backend;
use crate::tensor::{ravel, Tensor};

/// Environment variable that disables every accelerated kernel when set to
/// `1` or `true`. Read once.
pub const DISABLE_ENV: &str = "SEMIRING_DP_DISABLE_ACCEL";

/// Which specialized multiply a semiring's matmul maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    /// Standard `(+, ×)` product.
    Plain,
    /// Log-space `(logsumexp, +)` product.
    Log,
    /// Max-plus `(max, +)` product.
    Max,
}

/// Accelerated kernels available to this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// faer GEMM for the standard product.
    pub dense_gemm: bool,
    /// tropical-gemm for the max-plus product.
    pub tropical_gemm: bool,
}

impl Capabilities {
    /// Probe compiled-in kernels and the [`DISABLE_ENV`] switch.
    pub fn detect() -> Self {
        let disabled = std::env::var(DISABLE_ENV)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false);
        Self {
            dense_gemm: !disabled,
            tropical_gemm: cfg!(feature = "tropical-kernels") && !disabled,
        }
    }

    /// No accelerated kernels.
    pub fn none() -> Self {
        Self {
            dense_gemm: false,
            tropical_gemm: false,
        }
    }

    /// Process-wide capabilities, detected once and cached.
    pub fn get() -> &'static Capabilities {
        static CAPS: OnceLock<Capabilities> = OnceLock::new();
        CAPS.get_or_init(|| {
            let caps = Capabilities::detect();
            tracing::debug!(
                dense_gemm = caps.dense_gemm,
                tropical_gemm = caps.tropical_gemm,
                "resolved accelerated matmul capabilities"
            );
            caps
        })
    }

    /// Whether `kernel` has an accelerated implementation.
    pub fn supports(&self, kernel: Kernel) -> bool {
        match kernel {
            Kernel::Plain => self.dense_gemm,
            Kernel::Max => self.tropical_gemm,
            Kernel::Log => false,
        }
    }
}

/// Accelerated `a ⊗ b` over the trailing two axes, using the cached
/// process capabilities.
pub fn try_matmul<T: Real, B: Backend>(
    kernel: Kernel,
    a: &Tensor<T, B>,
    b: &Tensor<T, B>,
) -> Option<Tensor<T, B>> {
    try_matmul_with(Capabilities::get(), kernel, a, b)
}

/// Accelerated `a ⊗ b` with explicit capabilities.
pub fn try_matmul_with<T: Real, B: Backend>(
    caps: &Capabilities,
    kernel: Kernel,
    a: &Tensor<T, B>,
    b: &Tensor<T, B>,
) -> Option<Tensor<T, B>> {
    if !caps.supports(kernel) {
        tracing::trace!(?kernel, "no accelerated kernel, using dense path");
        return None;
    }
    if a.ndim() < 2 || a.ndim() != b.ndim() {
        return None;
    }
    let nd = a.ndim();
    let batch = &a.shape()[..nd - 2];
    if batch != &b.shape()[..nd - 2] || a.shape()[nd - 1] != b.shape()[nd - 2] {
        tracing::trace!(?kernel, "operand shapes need broadcasting, using dense path");
        return None;
    }
    let (m, k, n) = (a.shape()[nd - 2], a.shape()[nd - 1], b.shape()[nd - 1]);

    let a_mats = a.row_major_matrices();
    let b_mats = b.row_major_matrices();
    let mut products = Vec::with_capacity(a_mats.len());
    for (am, bm) in a_mats.iter().zip(b_mats.iter()) {
        let c = match kernel {
            Kernel::Plain => gemm_plain(am, m, k, bm, n),
            Kernel::Max => gemm_maxplus(am, m, k, bm, n),
            Kernel::Log => None,
        }?;
        products.push(c);
    }
    tracing::trace!(?kernel, m, k, n, batches = products.len(), "accelerated matmul");

    let mut out_shape = batch.to_vec();
    out_shape.extend_from_slice(&[m, n]);
    let nb = batch.len();
    Some(Tensor::from_fn_with_backend(&out_shape, a.backend().clone(), |ix| {
        products[ravel(&ix[..nb], batch)][ix[nb] * n + ix[nb + 1]]
    }))
}

/// Standard GEMM on row-major buffers through faer.
fn gemm_plain<T: Real>(a: &[T], m: usize, k: usize, b: &[T], n: usize) -> Option<Vec<T>> {
    if TypeId::of::<T>() == TypeId::of::<f32>() {
        let a32: &[f32] = bytemuck::cast_slice(a);
        let b32: &[f32] = bytemuck::cast_slice(b);
        let c = faer_gemm_f32(a32, m, k, b32, n);
        Some(bytemuck::cast_slice::<f32, T>(&c).to_vec())
    } else if TypeId::of::<T>() == TypeId::of::<f64>() {
        let a64: &[f64] = bytemuck::cast_slice(a);
        let b64: &[f64] = bytemuck::cast_slice(b);
        let c = faer_gemm_f64(a64, m, k, b64, n);
        Some(bytemuck::cast_slice::<f64, T>(&c).to_vec())
    } else {
        None
    }
}

/// GEMM using faer for f32 (row-major buffers).
fn faer_gemm_f32(a: &[f32], m: usize, k: usize, b: &[f32], n: usize) -> Vec<f32> {
    use faer::Mat;

    let a_mat = Mat::from_fn(m, k, |i, j| a[i * k + j]);
    let b_mat = Mat::from_fn(k, n, |i, j| b[i * n + j]);
    let c_mat = &a_mat * &b_mat;

    let mut c = vec![0.0f32; m * n];
    for i in 0..m {
        for j in 0..n {
            c[i * n + j] = c_mat[(i, j)];
        }
    }
    c
}

/// GEMM using faer for f64 (row-major buffers).
fn faer_gemm_f64(a: &[f64], m: usize, k: usize, b: &[f64], n: usize) -> Vec<f64> {
    use faer::Mat;

    let a_mat = Mat::from_fn(m, k, |i, j| a[i * k + j]);
    let b_mat = Mat::from_fn(k, n, |i, j| b[i * n + j]);
    let c_mat = &a_mat * &b_mat;

    let mut c = vec![0.0f64; m * n];
    for i in 0..m {
        for j in 0..n {
            c[i * n + j] = c_mat[(i, j)];
        }
    }
    c
}

/// Max-plus GEMM on row-major buffers through tropical-gemm.
#[cfg(feature = "tropical-kernels")]
fn gemm_maxplus<T: Real>(a: &[T], m: usize, k: usize, b: &[T], n: usize) -> Option<Vec<T>> {
    use tropical_gemm::{tropical_matmul, TropicalMaxPlus, TropicalSemiring};

    if TypeId::of::<T>() == TypeId::of::<f32>() {
        let a32: &[f32] = bytemuck::cast_slice(a);
        let b32: &[f32] = bytemuck::cast_slice(b);
        let c: Vec<f32> = tropical_matmul::<TropicalMaxPlus<f32>>(a32, m, k, b32, n)
            .into_iter()
            .map(|x| x.value())
            .collect();
        Some(bytemuck::cast_slice::<f32, T>(&c).to_vec())
    } else if TypeId::of::<T>() == TypeId::of::<f64>() {
        let a64: &[f64] = bytemuck::cast_slice(a);
        let b64: &[f64] = bytemuck::cast_slice(b);
        let c: Vec<f64> = tropical_matmul::<TropicalMaxPlus<f64>>(a64, m, k, b64, n)
            .into_iter()
            .map(|x| x.value())
            .collect();
        Some(bytemuck::cast_slice::<f64, T>(&c).to_vec())
    } else {
        None
    }
}

#[cfg(not(feature = "tropical-kernels"))]
fn gemm_maxplus<T: Real>(_a: &[T], _m: usize, _k: usize, _b: &[T], _n: usize) -> Option<Vec<T>> {
    None
}

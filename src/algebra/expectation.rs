//! Expectation semirings: inside scores plus a running statistic.
//!
//! Values carry a leading component axis. Component 0 is always the
//! log-inside score of the reference distribution `p`; the last component is
//! the running statistic returned by `unconvert`. Reductions renormalize
//! `p` over the reduced axis and accumulate the statistic under
//! `softmax(p)`.
//!
//! | Semiring | Components | Zero | One |
//! |----------|------------|------|-----|
//! | [`KlDivergence`] | `(p, q, kl)` | `(-∞, -∞, 0)` | `(0, 0, 0)` |
//! | [`CrossEntropy`] | `(p, q, ce)` | `(-∞, -∞, 0)` | `(0, 0, 0)` |
//! | [`Entropy`] | `(p, h)` | `(-∞, 0)` | `(0, 0)` |
//! | [`Risk`] | `(p, cost, risk)` | `(-∞, 0, 0)` | `(0, 0, 0)` |

use super::semiring::Semiring;
use super::{Real, NEGINF};
use crate::backend::Backend;
use crate::error::{Result, SemiringError};
use crate::tensor::{normalize_dim, Tensor};

/// Axis of a single component corresponding to `dim` of the full value.
fn component_dim(semiring: &'static str, ndim: usize, dim: isize) -> Result<isize> {
    if normalize_dim(dim, ndim) == 0 {
        tracing::warn!(semiring, dim, "reduction over the component axis");
        return Err(SemiringError::ComponentAxis { semiring, dim });
    }
    Ok(if dim > 0 { dim - 1 } else { dim })
}

/// Log-partition and log-softmax of one stream along `d`.
fn normalize<T: Real, B: Backend>(x: &Tensor<T, B>, d: isize) -> (Tensor<T, B>, Tensor<T, B>) {
    let part = x.logsumexp(d);
    let log_sm = x - &part.unsqueeze(d);
    (part, log_sm)
}

/// `Σ_d stat · weight`.
fn weighted_sum<T: Real, B: Backend>(stat: &Tensor<T, B>, weight: &Tensor<T, B>, d: isize) -> Tensor<T, B> {
    (stat * weight).sum_axis(d)
}

/// Stack two streams `(x0, x1)` into `(x0, x1, 0)`.
fn convert_pair<T: Real, B: Backend>(semiring: &'static str, xs: &Tensor<T, B>) -> Result<Tensor<T, B>> {
    let actual = xs.shape().first().copied().unwrap_or(0);
    if actual != 2 {
        tracing::warn!(semiring, actual, "expected two stacked potential streams");
        return Err(SemiringError::ComponentCount {
            semiring,
            expected: 2,
            actual,
        });
    }
    let mut shape = xs.shape().to_vec();
    shape[0] = 3;
    Ok(Tensor::from_fn_with_backend(&shape, xs.backend().clone(), |ix| {
        if ix[0] < 2 {
            xs.get(ix)
        } else {
            T::zero()
        }
    }))
}

fn last_component<T: Real, B: Backend>(xs: &Tensor<T, B>) -> Tensor<T, B> {
    let n = xs.shape().first().copied().unwrap_or(0);
    assert!(n > 0, "expectation value has no components");
    xs.select(0, n - 1)
}

/// KL-divergence expectation semiring.
///
/// Tracks the inside scores of `p` and `q` and the running `KL(p ‖ q)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KlDivergence;

impl Semiring for KlDivergence {
    fn name(&self) -> &'static str {
        "kl_divergence"
    }

    fn size(&self) -> usize {
        3
    }

    fn zero_element(&self) -> Vec<f64> {
        vec![NEGINF, NEGINF, 0.0]
    }

    fn one_element(&self) -> Vec<f64> {
        vec![0.0; 3]
    }

    fn sum<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Result<Tensor<T, B>> {
        let d = component_dim(self.name(), xs.ndim(), dim)?;
        let (part_p, log_sm_p) = normalize(&xs.select(0, 0), d);
        let (part_q, log_sm_q) = normalize(&xs.select(0, 1), d);
        let sm_p = log_sm_p.exp();
        let stat = &(&xs.select(0, 2) - &log_sm_q) + &log_sm_p;
        let kl = weighted_sum(&stat, &sm_p, d);
        Ok(Tensor::stack(&[&part_p, &part_q, &kl], 0))
    }

    fn mul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Tensor<T, B> {
        a + b
    }

    fn prod<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Tensor<T, B> {
        xs.sum_axis(dim)
    }

    /// Expects the two streams `p` and `q` stacked on the leading axis.
    fn convert<T: Real, B: Backend>(&self, potentials: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        convert_pair(self.name(), potentials)
    }

    fn unconvert<T: Real, B: Backend>(&self, xs: &Tensor<T, B>) -> Tensor<T, B> {
        last_component(xs)
    }
}

/// Cross-entropy expectation semiring, `H(p, q)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrossEntropy;

impl Semiring for CrossEntropy {
    fn name(&self) -> &'static str {
        "cross_entropy"
    }

    fn size(&self) -> usize {
        3
    }

    fn zero_element(&self) -> Vec<f64> {
        vec![NEGINF, NEGINF, 0.0]
    }

    fn one_element(&self) -> Vec<f64> {
        vec![0.0; 3]
    }

    fn sum<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Result<Tensor<T, B>> {
        let d = component_dim(self.name(), xs.ndim(), dim)?;
        let (part_p, log_sm_p) = normalize(&xs.select(0, 0), d);
        let (part_q, log_sm_q) = normalize(&xs.select(0, 1), d);
        let sm_p = log_sm_p.exp();
        let stat = &xs.select(0, 2) - &log_sm_q;
        let ce = weighted_sum(&stat, &sm_p, d);
        Ok(Tensor::stack(&[&part_p, &part_q, &ce], 0))
    }

    fn mul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Tensor<T, B> {
        a + b
    }

    fn prod<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Tensor<T, B> {
        xs.sum_axis(dim)
    }

    /// Expects the two streams `p` and `q` stacked on the leading axis.
    fn convert<T: Real, B: Backend>(&self, potentials: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        convert_pair(self.name(), potentials)
    }

    fn unconvert<T: Real, B: Backend>(&self, xs: &Tensor<T, B>) -> Tensor<T, B> {
        last_component(xs)
    }
}

/// Entropy expectation semiring.
///
/// # Example
///
/// ```rust
/// use semiring_dp::{Cpu, Entropy, Semiring, Tensor};
///
/// // Uniform over 4 outcomes.
/// let x = Entropy.convert(&Tensor::<f64, Cpu>::zeros(&[4])).unwrap();
/// let h = Entropy.unconvert(&Entropy.sum(&x, -1).unwrap()).item();
/// assert!((h - 4f64.ln()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Entropy;

impl Semiring for Entropy {
    fn name(&self) -> &'static str {
        "entropy"
    }

    fn size(&self) -> usize {
        2
    }

    fn zero_element(&self) -> Vec<f64> {
        vec![NEGINF, 0.0]
    }

    fn one_element(&self) -> Vec<f64> {
        vec![0.0; 2]
    }

    fn sum<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Result<Tensor<T, B>> {
        let d = component_dim(self.name(), xs.ndim(), dim)?;
        let (part, log_sm) = normalize(&xs.select(0, 0), d);
        let sm = log_sm.exp();
        let stat = &xs.select(0, 1) - &log_sm;
        let h = weighted_sum(&stat, &sm, d);
        Ok(Tensor::stack(&[&part, &h], 0))
    }

    fn mul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Tensor<T, B> {
        a + b
    }

    fn prod<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Tensor<T, B> {
        xs.sum_axis(dim)
    }

    fn convert<T: Real, B: Backend>(&self, potentials: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        let mut shape = vec![2];
        shape.extend_from_slice(potentials.shape());
        Ok(Tensor::from_fn_with_backend(&shape, potentials.backend().clone(), |ix| {
            if ix[0] == 0 {
                potentials.get(&ix[1..])
            } else {
                T::zero()
            }
        }))
    }

    fn unconvert<T: Real, B: Backend>(&self, xs: &Tensor<T, B>) -> Tensor<T, B> {
        last_component(xs)
    }
}

/// Risk (expected cost) semiring.
///
/// Takes log-potentials and per-part costs stacked on the leading axis and
/// returns the expected cost under `p`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Risk;

impl Semiring for Risk {
    fn name(&self) -> &'static str {
        "risk"
    }

    fn size(&self) -> usize {
        3
    }

    fn zero_element(&self) -> Vec<f64> {
        vec![NEGINF, 0.0, 0.0]
    }

    fn one_element(&self) -> Vec<f64> {
        vec![0.0; 3]
    }

    fn sum<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Result<Tensor<T, B>> {
        let d = component_dim(self.name(), xs.ndim(), dim)?;
        let (part_p, log_sm_p) = normalize(&xs.select(0, 0), d);
        let sm_p = log_sm_p.exp();
        let stat = &xs.select(0, 1) + &xs.select(0, 2);
        let risk = weighted_sum(&stat, &sm_p, d);
        let cost = part_p.full_like(T::zero());
        Ok(Tensor::stack(&[&part_p, &cost, &risk], 0))
    }

    fn mul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Tensor<T, B> {
        a + b
    }

    fn prod<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Tensor<T, B> {
        xs.sum_axis(dim)
    }

    /// Expects log-potentials and costs stacked on the leading axis.
    fn convert<T: Real, B: Backend>(&self, potentials: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        convert_pair(self.name(), potentials)
    }

    fn unconvert<T: Real, B: Backend>(&self, xs: &Tensor<T, B>) -> Tensor<T, B> {
        last_component(xs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Cpu;

    fn streams(p: &[f64], q: &[f64]) -> Tensor<f64, Cpu> {
        let n = p.len();
        Tensor::from_fn(&[2, n], |ix| if ix[0] == 0 { p[ix[1]] } else { q[ix[1]] })
    }

    fn entropy_of(p: &[f64]) -> f64 {
        let z: f64 = p.iter().map(|v| v.exp()).sum();
        -p.iter().map(|v| v.exp() / z).map(|w| w * w.ln()).sum::<f64>()
    }

    #[test]
    fn test_component_axis_rejected() {
        let x = Entropy.convert(&Tensor::<f64, Cpu>::zeros(&[3])).unwrap();
        assert_eq!(
            Entropy.sum(&x, 0).unwrap_err(),
            SemiringError::ComponentAxis { semiring: "entropy", dim: 0 }
        );
        assert!(KlDivergence.sum(&Tensor::<f64, Cpu>::zeros(&[3, 2]), -2).is_err());
    }

    #[test]
    fn test_convert_requires_two_streams() {
        let bad = Tensor::<f64, Cpu>::zeros(&[3, 4]);
        assert_eq!(
            KlDivergence.convert(&bad).unwrap_err(),
            SemiringError::ComponentCount { semiring: "kl_divergence", expected: 2, actual: 3 }
        );
        assert!(CrossEntropy.convert(&bad).is_err());
        assert!(Risk.convert(&bad).is_err());

        let x = Risk.convert(&streams(&[1.0, 2.0], &[3.0, 4.0])).unwrap();
        assert_eq!(x.shape(), &[3, 2]);
        assert_eq!(x.get(&[1, 1]), 4.0);
        assert_eq!(x.get(&[2, 0]), 0.0);
    }

    #[test]
    fn test_entropy_matches_closed_form() {
        let p = [0.3, -1.2, 2.0, 0.0];
        let x = Entropy.convert(&Tensor::<f64, Cpu>::from_data(&p, &[4])).unwrap();
        let r = Entropy.sum(&x, -1).unwrap();
        assert_eq!(r.shape(), &[2]);
        assert!((Entropy.unconvert(&r).item() - entropy_of(&p)).abs() < 1e-12);
        let z: f64 = p.iter().map(|v| v.exp()).sum();
        assert!((r.get(&[0]) - z.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_kl_identical_streams_is_zero() {
        let p = [0.5, 1.5, -0.25];
        let x = KlDivergence.convert(&streams(&p, &p)).unwrap();
        let r = KlDivergence.sum(&x, -1).unwrap();
        assert!(KlDivergence.unconvert(&r).item().abs() < 1e-12);
    }

    #[test]
    fn test_kl_matches_closed_form() {
        let p = [0.5, 1.5, -0.25];
        let q = [0.0, 0.0, 1.0];
        let x = KlDivergence.convert(&streams(&p, &q)).unwrap();
        let r = KlDivergence.sum(&x, -1).unwrap();
        let zp: f64 = p.iter().map(|v| v.exp()).sum();
        let zq: f64 = q.iter().map(|v| v.exp()).sum();
        let expected: f64 = (0..3)
            .map(|i| {
                let pi = p[i].exp() / zp;
                let qi = q[i].exp() / zq;
                pi * (pi / qi).ln()
            })
            .sum();
        assert!((KlDivergence.unconvert(&r).item() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_cross_entropy_identical_equals_entropy() {
        let p = [0.1, -0.7, 1.3, 0.4];
        let x = CrossEntropy.convert(&streams(&p, &p)).unwrap();
        let ce = CrossEntropy.unconvert(&CrossEntropy.sum(&x, -1).unwrap()).item();
        assert!((ce - entropy_of(&p)).abs() < 1e-12);
    }

    #[test]
    fn test_risk_is_expected_cost() {
        let logits = [0.0, 1.0, 2.0];
        let costs = [3.0, -1.0, 0.5];
        let x = Risk.convert(&streams(&logits, &costs)).unwrap();
        let r = Risk.sum(&x, -1).unwrap();
        let z: f64 = logits.iter().map(|v| v.exp()).sum();
        let expected: f64 = (0..3).map(|i| logits[i].exp() / z * costs[i]).sum();
        assert!((Risk.unconvert(&r).item() - expected).abs() < 1e-12);
        assert_eq!(r.get(&[1]), 0.0);
    }

    #[test]
    fn test_positive_dim_maps_to_component_axis() {
        // (2, batch=2, n=3): reduce the last axis given as a positive index.
        let p = Tensor::<f64, Cpu>::from_fn(&[2, 3], |ix| ix[1] as f64 * (ix[0] as f64 + 1.0));
        let x = Entropy.convert(&p).unwrap();
        let a = Entropy.sum(&x, 2).unwrap();
        let b = Entropy.sum(&x, -1).unwrap();
        assert_eq!(a.shape(), &[2, 2]);
        assert_eq!(a.to_vec(), b.to_vec());
    }

    #[test]
    fn test_mul_one_is_identity() {
        let y = Tensor::<f64, Cpu>::from_fn(&[3, 2], |ix| ix[0] as f64 - ix[1] as f64);
        for s in [KlDivergence.one_element(), CrossEntropy.one_element(), Risk.one_element()] {
            assert_eq!(s, vec![0.0; 3]);
        }
        let mut one = y.clone();
        KlDivergence.one_(&mut one);
        assert_eq!(KlDivergence.mul(&one, &y).to_vec(), y.to_vec());
    }

    #[test]
    fn test_zero_is_sum_identity() {
        let y = Entropy
            .convert(&Tensor::<f64, Cpu>::from_data(&[0.2, 1.1], &[2]))
            .unwrap()
            .map(|v| v + 0.5);
        let mut z = y.clone();
        Entropy.zero_(&mut z);
        let r = Entropy.sum(&Tensor::stack(&[&z, &y], -1), -1).unwrap();
        for (a, b) in r.to_vec().iter().zip(y.to_vec()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_prod_sums_over_dim() {
        let x = Tensor::<f64, Cpu>::from_fn(&[2, 3], |ix| (ix[0] + ix[1]) as f64);
        assert_eq!(Entropy.prod(&x, -1).to_vec(), vec![3.0, 6.0]);
    }
}

//! Property-based tests for the semiring identities and laws.

use proptest::prelude::*;
use semiring_dp::{
    Counting, Cpu, CrossEntropy, Entropy, KMax, KlDivergence, Log, Max, Risk, Semiring, TempMax,
    Tensor,
};

// ===== Strategies =====

/// Potentials of moderate magnitude, length 1..=6.
fn arb_potentials() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-5.0f64..5.0, 1..=6)
}

/// Flat values for a three-component tensor, at least one position each.
fn arb_triples() -> impl Strategy<Value = Vec<f64>> {
    (1usize..=5).prop_flat_map(|n| prop::collection::vec(-5.0f64..5.0, 3 * n))
}

/// `(3, n)` tensor whose component `c` is `v[c * n..(c + 1) * n]`.
fn components(v: &[f64]) -> Tensor<f64, Cpu> {
    let n = v.len() / 3;
    Tensor::from_fn(&[3, n], |ix| v[ix[0] * n + ix[1]])
}

fn tensor(values: &[f64]) -> Tensor<f64, Cpu> {
    Tensor::from_data(values, &[values.len()])
}

fn assert_close(x: &Tensor<f64, Cpu>, y: &Tensor<f64, Cpu>, tol: f64) -> Result<(), TestCaseError> {
    prop_assert_eq!(x.shape(), y.shape());
    for (a, b) in x.to_vec().iter().zip(y.to_vec()) {
        prop_assert!((a - b).abs() <= tol, "{} vs {}", a, b);
    }
    Ok(())
}

/// `one ⊗ y == y`
fn check_one_identity<S: Semiring>(s: &S, y: &Tensor<f64, Cpu>) -> Result<(), TestCaseError> {
    let mut one = y.clone();
    s.one_(&mut one);
    assert_close(&s.mul(&one, y), y, 1e-9)?;
    assert_close(&s.mul(y, &one), y, 1e-9)
}

/// `zero ⊕ y == y`, with ⊕ as a reduction over a stacked last axis.
fn check_zero_identity<S: Semiring>(s: &S, y: &Tensor<f64, Cpu>) -> Result<(), TestCaseError> {
    let mut zero = y.clone();
    s.zero_(&mut zero);
    let r = s.sum(&Tensor::stack(&[&zero, y], -1), -1).unwrap();
    assert_close(&r, y, 1e-9)
}

// ===== Property Tests =====

proptest! {
    #[test]
    fn prop_simple_identities(p in arb_potentials()) {
        let x = tensor(&p);
        let y = Counting.convert(&x).unwrap();
        check_one_identity(&Counting, &y)?;
        check_zero_identity(&Counting, &y)?;
        check_one_identity(&Log, &y)?;
        check_zero_identity(&Log, &y)?;
        check_one_identity(&Max, &y)?;
        check_zero_identity(&Max, &y)?;
    }

    #[test]
    fn prop_kmax_identities(p in prop::collection::vec(-5.0f64..5.0, 3..=6), k in 1usize..=3) {
        let s = KMax::new(k).unwrap();
        // A genuine k-list: the k best of p.
        let y = s.sum(&s.convert(&tensor(&p)).unwrap(), -1).unwrap();
        check_one_identity(&s, &y)?;
        check_zero_identity(&s, &y)?;
    }

    #[test]
    fn prop_entropy_identities(p in arb_potentials(), h in arb_potentials()) {
        let n = p.len().min(h.len());
        let y = Tensor::<f64, Cpu>::from_fn(&[2, n], |ix| if ix[0] == 0 { p[ix[1]] } else { h[ix[1]] });
        check_one_identity(&Entropy, &y)?;
        check_zero_identity(&Entropy, &y)?;
    }

    #[test]
    fn prop_kl_identities(v in arb_triples()) {
        let y = components(&v);
        check_one_identity(&KlDivergence, &y)?;
        check_zero_identity(&KlDivergence, &y)?;
    }

    #[test]
    fn prop_cross_entropy_identities(v in arb_triples()) {
        let y = components(&v);
        check_one_identity(&CrossEntropy, &y)?;
        check_zero_identity(&CrossEntropy, &y)?;
    }

    #[test]
    fn prop_risk_identities(v in arb_triples()) {
        let y = components(&v);
        check_one_identity(&Risk, &y)?;

        // Adding zero folds the cost into the risk and clears the cost.
        let mut zero = y.clone();
        Risk.zero_(&mut zero);
        let r = Risk.sum(&Tensor::stack(&[&zero, &y], -1), -1).unwrap();
        prop_assert_eq!(r.shape(), y.shape());
        for j in 0..y.shape()[1] {
            prop_assert!((r.get(&[0, j]) - y.get(&[0, j])).abs() <= 1e-9);
            prop_assert_eq!(r.get(&[1, j]), 0.0);
            prop_assert!((r.get(&[2, j]) - (y.get(&[1, j]) + y.get(&[2, j]))).abs() <= 1e-9);
        }
    }

    #[test]
    fn prop_tempmax_one_identity(p in arb_potentials(), alpha in 0.1f64..4.0) {
        let s = TempMax::new(alpha).unwrap();
        check_one_identity(&s, &s.convert(&tensor(&p)).unwrap())?;
    }

    #[test]
    fn prop_log_plus_commutative_associative(a in -5.0f64..5.0, b in -5.0f64..5.0, c in -5.0f64..5.0) {
        let (ta, tb, tc) = (tensor(&[a]), tensor(&[b]), tensor(&[c]));
        let ab = Log.plus(&ta, &tb).unwrap();
        assert_close(&ab, &Log.plus(&tb, &ta).unwrap(), 1e-12)?;
        let left = Log.plus(&ab, &tc).unwrap();
        let right = Log.plus(&ta, &Log.plus(&tb, &tc).unwrap()).unwrap();
        assert_close(&left, &right, 1e-9)?;
    }

    #[test]
    fn prop_log_bounded_by_max(p in arb_potentials()) {
        let x = tensor(&p);
        let log_z = Log.sum(&x, -1).unwrap().item();
        let best = Max.sum(&x, -1).unwrap().item();
        prop_assert!(log_z >= best - 1e-12);
        prop_assert!(log_z <= best + (p.len() as f64).ln() + 1e-12);
    }

    #[test]
    fn prop_counting_distributes(a in -3.0f64..3.0, b in -3.0f64..3.0, c in -3.0f64..3.0) {
        let (ta, tb, tc) = (tensor(&[a]), tensor(&[b]), tensor(&[c]));
        let left = Counting.mul(&ta, &Counting.plus(&tb, &tc).unwrap());
        let right = Counting.plus(&Counting.mul(&ta, &tb), &Counting.mul(&ta, &tc)).unwrap();
        assert_close(&left, &right, 1e-9)?;
    }

    #[test]
    fn prop_kmax_one_matches_max(rows in 1usize..=3, p in prop::collection::vec(-5.0f64..5.0, 6)) {
        let cols = 6 / rows.max(1);
        let x = Tensor::<f64, Cpu>::from_fn(&[rows, cols], |ix| p[ix[0] * cols + ix[1]]);
        let s = KMax::new(1).unwrap();
        let kx = s.convert(&x).unwrap();
        let mx = Max.convert(&x).unwrap();
        prop_assert_eq!(s.sum(&kx, -1).unwrap().to_vec(), Max.sum(&mx, -1).unwrap().to_vec());
        prop_assert_eq!(s.mul(&kx, &kx).to_vec(), Max.mul(&mx, &mx).to_vec());
    }
}

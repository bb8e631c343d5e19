//! Tests for the k-max semiring against brute-force enumeration.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use semiring_dp::{Cpu, KMax, Max, Semiring, SemiringError, SparseSum, Tensor};

fn random(rng: &mut StdRng, shape: &[usize]) -> Tensor<f64, Cpu> {
    Tensor::from_fn(shape, |_| rng.gen_range(-10.0..10.0))
}

fn sorted_desc(mut v: Vec<f64>) -> Vec<f64> {
    v.sort_by(|a, b| b.partial_cmp(a).unwrap());
    v
}

#[test]
fn test_sum_is_true_top_k() {
    let mut rng = StdRng::seed_from_u64(7);
    for k in 1..=4 {
        let s = KMax::new(k).unwrap();
        let p = random(&mut rng, &[3, 6]);
        let r = s.sum(&s.convert(&p).unwrap(), -1).unwrap();
        assert_eq!(r.shape(), &[k, 3]);
        for row in 0..3 {
            let expected = sorted_desc((0..6).map(|j| p.get(&[row, j])).collect());
            for i in 0..k {
                assert_eq!(r.get(&[i, row]), expected[i]);
            }
        }
    }
}

#[test]
fn test_mul_is_true_top_k_of_pairs() {
    let mut rng = StdRng::seed_from_u64(11);
    let k = 3;
    let s = KMax::new(k).unwrap();
    // Two sorted k-lists per position.
    let a = s.sum(&s.convert(&random(&mut rng, &[2, 5])).unwrap(), -1).unwrap();
    let b = s.sum(&s.convert(&random(&mut rng, &[2, 5])).unwrap(), -1).unwrap();
    let c = s.mul(&a, &b);
    assert_eq!(c.shape(), &[k, 2]);
    for pos in 0..2 {
        let mut pairs = Vec::new();
        for i in 0..k {
            for j in 0..k {
                pairs.push(a.get(&[i, pos]) + b.get(&[j, pos]));
            }
        }
        let expected = sorted_desc(pairs);
        for i in 0..k {
            assert_eq!(c.get(&[i, pos]), expected[i]);
        }
    }
}

#[test]
fn test_values_sorted_descending() {
    let mut rng = StdRng::seed_from_u64(3);
    let s = KMax::new(4).unwrap();
    let a = s.convert(&random(&mut rng, &[5, 3])).unwrap();
    let b = s.convert(&random(&mut rng, &[3, 4])).unwrap();
    let c = s.matmul(&a, &b).unwrap();
    assert_eq!(c.shape(), &[4, 5, 4]);
    for i in 0..5 {
        for j in 0..4 {
            for slot in 1..4 {
                assert!(c.get(&[slot - 1, i, j]) >= c.get(&[slot, i, j]));
            }
        }
    }
}

#[test]
fn test_matmul_k1_matches_max() {
    let mut rng = StdRng::seed_from_u64(5);
    let s = KMax::new(1).unwrap();
    let a = random(&mut rng, &[4, 3]);
    let b = random(&mut rng, &[3, 2]);
    let kc = s.matmul(&s.convert(&a).unwrap(), &s.convert(&b).unwrap()).unwrap();
    let mc = Max.matmul(&Max.convert(&a).unwrap(), &Max.convert(&b).unwrap()).unwrap();
    assert_eq!(kc.to_vec(), mc.to_vec());
}

#[test]
fn test_sparse_sum_points_at_sources() {
    let mut rng = StdRng::seed_from_u64(13);
    let k = 3;
    let s = KMax::new(k).unwrap();
    let x = s.sum(&s.convert(&random(&mut rng, &[4, 2, 5])).unwrap(), -1).unwrap();
    // x: (k, 4, 2), reduce the last axis of size 2.
    let (v, (slots, positions)) = s.sparse_sum(&x, -1).unwrap();
    assert_eq!(v.shape(), &[k, 4]);
    for i in 0..k {
        for r in 0..4 {
            let slot = slots.get(&[i, r]) as usize;
            let pos = positions.get(&[i, r]) as usize;
            assert!(slot < k && pos < 2);
            assert_eq!(v.get(&[i, r]), x.get(&[slot, r, pos]));
        }
    }
}

#[test]
fn test_rejects_non_last_axis() {
    let s = KMax::new(2).unwrap();
    let x = s.convert(&Tensor::<f64, Cpu>::zeros(&[3, 4])).unwrap();
    assert!(matches!(
        s.sum(&x, 1),
        Err(SemiringError::UnsupportedAxis { semiring: "kmax", dim: 1, ndim: 3 })
    ));
    assert!(s.sum(&x, 2).is_ok());
}

#[test]
fn test_k1_propagates_nan_like_max() {
    let x = Tensor::<f64, Cpu>::from_data(&[f64::NAN, 10.0, 2.0], &[3]);
    let k1 = KMax::new(1).unwrap();
    let kv = k1.sum(&k1.convert(&x).unwrap(), -1).unwrap();
    let mv = Max.sum(&Max.convert(&x).unwrap(), -1).unwrap();
    assert!(kv.item().is_nan());
    assert!(mv.item().is_nan());

    let k2 = KMax::new(2).unwrap();
    let v = k2.sum(&k2.convert(&x).unwrap(), -1).unwrap();
    assert!(v.get(&[0]).is_nan());
    assert_eq!(v.get(&[1]), 10.0);
}

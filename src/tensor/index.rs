//! Multi-index helpers shared by the tensor operations.

/// Resolve a possibly negative axis against `ndim`.
///
/// # Panics
///
/// Panics if `dim` is outside `-ndim..ndim`.
pub fn normalize_dim(dim: isize, ndim: usize) -> usize {
    let n = ndim as isize;
    let d = if dim < 0 { dim + n } else { dim };
    assert!(
        (0..n).contains(&d),
        "dim {} out of range for {}D tensor",
        dim,
        ndim
    );
    d as usize
}

/// Visit every multi-index of `shape` in column-major order.
///
/// A 0D shape is visited once with an empty index; a shape with a zero
/// extent is not visited at all.
pub(crate) fn for_each_coord(shape: &[usize], mut f: impl FnMut(&[usize])) {
    if shape.iter().any(|&s| s == 0) {
        return;
    }
    let numel: usize = shape.iter().product();
    let mut ix = vec![0usize; shape.len()];
    for _ in 0..numel {
        f(&ix);
        for dim in 0..shape.len() {
            ix[dim] += 1;
            if ix[dim] < shape[dim] {
                break;
            }
            ix[dim] = 0;
        }
    }
}

/// Column-major linear position of `ix` in `shape`.
pub(crate) fn ravel(ix: &[usize], shape: &[usize]) -> usize {
    let mut pos = 0;
    let mut stride = 1;
    for (&i, &s) in ix.iter().zip(shape.iter()) {
        pos += i * stride;
        stride *= s;
    }
    pos
}

/// Broadcast two shapes, aligning trailing axes.
///
/// # Panics
///
/// Panics if the shapes are incompatible.
pub(crate) fn broadcast_shapes(a: &[usize], b: &[usize]) -> Vec<usize> {
    let ndim = a.len().max(b.len());
    let mut out = vec![0; ndim];
    for i in 0..ndim {
        let da = if i + a.len() >= ndim { a[i + a.len() - ndim] } else { 1 };
        let db = if i + b.len() >= ndim { b[i + b.len() - ndim] } else { 1 };
        assert!(
            da == db || da == 1 || db == 1,
            "shapes {:?} and {:?} cannot broadcast",
            a,
            b
        );
        out[i] = if da == 1 { db } else { da };
    }
    out
}

/// Map an index into a broadcast output back to an index into `shape`.
pub(crate) fn broadcast_coords(shape: &[usize], out_ix: &[usize]) -> Vec<usize> {
    let skip = out_ix.len() - shape.len();
    shape
        .iter()
        .zip(out_ix[skip..].iter())
        .map(|(&s, &i)| if s == 1 { 0 } else { i })
        .collect()
}

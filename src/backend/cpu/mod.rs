//! Host-memory backend.

use super::traits::{Backend, Storage};
use crate::algebra::Scalar;
use crate::tensor::for_each_coord;

/// Backend keeping every buffer in a `Vec`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cpu;

impl<T: Scalar> Storage<T> for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> T {
        self[index]
    }

    #[inline]
    fn set(&mut self, index: usize, value: T) {
        self[index] = value;
    }

    fn to_vec(&self) -> Vec<T> {
        self.clone()
    }
}

impl Backend for Cpu {
    type Storage<T: Scalar> = Vec<T>;

    fn name() -> &'static str {
        "cpu"
    }

    fn filled<T: Scalar>(&self, len: usize, value: T) -> Vec<T> {
        vec![value; len]
    }

    fn from_slice<T: Scalar>(&self, data: &[T]) -> Vec<T> {
        data.to_vec()
    }

    fn copy_strided<T: Scalar>(
        &self,
        src: &Vec<T>,
        shape: &[usize],
        strides: &[usize],
        offset: usize,
    ) -> Vec<T> {
        let mut dst = Vec::with_capacity(shape.iter().product());
        for_each_coord(shape, |ix| {
            let pos = offset + ix.iter().zip(strides).map(|(i, s)| i * s).sum::<usize>();
            dst.push(src[pos]);
        });
        dst
    }
}

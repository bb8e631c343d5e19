//! Runtime selection of a semiring.
//!
//! [`SemiringSpec`] is the serializable description of a semiring, read
//! from configuration files (`{"kind": "kmax", "k": 3}`) or from short
//! strings (`"kmax:3"`, `"tempmax:0.5"`, `"log"`). [`SemiringSpec::build`]
//! validates it and returns an [`AnySemiring`], which implements
//! [`Semiring`] by delegating to the selected algebra.
//!
//! ```rust
//! use semiring_dp::{Cpu, Semiring, SemiringSpec, Tensor};
//!
//! let s = "kmax:2".parse::<SemiringSpec>().unwrap().build().unwrap();
//! let x = s.convert(&Tensor::<f64, Cpu>::from_data(&[1.0, 2.0, 3.0], &[3])).unwrap();
//! assert_eq!(s.sum(&x, -1).unwrap().to_vec(), vec![3.0, 2.0]);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::algebra::{
    Counting, CrossEntropy, Entropy, KMax, KlDivergence, Log, Max, Real, Risk, Semiring, TempMax,
};
use crate::backend::Backend;
use crate::error::{Result, SemiringError};
use crate::tensor::Tensor;

/// Serializable description of a semiring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SemiringSpec {
    /// [`Counting`]
    Counting,
    /// [`Log`]
    Log,
    /// [`Max`]
    Max,
    /// [`KMax`] with `k` slots
    Kmax {
        /// Number of best scores kept
        k: usize,
    },
    /// [`TempMax`] with inverse temperature `alpha`
    #[serde(rename = "tempmax")]
    TempMax {
        /// Inverse temperature
        alpha: f64,
    },
    /// [`KlDivergence`]
    KlDivergence,
    /// [`CrossEntropy`]
    CrossEntropy,
    /// [`Entropy`]
    Entropy,
    /// [`Risk`]
    Risk,
}

impl SemiringSpec {
    /// Validate parameters and construct the semiring.
    pub fn build(&self) -> Result<AnySemiring> {
        Ok(match *self {
            SemiringSpec::Counting => AnySemiring::Counting(Counting),
            SemiringSpec::Log => AnySemiring::Log(Log),
            SemiringSpec::Max => AnySemiring::Max(Max),
            SemiringSpec::Kmax { k } => AnySemiring::KMax(KMax::new(k)?),
            SemiringSpec::TempMax { alpha } => AnySemiring::TempMax(TempMax::new(alpha)?),
            SemiringSpec::KlDivergence => AnySemiring::KlDivergence(KlDivergence),
            SemiringSpec::CrossEntropy => AnySemiring::CrossEntropy(CrossEntropy),
            SemiringSpec::Entropy => AnySemiring::Entropy(Entropy),
            SemiringSpec::Risk => AnySemiring::Risk(Risk),
        })
    }
}

impl FromStr for SemiringSpec {
    type Err = SemiringError;

    /// Parse `name` or `name:param`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, param) = match s.split_once(':') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (s, None),
        };
        let name = name.to_ascii_lowercase().replace('-', "_");

        let spec = match (name.as_str(), param) {
            ("counting", None) => SemiringSpec::Counting,
            ("log", None) => SemiringSpec::Log,
            ("max", None) => SemiringSpec::Max,
            ("kmax", Some(p)) => SemiringSpec::Kmax {
                k: p.parse().map_err(|_| {
                    SemiringError::InvalidParameter(format!("k-max k must be an integer, got {:?}", p))
                })?,
            },
            ("tempmax", Some(p)) => SemiringSpec::TempMax {
                alpha: p.parse().map_err(|_| {
                    SemiringError::InvalidParameter(format!("temperature-max alpha must be a number, got {:?}", p))
                })?,
            },
            ("kl_divergence" | "kl", None) => SemiringSpec::KlDivergence,
            ("cross_entropy", None) => SemiringSpec::CrossEntropy,
            ("entropy", None) => SemiringSpec::Entropy,
            ("risk", None) => SemiringSpec::Risk,
            ("kmax" | "tempmax", None) => {
                return Err(SemiringError::InvalidParameter(format!(
                    "{} requires a parameter, e.g. {}:1",
                    name, name
                )))
            }
            _ => {
                tracing::warn!(spec = s, "unknown semiring");
                return Err(SemiringError::UnknownSemiring(s.to_string()));
            }
        };
        Ok(spec)
    }
}

impl fmt::Display for SemiringSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemiringSpec::Counting => write!(f, "counting"),
            SemiringSpec::Log => write!(f, "log"),
            SemiringSpec::Max => write!(f, "max"),
            SemiringSpec::Kmax { k } => write!(f, "kmax:{}", k),
            SemiringSpec::TempMax { alpha } => write!(f, "tempmax:{}", alpha),
            SemiringSpec::KlDivergence => write!(f, "kl_divergence"),
            SemiringSpec::CrossEntropy => write!(f, "cross_entropy"),
            SemiringSpec::Entropy => write!(f, "entropy"),
            SemiringSpec::Risk => write!(f, "risk"),
        }
    }
}

/// A semiring chosen at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnySemiring {
    /// [`Counting`]
    Counting(Counting),
    /// [`Log`]
    Log(Log),
    /// [`Max`]
    Max(Max),
    /// [`KMax`]
    KMax(KMax),
    /// [`TempMax`]
    TempMax(TempMax),
    /// [`KlDivergence`]
    KlDivergence(KlDivergence),
    /// [`CrossEntropy`]
    CrossEntropy(CrossEntropy),
    /// [`Entropy`]
    Entropy(Entropy),
    /// [`Risk`]
    Risk(Risk),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            AnySemiring::Counting($s) => $body,
            AnySemiring::Log($s) => $body,
            AnySemiring::Max($s) => $body,
            AnySemiring::KMax($s) => $body,
            AnySemiring::TempMax($s) => $body,
            AnySemiring::KlDivergence($s) => $body,
            AnySemiring::CrossEntropy($s) => $body,
            AnySemiring::Entropy($s) => $body,
            AnySemiring::Risk($s) => $body,
        }
    };
}

impl Semiring for AnySemiring {
    fn name(&self) -> &'static str {
        dispatch!(self, s => s.name())
    }

    fn size(&self) -> usize {
        dispatch!(self, s => s.size())
    }

    fn zero_element(&self) -> Vec<f64> {
        dispatch!(self, s => s.zero_element())
    }

    fn one_element(&self) -> Vec<f64> {
        dispatch!(self, s => s.one_element())
    }

    fn sum<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Result<Tensor<T, B>> {
        dispatch!(self, s => s.sum(xs, dim))
    }

    fn plus<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        dispatch!(self, s => s.plus(a, b))
    }

    fn mul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Tensor<T, B> {
        dispatch!(self, s => s.mul(a, b))
    }

    fn times<T: Real, B: Backend>(&self, ts: &[&Tensor<T, B>]) -> Tensor<T, B> {
        dispatch!(self, s => s.times(ts))
    }

    fn prod<T: Real, B: Backend>(&self, xs: &Tensor<T, B>, dim: isize) -> Tensor<T, B> {
        dispatch!(self, s => s.prod(xs, dim))
    }

    fn matmul<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        dispatch!(self, s => s.matmul(a, b))
    }

    fn dot<T: Real, B: Backend>(&self, a: &Tensor<T, B>, b: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        dispatch!(self, s => s.dot(a, b))
    }

    fn convert<T: Real, B: Backend>(&self, potentials: &Tensor<T, B>) -> Result<Tensor<T, B>> {
        dispatch!(self, s => s.convert(potentials))
    }

    fn unconvert<T: Real, B: Backend>(&self, xs: &Tensor<T, B>) -> Tensor<T, B> {
        dispatch!(self, s => s.unconvert(xs))
    }

    fn zero_<'t, T: Real, B: Backend>(&self, xs: &'t mut Tensor<T, B>) -> &'t mut Tensor<T, B> {
        dispatch!(self, s => s.zero_(xs))
    }

    fn one_<'t, T: Real, B: Backend>(&self, xs: &'t mut Tensor<T, B>) -> &'t mut Tensor<T, B> {
        dispatch!(self, s => s.one_(xs))
    }

    fn zero_mask_<'t, T: Real, B: Backend>(
        &self,
        xs: &'t mut Tensor<T, B>,
        mask: &Tensor<bool, B>,
    ) -> &'t mut Tensor<T, B> {
        dispatch!(self, s => s.zero_mask_(xs, mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("log".parse::<SemiringSpec>().unwrap(), SemiringSpec::Log);
        assert_eq!(" Max ".parse::<SemiringSpec>().unwrap(), SemiringSpec::Max);
        assert_eq!("kmax:3".parse::<SemiringSpec>().unwrap(), SemiringSpec::Kmax { k: 3 });
        assert_eq!(
            "tempmax:0.5".parse::<SemiringSpec>().unwrap(),
            SemiringSpec::TempMax { alpha: 0.5 }
        );
        assert_eq!("kl-divergence".parse::<SemiringSpec>().unwrap(), SemiringSpec::KlDivergence);
        assert_eq!("cross_entropy".parse::<SemiringSpec>().unwrap(), SemiringSpec::CrossEntropy);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "viterbi".parse::<SemiringSpec>().unwrap_err(),
            SemiringError::UnknownSemiring("viterbi".to_string())
        );
        assert!(matches!(
            "kmax:two".parse::<SemiringSpec>(),
            Err(SemiringError::InvalidParameter(_))
        ));
        assert!(matches!(
            "kmax".parse::<SemiringSpec>(),
            Err(SemiringError::InvalidParameter(_))
        ));
        assert!(matches!("log:1".parse::<SemiringSpec>(), Err(SemiringError::UnknownSemiring(_))));
    }

    #[test]
    fn test_display_roundtrip() {
        for spec in [
            SemiringSpec::Counting,
            SemiringSpec::Kmax { k: 4 },
            SemiringSpec::TempMax { alpha: 0.25 },
            SemiringSpec::Risk,
        ] {
            assert_eq!(spec.to_string().parse::<SemiringSpec>().unwrap(), spec);
        }
    }

    #[test]
    fn test_build_validates() {
        assert!(SemiringSpec::Kmax { k: 0 }.build().is_err());
        assert!(SemiringSpec::TempMax { alpha: f64::NAN }.build().is_err());
        let s = SemiringSpec::Kmax { k: 3 }.build().unwrap();
        assert_eq!(s.name(), "kmax");
        assert_eq!(s.size(), 3);
        assert_eq!(SemiringSpec::Entropy.build().unwrap().size(), 2);
    }
}

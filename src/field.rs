//! Real embeddings of objective coefficients.
//!
//! The objective of a relaxation lives in whatever coefficient field the
//! symbolic front-end works over: machine floats, exact rationals, or a
//! cyclotomic number field when the problem carries complex phases. The
//! encoder never looks inside those elements. It only asks each coefficient
//! for its value under the real embedding, through [`RealEmbedding`].

use num_bigint::BigInt;
use num_rational::{BigRational, Ratio};
use num_traits::{ToPrimitive, Zero};
use std::f64::consts::TAU;
use std::fmt::{self, Display};

/// Evaluation of a field element to a real number.
pub trait RealEmbedding {
    /// The value of this element as an `f64`.
    ///
    /// Elements beyond the range of `f64` evaluate to `±inf`. An element the
    /// conversion cannot represent at all evaluates to NaN.
    fn to_real(&self) -> f64;
}

impl<T: RealEmbedding + ?Sized> RealEmbedding for &T {
    fn to_real(&self) -> f64 {
        (**self).to_real()
    }
}

impl RealEmbedding for f64 {
    fn to_real(&self) -> f64 {
        *self
    }
}

impl RealEmbedding for f32 {
    fn to_real(&self) -> f64 {
        f64::from(*self)
    }
}

impl RealEmbedding for i32 {
    fn to_real(&self) -> f64 {
        f64::from(*self)
    }
}

impl RealEmbedding for i64 {
    fn to_real(&self) -> f64 {
        *self as f64
    }
}

impl RealEmbedding for BigInt {
    fn to_real(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl RealEmbedding for Ratio<i64> {
    fn to_real(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl RealEmbedding for BigRational {
    fn to_real(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

/// An element of the cyclotomic field Q(ζ_n).
///
/// Stored as rational coordinates over the powers `1, ζ, ..., ζ^(n-1)` of
/// ζ = e^(2πi/n). The representation is not reduced modulo the cyclotomic
/// polynomial, so distinct coordinate vectors may denote the same number.
/// That is harmless here because the only operation is evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CyclotomicNumber {
    order: usize,
    coefficients: Vec<BigRational>,
}

impl CyclotomicNumber {
    /// Create `Σ coefficients[k] · ζ_order^k`.
    ///
    /// Coordinates past `order` wrap around, since ζ^order = 1.
    ///
    /// # Panics
    ///
    /// Panics if `order` is zero.
    pub fn new(order: usize, coefficients: Vec<BigRational>) -> Self {
        assert!(order > 0, "cyclotomic order must be positive");
        let mut folded = vec![BigRational::zero(); order];
        for (power, coeff) in coefficients.into_iter().enumerate() {
            folded[power % order] += coeff;
        }
        CyclotomicNumber {
            order,
            coefficients: folded,
        }
    }

    /// The rational number `value`, as an element of Q(ζ_1) = Q.
    pub fn from_rational(value: BigRational) -> Self {
        CyclotomicNumber {
            order: 1,
            coefficients: vec![value],
        }
    }

    /// The integer `value`, as an element of Q.
    pub fn from_integer(value: i64) -> Self {
        Self::from_rational(BigRational::from_integer(BigInt::from(value)))
    }

    /// The root of unity `ζ_order^power`.
    pub fn zeta_power(order: usize, power: usize) -> Self {
        assert!(order > 0, "cyclotomic order must be positive");
        let mut coefficients = vec![BigRational::zero(); order];
        coefficients[power % order] = BigRational::from_integer(BigInt::from(1));
        CyclotomicNumber {
            order,
            coefficients,
        }
    }

    /// The order `n` of the ambient field Q(ζ_n).
    pub fn order(&self) -> usize {
        self.order
    }

    /// Coordinates over `1, ζ, ..., ζ^(n-1)`.
    pub fn coefficients(&self) -> &[BigRational] {
        &self.coefficients
    }

    /// Imaginary part under the canonical embedding.
    pub fn imaginary_part(&self) -> f64 {
        self.embed(f64::sin)
    }

    fn embed(&self, trig: fn(f64) -> f64) -> f64 {
        let n = self.order as f64;
        self.coefficients
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_zero())
            .map(|(k, c)| c.to_real() * trig(TAU * k as f64 / n))
            .sum()
    }
}

impl RealEmbedding for CyclotomicNumber {
    /// Real part of the canonical embedding ζ_n ↦ e^(2πi/n).
    ///
    /// Objective coefficients of a Hermitian relaxation are real, so the
    /// imaginary part is dropped.
    fn to_real(&self) -> f64 {
        self.embed(f64::cos)
    }
}

impl Display for CyclotomicNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote_any = false;
        for (k, c) in self.coefficients.iter().enumerate() {
            if c.is_zero() {
                continue;
            }
            if wrote_any {
                write!(f, " + ")?;
            }
            match k {
                0 => write!(f, "{c}")?,
                _ => write!(f, "({c})*z{}^{k}", self.order)?,
            }
            wrote_any = true;
        }
        if !wrote_any {
            write!(f, "0")?;
        }
        Ok(())
    }
}

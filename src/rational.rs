//! Exact rational arithmetic
//!
//! Thin value-type wrapper around `num_rational::BigRational`. All rate,
//! time, and power quantities in the calculator go through this type so
//! every derived figure stays an exact, automatically reduced fraction.
//! Floating-point game data is converted once, at load time, via
//! [`Rational::from_float_approximate`].

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::{BigRational, Ratio};
use num_traits::{One, Signed, Zero};
use thiserror::Error;

use crate::error::CalcError;

/// An immutable arbitrary-precision fraction with structural equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rational(BigRational);

impl Rational {
    /// The additive identity.
    pub fn zero() -> Self {
        Rational(BigRational::zero())
    }

    /// The multiplicative identity.
    pub fn one() -> Self {
        Rational(BigRational::one())
    }

    pub fn from_integer(n: i64) -> Self {
        Rational(BigRational::from_integer(BigInt::from(n)))
    }

    /// Build `numer/denom`, reduced. `denom` must be nonzero.
    pub fn from_fraction(numer: i64, denom: i64) -> Self {
        Rational(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    /// Exact conversion from the binary expansion of `x`. `None` for
    /// non-finite inputs.
    pub fn from_float(x: f64) -> Option<Self> {
        BigRational::from_float(x).map(Rational)
    }

    /// Bounded-precision conversion: continued-fraction approximation
    /// over `i64` terms, so values like `0.5` or `1.25` come back as
    /// their minimal fractions rather than long binary expansions.
    /// Falls back to the exact expansion when no bounded approximation
    /// exists, and to zero for non-finite inputs.
    pub fn from_float_approximate(x: f64) -> Self {
        if let Some(r) = Ratio::<i64>::approximate_float(x) {
            return Rational(BigRational::new(
                BigInt::from(*r.numer()),
                BigInt::from(*r.denom()),
            ));
        }
        BigRational::from_float(x).map(Rational).unwrap_or_else(Self::zero)
    }

    pub fn add(&self, other: &Rational) -> Rational {
        Rational(&self.0 + &other.0)
    }

    pub fn mul(&self, other: &Rational) -> Rational {
        Rational(&self.0 * &other.0)
    }

    pub fn div(&self, other: &Rational) -> Result<Rational, CalcError> {
        if other.0.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        Ok(Rational(&self.0 / &other.0))
    }

    pub fn reciprocate(&self) -> Result<Rational, CalcError> {
        if self.0.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        Ok(Rational(self.0.recip()))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn less(&self, other: &Rational) -> bool {
        self.0 < other.0
    }

    /// Render as a decimal string with up to `places` fractional digits,
    /// rounded half-up, trailing zeros trimmed.
    pub fn to_decimal(&self, places: usize) -> String {
        let sign = if self.0.is_negative() { "-" } else { "" };
        let abs = self.0.abs();
        let scale = num_traits::pow(BigInt::from(10), places);
        let two = BigInt::from(2);
        let numer = abs.numer() * &scale;
        let denom = abs.denom().clone();
        let rounded = (numer * &two + &denom) / (denom * &two);
        let int_part = &rounded / &scale;
        if places == 0 {
            return format!("{sign}{int_part}");
        }
        let mut frac = (&rounded % &scale).to_string();
        while frac.len() < places {
            frac.insert(0, '0');
        }
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            format!("{sign}{int_part}")
        } else {
            format!("{sign}{int_part}.{frac}")
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.denom().is_one() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("invalid rational literal: {0}")]
pub struct ParseRationalError(String);

/// Accepts `N`, `N/D`, or a decimal literal.
impl FromStr for Rational {
    type Err = ParseRationalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((n, d)) = s.split_once('/') {
            let numer: i64 = n
                .trim()
                .parse()
                .map_err(|_| ParseRationalError(s.to_string()))?;
            let denom: i64 = d
                .trim()
                .parse()
                .map_err(|_| ParseRationalError(s.to_string()))?;
            if denom == 0 {
                return Err(ParseRationalError(s.to_string()));
            }
            return Ok(Rational::from_fraction(numer, denom));
        }
        if let Ok(n) = s.parse::<i64>() {
            return Ok(Rational::from_integer(n));
        }
        let x: f64 = s.parse().map_err(|_| ParseRationalError(s.to_string()))?;
        if !x.is_finite() {
            return Err(ParseRationalError(s.to_string()));
        }
        Ok(Rational::from_float_approximate(x))
    }
}

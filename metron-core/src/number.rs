//! Arbitrary precision numbers using dashu
//!
//! Uses dashu-float (DBig) for decimal arithmetic, so scale factors such as
//! 0.0254 or 0.45359237 are represented exactly and rounding of measure
//! values happens in base 10.

use dashu_float::DBig;
use dashu_int::IBig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Domain error: {0}")]
    DomainError(String),
}

/// Working precision for calculations (decimal digits)
const WORK_PRECISION: usize = 50;

/// Arbitrary precision decimal number
///
/// Built on dashu-float's DBig. All operations return Results or new
/// Numbers - never panic.
#[derive(Debug, Clone)]
pub struct Number {
    inner: DBig,
}

impl Number {
    // ========== Construction ==========

    /// Ensure a DBig has adequate precision for calculations
    fn with_work_precision(val: DBig) -> DBig {
        val.with_precision(WORK_PRECISION).value()
    }

    /// Create from a decimal string such as "3.14" or "-42"
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();
        let inner: DBig = s.parse()
            .map_err(|_| NumberError::ParseError(s.to_string()))?;

        Ok(Self { inner: Self::with_work_precision(inner) })
    }

    /// Create from i64 with working precision
    pub fn from_i64(n: i64) -> Self {
        Self { inner: Self::with_work_precision(DBig::from(n)) }
    }

    /// Create from f64, keeping the shortest decimal form that round-trips
    pub fn from_f64(f: f64) -> Result<Self, NumberError> {
        if !f.is_finite() {
            return Err(NumberError::DomainError(format!("{} is not a finite number", f)));
        }
        let text = format!("{:e}", f);
        let (mantissa, exponent) = text
            .split_once('e')
            .ok_or_else(|| NumberError::ParseError(text.clone()))?;
        let mantissa: DBig = mantissa.parse()
            .map_err(|_| NumberError::ParseError(text.clone()))?;
        let exponent: isize = exponent.parse()
            .map_err(|_| NumberError::ParseError(text.clone()))?;

        let (significand, scale) = mantissa.into_repr().into_parts();
        let inner = DBig::from_parts(significand, scale + exponent);
        Ok(Self { inner: Self::with_work_precision(inner) })
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        self.inner == DBig::ZERO
    }

    // ========== Basic Arithmetic ==========

    pub fn add(&self, other: &Self) -> Self {
        Self { inner: &self.inner + &other.inner }
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self { inner: &self.inner - &other.inner }
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self { inner: &self.inner * &other.inner }
    }

    /// Safe division (returns Result, never panics)
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            Err(NumberError::DivisionByZero)
        } else {
            Ok(Self { inner: &self.inner / &other.inner })
        }
    }

    /// Round to `places` decimal digits, ties away from zero.
    pub fn round_to(&self, places: u32) -> Self {
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();
        let target = -(places as isize);
        if exponent >= target {
            return self.clone();
        }

        let mut divisor = IBig::ONE;
        for _ in 0..(target - exponent) {
            divisor *= IBig::from(10u8);
        }

        let mut quotient = &significand / &divisor;
        let twice_remainder = (&significand % &divisor) * IBig::from(2u8);
        if twice_remainder >= divisor {
            quotient += IBig::ONE;
        } else if -twice_remainder >= divisor {
            quotient -= IBig::ONE;
        }

        Self { inner: Self::with_work_precision(DBig::from_parts(quotient, target)) }
    }
}

// ========== Trait Implementations ==========

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();
        if exponent >= 0 {
            let mut value = significand;
            for _ in 0..exponent {
                value *= IBig::from(10u8);
            }
            return write!(f, "{}", value);
        }

        // Exact decimal rendering, e.g. 0.6213711922
        let negative = significand < IBig::ZERO;
        let digits = if negative { (-significand).to_string() } else { significand.to_string() };
        let places = (-exponent) as usize;
        let padded = if digits.len() <= places {
            format!("{}{}", "0".repeat(places - digits.len() + 1), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - places);
        write!(f, "{}{}.{}", if negative { "-" } else { "" }, int_part, frac_part)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::from_i64(n)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Self::from_i64(n as i64)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.partial_cmp(&other.inner).unwrap_or(std::cmp::Ordering::Equal)
    }
}

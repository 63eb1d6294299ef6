//! Measure type - a value bound to a unit

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::{MeasureError, Number, Unit};

/// Default number of decimal digits kept on every measure
pub const DEFAULT_PRECISION: u32 = 10;

/// A physical measure: a numeric value with an associated unit.
///
/// The value is rounded to `precision` decimal digits (ties away from zero)
/// whenever a measure is constructed, including results of arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "MeasureParts")]
pub struct Measure {
    value: Number,
    unit: Unit,
    precision: u32,
}

/// Wire form of a measure; rounded on the way in
#[derive(Deserialize)]
struct MeasureParts {
    value: Number,
    unit: Unit,
    #[serde(default = "default_precision")]
    precision: u32,
}

fn default_precision() -> u32 {
    DEFAULT_PRECISION
}

impl From<MeasureParts> for Measure {
    fn from(parts: MeasureParts) -> Self {
        Measure::with_precision(parts.value, parts.unit, parts.precision)
    }
}

impl Measure {
    /// Create a measure rounded to [`DEFAULT_PRECISION`]
    pub fn new(value: impl Into<Number>, unit: impl Into<Unit>) -> Self {
        Self::with_precision(value, unit, DEFAULT_PRECISION)
    }

    /// Create a measure rounded to the given number of decimal digits
    pub fn with_precision(value: impl Into<Number>, unit: impl Into<Unit>, precision: u32) -> Self {
        Measure {
            value: value.into().round_to(precision),
            unit: unit.into(),
            precision,
        }
    }

    /// Create a dimensionless measure (pure number)
    pub fn dimensionless(value: impl Into<Number>) -> Self {
        Self::new(value, Unit::dimensionless())
    }

    pub fn value(&self) -> &Number {
        &self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn is_dimensionless(&self) -> bool {
        self.unit.is_dimensionless()
    }

    /// Same unit and precision, new value
    pub fn with_value(&self, value: Number) -> Measure {
        Self::with_precision(value, self.unit.clone(), self.precision)
    }

    /// Add two measures (units must be equal)
    pub fn add(&self, other: &Measure) -> Result<Measure, MeasureError> {
        self.check_same_unit(other)?;
        Ok(self.with_value(self.value.add(&other.value)))
    }

    /// Subtract two measures (units must be equal)
    pub fn sub(&self, other: &Measure) -> Result<Measure, MeasureError> {
        self.check_same_unit(other)?;
        Ok(self.with_value(self.value.sub(&other.value)))
    }

    /// Multiply two measures (units are multiplied)
    pub fn mul(&self, other: &Measure) -> Measure {
        Self::with_precision(
            self.value.mul(&other.value),
            self.unit.multiply(&other.unit),
            self.precision,
        )
    }

    /// Divide two measures (units are divided)
    pub fn div(&self, other: &Measure) -> Result<Measure, MeasureError> {
        let value = self.value.checked_div(&other.value)?;
        Ok(Self::with_precision(value, self.unit.divide(&other.unit), self.precision))
    }

    /// Attach an extra unit factor, keeping the value
    pub fn times_unit(&self, unit: impl Into<Unit>) -> Measure {
        Self::with_precision(self.value.clone(), self.unit.multiply(&unit.into()), self.precision)
    }

    fn check_same_unit(&self, other: &Measure) -> Result<(), MeasureError> {
        if self.unit != other.unit {
            return Err(MeasureError::incompatible_units(&self.unit, &other.unit));
        }
        Ok(())
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_dimensionless() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}

impl PartialEq for Measure {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && self.value == other.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codes, Factor};

    const METER: Factor = Factor::root("m");
    const SECOND: Factor = Factor::root("s");

    fn n(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    #[test]
    fn test_construction_rounds() {
        let m = Measure::new(n("1.23456789012345"), METER);
        assert_eq!(*m.value(), n("1.2345678901"));

        let m = Measure::with_precision(n("2.345"), METER, 2);
        assert_eq!(*m.value(), n("2.35"));
    }

    #[test]
    fn test_add_same_unit() {
        let a = Measure::new(5, METER);
        let b = Measure::new(7, METER);
        assert_eq!(a.add(&b).unwrap(), Measure::new(12, METER));
        assert_eq!(a.sub(&b).unwrap(), Measure::new(-2, METER));
    }

    #[test]
    fn test_add_mismatched_units_fails() {
        let a = Measure::new(5, METER);
        let b = Measure::new(5, SECOND);
        let err = a.add(&b).unwrap_err();
        assert_eq!(err.code(), codes::INCOMPATIBLE_UNITS);
        assert!(a.sub(&b).is_err());
    }

    #[test]
    fn test_mul_div_combine_units() {
        let distance = Measure::new(100, METER);
        let time = Measure::new(10, SECOND);
        let speed = distance.div(&time).unwrap();
        assert_eq!(speed, Measure::new(10, METER / SECOND));

        let back = speed.mul(&time);
        assert_eq!(back, distance);
    }

    #[test]
    fn test_div_by_zero() {
        let distance = Measure::new(100, METER);
        let zero = Measure::new(0, SECOND);
        assert_eq!(distance.div(&zero).unwrap_err().code(), codes::NUMERIC);
    }

    #[test]
    fn test_times_unit() {
        let m = Measure::dimensionless(3).times_unit(METER);
        assert_eq!(m, Measure::new(3, METER));
        assert!(!m.is_dimensionless());
    }

    #[test]
    fn test_deserialize_rounds_value() {
        let json = serde_json::json!({
            "value": "1.23456789012345678",
            "unit": { "numerators": [{ "kind": "root", "id": "m" }], "denominators": [] },
            "precision": 2
        });
        let m: Measure = serde_json::from_value(json).unwrap();
        assert_eq!(*m.value(), n("1.23"));
        assert_eq!(m.precision(), 2);
        assert_eq!(*m.unit(), METER.unit());
    }

    #[test]
    fn test_deserialize_defaults_precision() {
        let json = serde_json::json!({
            "value": "0.123456789012",
            "unit": { "numerators": [], "denominators": [] }
        });
        let m: Measure = serde_json::from_value(json).unwrap();
        assert_eq!(m.precision(), DEFAULT_PRECISION);
        assert_eq!(*m.value(), n("0.1234567890"));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Measure::new(5, METER / SECOND)), "5 m/s");
        assert_eq!(format!("{}", Measure::dimensionless(2)), "2");
    }
}

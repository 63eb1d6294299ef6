//! Metron Core - Fundamental types
//!
//! This crate provides the value types used throughout Metron:
//! - `Number`: Arbitrary precision decimal numbers
//! - `Factor` / `Unit`: Unit algebra over fundamental and root factors
//! - `Measure`: A rounded value bound to a unit
//! - `MeasureError`: Structured errors with machine-readable codes

mod number;
mod unit;
mod measure;
mod error;

pub use number::{Number, NumberError};
pub use unit::{Factor, FactorKind, Unit, ExpandedUnit};
pub use measure::{Measure, DEFAULT_PRECISION};
pub use error::{MeasureError, ErrorReport, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Number, Factor, Unit, Measure, MeasureError};
    pub use crate::error::codes;
}

#[cfg(test)]
mod tests {
    use super::*;

    const LENGTH: Factor = Factor::fundamental("[LENGTH]");
    const MASS: Factor = Factor::fundamental("[MASS]");
    const TIME: Factor = Factor::fundamental("[TIME]");
    const METER: Factor = Factor::root("m");
    const SECOND: Factor = Factor::root("s");
    const KILOGRAM: Factor = Factor::root("kg");

    mod algebra_tests {
        use super::*;

        #[test]
        fn test_product_then_quotient_restores_unit() {
            let units = [
                METER.unit(),
                METER / SECOND,
                KILOGRAM * METER.squared() / SECOND.squared(),
                Unit::dimensionless(),
            ];
            for a in &units {
                for b in &units {
                    assert_eq!((a * b) / b, *a, "({} * {}) / {}", a, b, b);
                }
            }
        }

        #[test]
        fn test_inverse_times_self_is_dimensionless() {
            let units = [METER.unit(), METER / SECOND, KILOGRAM * METER.cubed()];
            for a in &units {
                assert!((a.inverse() * a).is_dimensionless(), "{}", a);
            }
        }

        #[test]
        fn test_physical_unit_expression() {
            let energy = (MASS * LENGTH.squared()) / TIME.squared();
            assert!(energy.is_fundamental());
            assert_eq!(energy, MASS * LENGTH * LENGTH / TIME / TIME);
            assert_ne!(energy, MASS * LENGTH / TIME.squared());
        }
    }

    mod measure_tests {
        use super::*;

        #[test]
        fn test_area_from_lengths() {
            let width = Measure::new(3, METER);
            let depth = Measure::new(Number::from_str("2.5").unwrap(), METER);
            let area = width.mul(&depth);
            assert_eq!(*area.unit(), METER.squared());
            assert_eq!(*area.value(), Number::from_str("7.5").unwrap());
        }

        #[test]
        fn test_measure_serialization() {
            let m = Measure::new(5, METER / SECOND);
            let json = serde_json::to_value(&m).unwrap();
            assert_eq!(json["value"], "5");
            assert_eq!(json["precision"], 10);
            let back: Measure = serde_json::from_value(json).unwrap();
            assert_eq!(back, m);
        }
    }
}

//! Catalog of well-known units
//!
//! Fundamental factors describe physical dimensions; root factors are the
//! concrete units. Nothing here is configured: see [`crate::standard`] for
//! the conversions that tie these units together.

use std::collections::HashSet;
use metron_core::{Factor, MeasureError, Unit};
use crate::SystemTag;

// Fundamental dimensions
pub const LENGTH: Factor = Factor::fundamental("[LENGTH]");
pub const MASS: Factor = Factor::fundamental("[MASS]");
pub const TIME: Factor = Factor::fundamental("[TIME]");
pub const TEMPERATURE: Factor = Factor::fundamental("[TEMPERATURE]");

// Length
pub const KILOMETER: Factor = Factor::root("km");
pub const METER: Factor = Factor::root("m");
pub const CENTIMETER: Factor = Factor::root("cm");
pub const MILLIMETER: Factor = Factor::root("mm");
pub const MICROMETER: Factor = Factor::root("µm");
pub const NANOMETER: Factor = Factor::root("nm");
pub const MILE: Factor = Factor::root("mi");
pub const YARD: Factor = Factor::root("yd");
pub const FOOT: Factor = Factor::root("ft");
pub const INCH: Factor = Factor::root("in");
pub const MICROINCH: Factor = Factor::root("µin");

// Area
pub const SQUARE_METER: Factor = Factor::root("m²");
pub const HECTARE: Factor = Factor::root("ha");

// Mass
pub const TONNE: Factor = Factor::root("t");
pub const KILOGRAM: Factor = Factor::root("kg");
pub const GRAM: Factor = Factor::root("g");
pub const MILLIGRAM: Factor = Factor::root("mg");
pub const CARAT: Factor = Factor::root("ct");
pub const OUNCE: Factor = Factor::root("oz");
pub const POUND: Factor = Factor::root("lb");

// Time
pub const DAY: Factor = Factor::root("d");
pub const HOUR: Factor = Factor::root("h");
pub const MINUTE: Factor = Factor::root("min");
pub const SECOND: Factor = Factor::root("s");
pub const MILLISECOND: Factor = Factor::root("ms");
pub const MICROSECOND: Factor = Factor::root("µs");
pub const NANOSECOND: Factor = Factor::root("ns");

// Pressure
pub const PASCAL: Factor = Factor::root("Pa");
pub const PSI: Factor = Factor::root("psi");
pub const BAR: Factor = Factor::root("bar");

// Temperature
pub const KELVIN: Factor = Factor::root("K");
pub const CELSIUS: Factor = Factor::root("°C");
pub const FAHRENHEIT: Factor = Factor::root("°F");

// Energy and force
pub const JOULE: Factor = Factor::root("J");
pub const NEWTON: Factor = Factor::root("N");

// Unit systems
pub const SI: SystemTag = SystemTag::new("SI");
pub const METRIC: SystemTag = SystemTag::new("Metric");
pub const IMPERIAL: SystemTag = SystemTag::new("Imperial");

/// Every factor in the catalog
pub fn all() -> Vec<Factor> {
    vec![
        LENGTH, MASS, TIME, TEMPERATURE,
        KILOMETER, METER, CENTIMETER, MILLIMETER, MICROMETER, NANOMETER,
        MILE, YARD, FOOT, INCH, MICROINCH,
        SQUARE_METER, HECTARE,
        TONNE, KILOGRAM, GRAM, MILLIGRAM, CARAT, OUNCE, POUND,
        DAY, HOUR, MINUTE, SECOND, MILLISECOND, MICROSECOND, NANOSECOND,
        PASCAL, PSI, BAR,
        KELVIN, CELSIUS, FAHRENHEIT,
        JOULE, NEWTON,
    ]
}

/// Check the catalog for structurally equal entries
pub fn validate() -> Result<(), MeasureError> {
    ensure_unique(all())
}

/// Fail on the first unit that occurs twice
pub fn ensure_unique<I, U>(units: I) -> Result<(), MeasureError>
where
    I: IntoIterator<Item = U>,
    U: Into<Unit>,
{
    let mut seen = HashSet::new();
    for unit in units {
        let unit = unit.into();
        if seen.contains(&unit) {
            return Err(MeasureError::DuplicateUnit { unit: unit.to_string() });
        }
        seen.insert(unit);
    }
    Ok(())
}

/// Physical unit of pressure: `[MASS]/([LENGTH]·[TIME]^2)`
pub fn pressure() -> Unit {
    MASS / (LENGTH * TIME.squared())
}

/// Physical unit of force: `[MASS]·[LENGTH]/[TIME]^2`
pub fn force() -> Unit {
    MASS * LENGTH / TIME.squared()
}

/// Physical unit of energy: `[MASS]·[LENGTH]^2/[TIME]^2`
pub fn energy() -> Unit {
    MASS * LENGTH.squared() / TIME.squared()
}

#[cfg(test)]
mod tests {
    use super::*;
    use metron_core::codes;

    #[test]
    fn test_catalog_is_unique() {
        assert!(validate().is_ok());
    }

    #[test]
    fn test_duplicates_detected() {
        let err = ensure_unique([METER, SECOND, Factor::root("m")]).unwrap_err();
        assert_eq!(err.code(), codes::DUPLICATE_UNIT);
        assert!(err.to_string().contains("m"));
    }

    #[test]
    fn test_kind_distinguishes_factors() {
        assert!(ensure_unique([Factor::root("[LENGTH]"), LENGTH]).is_ok());
    }

    #[test]
    fn test_derived_physical_units() {
        assert!(energy().is_fundamental());
        assert_eq!(energy(), force() * LENGTH);
        assert_eq!(pressure(), force() / LENGTH.squared());
    }
}

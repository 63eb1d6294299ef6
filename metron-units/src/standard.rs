//! Standard unit configuration
//!
//! Wires the catalog units into a registry: physical units, system tags,
//! scales, bridges between unit systems, offset temperature scales and
//! compactions for derived units.

use tracing::debug;
use metron_core::{Measure, MeasureError, Number, NumberError, Unit};
use crate::catalog::*;
use crate::graph::{divide_by, multiply_by};
use crate::{InferDimension, UnitRegistry};

/// Configure every standard unit
pub fn configure(registry: &mut UnitRegistry) -> Result<(), MeasureError> {
    configure_length(registry)?;
    configure_area(registry)?;
    configure_mass(registry)?;
    configure_time(registry)?;
    configure_temperature(registry)?;
    configure_pressure(registry)?;
    configure_mechanics(registry)?;
    debug!(nodes = registry.graph().len(), "standard units configured");
    Ok(())
}

fn number(s: &str) -> Result<Number, NumberError> {
    Number::from_str(s)
}

fn identity() -> impl Fn(&Number) -> Result<Number, NumberError> + Send + Sync + 'static {
    |value: &Number| Ok(value.clone())
}

fn configure_length(registry: &mut UnitRegistry) -> Result<(), MeasureError> {
    registry
        .unit(NANOMETER)
        .is_physical_unit(LENGTH)?
        .start_scale()?
        .to(MICROMETER, 1000)?
        .to(MILLIMETER, 1000)?
        .to(CENTIMETER, 10)?
        .to(METER, 100)?
        .to(KILOMETER, 1000)?;

    registry
        .unit(MICROINCH)
        .is_physical_unit(LENGTH)?
        .start_scale()?
        .to(INCH, 1_000_000)?
        .to(FOOT, 12)?
        .to(YARD, 3)?
        .to(MILE, 1760)?;

    let inch = number("2.54")?;
    registry
        .unit(INCH)
        .convert_value_based(CENTIMETER, multiply_by(inch.clone()), divide_by(inch), InferDimension::Strict)?;

    for unit in [NANOMETER, MICROMETER, MILLIMETER, CENTIMETER, METER, KILOMETER] {
        registry.unit(unit).belongs_to_type_system(&[METRIC]);
    }
    registry.unit(METER).belongs_to_type_system(&[SI]);
    for unit in [MICROINCH, INCH, FOOT, YARD, MILE] {
        registry.unit(unit).belongs_to_type_system(&[IMPERIAL]);
    }
    Ok(())
}

fn configure_area(registry: &mut UnitRegistry) -> Result<(), MeasureError> {
    registry
        .unit(SQUARE_METER)
        .is_physical_unit(LENGTH.squared())?
        .belongs_to_type_system(&[SI, METRIC])
        .equivalent_to(METER.squared())
        .convert_value_based(METER.squared(), identity(), identity(), InferDimension::FromThis)?
        .start_scale()?
        .to(HECTARE, 10_000)?;
    registry.unit(HECTARE).belongs_to_type_system(&[METRIC]);
    Ok(())
}

fn configure_mass(registry: &mut UnitRegistry) -> Result<(), MeasureError> {
    registry
        .unit(MILLIGRAM)
        .is_physical_unit(MASS)?
        .start_scale()?
        .to(GRAM, 1000)?
        .to(KILOGRAM, 1000)?
        .to(TONNE, 1000)?;

    registry.unit(MILLIGRAM).start_scale()?.to(CARAT, 200)?;

    registry
        .unit(OUNCE)
        .is_physical_unit(MASS)?
        .start_scale()?
        .to(POUND, 16)?;

    let pound = number("0.45359237")?;
    registry
        .unit(POUND)
        .convert_value_based(KILOGRAM, multiply_by(pound.clone()), divide_by(pound), InferDimension::Strict)?;

    for unit in [MILLIGRAM, GRAM, KILOGRAM, TONNE, CARAT] {
        registry.unit(unit).belongs_to_type_system(&[METRIC]);
    }
    registry.unit(KILOGRAM).belongs_to_type_system(&[SI]);
    for unit in [OUNCE, POUND] {
        registry.unit(unit).belongs_to_type_system(&[IMPERIAL]);
    }
    Ok(())
}

fn configure_time(registry: &mut UnitRegistry) -> Result<(), MeasureError> {
    registry
        .unit(NANOSECOND)
        .is_physical_unit(TIME)?
        .start_scale()?
        .to(MICROSECOND, 1000)?
        .to(MILLISECOND, 1000)?
        .to(SECOND, 1000)?
        .to(MINUTE, 60)?
        .to(HOUR, 60)?
        .to(DAY, 24)?;

    for unit in [NANOSECOND, MICROSECOND, MILLISECOND, SECOND, MINUTE, HOUR, DAY] {
        registry.unit(unit).belongs_to_type_system(&[METRIC, IMPERIAL]);
    }
    registry.unit(SECOND).belongs_to_type_system(&[SI]);
    Ok(())
}

fn configure_temperature(registry: &mut UnitRegistry) -> Result<(), MeasureError> {
    let offset = number("273.15")?;
    let nine = Number::from_i64(9);
    let five = Number::from_i64(5);
    let thirty_two = Number::from_i64(32);

    let to_celsius = offset.clone();
    let from_celsius = offset;
    registry
        .unit(KELVIN)
        .is_physical_unit(TEMPERATURE)?
        .belongs_to_type_system(&[SI, METRIC])
        .convertible_to(
            CELSIUS,
            move |m: &Measure| Ok(Measure::with_precision(m.value().sub(&to_celsius), CELSIUS, m.precision())),
            move |m: &Measure| Ok(Measure::with_precision(m.value().add(&from_celsius), KELVIN, m.precision())),
        );

    let (to_nine, to_five, to_offset) = (nine.clone(), five.clone(), thirty_two.clone());
    registry
        .unit(CELSIUS)
        .is_physical_unit(TEMPERATURE)?
        .belongs_to_type_system(&[METRIC])
        .convertible_to(
            FAHRENHEIT,
            move |m: &Measure| {
                let value = m.value().mul(&to_nine).checked_div(&to_five)?.add(&to_offset);
                Ok(Measure::with_precision(value, FAHRENHEIT, m.precision()))
            },
            move |m: &Measure| {
                let value = m.value().sub(&thirty_two).mul(&five).checked_div(&nine)?;
                Ok(Measure::with_precision(value, CELSIUS, m.precision()))
            },
        );

    registry
        .unit(FAHRENHEIT)
        .is_physical_unit(TEMPERATURE)?
        .belongs_to_type_system(&[IMPERIAL]);
    Ok(())
}

fn configure_pressure(registry: &mut UnitRegistry) -> Result<(), MeasureError> {
    registry
        .unit(PASCAL)
        .is_physical_unit(pressure())?
        .belongs_to_type_system(&[SI, METRIC])
        .start_scale()?
        .to(BAR, 100_000)?;
    registry.unit(BAR).belongs_to_type_system(&[METRIC]);

    let psi = number("6894.757293168")?;
    registry
        .unit(PSI)
        .is_physical_unit(pressure())?
        .belongs_to_type_system(&[IMPERIAL])
        .convert_value_based(PASCAL, multiply_by(psi.clone()), divide_by(psi), InferDimension::Strict)?;
    Ok(())
}

fn configure_mechanics(registry: &mut UnitRegistry) -> Result<(), MeasureError> {
    let newton_parts: Unit = KILOGRAM * METER / SECOND.squared();
    registry
        .unit(NEWTON)
        .is_physical_unit(force())?
        .belongs_to_type_system(&[SI, METRIC])
        .equivalent_to(newton_parts.clone())
        .convert_value_based(newton_parts, identity(), identity(), InferDimension::FromThis)?;

    let joule_parts: Unit = NEWTON * METER;
    registry
        .unit(JOULE)
        .is_physical_unit(energy())?
        .belongs_to_type_system(&[SI, METRIC])
        .equivalent_to(joule_parts.clone())
        .convert_value_based(joule_parts, identity(), identity(), InferDimension::FromThis)?;
    Ok(())
}

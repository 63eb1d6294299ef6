//! Registry-backed introspection on units and measures

use metron_core::{Factor, Measure, MeasureError, Unit};
use crate::{UnitMeta, UnitRegistry};

/// Unit queries answered by a registry
pub trait UnitInfo {
    /// Physical unit, declared or derived from the factors
    fn to_physical_unit(&self, registry: &UnitRegistry) -> Result<Unit, MeasureError>;

    /// Metadata, if the unit was configured
    fn unit_data<'r>(&self, registry: &'r UnitRegistry) -> Option<&'r UnitMeta>;

    /// Registered compaction, or the unit itself
    fn try_compaction(&self, registry: &UnitRegistry) -> Unit;
}

impl UnitInfo for Unit {
    fn to_physical_unit(&self, registry: &UnitRegistry) -> Result<Unit, MeasureError> {
        registry.physical_unit(self)
    }

    fn unit_data<'r>(&self, registry: &'r UnitRegistry) -> Option<&'r UnitMeta> {
        registry.get(self)
    }

    fn try_compaction(&self, registry: &UnitRegistry) -> Unit {
        registry.compact(self)
    }
}

impl UnitInfo for Factor {
    fn to_physical_unit(&self, registry: &UnitRegistry) -> Result<Unit, MeasureError> {
        registry.physical_unit(&self.unit())
    }

    fn unit_data<'r>(&self, registry: &'r UnitRegistry) -> Option<&'r UnitMeta> {
        registry.get(&self.unit())
    }

    fn try_compaction(&self, registry: &UnitRegistry) -> Unit {
        registry.compact(&self.unit())
    }
}

/// Conversion of measures through a registry
pub trait ConvertTo {
    fn convert_to(&self, target: impl Into<Unit>, registry: &UnitRegistry) -> Result<Measure, MeasureError>;

    /// Replace the unit with its registered compaction, keeping the value
    fn compacted(&self, registry: &UnitRegistry) -> Measure;
}

impl ConvertTo for Measure {
    fn convert_to(&self, target: impl Into<Unit>, registry: &UnitRegistry) -> Result<Measure, MeasureError> {
        registry.convert(self, target)
    }

    fn compacted(&self, registry: &UnitRegistry) -> Measure {
        Measure::with_precision(self.value().clone(), registry.compact(self.unit()), self.precision())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::*;

    #[test]
    fn test_factor_and_unit_agree() {
        let registry = UnitRegistry::standard().unwrap();
        assert_eq!(
            METER.to_physical_unit(&registry).unwrap(),
            METER.unit().to_physical_unit(&registry).unwrap()
        );
        assert!(KILOGRAM.unit_data(&registry).unwrap().is_member_of(&SI));
        assert!(Factor::root("furlong").unit_data(&registry).is_none());
    }

    #[test]
    fn test_compacted_measure() {
        let registry = UnitRegistry::standard().unwrap();
        let force = Measure::new(3, KILOGRAM * METER / SECOND.squared());
        assert_eq!(force.compacted(&registry), Measure::new(3, NEWTON));
        assert_eq!((NEWTON * METER).try_compaction(&registry), JOULE.unit());
    }
}

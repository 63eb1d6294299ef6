//! Metron Units - Unit registry and conversion
//!
//! Provides the configuration side of Metron and the machinery that
//! converts measures between units:
//!
//! - `UnitRegistry`: unit metadata, compactions and the conversion graph
//! - `UnitConfig` / `ScaleBuilder`: fluent configuration handles
//! - `UnitGraph`: declared scalar and measure-based conversions
//! - `ConversionTracker`: route search with decomposition of compound units
//! - `catalog` / `standard`: well-known units and their standard wiring
//!
//! A registry is configured once and then only read; conversions may run
//! concurrently from several threads.

mod graph;
mod registry;
mod tracker;
mod info;
pub mod catalog;
pub mod standard;

pub use graph::{
    divide_by, multiply_by, EdgeKind, MeasureFn, ScalarFn, UnitGraph, UnitGraphEdge, UnitGraphNode,
};
pub use registry::{InferDimension, ScaleBuilder, SystemTag, UnitConfig, UnitMeta, UnitRegistry};
pub use tracker::{Conversion, ConversionTracker};
pub use info::{ConvertTo, UnitInfo};

#[cfg(test)]
mod tests {
    use super::*;
    use super::catalog::*;
    use metron_core::{codes, Measure, Number, Unit};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init();
    }

    fn n(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    mod physical_unit_tests {
        use super::*;
        use metron_core::Factor;

        fn base_registry() -> UnitRegistry {
            let mut registry = UnitRegistry::new();
            registry.unit(METER).is_physical_unit(LENGTH).unwrap();
            registry.unit(SECOND).is_physical_unit(TIME).unwrap();
            registry
        }

        #[test]
        fn test_joule_physical_unit() {
            let mut registry = base_registry();
            registry
                .unit(JOULE)
                .is_physical_unit(MASS * LENGTH.squared() / TIME.squared())
                .unwrap();
            assert_eq!(
                JOULE.to_physical_unit(&registry).unwrap(),
                MASS * LENGTH.squared() / TIME.squared()
            );
        }

        #[test]
        fn test_speed_physical_unit() {
            let registry = base_registry();
            assert_eq!((METER / SECOND).to_physical_unit(&registry).unwrap(), LENGTH / TIME);
        }

        #[test]
        fn test_repeated_factors_physical_unit() {
            let registry = base_registry();
            let unit = METER * METER * SECOND;
            assert_eq!(unit.to_physical_unit(&registry).unwrap(), LENGTH * LENGTH * TIME);
            assert_ne!(unit.to_physical_unit(&registry).unwrap(), LENGTH * TIME);
        }

        #[test]
        fn test_unconfigured_unit_fails() {
            let registry = base_registry();
            let err = Factor::root("furlong").to_physical_unit(&registry).unwrap_err();
            assert_eq!(err.code(), codes::MISSING_CONFIGURATION);
            assert!(err.to_string().contains("furlong"));
        }
    }

    mod conversion_tests {
        use super::*;

        #[test]
        fn test_linear_scale_round_trip() {
            init_tracing();
            let mut registry = UnitRegistry::new();
            registry
                .unit(METER)
                .is_physical_unit(LENGTH)
                .unwrap()
                .start_scale()
                .unwrap()
                .to(KILOMETER, 1000)
                .unwrap();

            let meters = Measure::new(1, KILOMETER).convert_to(METER, &registry).unwrap();
            assert_eq!(meters, Measure::new(1000, METER));

            let back = meters.convert_to(KILOMETER, &registry).unwrap();
            assert_eq!(back, Measure::new(1, KILOMETER));
        }

        #[test]
        fn test_celsius_fahrenheit() {
            init_tracing();
            let registry = UnitRegistry::standard().unwrap();

            let freezing = Measure::new(0, CELSIUS).convert_to(FAHRENHEIT, &registry).unwrap();
            assert_eq!(freezing, Measure::new(32, FAHRENHEIT));

            let boiling = Measure::new(100, CELSIUS).convert_to(FAHRENHEIT, &registry).unwrap();
            assert_eq!(boiling, Measure::new(212, FAHRENHEIT));

            let back = Measure::new(212, FAHRENHEIT).convert_to(CELSIUS, &registry).unwrap();
            assert_eq!(back, Measure::new(100, CELSIUS));
        }

        #[test]
        fn test_kelvin_through_celsius() {
            let registry = UnitRegistry::standard().unwrap();
            let room = Measure::new(300, KELVIN).convert_to(CELSIUS, &registry).unwrap();
            assert_eq!(room, Measure::new(n("26.85"), CELSIUS));

            let freezing = Measure::new(n("273.15"), KELVIN).convert_to(FAHRENHEIT, &registry).unwrap();
            assert_eq!(freezing, Measure::new(32, FAHRENHEIT));
        }

        #[test]
        fn test_across_unit_systems() {
            let registry = UnitRegistry::standard().unwrap();

            let mile = Measure::new(1, MILE).convert_to(KILOMETER, &registry).unwrap();
            assert_eq!(mile, Measure::new(n("1.609344"), KILOMETER));

            let pound = Measure::new(1, POUND).convert_to(KILOGRAM, &registry).unwrap();
            assert_eq!(pound, Measure::new(n("0.45359237"), KILOGRAM));

            let psi = Measure::new(1, PSI).convert_to(BAR, &registry).unwrap();
            assert_eq!(psi, Measure::new(n("0.0689475729"), BAR));
        }

        #[test]
        fn test_area_and_compound_targets() {
            let registry = UnitRegistry::standard().unwrap();

            let field = Measure::new(1, HECTARE).convert_to(METER * METER, &registry).unwrap();
            assert_eq!(field, Measure::new(10_000, METER.squared()));

            let work = Measure::new(5, JOULE).convert_to(NEWTON * METER, &registry).unwrap();
            assert_eq!(work, Measure::new(5, NEWTON * METER));
        }

        #[test]
        fn test_speed_by_decomposition() {
            init_tracing();
            let registry = UnitRegistry::standard().unwrap();
            let speed = Measure::new(36, KILOMETER / HOUR).convert_to(METER / SECOND, &registry).unwrap();
            assert_eq!(speed, Measure::new(10, METER / SECOND));
        }

        #[test]
        fn test_force_by_decomposition() {
            let registry = UnitRegistry::standard().unwrap();
            let force = Measure::new(1, KILOGRAM * METER / SECOND.squared());
            let cgs = force
                .convert_to(GRAM * CENTIMETER / SECOND.squared(), &registry)
                .unwrap();
            assert_eq!(cgs, Measure::new(100_000, GRAM * CENTIMETER / SECOND.squared()));

            let newtons = force.convert_to(NEWTON, &registry).unwrap();
            assert_eq!(newtons, Measure::new(1, NEWTON));
        }

        #[test]
        fn test_results_use_registry_precision() {
            let mut registry = UnitRegistry::standard().unwrap();
            registry.set_measure_precision(2);
            let inch = Measure::new(1, CENTIMETER).convert_to(INCH, &registry).unwrap();
            assert_eq!(*inch.value(), n("0.39"));
            assert_eq!(inch.precision(), 2);
        }

        #[test]
        fn test_unresolvable_conversions() {
            let registry = UnitRegistry::standard().unwrap();

            let err = Measure::new(1, METER).convert_to(SECOND, &registry).unwrap_err();
            assert_eq!(err.code(), codes::UNRESOLVABLE_CONVERSION);

            let err = Measure::new(1, KILOMETER / HOUR).convert_to(KILOGRAM, &registry).unwrap_err();
            assert_eq!(err.code(), codes::UNRESOLVABLE_CONVERSION);

            let unknown = Unit::from(metron_core::Factor::root("furlong"));
            let err = Measure::new(1, unknown).convert_to(METER, &registry).unwrap_err();
            assert_eq!(err.code(), codes::UNRESOLVABLE_CONVERSION);
        }

        #[test]
        fn test_incompatible_addition() {
            let err = Measure::new(5, METER).add(&Measure::new(5, SECOND)).unwrap_err();
            assert_eq!(err.code(), codes::INCOMPATIBLE_UNITS);
        }

        #[test]
        fn test_concurrent_reads() {
            let registry = UnitRegistry::standard().unwrap();
            std::thread::scope(|scope| {
                for hours in 1..=4 {
                    let registry = &registry;
                    scope.spawn(move || {
                        let minutes = Measure::new(hours, HOUR).convert_to(MINUTE, registry).unwrap();
                        assert_eq!(minutes, Measure::new(hours * 60, MINUTE));
                    });
                }
            });
        }

        #[test]
        fn test_error_report_export() {
            let registry = UnitRegistry::standard().unwrap();
            let err = Measure::new(1, METER).convert_to(KELVIN, &registry).unwrap_err();
            let json = serde_json::to_value(err.report()).unwrap();
            assert_eq!(json["code"], "UNRESOLVABLE_CONVERSION");
            assert!(json["suggestion"].is_string());
        }
    }
}

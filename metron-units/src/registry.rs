//! Unit registry and fluent configuration
//!
//! The registry is an explicit context object: it owns per-unit metadata,
//! the compaction table and the conversion graph. Configuration goes
//! through [`UnitRegistry::unit`], which hands out a [`UnitConfig`] whose
//! methods chain. Every fallible step validates before touching the
//! registry, so a failed call leaves it unchanged.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use metron_core::{
    Measure, MeasureError, Number, NumberError, Unit, DEFAULT_PRECISION,
};
use crate::graph::{divide_by, multiply_by, UnitGraph, UnitGraphEdge, UnitGraphNode};
use crate::tracker::{Conversion, ConversionTracker};

/// Name of a unit system a unit belongs to (SI, Imperial, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemTag(Cow<'static, str>);

impl SystemTag {
    pub const fn new(name: &'static str) -> Self {
        SystemTag(Cow::Borrowed(name))
    }

    pub fn named(name: impl Into<String>) -> Self {
        SystemTag(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SystemTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What to do when a value-based conversion targets a unit with no
/// declared physical unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InferDimension {
    /// Give the other unit this unit's physical unit
    FromThis,
    /// Fail with `MissingPhysicalUnit`
    #[default]
    Strict,
}

/// Metadata attached to a configured unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitMeta {
    unit: Unit,
    physical_unit: Option<Unit>,
    systems: BTreeSet<SystemTag>,
}

impl UnitMeta {
    fn new(unit: Unit) -> Self {
        UnitMeta { unit, physical_unit: None, systems: BTreeSet::new() }
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Declared physical unit, if any
    pub fn physical_unit(&self) -> Option<&Unit> {
        self.physical_unit.as_ref()
    }

    pub fn systems(&self) -> impl Iterator<Item = &SystemTag> {
        self.systems.iter()
    }

    pub fn is_member_of(&self, system: &SystemTag) -> bool {
        self.systems.contains(system)
    }

    /// The conversion graph node of this unit, if it takes part in any conversion
    pub fn conversion_info<'r>(&self, registry: &'r UnitRegistry) -> Option<&'r UnitGraphNode> {
        registry.graph().node(&self.unit)
    }
}

/// Registry of unit metadata, compactions and conversions
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    metadata: HashMap<Unit, UnitMeta>,
    compactions: HashMap<Unit, Unit>,
    graph: UnitGraph,
    precision: u32,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRegistry {
    /// Empty registry with the default measure precision
    pub fn new() -> Self {
        UnitRegistry {
            metadata: HashMap::new(),
            compactions: HashMap::new(),
            graph: UnitGraph::new(),
            precision: DEFAULT_PRECISION,
        }
    }

    /// Registry preloaded with the standard unit set
    pub fn standard() -> Result<Self, MeasureError> {
        let mut registry = Self::new();
        crate::standard::configure(&mut registry)?;
        Ok(registry)
    }

    /// Decimal digits kept on measures produced by this registry
    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn set_measure_precision(&mut self, precision: u32) {
        debug!(precision, "measure precision changed");
        self.precision = precision;
    }

    /// Start (or continue) configuring a unit
    pub fn unit(&mut self, unit: impl Into<Unit>) -> UnitConfig<'_> {
        let unit = unit.into();
        self.meta_mut(&unit);
        UnitConfig { registry: self, unit }
    }

    /// Metadata of a configured unit
    pub fn get(&self, unit: &Unit) -> Option<&UnitMeta> {
        self.metadata.get(unit)
    }

    /// All configured units
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.metadata.keys()
    }

    /// Registered compaction of a unit
    pub fn get_equivalent(&self, unit: &Unit) -> Option<&Unit> {
        self.compactions.get(unit)
    }

    /// Record that `unit` is more compactly written as `compact`
    pub fn add_compaction(&mut self, unit: impl Into<Unit>, compact: impl Into<Unit>) {
        let unit = unit.into();
        let compact = compact.into();
        trace!(%unit, %compact, "compaction");
        self.compactions.insert(unit, compact);
    }

    pub fn graph(&self) -> &UnitGraph {
        &self.graph
    }

    /// Measure rounded to this registry's precision
    pub fn measure(&self, value: impl Into<Number>, unit: impl Into<Unit>) -> Measure {
        Measure::with_precision(value, unit, self.precision)
    }

    /// Physical unit of any unit.
    ///
    /// Declared metadata wins; otherwise the physical unit is derived from
    /// the factors. A fundamental factor is its own physical unit.
    pub fn physical_unit(&self, unit: &Unit) -> Result<Unit, MeasureError> {
        if let Some(physical) = self.get(unit).and_then(UnitMeta::physical_unit) {
            return Ok(physical.clone());
        }
        if unit.is_fundamental() {
            return Ok(unit.clone());
        }
        if unit.as_factor().is_some() {
            return Err(MeasureError::missing_configuration(unit));
        }

        let mut physical = Unit::dimensionless();
        for factor in unit.numerators() {
            physical = physical.multiply(&self.factor_physical_unit(&factor.unit(), unit)?);
        }
        for factor in unit.denominators() {
            physical = physical.divide(&self.factor_physical_unit(&factor.unit(), unit)?);
        }
        Ok(physical)
    }

    fn factor_physical_unit(&self, factor: &Unit, whole: &Unit) -> Result<Unit, MeasureError> {
        if factor.is_fundamental() {
            return Ok(factor.clone());
        }
        self.get(factor)
            .and_then(UnitMeta::physical_unit)
            .cloned()
            .ok_or_else(|| MeasureError::missing_configuration(format!("{} (in {})", factor, whole)))
    }

    /// Compaction of a unit, or the unit itself
    pub fn compact(&self, unit: &Unit) -> Unit {
        self.get_equivalent(unit).cloned().unwrap_or_else(|| unit.clone())
    }

    /// Find the conversion from `source` to `target`
    pub fn find_conversion(&self, source: &Unit, target: &Unit) -> Result<Conversion, MeasureError> {
        ConversionTracker::new(self).find_conversion_sequence(source, target)
    }

    /// Convert a measure to the target unit
    pub fn convert(&self, measure: &Measure, target: impl Into<Unit>) -> Result<Measure, MeasureError> {
        let target = target.into();
        let conversion = self.find_conversion(measure.unit(), &target)?;
        let result = conversion.apply(measure, self)?;
        if *result.unit() != target {
            debug!(from = %measure.unit(), to = %target, reached = %result.unit(), "conversion ended on another unit");
            return Err(MeasureError::unresolvable(measure.unit(), &target));
        }
        Ok(result)
    }

    fn meta_mut(&mut self, unit: &Unit) -> &mut UnitMeta {
        self.metadata.entry(unit.clone()).or_insert_with(|| {
            trace!(%unit, "new unit metadata");
            UnitMeta::new(unit.clone())
        })
    }

    fn add_scalar_edge<F>(&mut self, from: &Unit, to: &Unit, convert: F)
    where
        F: Fn(&Number) -> Result<Number, NumberError> + Send + Sync + 'static,
    {
        trace!(%from, %to, "scalar conversion");
        self.graph.add_edge(UnitGraphEdge::scalar(from.clone(), to.clone(), Arc::new(convert)));
    }
}

/// Fluent configuration handle for one unit
pub struct UnitConfig<'a> {
    registry: &'a mut UnitRegistry,
    unit: Unit,
}

impl<'a> UnitConfig<'a> {
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn meta(&self) -> Option<&UnitMeta> {
        self.registry.get(&self.unit)
    }

    /// Declare the physical unit of this unit; must be made of fundamental factors
    pub fn is_physical_unit(self, physical: impl Into<Unit>) -> Result<Self, MeasureError> {
        let physical = physical.into();
        if !physical.is_fundamental() {
            return Err(MeasureError::InvalidPhysicalUnit { unit: physical.to_string() });
        }
        debug!(unit = %self.unit, %physical, "physical unit");
        self.registry.meta_mut(&self.unit).physical_unit = Some(physical);
        Ok(self)
    }

    /// Tag this unit as a member of the given systems
    pub fn belongs_to_type_system(self, systems: &[SystemTag]) -> Self {
        let meta = self.registry.meta_mut(&self.unit);
        meta.systems.extend(systems.iter().cloned());
        self
    }

    /// Declare this unit the compact form of `unit`
    pub fn equivalent_to(self, unit: impl Into<Unit>) -> Self {
        self.registry.add_compaction(unit, self.unit.clone());
        self
    }

    /// Declare scalar conversions in both directions between this unit and
    /// `other`. Both must share a physical unit.
    pub fn convert_value_based<F, G>(
        self,
        other: impl Into<Unit>,
        to_other: F,
        to_this: G,
        infer: InferDimension,
    ) -> Result<Self, MeasureError>
    where
        F: Fn(&Number) -> Result<Number, NumberError> + Send + Sync + 'static,
        G: Fn(&Number) -> Result<Number, NumberError> + Send + Sync + 'static,
    {
        let other = other.into();
        let physical = self
            .registry
            .get(&self.unit)
            .and_then(UnitMeta::physical_unit)
            .cloned()
            .ok_or_else(|| MeasureError::MissingPhysicalUnit { unit: self.unit.to_string() })?;

        match self.registry.get(&other).and_then(UnitMeta::physical_unit).cloned() {
            Some(other_physical) if other_physical == physical => {}
            Some(other_physical) => {
                return Err(MeasureError::DimensionMismatch {
                    from: self.unit.to_string(),
                    to: other.to_string(),
                    from_dim: physical.to_string(),
                    to_dim: other_physical.to_string(),
                });
            }
            None if infer == InferDimension::Strict => {
                return Err(MeasureError::MissingPhysicalUnit { unit: other.to_string() });
            }
            None => {
                debug!(unit = %other, %physical, "physical unit inferred");
                self.registry.meta_mut(&other).physical_unit = Some(physical);
            }
        }

        self.registry.add_scalar_edge(&self.unit, &other, to_other);
        self.registry.add_scalar_edge(&other, &self.unit, to_this);
        Ok(self)
    }

    /// Declare measure-level conversions in both directions. No physical
    /// unit check is made.
    pub fn convertible_to<F, G>(self, other: impl Into<Unit>, to_other: F, to_this: G) -> Self
    where
        F: Fn(&Measure) -> Result<Measure, MeasureError> + Send + Sync + 'static,
        G: Fn(&Measure) -> Result<Measure, MeasureError> + Send + Sync + 'static,
    {
        let other = other.into();
        trace!(from = %self.unit, to = %other, "measure conversion");
        let graph = &mut self.registry.graph;
        graph.add_edge(UnitGraphEdge::measure_based(self.unit.clone(), other.clone(), Arc::new(to_other)));
        graph.add_edge(UnitGraphEdge::measure_based(other, self.unit.clone(), Arc::new(to_this)));
        self
    }

    /// Begin a linear scale anchored at this unit
    pub fn start_scale(self) -> Result<ScaleBuilder<'a>, MeasureError> {
        let physical = self
            .registry
            .get(&self.unit)
            .and_then(UnitMeta::physical_unit)
            .cloned()
            .ok_or_else(|| MeasureError::invalid_scale(&self.unit, "scale start has no physical unit"))?;
        Ok(ScaleBuilder { registry: self.registry, previous: self.unit, physical })
    }
}

/// Chain of units where each is a fixed multiple of the previous one
pub struct ScaleBuilder<'a> {
    registry: &'a mut UnitRegistry,
    previous: Unit,
    physical: Unit,
}

impl<'a> ScaleBuilder<'a> {
    /// Extend the scale: one `unit` equals `scale` of the previous unit
    pub fn to(self, unit: impl Into<Unit>, scale: impl Into<Number>) -> Result<Self, MeasureError> {
        let unit = unit.into();
        let scale = scale.into();
        if scale.is_zero() {
            return Err(MeasureError::invalid_scale(&unit, "scale factor must be non-zero"));
        }
        if let Some(existing) = self.registry.get(&unit).and_then(UnitMeta::physical_unit) {
            if *existing != self.physical {
                return Err(MeasureError::DimensionMismatch {
                    from: self.previous.to_string(),
                    to: unit.to_string(),
                    from_dim: self.physical.to_string(),
                    to_dim: existing.to_string(),
                });
            }
        }

        debug!(%unit, previous = %self.previous, %scale, "scale step");
        self.registry.meta_mut(&unit).physical_unit = Some(self.physical.clone());
        self.registry.add_scalar_edge(&unit, &self.previous, multiply_by(scale.clone()));
        self.registry.add_scalar_edge(&self.previous, &unit, divide_by(scale));
        Ok(ScaleBuilder { registry: self.registry, previous: unit, physical: self.physical })
    }

    /// The most recently added unit
    pub fn current(&self) -> &Unit {
        &self.previous
    }
}

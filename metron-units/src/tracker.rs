//! Conversion search
//!
//! A conversion is looked up in two stages. First a depth-first search over
//! the graph starting at the source node, following edges in declaration
//! order and never revisiting a unit already on the current route; the
//! first route that reaches the target wins. If the source is a compound
//! unit and no route exists, both units are decomposed into factors, the
//! factors are paired by physical unit, and each pair is solved on its own.

use std::sync::Arc;
use tracing::{debug, trace};
use metron_core::{Factor, Measure, MeasureError, Unit};
use crate::graph::UnitGraphEdge;
use crate::UnitRegistry;

/// A resolved way to go from one unit to another
#[derive(Debug, Clone)]
pub enum Conversion {
    /// Source and target are the same unit
    Identity,
    /// Edges applied one after another
    Route(Vec<Arc<UnitGraphEdge>>),
    /// Per-factor conversions of a decomposed unit. Denominator conversions
    /// run from the target factor to the source factor, since a quantity
    /// per unit scales inversely to the unit itself.
    Composite {
        numerators: Vec<Conversion>,
        denominators: Vec<Conversion>,
    },
}

impl Conversion {
    /// Apply the conversion to a measure
    pub fn apply(&self, measure: &Measure, registry: &UnitRegistry) -> Result<Measure, MeasureError> {
        match self {
            Conversion::Identity => Ok(registry.measure(measure.value().clone(), measure.unit().clone())),
            Conversion::Route(edges) => edges
                .iter()
                .try_fold(measure.clone(), |current, edge| edge.apply(&current, registry)),
            Conversion::Composite { numerators, denominators } => numerators
                .iter()
                .chain(denominators)
                .try_fold(measure.clone(), |current, part| part.apply(&current, registry)),
        }
    }

    /// Number of edges traversed
    pub fn steps(&self) -> usize {
        match self {
            Conversion::Identity => 0,
            Conversion::Route(edges) => edges.len(),
            Conversion::Composite { numerators, denominators } => {
                numerators.iter().chain(denominators).map(Conversion::steps).sum()
            }
        }
    }

    pub fn is_identity(&self) -> bool {
        self.steps() == 0
    }
}

/// Searches the registry's graph for conversions
pub struct ConversionTracker<'r> {
    registry: &'r UnitRegistry,
}

impl<'r> ConversionTracker<'r> {
    pub fn new(registry: &'r UnitRegistry) -> Self {
        ConversionTracker { registry }
    }

    /// Find a conversion from `source` to `target`
    pub fn find_conversion_sequence(&self, source: &Unit, target: &Unit) -> Result<Conversion, MeasureError> {
        if source == target {
            return Ok(Conversion::Identity);
        }

        if let Some(node) = self.registry.graph().node(source) {
            for edge in node.conversions() {
                let mut route = vec![Arc::clone(edge)];
                if self.extend_route(&mut route, target) {
                    debug!(from = %source, to = %target, steps = route.len(), "conversion route found");
                    return Ok(Conversion::Route(route));
                }
            }
        }

        if source.as_factor().is_some() {
            debug!(from = %source, to = %target, "no conversion route");
            return Err(MeasureError::unresolvable(source, target));
        }
        self.decompose_and_search(source, target)
    }

    fn extend_route(&self, route: &mut Vec<Arc<UnitGraphEdge>>, target: &Unit) -> bool {
        let current = match route.last() {
            Some(edge) => edge.to().clone(),
            None => return false,
        };
        if current == *target {
            return true;
        }
        let Some(node) = self.registry.graph().node(&current) else {
            return false;
        };

        for edge in node.conversions() {
            let revisits = route
                .iter()
                .any(|step| step.from() == edge.to() || step.to() == edge.to());
            if revisits {
                continue;
            }
            trace!(step = %edge, "trying");
            route.push(Arc::clone(edge));
            if self.extend_route(route, target) {
                return true;
            }
            route.pop();
        }
        false
    }

    fn decompose_and_search(&self, source: &Unit, target: &Unit) -> Result<Conversion, MeasureError> {
        debug!(from = %source, to = %target, "decomposing");
        let start = source.expand();
        let end = target.expand();

        let numerator_pairs = self.match_via_physical_units(&start.numerators, &end.numerators, source, target)?;
        let denominator_pairs = self.match_via_physical_units(&start.denominators, &end.denominators, source, target)?;

        let numerators = numerator_pairs
            .iter()
            .map(|(from, to)| self.find_conversion_sequence(&from.unit(), &to.unit()))
            .collect::<Result<Vec<_>, _>>()?;
        let denominators = denominator_pairs
            .iter()
            .map(|(from, to)| self.find_conversion_sequence(&to.unit(), &from.unit()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Conversion::Composite { numerators, denominators })
    }

    /// Pair each source factor with a target factor of the same physical
    /// unit. An identical factor is preferred; otherwise the first match in
    /// target order is taken. Any factor left unpaired on either side makes
    /// the conversion unresolvable.
    fn match_via_physical_units(
        &self,
        start: &[Factor],
        end: &[Factor],
        source: &Unit,
        target: &Unit,
    ) -> Result<Vec<(Factor, Factor)>, MeasureError> {
        let mut pool = end
            .iter()
            .map(|factor| Ok((factor.clone(), self.registry.physical_unit(&factor.unit())?)))
            .collect::<Result<Vec<(Factor, Unit)>, MeasureError>>()?;

        let mut pairs = Vec::with_capacity(start.len());
        for factor in start {
            let physical = self.registry.physical_unit(&factor.unit())?;
            let position = pool
                .iter()
                .position(|(candidate, _)| candidate == factor)
                .or_else(|| pool.iter().position(|(_, candidate)| *candidate == physical))
                .ok_or_else(|| MeasureError::unresolvable(source, target))?;
            let (partner, _) = pool.remove(position);
            trace!(from = %factor, to = %partner, "paired");
            pairs.push((factor.clone(), partner));
        }

        if !pool.is_empty() {
            return Err(MeasureError::unresolvable(source, target));
        }
        Ok(pairs)
    }
}

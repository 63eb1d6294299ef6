//! Conversion graph
//!
//! Nodes are units that take part in at least one declared conversion.
//! Each node owns its outgoing edges, at most one per destination, kept in
//! declaration order so that searches are deterministic.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use metron_core::{Measure, MeasureError, Number, NumberError, Unit};
use crate::UnitRegistry;

/// Scalar conversion function (`real -> real`)
pub type ScalarFn = Arc<dyn Fn(&Number) -> Result<Number, NumberError> + Send + Sync>;

/// Arbitrary measure transform (`Measure -> Measure`)
pub type MeasureFn = Arc<dyn Fn(&Measure) -> Result<Measure, MeasureError> + Send + Sync>;

/// `value -> value * factor`
pub fn multiply_by(factor: Number) -> impl Fn(&Number) -> Result<Number, NumberError> + Send + Sync + 'static {
    move |value: &Number| Ok(value.mul(&factor))
}

/// `value -> value / factor`
pub fn divide_by(factor: Number) -> impl Fn(&Number) -> Result<Number, NumberError> + Send + Sync + 'static {
    move |value: &Number| value.checked_div(&factor)
}

/// How an edge transforms a measure
#[derive(Clone)]
pub enum EdgeKind {
    /// Scale the value; the unit is multiplied by `to / from`, so the edge
    /// also applies to compound units containing `from`
    Scalar { convert: ScalarFn, ratio: Unit },
    /// Arbitrary transform (e.g. offset temperature scales)
    Measure(MeasureFn),
}

/// A directed conversion between two units
#[derive(Clone)]
pub struct UnitGraphEdge {
    from: Unit,
    to: Unit,
    kind: EdgeKind,
}

impl UnitGraphEdge {
    pub fn scalar(from: Unit, to: Unit, convert: ScalarFn) -> Self {
        let ratio = to.divide(&from);
        UnitGraphEdge { from, to, kind: EdgeKind::Scalar { convert, ratio } }
    }

    pub fn measure_based(from: Unit, to: Unit, convert: MeasureFn) -> Self {
        UnitGraphEdge { from, to, kind: EdgeKind::Measure(convert) }
    }

    pub fn from(&self) -> &Unit {
        &self.from
    }

    pub fn to(&self) -> &Unit {
        &self.to
    }

    pub fn is_measure_based(&self) -> bool {
        matches!(self.kind, EdgeKind::Measure(_))
    }

    /// Apply this edge to a measure.
    ///
    /// Results of measure-based edges are replaced by their registered
    /// compaction, if any.
    pub fn apply(&self, measure: &Measure, registry: &UnitRegistry) -> Result<Measure, MeasureError> {
        match &self.kind {
            EdgeKind::Scalar { convert, ratio } => {
                let value = convert(measure.value())?;
                Ok(registry.measure(value, measure.unit().multiply(ratio)))
            }
            EdgeKind::Measure(convert) => {
                let result = convert(measure)?;
                let unit = registry
                    .get_equivalent(result.unit())
                    .cloned()
                    .unwrap_or_else(|| result.unit().clone());
                Ok(registry.measure(result.value().clone(), unit))
            }
        }
    }
}

impl PartialEq for UnitGraphEdge {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl Eq for UnitGraphEdge {}

impl fmt::Debug for UnitGraphEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flavor = if self.is_measure_based() { "measure" } else { "scalar" };
        write!(f, "UnitGraphEdge({} -> {}, {})", self.from, self.to, flavor)
    }
}

impl fmt::Display for UnitGraphEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "From {} to {}", self.from, self.to)
    }
}

/// A unit together with its outgoing conversions
#[derive(Debug, Clone)]
pub struct UnitGraphNode {
    unit: Unit,
    edges: Vec<Arc<UnitGraphEdge>>,
}

impl UnitGraphNode {
    fn new(unit: Unit) -> Self {
        UnitGraphNode { unit, edges: Vec::new() }
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Outgoing edges in declaration order
    pub fn conversions(&self) -> &[Arc<UnitGraphEdge>] {
        &self.edges
    }

    pub fn conversion_to(&self, to: &Unit) -> Option<&Arc<UnitGraphEdge>> {
        self.edges.iter().find(|edge| edge.to() == to)
    }

    /// Install an edge unless one to the same destination exists.
    /// Returns the edge that is in place afterwards.
    fn add_conversion(&mut self, edge: UnitGraphEdge) -> Arc<UnitGraphEdge> {
        if let Some(existing) = self.conversion_to(edge.to()) {
            return Arc::clone(existing);
        }
        let edge = Arc::new(edge);
        self.edges.push(Arc::clone(&edge));
        edge
    }
}

/// Directed multigraph of declared conversions
#[derive(Debug, Clone, Default)]
pub struct UnitGraph {
    nodes: HashMap<Unit, UnitGraphNode>,
}

impl UnitGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, unit: &Unit) -> Option<&UnitGraphNode> {
        self.nodes.get(unit)
    }

    pub fn contains(&self, unit: &Unit) -> bool {
        self.nodes.contains_key(unit)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get-or-create the node for a unit
    pub fn add_unit(&mut self, unit: &Unit) -> &mut UnitGraphNode {
        self.nodes
            .entry(unit.clone())
            .or_insert_with(|| UnitGraphNode::new(unit.clone()))
    }

    /// Install an edge, creating both end nodes as needed
    pub fn add_edge(&mut self, edge: UnitGraphEdge) -> Arc<UnitGraphEdge> {
        self.add_unit(edge.to());
        let from = edge.from().clone();
        self.add_unit(&from).add_conversion(edge)
    }
}

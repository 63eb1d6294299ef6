//! Unit algebra
//!
//! A unit is a ratio of two multisets of atomic factors. Factors are either
//! fundamental (an irreducible physical dimension such as `[LENGTH]`) or
//! root (a concrete named unit such as `m`). Both multisets are kept sorted
//! and reduced, so structural equality is multiset equality.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Div, Mul};
use serde::{Deserialize, Serialize};

/// Kind tag of an atomic factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorKind {
    /// Irreducible physical dimension, only used to express physical units
    Fundamental,
    /// Concrete named unit
    Root,
}

/// An atomic unit factor, identified by its kind and id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Factor {
    kind: FactorKind,
    id: Cow<'static, str>,
}

impl Factor {
    /// Fundamental factor, usable in `const` catalogs
    pub const fn fundamental(id: &'static str) -> Self {
        Factor { kind: FactorKind::Fundamental, id: Cow::Borrowed(id) }
    }

    /// Root factor, usable in `const` catalogs
    pub const fn root(id: &'static str) -> Self {
        Factor { kind: FactorKind::Root, id: Cow::Borrowed(id) }
    }

    /// Root factor with a runtime id
    pub fn named(id: impl Into<String>) -> Self {
        Factor { kind: FactorKind::Root, id: Cow::Owned(id.into()) }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> FactorKind {
        self.kind
    }

    pub fn is_fundamental(&self) -> bool {
        self.kind == FactorKind::Fundamental
    }

    /// Single-factor unit
    pub fn unit(&self) -> Unit {
        Unit::from(self.clone())
    }

    pub fn squared(&self) -> Unit {
        self.unit().squared()
    }

    pub fn cubed(&self) -> Unit {
        self.unit().cubed()
    }

    pub fn per(&self, other: impl Into<Unit>) -> Unit {
        self.unit().per(other)
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A unit split into its flat factor lists, repeats included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedUnit {
    pub numerators: Vec<Factor>,
    pub denominators: Vec<Factor>,
}

/// A unit of measurement in canonical (reduced) form
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "UnitParts")]
pub struct Unit {
    numerators: Vec<Factor>,
    denominators: Vec<Factor>,
}

/// Wire form of a unit; canonicalized on the way in
#[derive(Deserialize)]
struct UnitParts {
    #[serde(default)]
    numerators: Vec<Factor>,
    #[serde(default)]
    denominators: Vec<Factor>,
}

impl From<UnitParts> for Unit {
    fn from(parts: UnitParts) -> Self {
        Unit::from_parts(parts.numerators, parts.denominators)
    }
}

impl Unit {
    /// The dimensionless unit
    pub fn dimensionless() -> Self {
        Unit::default()
    }

    /// Build a unit from factor lists, cancelling factors present in both
    pub fn from_parts(
        numerators: impl IntoIterator<Item = Factor>,
        denominators: impl IntoIterator<Item = Factor>,
    ) -> Self {
        let mut numerators: Vec<Factor> = numerators.into_iter().collect();
        let mut denominators: Vec<Factor> = denominators.into_iter().collect();
        numerators.sort();
        denominators.sort();

        let mut num = Vec::with_capacity(numerators.len());
        let mut den = Vec::with_capacity(denominators.len());
        let (mut i, mut j) = (0, 0);
        while i < numerators.len() && j < denominators.len() {
            match numerators[i].cmp(&denominators[j]) {
                Ordering::Less => {
                    num.push(numerators[i].clone());
                    i += 1;
                }
                Ordering::Greater => {
                    den.push(denominators[j].clone());
                    j += 1;
                }
                // One instance on each side cancels
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
            }
        }
        num.extend_from_slice(&numerators[i..]);
        den.extend_from_slice(&denominators[j..]);

        Unit { numerators: num, denominators: den }
    }

    pub fn numerators(&self) -> &[Factor] {
        &self.numerators
    }

    pub fn denominators(&self) -> &[Factor] {
        &self.denominators
    }

    /// True when both factor multisets are empty
    pub fn is_dimensionless(&self) -> bool {
        self.numerators.is_empty() && self.denominators.is_empty()
    }

    /// True when the unit is made purely of fundamental factors
    pub fn is_fundamental(&self) -> bool {
        !self.is_dimensionless()
            && self.numerators.iter().chain(&self.denominators).all(Factor::is_fundamental)
    }

    /// The single factor of a plain root or fundamental unit
    pub fn as_factor(&self) -> Option<&Factor> {
        match (self.numerators.as_slice(), self.denominators.as_slice()) {
            ([factor], []) => Some(factor),
            _ => None,
        }
    }

    /// Multiply two units (e.g., m * m -> m^2)
    pub fn multiply(&self, other: &Unit) -> Unit {
        Unit::from_parts(
            self.numerators.iter().chain(&other.numerators).cloned(),
            self.denominators.iter().chain(&other.denominators).cloned(),
        )
    }

    /// Divide two units (e.g., m / s -> m/s)
    pub fn divide(&self, other: &Unit) -> Unit {
        self.multiply(&other.inverse())
    }

    /// Swap numerators and denominators
    pub fn inverse(&self) -> Unit {
        Unit {
            numerators: self.denominators.clone(),
            denominators: self.numerators.clone(),
        }
    }

    pub fn per(&self, other: impl Into<Unit>) -> Unit {
        self.divide(&other.into())
    }

    pub fn squared(&self) -> Unit {
        self.multiply(self)
    }

    pub fn cubed(&self) -> Unit {
        self.squared().multiply(self)
    }

    /// Raise to an integer power; negative exponents invert
    pub fn power(&self, exp: i32) -> Unit {
        let base = if exp < 0 { self.inverse() } else { self.clone() };
        (0..exp.unsigned_abs()).fold(Unit::dimensionless(), |acc, _| acc.multiply(&base))
    }

    /// Flat numerator and denominator factor lists
    pub fn expand(&self) -> ExpandedUnit {
        ExpandedUnit {
            numerators: self.numerators.clone(),
            denominators: self.denominators.clone(),
        }
    }
}

impl From<Factor> for Unit {
    fn from(factor: Factor) -> Self {
        Unit { numerators: vec![factor], denominators: Vec::new() }
    }
}

impl From<&Factor> for Unit {
    fn from(factor: &Factor) -> Self {
        Unit::from(factor.clone())
    }
}

impl From<&Unit> for Unit {
    fn from(unit: &Unit) -> Self {
        unit.clone()
    }
}

impl<T: Into<Unit>> Mul<T> for Unit {
    type Output = Unit;

    fn mul(self, rhs: T) -> Unit {
        self.multiply(&rhs.into())
    }
}

impl<T: Into<Unit>> Mul<T> for &Unit {
    type Output = Unit;

    fn mul(self, rhs: T) -> Unit {
        self.multiply(&rhs.into())
    }
}

impl<T: Into<Unit>> Div<T> for Unit {
    type Output = Unit;

    fn div(self, rhs: T) -> Unit {
        self.divide(&rhs.into())
    }
}

impl<T: Into<Unit>> Div<T> for &Unit {
    type Output = Unit;

    fn div(self, rhs: T) -> Unit {
        self.divide(&rhs.into())
    }
}

impl<T: Into<Unit>> Mul<T> for Factor {
    type Output = Unit;

    fn mul(self, rhs: T) -> Unit {
        Unit::from(self).multiply(&rhs.into())
    }
}

impl<T: Into<Unit>> Div<T> for Factor {
    type Output = Unit;

    fn div(self, rhs: T) -> Unit {
        Unit::from(self).divide(&rhs.into())
    }
}

/// Render sorted factors as `a^2·b`
fn write_factors(f: &mut fmt::Formatter<'_>, factors: &[Factor]) -> fmt::Result {
    let mut parts = Vec::new();
    let mut i = 0;
    while i < factors.len() {
        let run = factors[i..].iter().take_while(|x| **x == factors[i]).count();
        if run == 1 {
            parts.push(factors[i].to_string());
        } else {
            parts.push(format!("{}^{}", factors[i], run));
        }
        i += run;
    }
    write!(f, "{}", parts.join("·"))
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.numerators.is_empty() {
            write!(f, "1")?;
        } else {
            write_factors(f, &self.numerators)?;
        }
        if !self.denominators.is_empty() {
            write!(f, "/")?;
            write_factors(f, &self.denominators)?;
        }
        Ok(())
    }
}

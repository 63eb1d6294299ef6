//! Structured errors for measures, units and conversions
//!
//! Every failure is reported synchronously at the call that triggered it.
//! Errors carry a machine-readable code and, where one exists, a hint on
//! how to fix the configuration.

use crate::NumberError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INCOMPATIBLE_UNITS: &str = "INCOMPATIBLE_UNITS";
    pub const INVALID_PHYSICAL_UNIT: &str = "INVALID_PHYSICAL_UNIT";
    pub const MISSING_PHYSICAL_UNIT: &str = "MISSING_PHYSICAL_UNIT";
    pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
    pub const MISSING_CONFIGURATION: &str = "MISSING_CONFIGURATION";
    pub const UNRESOLVABLE_CONVERSION: &str = "UNRESOLVABLE_CONVERSION";
    pub const INVALID_SCALE: &str = "INVALID_SCALE";
    pub const DUPLICATE_UNIT: &str = "DUPLICATE_UNIT";
    pub const NUMERIC: &str = "NUMERIC";
}

/// Errors raised by unit arithmetic, configuration and conversion.
///
/// Units are captured by their display form so errors stay cheap to clone
/// and serialize.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// Addition or subtraction of measures whose units differ
    #[error("cannot combine {left} with {right}: units differ")]
    IncompatibleUnits { left: String, right: String },

    /// A physical dimension was declared with non-fundamental factors
    #[error("{unit} is not built from fundamental factors and cannot be a physical unit")]
    InvalidPhysicalUnit { unit: String },

    /// A value-based conversion was declared on a unit without a physical unit
    #[error("{unit} has no physical unit; declare one before adding value-based conversions")]
    MissingPhysicalUnit { unit: String },

    /// A value-based conversion between units of different physical dimension
    #[error("cannot convert {from} ({from_dim}) to {to} ({to_dim}): physical units differ")]
    DimensionMismatch {
        from: String,
        to: String,
        from_dim: String,
        to_dim: String,
    },

    /// A unit (or one of its factors) has no registered metadata
    #[error("no metadata could be derived for unit {unit}")]
    MissingConfiguration { unit: String },

    /// No declared, composed or decomposed path links the two units
    #[error("no conversion path from {from} to {to}")]
    UnresolvableConversion { from: String, to: String },

    /// A linear scale cannot start at, or step by, the given value
    #[error("invalid scale at {unit}: {reason}")]
    InvalidScale { unit: String, reason: String },

    /// The unit catalog contains two structurally equal entries
    #[error("unit {unit} is declared more than once")]
    DuplicateUnit { unit: String },

    /// Arithmetic failure inside a conversion function
    #[error("numeric error: {0}")]
    Number(#[from] NumberError),
}

impl MeasureError {
    pub fn incompatible_units(left: impl ToString, right: impl ToString) -> Self {
        Self::IncompatibleUnits { left: left.to_string(), right: right.to_string() }
    }

    pub fn missing_configuration(unit: impl ToString) -> Self {
        Self::MissingConfiguration { unit: unit.to_string() }
    }

    pub fn unresolvable(from: impl ToString, to: impl ToString) -> Self {
        Self::UnresolvableConversion { from: from.to_string(), to: to.to_string() }
    }

    pub fn invalid_scale(unit: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidScale { unit: unit.to_string(), reason: reason.into() }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::IncompatibleUnits { .. } => codes::INCOMPATIBLE_UNITS,
            Self::InvalidPhysicalUnit { .. } => codes::INVALID_PHYSICAL_UNIT,
            Self::MissingPhysicalUnit { .. } => codes::MISSING_PHYSICAL_UNIT,
            Self::DimensionMismatch { .. } => codes::DIMENSION_MISMATCH,
            Self::MissingConfiguration { .. } => codes::MISSING_CONFIGURATION,
            Self::UnresolvableConversion { .. } => codes::UNRESOLVABLE_CONVERSION,
            Self::InvalidScale { .. } => codes::INVALID_SCALE,
            Self::DuplicateUnit { .. } => codes::DUPLICATE_UNIT,
            Self::Number(_) => codes::NUMERIC,
        }
    }

    /// Suggestion for fixing the error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::IncompatibleUnits { .. } => {
                Some("Convert one measure to the other's unit first".to_string())
            }
            Self::InvalidPhysicalUnit { .. } => {
                Some("Express physical units with fundamental factors such as [LENGTH]".to_string())
            }
            Self::MissingPhysicalUnit { unit } => {
                Some(format!("Call is_physical_unit on {} first", unit))
            }
            Self::MissingConfiguration { .. } => {
                Some("Have you forgotten to run a configuration?".to_string())
            }
            Self::UnresolvableConversion { .. } => {
                Some("Declare a conversion linking the units or their factors".to_string())
            }
            _ => None,
        }
    }

    /// Render into a serializable report
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code().to_string(),
            message: self.to_string(),
            suggestion: self.suggestion(),
        }
    }
}

/// Serializable form of a [`MeasureError`] for hosts that export errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

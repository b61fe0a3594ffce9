//! Dynamic values exchanged across the host boundary.
//!
//! # Responsibility
//! - Define the tagged value shape the host marshals arguments and results into.
//! - Provide checked accessors and plain conversions from Rust primitives.
//!
//! # Invariants
//! - A `Variant` is plain owned data; it never carries host handles.
//! - Numeric access does not silently narrow: `as_i32` on `Real` is `None`.

use serde::{Deserialize, Serialize};

/// Tagged dynamic value passed through the dispatch boundary.
///
/// Every argument the host forwards and every value a member returns is one
/// of these shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// No value. Also the result shape of a procedure-style call.
    Empty,
    Bool(bool),
    Int(i32),
    Real(f64),
    Str(String),
    Blob(Vec<u8>),
}

impl Variant {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the numeric payload, widening `Int` to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(f64::from(*value)),
            Self::Real(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(value) => Some(value.as_slice()),
            _ => None,
        }
    }

    /// Stable lowercase tag used in diagnostics and error text.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Real(_) => "real",
            Self::Str(_) => "str",
            Self::Blob(_) => "blob",
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::Empty
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<u8>> for Variant {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

//! Field descriptors and query-string projection.
//!
//! # Design
//! Each request shape declares an explicit list of `Field` descriptors in
//! declaration order instead of discovering fields at runtime. The empty
//! string and numeric zero are the "unset" markers: an optional parameter
//! left at its default is omitted from the query string and skipped by
//! validation. A consequence is that optional numeric parameters cannot
//! carry an explicit zero.

use std::collections::BTreeMap;
use std::fmt;

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl ParamValue {
    /// Whether this value is its type's zero/unset marker.
    pub fn is_unset(&self) -> bool {
        match self {
            ParamValue::Str(s) => s.is_empty(),
            ParamValue::Int(i) => *i == 0,
            ParamValue::Float(v) => *v == 0.0,
        }
    }

    /// Numeric view used by bound checks. Non-numeric values read as zero.
    pub(crate) fn as_number(&self) -> f64 {
        match self {
            ParamValue::Str(_) => 0.0,
            ParamValue::Int(i) => *i as f64,
            ParamValue::Float(v) => *v,
        }
    }

    /// String view used by length and format checks. Non-string values read
    /// as empty.
    pub(crate) fn as_text(&self) -> &str {
        match self {
            ParamValue::Str(s) => s,
            _ => "",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// One request attribute: a wire name plus its current value.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub value: ParamValue,
}

impl Field {
    pub fn str(name: &'static str, value: &str) -> Self {
        Self {
            name,
            value: ParamValue::Str(value.to_string()),
        }
    }

    pub fn int(name: &'static str, value: i64) -> Self {
        Self {
            name,
            value: ParamValue::Int(value),
        }
    }

    pub fn float(name: &'static str, value: f64) -> Self {
        Self {
            name,
            value: ParamValue::Float(value),
        }
    }
}

/// Project field descriptors onto wire query parameters.
///
/// Unset fields are omitted entirely; every other field is stringified
/// under its wire name. The `BTreeMap` keeps iteration deterministic.
pub fn project(fields: &[Field]) -> BTreeMap<String, String> {
    fields
        .iter()
        .filter(|f| !f.value.is_unset())
        .map(|f| (f.name.to_string(), f.value.to_string()))
        .collect()
}

//! The comparable value types a filter leaf can carry.

use crate::error::SiftError;
use std::fmt;

/// A leaf filter argument.
///
/// Mirrors the driver-specific value enums a generated-code ORM would use
/// (e.g. `PostgresValue`), collapsed into one dialect-independent tagged sum:
/// this crate never decodes driver wire values, it only ever emits literal
/// SQL parameters, so a single runtime enum is sufficient (see the "Dynamic
/// dispatch on value kind" design note).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// A boolean comparable.
    Bool(bool),
    /// A 64-bit integer comparable.
    Int(i64),
    /// A double-precision float comparable.
    Float(f64),
    /// A UTF-8 string comparable (also used for ISO-8601 temporal literals).
    String(String),
}

/// The kind tag of a [`Value`], used to key the type registry and casters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `Value::Bool`
    Bool,
    /// `Value::Int`
    Int,
    /// `Value::Float`
    Float,
    /// `Value::String`
    String,
}

impl Value {
    /// The kind tag of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
        };
        f.write_str(s)
    }
}

/// Validates that a list of comparables is homogeneous in kind, as required
/// by `$in`/`$nin`. The first element sets the kind; a later element of a
/// different kind is an [`SiftError::IncoherentList`].
pub fn homogeneous_kind(values: &[Value]) -> crate::error::Result<Option<Kind>> {
    let Some(first) = values.first() else {
        return Ok(None);
    };
    let kind = first.kind();
    for (index, value) in values.iter().enumerate().skip(1) {
        if value.kind() != kind {
            return Err(SiftError::IncoherentList { index });
        }
    }
    Ok(Some(kind))
}

#[cfg(feature = "serde")]
impl Value {
    /// Converts a `serde_json::Value` leaf argument into a [`Value`], failing
    /// on non-scalar JSON (arrays/objects/null are handled by the caller,
    /// never reach here for a single comparable argument).
    pub fn from_json(json: &serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Value::Int(i))
                } else {
                    n.as_f64().map(Value::Float)
                }
            }
            serde_json::Value::String(s) => Some(Value::String(s.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homogeneous_list_accepts_same_kind() {
        let values = vec![Value::Int(1), Value::Int(2), Value::Int(3)];
        assert_eq!(homogeneous_kind(&values).unwrap(), Some(Kind::Int));
    }

    #[test]
    fn homogeneous_list_rejects_mixed_kind() {
        let values = vec![Value::Int(1), Value::String("x".into())];
        let err = homogeneous_kind(&values).unwrap_err();
        assert!(matches!(err, SiftError::IncoherentList { index: 1 }));
    }

    #[test]
    fn empty_list_has_no_kind() {
        assert_eq!(homogeneous_kind(&[]).unwrap(), None);
    }
}

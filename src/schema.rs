//! Value-level model descriptors and the dotted-path resolver.
//!
//! A model is a plain, `'static` value: a [`ModelSchema`] naming its table,
//! primary key and fields, authored once per table rather than discovered
//! by reflection at runtime.

use std::collections::BTreeMap;

use crate::registry::ColumnType;
use crate::value::Kind;

/// The logical type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Integer,
    Float,
    String,
    Temporal,
    JsonDocument,
}

impl FieldKind {
    /// The comparable [`Kind`] a filter on this field's *own* column would
    /// need (only meaningful for non-JSON fields; JSON fields are compared
    /// through their nested schema instead).
    pub fn comparable_kind(self) -> Option<Kind> {
        match self {
            FieldKind::Bool => Some(Kind::Bool),
            FieldKind::Integer => Some(Kind::Int),
            FieldKind::Float => Some(Kind::Float),
            FieldKind::String | FieldKind::Temporal => Some(Kind::String),
            FieldKind::JsonDocument => None,
        }
    }
}

/// The schema of a field's embedded JSON document, when [`FieldKind::JsonDocument`].
#[derive(Debug, Clone)]
pub enum NestedSchema {
    /// A record with a fixed, known set of keys, each with its own [`FieldKind`].
    Strict(BTreeMap<&'static str, FieldKind>),
    /// A record permitting arbitrary additional keys beyond any declared ones.
    Open,
}

impl NestedSchema {
    /// Whether `key` is a member of a [`NestedSchema::Strict`] record, or
    /// unconditionally `true` for [`NestedSchema::Open`] (an open record
    /// accepts any key at the compiler level; its presence at runtime is a
    /// property of the data, not the schema).
    pub fn declares(&self, key: &str) -> bool {
        match self {
            NestedSchema::Open => true,
            NestedSchema::Strict(fields) => fields.contains_key(key),
        }
    }

    /// `true` iff this nested record is [`NestedSchema::Open`].
    pub fn is_open(&self) -> bool {
        matches!(self, NestedSchema::Open)
    }
}

/// One field of a [`ModelSchema`].
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub kind: FieldKind,
    pub column_type: ColumnType,
    pub nested: Option<NestedSchema>,
}

impl FieldSchema {
    /// A non-JSON field with no nested schema.
    pub const fn scalar(kind: FieldKind, column_type: ColumnType) -> Self {
        Self {
            kind,
            column_type,
            nested: None,
        }
    }

    /// A `json-document` field carrying `nested`.
    pub const fn json(column_type: ColumnType, nested: NestedSchema) -> Self {
        Self {
            kind: FieldKind::JsonDocument,
            column_type,
            nested: Some(nested),
        }
    }
}

/// A flat record type description: table name, primary key field, and named
/// fields. Authored once per table and shared by reference.
#[derive(Debug, Clone)]
pub struct ModelSchema {
    pub table: &'static str,
    pub pk: &'static str,
    pub fields: BTreeMap<&'static str, FieldSchema>,
}

impl ModelSchema {
    pub fn new(table: &'static str, pk: &'static str) -> Self {
        Self {
            table,
            pk,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field registration.
    pub fn field(mut self, name: &'static str, schema: FieldSchema) -> Self {
        self.fields.insert(name, schema);
        self
    }

    pub fn field_schema(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }
}

/// A resolved root column: its name and declared schema.
#[derive(Debug, Clone, Copy)]
pub struct RootField<'a> {
    pub name: &'a str,
    pub schema: &'a FieldSchema,
}

/// Splits a dotted path at the head segment and resolves it against `model`.
///
/// Returns `None` — never an `Err` — when the head segment does not name a
/// field of `model`: the binder treats `None` as "skip this filter entry"
/// rather than raising.
pub fn resolve<'a>(model: &'a ModelSchema, path: &'a str) -> Option<(RootField<'a>, Vec<String>)> {
    let mut segments = path.split('.');
    let head = segments.next()?;
    let schema = model.field_schema(head)?;
    let tail = segments.map(str::to_string).collect();
    Some((
        RootField {
            name: head,
            schema,
        },
        tail,
    ))
}

/// Resolves the `_pk` sentinel to the model's primary key field name, or
/// any other path unchanged.
pub fn resolve_sort_field<'a>(model: &'a ModelSchema, field: &'a str) -> &'a str {
    if field == "_pk" {
        model.pk
    } else {
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ColumnType;

    fn person_schema() -> ModelSchema {
        ModelSchema::new("person", "id").field(
            "jsonable",
            FieldSchema::json(ColumnType::Text, NestedSchema::Open),
        )
    }

    #[test]
    fn resolve_splits_head_and_tail() {
        let model = person_schema();
        let (root, tail) = resolve(&model, "jsonable.name.first").unwrap();
        assert_eq!(root.name, "jsonable");
        assert_eq!(tail, vec!["name".to_string(), "first".to_string()]);
    }

    #[test]
    fn resolve_returns_none_for_unknown_head() {
        let model = person_schema();
        assert!(resolve(&model, "nope.x").is_none());
    }

    #[test]
    fn pk_sentinel_resolves_to_primary_key() {
        let model = person_schema();
        assert_eq!(resolve_sort_field(&model, "_pk"), "id");
        assert_eq!(resolve_sort_field(&model, "age"), "age");
    }

    #[test]
    fn open_schema_declares_every_key() {
        assert!(NestedSchema::Open.declares("anything"));
    }

    #[test]
    fn strict_schema_declares_only_its_own_keys() {
        let strict = NestedSchema::Strict(BTreeMap::from([("age", FieldKind::Integer)]));
        assert!(strict.declares("age"));
        assert!(!strict.declares("nickname"));
    }
}

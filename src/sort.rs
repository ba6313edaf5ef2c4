//! The sort compiler: turns sort tokens (`"age:desc"`, `"_pk"`, ...) into an
//! `ORDER BY` fragment, dispatching each field to a registered
//! [`SortStrategy`] by priority so that special-cased fields (e.g. a field
//! that needs a `NULLS LAST` clause, or a JSON-embedded field that needs its
//! own extraction) can override the default column-name sort.

use crate::dialect::Dialect;
use crate::error::{Result, SiftError};
use crate::schema::{resolve_sort_field, ModelSchema};
use crate::sql::Sql;

/// Ascending or descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// One parsed sort token: a resolved field name and its direction.
#[derive(Debug, Clone)]
pub struct SortKey {
    pub field: String,
    pub direction: Direction,
}

/// Parses one sort token of the form `field` or `field:asc`/`field:desc`.
/// `_pk` is resolved to the model's primary key column before being handed
/// to the sorter registry.
pub fn parse_token(model: &ModelSchema, token: &str) -> Result<SortKey> {
    let (field, direction) = match token.split_once(':') {
        Some((field, dir)) => {
            let direction = match dir {
                "asc" => Direction::Asc,
                "desc" => Direction::Desc,
                other => return Err(SiftError::InvalidDirection(other.to_string())),
            };
            (field, direction)
        }
        None => (token, Direction::Asc),
    };

    Ok(SortKey {
        field: resolve_sort_field(model, field).to_string(),
        direction,
    })
}

/// Parses a list of sort tokens, skipping any whose field part is empty
/// (e.g. `":desc"`, which names no field and is dropped rather than
/// rejected), and falling back to ascending primary-key order when no
/// usable token remains — the same order a query with no sort at all gets.
pub fn parse_tokens(model: &ModelSchema, tokens: &[String]) -> Result<Vec<SortKey>> {
    let mut keys = Vec::new();
    for token in tokens {
        let field_part = token.split(':').next().unwrap_or("");
        if field_part.is_empty() {
            continue;
        }
        keys.push(parse_token(model, token)?);
    }
    if keys.is_empty() {
        keys.push(SortKey {
            field: model.pk.to_string(),
            direction: Direction::Asc,
        });
    }
    Ok(keys)
}

/// Builds the "field IS NOT NULL" guard a sorted field needs so nulls don't
/// interleave arbitrarily with a `NULLS FIRST`/`NULLS LAST` policy that
/// varies by dialect: excluding them from the result set up front keeps
/// ordering well-defined everywhere. Every [`SortKey`] gets exactly one of
/// these, AND-combined into the bound `WHERE` clause alongside the filter
/// predicates.
///
/// Sort keys here always resolve to a physical column (`resolve_sort_field`
/// only rewrites the `_pk` sentinel), so the guard is the bare column check;
/// there is no nested-JSON-path sort target needing the `$has`-style
/// presence check a filter path does.
pub fn null_guard(key: &SortKey) -> Sql {
    Sql::raw(format!("{} IS NOT NULL", key.field))
}

/// Builds one [`null_guard`] per key, in key order.
pub fn null_guards(keys: &[SortKey]) -> Vec<Sql> {
    keys.iter().map(null_guard).collect()
}

/// A pluggable strategy for rendering one [`SortKey`] into an `ORDER BY`
/// term. The default strategy (`ORDER BY <column> <dir>`) covers every plain
/// scalar column; a model can register a higher-priority strategy ahead of
/// it for fields needing bespoke handling (e.g. a computed or JSON-embedded
/// sort key).
///
/// Lower `priority()` runs first; the default strategy sits at the bottom of
/// the registry at priority 999 so any custom strategy naturally overrides
/// it by registering a smaller number.
pub trait SortStrategy {
    /// Whether this strategy claims `key.field`.
    fn applies(&self, key: &SortKey) -> bool;
    /// Renders the `ORDER BY` term for `key`. Only called when `applies` is `true`.
    fn render(&self, dialect: Dialect, key: &SortKey) -> Sql;
    /// Registry priority; lower runs first.
    fn priority(&self) -> i32 {
        999
    }
}

struct DefaultColumnSort;

impl SortStrategy for DefaultColumnSort {
    fn applies(&self, _key: &SortKey) -> bool {
        true
    }

    fn render(&self, _dialect: Dialect, key: &SortKey) -> Sql {
        Sql::raw(format!("{} {}", key.field, key.direction.as_sql()))
    }

    fn priority(&self) -> i32 {
        999
    }
}

/// An ordered collection of [`SortStrategy`] implementations, consulted in
/// priority order for each sort key. Always includes [`DefaultColumnSort`]
/// at the bottom so every field resolves to *some* term.
pub struct SorterRegistry {
    strategies: Vec<Box<dyn SortStrategy>>,
}

impl Default for SorterRegistry {
    fn default() -> Self {
        Self {
            strategies: vec![Box::new(DefaultColumnSort)],
        }
    }
}

impl SorterRegistry {
    /// Registers a strategy, keeping the registry sorted by ascending priority.
    pub fn register(&mut self, strategy: Box<dyn SortStrategy>) {
        self.strategies.push(strategy);
        self.strategies.sort_by_key(|s| s.priority());
    }

    fn term(&self, dialect: Dialect, key: &SortKey) -> Sql {
        self.strategies
            .iter()
            .find(|s| s.applies(key))
            .map(|s| s.render(dialect, key))
            .unwrap_or_else(|| DefaultColumnSort.render(dialect, key))
    }

    /// Compiles a full `ORDER BY` clause body (without the `ORDER BY`
    /// keyword) from the given sort keys, comma-joined. Returns
    /// [`Sql::empty`] for no keys.
    pub fn compile(&self, dialect: Dialect, keys: &[SortKey]) -> Sql {
        Sql::join(keys.iter().map(|k| self.term(dialect, k)), ", ")
    }
}

#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod expr;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

mod statement;

use crate::{dialect::Dialect, stmt::Statement};

use squill_core::{
    schema::{FieldMap, SchemaRegistry},
    stmt::FilterNode,
    Result,
};

/// Serialize a statement to a SQL string.
///
/// Filter columns resolve through the statement table's [`FieldMap`];
/// relation sub-filters resolve the related table's map through the
/// registry. Identifier quoting and placeholder rendering come from the
/// [`Dialect`]; everything else is dialect-independent.
#[derive(Debug)]
pub struct Serializer<'a> {
    /// Registry against which table and column references are resolved
    registry: &'a SchemaRegistry,

    /// The dialect handles the differences between SQL backends.
    dialect: Dialect,
}

/// Expression scope: the field map column references resolve against.
/// Compiling a relation sub-filter swaps in the related table's map.
#[derive(Debug, Clone, Copy)]
struct ExprContext<'a> {
    map: &'a FieldMap,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl<'a> Serializer<'a> {
    pub fn new(registry: &'a SchemaRegistry, dialect: Dialect) -> Serializer<'a> {
        Serializer { registry, dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Serializes a statement, pushing its arguments onto `params` in
    /// placeholder order. The argument list and the emitted placeholders
    /// stay index-aligned.
    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> Result<String> {
        let map = self.registry.field_map(stmt.table())?;
        let cx = ExprContext { map: map.as_ref() };

        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        stmt.to_sql(&cx, &mut fmt)?;

        ret.push(';');
        Ok(ret)
    }

    /// Compiles a filter to a bare `WHERE`-clause fragment. An absent filter
    /// compiles to an empty fragment with no arguments: the explicit
    /// "match all" policy.
    pub fn where_clause(
        &self,
        filter: Option<&FilterNode>,
        map: &FieldMap,
        params: &mut impl Params,
    ) -> Result<String> {
        let mut ret = String::new();

        if let Some(filter) = filter {
            let cx = ExprContext { map };
            let mut fmt = Formatter {
                serializer: self,
                dst: &mut ret,
                params,
            };
            filter.to_sql(&cx, &mut fmt)?;
        }

        Ok(ret)
    }
}

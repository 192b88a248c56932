use squill_core::stmt::{FilterNode, Value};

/// `UPDATE <table> SET ... WHERE <filter>`
///
/// The filter is mandatory: the executor always updates by a point filter on
/// the primary key, never the whole table.
#[derive(Debug, Clone)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<(String, Value)>,
    pub filter: FilterNode,
    pub returning: bool,
}

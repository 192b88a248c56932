use squill_core::stmt::Value;

/// A multi-row `INSERT`.
///
/// `columns` is the inserted column subset; a server-generated key column is
/// either omitted from it or filled with a [`Cell::Generated`] sentinel,
/// depending on the dialect.
#[derive(Debug, Clone)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub returning: bool,
}

/// One cell of an inserted row.
#[derive(Debug, Clone)]
pub enum Cell {
    /// Bind the value as a statement parameter.
    Bind(Value),

    /// Let the backend generate the value; rendered as the dialect's key
    /// sentinel expression.
    Generated,
}

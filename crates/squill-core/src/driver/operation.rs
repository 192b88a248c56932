use crate::stmt::{ColumnType, Value};

/// A single operation executed against a [`Connection`].
///
/// [`Connection`]: super::Connection
#[derive(Debug)]
pub enum Operation {
    /// Execute a compiled SQL statement.
    Query(SqlQuery),

    /// Execute a transaction lifecycle op.
    Transaction(Transaction),
}

/// A compiled, parameterized statement.
///
/// `args` is index-aligned with the placeholders in `text`. `ret` carries
/// per-column decoding hints when the statement returns rows; `None` means
/// the statement returns an affected-row count.
#[derive(Debug, Clone)]
pub struct SqlQuery {
    pub text: String,
    pub args: Vec<Value>,
    pub ret: Option<Vec<ColumnType>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Start,
    Commit,
    Rollback,
}

impl From<SqlQuery> for Operation {
    fn from(query: SqlQuery) -> Operation {
        Operation::Query(query)
    }
}

impl From<Transaction> for Operation {
    fn from(transaction: Transaction) -> Operation {
        Operation::Transaction(transaction)
    }
}

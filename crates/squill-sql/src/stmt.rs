mod delete;
pub use delete::Delete;

mod insert;
pub use insert::{Cell, Insert};

mod select;
pub use select::Select;

mod update;
pub use update::Update;

/// A DML statement against a single registered table.
#[derive(Debug, Clone)]
pub enum Statement {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    /// The table this statement runs against; the serializer resolves the
    /// table's field map through the schema registry.
    pub fn table(&self) -> &str {
        match self {
            Statement::Select(stmt) => &stmt.table,
            Statement::Insert(stmt) => &stmt.table,
            Statement::Update(stmt) => &stmt.table,
            Statement::Delete(stmt) => &stmt.table,
        }
    }
}

impl From<Select> for Statement {
    fn from(stmt: Select) -> Statement {
        Statement::Select(stmt)
    }
}

impl From<Insert> for Statement {
    fn from(stmt: Insert) -> Statement {
        Statement::Insert(stmt)
    }
}

impl From<Update> for Statement {
    fn from(stmt: Update) -> Statement {
        Statement::Update(stmt)
    }
}

impl From<Delete> for Statement {
    fn from(stmt: Delete) -> Statement {
        Statement::Delete(stmt)
    }
}

use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};
use squill_core::{
    stmt::{ColumnType, Value as CoreValue},
    Error, Result,
};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a SQLite cell within a row to a core value, guided by the
    /// column's declared type.
    pub fn from_sql(row: &Row, index: usize, ty: &ColumnType) -> Result<Self> {
        let value: SqlValue = row.get(index).map_err(Error::driver)?;

        let core_value = match value {
            SqlValue::Null => CoreValue::Null,
            SqlValue::Integer(value) => match ty {
                ColumnType::Bool => CoreValue::Bool(value != 0),
                ColumnType::I64 => CoreValue::I64(value),
                ColumnType::F64 => CoreValue::F64(value as f64),
                _ => return Err(mismatch("INTEGER", index, ty)),
            },
            SqlValue::Real(value) => match ty {
                ColumnType::F64 => CoreValue::F64(value),
                _ => return Err(mismatch("REAL", index, ty)),
            },
            SqlValue::Text(value) => match ty {
                ColumnType::Text => CoreValue::String(value),
                _ => return Err(mismatch("TEXT", index, ty)),
            },
            SqlValue::Blob(value) => match ty {
                ColumnType::Bytes => CoreValue::Bytes(value),
                _ => return Err(mismatch("BLOB", index, ty)),
            },
        };

        Ok(Value(core_value))
    }
}

fn mismatch(storage: &str, index: usize, ty: &ColumnType) -> Error {
    Error::scan(format!(
        "column {index} is {storage}, expected {ty:?}"
    ))
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match &self.0 {
            CoreValue::Bool(true) => Ok(ToSqlOutput::Owned(SqlValue::Integer(1))),
            CoreValue::Bool(false) => Ok(ToSqlOutput::Owned(SqlValue::Integer(0))),
            CoreValue::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            CoreValue::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            CoreValue::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            CoreValue::Bytes(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Blob(&v[..]))),
            CoreValue::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
        }
    }
}

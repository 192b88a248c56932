use mysql_async::Value as MysqlValue;
use squill_core::{
    stmt::{ColumnType, Value},
    Error, Result,
};

pub(crate) fn to_mysql(value: &Value) -> MysqlValue {
    match value {
        Value::Bool(v) => MysqlValue::Int(*v as i64),
        Value::I64(v) => MysqlValue::Int(*v),
        Value::F64(v) => MysqlValue::Double(*v),
        Value::String(v) => MysqlValue::Bytes(v.clone().into_bytes()),
        Value::Bytes(v) => MysqlValue::Bytes(v.clone()),
        Value::Null => MysqlValue::NULL,
    }
}

pub(crate) fn from_mysql(
    row: &mut mysql_async::Row,
    index: usize,
    ty: &ColumnType,
) -> Result<Value> {
    let raw: MysqlValue = row
        .take(index)
        .ok_or_else(|| Error::scan(format!("column {index} was already consumed")))?;

    let value = match raw {
        MysqlValue::NULL => Value::Null,
        MysqlValue::Int(v) => match ty {
            ColumnType::Bool => Value::Bool(v != 0),
            ColumnType::I64 => Value::I64(v),
            ColumnType::F64 => Value::F64(v as f64),
            _ => return Err(mismatch("an integer", index, ty)),
        },
        MysqlValue::UInt(v) => match ty {
            ColumnType::Bool => Value::Bool(v != 0),
            ColumnType::I64 => Value::I64(v as i64),
            ColumnType::F64 => Value::F64(v as f64),
            _ => return Err(mismatch("an unsigned integer", index, ty)),
        },
        MysqlValue::Float(v) => match ty {
            ColumnType::F64 => Value::F64(v as f64),
            _ => return Err(mismatch("a float", index, ty)),
        },
        MysqlValue::Double(v) => match ty {
            ColumnType::F64 => Value::F64(v),
            _ => return Err(mismatch("a double", index, ty)),
        },
        MysqlValue::Bytes(bytes) => match ty {
            ColumnType::Text => Value::String(
                String::from_utf8(bytes)
                    .map_err(|_| Error::scan(format!("column {index} is not valid UTF-8")))?,
            ),
            ColumnType::Bytes => Value::Bytes(bytes),
            _ => return Err(mismatch("bytes", index, ty)),
        },
        other => {
            return Err(Error::scan(format!(
                "unsupported MySQL value {other:?} at column {index}"
            )))
        }
    };

    Ok(value)
}

fn mismatch(storage: &str, index: usize, ty: &ColumnType) -> Error {
    Error::scan(format!("column {index} is {storage}, expected {ty:?}"))
}

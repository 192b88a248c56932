use postgres::types::{private::BytesMut, to_sql_checked, IsNull, ToSql, Type};
use squill_core::{
    stmt::{ColumnType, Value as CoreValue, ValueRecord},
    Error, Result,
};
use tokio_postgres::Row;

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match &self.0 {
            CoreValue::Null => Ok(IsNull::Yes),
            CoreValue::Bool(value) => value.to_sql(ty, out),
            CoreValue::I64(value) => {
                // Narrow to the column's integer width.
                if *ty == Type::INT2 {
                    (*value as i16).to_sql(ty, out)
                } else if *ty == Type::INT4 {
                    (*value as i32).to_sql(ty, out)
                } else {
                    value.to_sql(ty, out)
                }
            }
            CoreValue::F64(value) => {
                if *ty == Type::FLOAT4 {
                    (*value as f32).to_sql(ty, out)
                } else {
                    value.to_sql(ty, out)
                }
            }
            CoreValue::String(value) => value.to_sql(ty, out),
            CoreValue::Bytes(value) => value.to_sql(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

/// Decodes a full result row against the expected column types.
pub(crate) fn decode_row(row: &Row, tys: &[ColumnType]) -> Result<ValueRecord> {
    if row.len() != tys.len() {
        return Err(Error::scan(format!(
            "expected {} columns, got {}",
            tys.len(),
            row.len()
        )));
    }

    let mut items = Vec::with_capacity(tys.len());
    for (index, expected) in tys.iter().enumerate() {
        items.push(decode_column(row, index, expected)?);
    }

    Ok(ValueRecord::from_vec(items))
}

/// Decodes one cell. The PostgreSQL column type drives the wire decoding;
/// the expected type only widens integers into booleans or floats where the
/// schema says so.
fn decode_column(row: &Row, index: usize, expected: &ColumnType) -> Result<CoreValue> {
    let ty = row.columns()[index].type_().clone();

    let decoded = if ty == Type::BOOL {
        row.try_get::<_, Option<bool>>(index)
            .map_err(Error::driver)?
            .map(CoreValue::Bool)
    } else if ty == Type::INT2 {
        row.try_get::<_, Option<i16>>(index)
            .map_err(Error::driver)?
            .map(|value| CoreValue::I64(value as i64))
    } else if ty == Type::INT4 {
        row.try_get::<_, Option<i32>>(index)
            .map_err(Error::driver)?
            .map(|value| CoreValue::I64(value as i64))
    } else if ty == Type::INT8 {
        row.try_get::<_, Option<i64>>(index)
            .map_err(Error::driver)?
            .map(CoreValue::I64)
    } else if ty == Type::FLOAT4 {
        row.try_get::<_, Option<f32>>(index)
            .map_err(Error::driver)?
            .map(|value| CoreValue::F64(value as f64))
    } else if ty == Type::FLOAT8 {
        row.try_get::<_, Option<f64>>(index)
            .map_err(Error::driver)?
            .map(CoreValue::F64)
    } else if ty == Type::TEXT || ty == Type::VARCHAR || ty == Type::BPCHAR {
        row.try_get::<_, Option<String>>(index)
            .map_err(Error::driver)?
            .map(CoreValue::String)
    } else if ty == Type::BYTEA {
        row.try_get::<_, Option<Vec<u8>>>(index)
            .map_err(Error::driver)?
            .map(CoreValue::Bytes)
    } else {
        return Err(Error::scan(format!(
            "unsupported column type `{ty}` at index {index}"
        )));
    };

    let value = match (decoded, expected) {
        (None, _) => CoreValue::Null,
        (Some(CoreValue::I64(v)), ColumnType::Bool) => CoreValue::Bool(v != 0),
        (Some(CoreValue::I64(v)), ColumnType::F64) => CoreValue::F64(v as f64),
        (Some(value), _) => value,
    };

    Ok(value)
}

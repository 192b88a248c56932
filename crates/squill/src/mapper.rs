use crate::Record;

use squill_core::{schema::FieldMap, stmt::ValueRecord, Error, Result};

/// Maps result rows into records, consuming the rows in one pass.
///
/// A row whose width does not match the field map's column count is a scan
/// error; so is any per-field conversion failure inside `from_values`.
pub(crate) fn scan<R: Record>(rows: Vec<ValueRecord>, map: &FieldMap) -> Result<Vec<R>> {
    let width = map.columns().len();

    rows.into_iter()
        .map(|row| {
            if row.len() != width {
                return Err(Error::scan(format!(
                    "expected {} columns for record type `{}`, got {}",
                    width,
                    map.record(),
                    row.len()
                )));
            }
            R::from_values(row.into_vec())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use squill_core::{
        schema::{FieldDescriptor, RecordDescriptor},
        stmt::{ColumnType, Value},
    };

    #[derive(Debug)]
    struct Pair {
        id: i64,
        label: String,
    }

    impl Record for Pair {
        fn descriptor() -> RecordDescriptor {
            RecordDescriptor::new("Pair", "pairs")
                .field(FieldDescriptor::new("id", ColumnType::I64))
                .field(FieldDescriptor::new("label", ColumnType::Text))
        }

        fn into_values(self) -> Vec<Value> {
            vec![self.id.into(), self.label.into()]
        }

        fn from_values(values: Vec<Value>) -> Result<Self> {
            let mut values = values.into_iter();
            Ok(Pair {
                id: values.next().unwrap_or_default().to_i64()?,
                label: values.next().unwrap_or_default().to_string()?,
            })
        }
    }

    fn map() -> FieldMap {
        FieldMap::from_descriptor(&Pair::descriptor()).unwrap()
    }

    #[test]
    fn scans_rows_in_order() {
        let rows = vec![
            ValueRecord::from_vec(vec![Value::I64(1), Value::String("a".into())]),
            ValueRecord::from_vec(vec![Value::I64(2), Value::String("b".into())]),
        ];

        let pairs: Vec<Pair> = scan(rows, &map()).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].id, 1);
        assert_eq!(pairs[1].label, "b");
    }

    #[test]
    fn wrong_width_is_a_scan_error() {
        let rows = vec![ValueRecord::from_vec(vec![Value::I64(1)])];
        let err = scan::<Pair>(rows, &map()).unwrap_err();
        assert!(err.is_scan());
    }

    #[test]
    fn type_mismatch_is_a_scan_error() {
        let rows = vec![ValueRecord::from_vec(vec![
            Value::String("not an id".into()),
            Value::String("a".into()),
        ])];
        let err = scan::<Pair>(rows, &map()).unwrap_err();
        assert!(err.is_scan());
    }
}

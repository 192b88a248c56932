use squill_core::{schema::RecordDescriptor, stmt::Value, Result};

/// A typed record bound to a registered table.
///
/// `into_values` and `from_values` are ordered per the descriptor's field
/// list; the executor hands rows to `from_values` only after checking their
/// width against the field map.
pub trait Record: Sized + Send + 'static {
    /// The declarative schema description for this record type. Called once
    /// at registration and once per operation; must be pure.
    fn descriptor() -> RecordDescriptor;

    /// Decomposes the record into column values, in descriptor field order.
    /// An absent generated key is represented as [`Value::Null`].
    fn into_values(self) -> Vec<Value>;

    /// Rebuilds a record from column values in descriptor field order.
    /// Conversion failures surface as scan errors.
    fn from_values(values: Vec<Value>) -> Result<Self>;
}

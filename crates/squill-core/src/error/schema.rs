/// A startup-class schema configuration error.
#[derive(Debug)]
pub(super) struct SchemaError(pub(super) String);

impl std::error::Error for SchemaError {}

impl core::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.0)
    }
}

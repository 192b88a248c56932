/// An error built from free-form format arguments.
#[derive(Debug)]
pub(super) struct AdhocError(pub(super) String);

impl std::error::Error for AdhocError {}

impl core::fmt::Display for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

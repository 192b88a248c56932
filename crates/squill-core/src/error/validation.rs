/// Error when client-supplied input fails validation.
#[derive(Debug)]
pub(super) struct ValidationError(pub(super) String);

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid request: {}", self.0)
    }
}

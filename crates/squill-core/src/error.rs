mod adhoc;
mod driver;
mod invalid_result;
mod scan;
mod schema;
mod validation;

use adhoc::AdhocError;
use driver::DriverError;
use invalid_result::InvalidResultError;
use scan::ScanError;
use schema::SchemaError;
use std::sync::Arc;
use validation::ValidationError;

/// Return early with an ad-hoc [`Error`] built from format arguments.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Create an ad-hoc [`Error`] from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur in squill.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    Driver(DriverError),
    InvalidResult(InvalidResultError),
    Scan(ScanError),
    Schema(SchemaError),
    Validation(ValidationError),
    Unknown,
}

impl Error {
    /// Create an ad-hoc error from format arguments. Prefer the typed
    /// constructors; this exists for the `bail!`/`err!` macros.
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError(args.to_string())))
    }

    /// A startup-class schema configuration failure: unresolvable primary
    /// key, unknown relation target, unsupported backend kind.
    pub fn schema(message: impl Into<String>) -> Error {
        Error::from(ErrorKind::Schema(SchemaError(message.into())))
    }

    /// A per-request client-input failure: malformed filter shape, unknown
    /// column or operator, wrong operand arity.
    pub fn validation(message: impl Into<String>) -> Error {
        Error::from(ErrorKind::Validation(ValidationError(message.into())))
    }

    /// A result-mapping failure: column/field type mismatch or unexpected
    /// column count. Internal invariant violations, never retried.
    pub fn scan(message: impl Into<String>) -> Error {
        Error::from(ErrorKind::Scan(ScanError(message.into())))
    }

    /// A driver/connection failure. Propagated unchanged to the caller.
    pub fn driver(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(ErrorKind::Driver(DriverError(Box::new(err))))
    }

    /// The driver returned a response of the wrong shape (e.g. a row count
    /// where rows were expected).
    pub fn invalid_result(message: impl Into<String>) -> Error {
        Error::from(ErrorKind::InvalidResult(InvalidResultError(message.into())))
    }

    pub fn is_schema(&self) -> bool {
        matches!(self.kind(), ErrorKind::Schema(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation(_))
    }

    pub fn is_scan(&self) -> bool {
        matches!(self.kind(), ErrorKind::Scan(_))
    }

    pub fn is_driver(&self) -> bool {
        matches!(self.kind(), ErrorKind::Driver(_))
    }

    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context
    /// is shown first, ending with the root cause.
    pub fn context(self, consequent: Error) -> Error {
        let mut err = consequent;
        if err.inner.is_none() {
            err = Error::from(ErrorKind::Unknown);
        }
        let inner = err.inner.as_mut().unwrap();
        Arc::get_mut(inner).unwrap().cause = Some(self);
        err
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Driver(err) => Some(err.0.as_ref()),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Driver(err) => core::fmt::Display::fmt(err, f),
            InvalidResult(err) => core::fmt::Display::fmt(err, f),
            Scan(err) => core::fmt::Display::fmt(err, f),
            Schema(err) => core::fmt::Display::fmt(err, f),
            Validation(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown squill error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        // Ensure Error stays at one word (size of pointer/Arc)
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("test error: {}", 42));
        assert_eq!(err.to_string(), "test error: 42");
    }

    #[test]
    fn error_chain_display() {
        let root = Error::validation("unknown column `nope`");
        let chained = root.context(err!("while parsing filter"));
        assert_eq!(
            chained.to_string(),
            "while parsing filter: invalid request: unknown column `nope`"
        );
    }

    #[test]
    fn error_classes() {
        assert!(Error::schema("no primary key").is_schema());
        assert!(Error::validation("bad operand").is_validation());
        assert!(Error::scan("wrong width").is_scan());
        assert!(!Error::scan("wrong width").is_validation());
    }

    #[test]
    fn anyhow_bridge() {
        let anyhow_err = anyhow::anyhow!("something failed");
        let our_err: Error = anyhow_err.into();
        assert_eq!(our_err.to_string(), "something failed");
    }

    #[test]
    fn display_prefixes() {
        assert_eq!(
            Error::schema("record type `User` has no fields").to_string(),
            "invalid schema: record type `User` has no fields"
        );
        assert_eq!(
            Error::scan("expected 3 columns, got 2").to_string(),
            "scan failed: expected 3 columns, got 2"
        );
    }
}

use squill_core::DialectKind;

use std::fmt::Write;

/// How a mutating statement's affected rows are retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturningMode {
    /// The statement carries a native `RETURNING` clause.
    NativeReturning,

    /// The statement carries an `OUTPUT` clause.
    OutputClause,

    /// The rows are selected in a separate statement wrapped in the same
    /// transaction.
    SelectAround,
}

/// Backend-specific rendering and result-retrieval policy.
///
/// Stateless; one value per backend kind, shared read-only across all
/// operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    kind: DialectKind,
}

impl Dialect {
    pub fn new(kind: DialectKind) -> Dialect {
        Dialect { kind }
    }

    pub fn postgresql() -> Dialect {
        Dialect::new(DialectKind::Postgresql)
    }

    pub fn sqlite() -> Dialect {
        Dialect::new(DialectKind::Sqlite)
    }

    pub fn mysql() -> Dialect {
        Dialect::new(DialectKind::Mysql)
    }

    pub fn mssql() -> Dialect {
        Dialect::new(DialectKind::Mssql)
    }

    pub fn kind(&self) -> DialectKind {
        self.kind
    }

    pub fn returning_mode(&self) -> ReturningMode {
        match self.kind {
            DialectKind::Postgresql | DialectKind::Sqlite => ReturningMode::NativeReturning,
            DialectKind::Mssql => ReturningMode::OutputClause,
            DialectKind::Mysql => ReturningMode::SelectAround,
        }
    }

    /// The expression inserted in the key column when the backend generates
    /// the key. `None` means the key column is omitted from the insert
    /// entirely.
    pub fn key_sentinel(&self) -> Option<&'static str> {
        match self.kind {
            DialectKind::Postgresql => Some("DEFAULT"),
            DialectKind::Mssql => Some("NULL"),
            DialectKind::Mysql | DialectKind::Sqlite => None,
        }
    }

    pub fn quote_ident(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        self.write_ident(&mut out, name);
        out
    }

    pub(crate) fn write_ident(&self, dst: &mut String, name: &str) {
        match self.kind {
            DialectKind::Postgresql | DialectKind::Sqlite => {
                dst.push('"');
                for c in name.chars() {
                    if c == '"' {
                        dst.push('"');
                    }
                    dst.push(c);
                }
                dst.push('"');
            }
            DialectKind::Mysql => {
                dst.push('`');
                for c in name.chars() {
                    if c == '`' {
                        dst.push('`');
                    }
                    dst.push(c);
                }
                dst.push('`');
            }
            DialectKind::Mssql => {
                dst.push('[');
                for c in name.chars() {
                    if c == ']' {
                        dst.push(']');
                    }
                    dst.push(c);
                }
                dst.push(']');
            }
        }
    }

    /// Renders the placeholder for the `ordinal`-th argument (1-based).
    pub fn placeholder(&self, ordinal: usize) -> String {
        let mut out = String::new();
        self.write_placeholder(&mut out, ordinal);
        out
    }

    pub(crate) fn write_placeholder(&self, dst: &mut String, ordinal: usize) {
        match self.kind {
            DialectKind::Mysql => dst.push('?'),
            DialectKind::Postgresql => write!(dst, "${ordinal}").unwrap(),
            DialectKind::Sqlite => write!(dst, "?{ordinal}").unwrap(),
            DialectKind::Mssql => write!(dst, "@p{ordinal}").unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_per_backend() {
        assert_eq!(Dialect::postgresql().quote_ident("name"), "\"name\"");
        assert_eq!(Dialect::sqlite().quote_ident("name"), "\"name\"");
        assert_eq!(Dialect::mysql().quote_ident("name"), "`name`");
        assert_eq!(Dialect::mssql().quote_ident("name"), "[name]");
    }

    #[test]
    fn quoting_escapes_delimiters() {
        assert_eq!(Dialect::postgresql().quote_ident("a\"b"), "\"a\"\"b\"");
        assert_eq!(Dialect::mysql().quote_ident("a`b"), "`a``b`");
        assert_eq!(Dialect::mssql().quote_ident("a]b"), "[a]]b]");
    }

    #[test]
    fn placeholders_per_backend() {
        assert_eq!(Dialect::postgresql().placeholder(2), "$2");
        assert_eq!(Dialect::sqlite().placeholder(2), "?2");
        assert_eq!(Dialect::mysql().placeholder(2), "?");
        assert_eq!(Dialect::mssql().placeholder(2), "@p2");
    }

    #[test]
    fn retrieval_policy_per_backend() {
        assert_eq!(
            Dialect::postgresql().returning_mode(),
            ReturningMode::NativeReturning
        );
        assert_eq!(
            Dialect::sqlite().returning_mode(),
            ReturningMode::NativeReturning
        );
        assert_eq!(Dialect::mssql().returning_mode(), ReturningMode::OutputClause);
        assert_eq!(Dialect::mysql().returning_mode(), ReturningMode::SelectAround);
    }

    #[test]
    fn key_sentinels() {
        assert_eq!(Dialect::postgresql().key_sentinel(), Some("DEFAULT"));
        assert_eq!(Dialect::mssql().key_sentinel(), Some("NULL"));
        assert_eq!(Dialect::mysql().key_sentinel(), None);
        assert_eq!(Dialect::sqlite().key_sentinel(), None);
    }
}

use crate::{Error, Result};

/// The supported SQL backends.
///
/// This is a closed set: constructing a kind from configuration goes through
/// [`DialectKind::from_scheme`], which fails on anything unsupported instead
/// of deferring the problem to the first query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectKind {
    Postgresql,
    Sqlite,
    Mysql,
    Mssql,
}

impl DialectKind {
    /// Resolves a connection-URL scheme to a dialect kind. An unknown scheme
    /// is a fatal configuration error, raised here at construction time.
    pub fn from_scheme(scheme: &str) -> Result<DialectKind> {
        match scheme {
            "postgresql" | "postgres" => Ok(DialectKind::Postgresql),
            "sqlite" => Ok(DialectKind::Sqlite),
            "mysql" => Ok(DialectKind::Mysql),
            "mssql" | "sqlserver" => Ok(DialectKind::Mssql),
            other => Err(Error::schema(format!(
                "unsupported database backend `{other}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_schemes() {
        assert_eq!(
            DialectKind::from_scheme("postgresql").unwrap(),
            DialectKind::Postgresql
        );
        assert_eq!(
            DialectKind::from_scheme("postgres").unwrap(),
            DialectKind::Postgresql
        );
        assert_eq!(DialectKind::from_scheme("sqlite").unwrap(), DialectKind::Sqlite);
        assert_eq!(DialectKind::from_scheme("mysql").unwrap(), DialectKind::Mysql);
        assert_eq!(DialectKind::from_scheme("mssql").unwrap(), DialectKind::Mssql);
    }

    #[test]
    fn unknown_scheme_fails_at_construction() {
        let err = DialectKind::from_scheme("oracle").unwrap_err();
        assert!(err.is_schema());
    }
}

mod value;
pub(crate) use value::Value;

use rusqlite::Connection as RusqliteConnection;
use squill_core::{
    async_trait,
    driver::{Operation, Response, SqlQuery, Transaction},
    stmt::ValueRecord,
    DialectKind, Error, Result,
};
use std::path::{Path, PathBuf};
use url::Url;

/// SQLite-backed connection.
#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    /// Open a connection from a `sqlite:` connection URL. The path
    /// `:memory:` opens an in-memory database.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver)?;

        if url.scheme() != "sqlite" {
            return Err(Error::schema(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Self::in_memory()
        } else {
            Self::open(PathBuf::from(url.path()))
        }
    }

    /// Open an in-memory SQLite database.
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::driver)?;
        Ok(Self { connection })
    }

    /// Open a SQLite database at the specified file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver)?;
        Ok(Self { connection })
    }

    /// Executes raw SQL outside the compiled-statement path. Used for schema
    /// setup; the engine itself owns no DDL.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.connection.execute_batch(sql).map_err(Error::driver)
    }
}

impl From<RusqliteConnection> for Connection {
    fn from(connection: RusqliteConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl squill_core::Connection for Connection {
    fn dialect(&self) -> DialectKind {
        DialectKind::Sqlite
    }

    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let query: SqlQuery = match op {
            Operation::Query(query) => query,
            Operation::Transaction(Transaction::Start) => {
                self.connection
                    .execute_batch("BEGIN")
                    .map_err(Error::driver)?;
                return Ok(Response::count(0));
            }
            Operation::Transaction(Transaction::Commit) => {
                self.connection
                    .execute_batch("COMMIT")
                    .map_err(Error::driver)?;
                return Ok(Response::count(0));
            }
            Operation::Transaction(Transaction::Rollback) => {
                self.connection
                    .execute_batch("ROLLBACK")
                    .map_err(Error::driver)?;
                return Ok(Response::count(0));
            }
        };

        let mut stmt = self
            .connection
            .prepare_cached(&query.text)
            .map_err(Error::driver)?;

        let params = query.args.into_iter().map(Value::from).collect::<Vec<_>>();

        let Some(tys) = query.ret else {
            let count = stmt
                .execute(rusqlite::params_from_iter(params.iter()))
                .map_err(Error::driver)?;
            drop(stmt);

            let last = self.connection.last_insert_rowid();
            let last_insert_id = (count > 0 && last > 0).then_some(last as u64);
            return Ok(Response::count_with_last_id(count as u64, last_insert_id));
        };

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver)?;

        let mut ret = Vec::new();

        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut items = Vec::with_capacity(tys.len());
                    for (index, ty) in tys.iter().enumerate() {
                        items.push(Value::from_sql(row, index, ty)?.into_inner());
                    }
                    ret.push(ValueRecord::from_vec(items));
                }
                Ok(None) => break,
                Err(err) => return Err(Error::driver(err)),
            }
        }

        Ok(Response::values(ret))
    }
}

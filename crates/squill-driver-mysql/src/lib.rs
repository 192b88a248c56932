mod value;

use mysql_async::{prelude::Queryable, Conn, Opts, OptsBuilder, Params};
use squill_core::{
    async_trait,
    driver::{Operation, Response, SqlQuery, Transaction},
    stmt::ValueRecord,
    DialectKind, Error, Result,
};
use url::Url;

/// MySQL-backed connection.
///
/// MySQL has no `RETURNING`; mutation results are retrieved with a wrapped
/// select, so the driver reports the last generated key alongside affected
/// row counts.
#[derive(Debug)]
pub struct Connection {
    conn: Conn,
}

impl Connection {
    /// Connects using a `mysql:` connection URL.
    pub async fn connect(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver)?;

        if url.scheme() != "mysql" {
            return Err(Error::schema(format!(
                "connection URL does not have a `mysql` scheme; url={url_str}"
            )));
        }

        url.host_str().ok_or_else(|| {
            Error::schema(format!("missing host in connection URL; url={url_str}"))
        })?;

        if url.path().is_empty() {
            return Err(Error::schema(format!(
                "no database specified - missing path in connection URL; url={url_str}"
            )));
        }

        let opts = Opts::from_url(&url_str).map_err(Error::driver)?;
        let opts = OptsBuilder::from_opts(opts).client_found_rows(true);

        let conn = Conn::new(opts).await.map_err(Error::driver)?;
        Ok(Self { conn })
    }
}

impl From<Conn> for Connection {
    fn from(conn: Conn) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl squill_core::Connection for Connection {
    fn dialect(&self) -> DialectKind {
        DialectKind::Mysql
    }

    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let query: SqlQuery = match op {
            Operation::Query(query) => query,
            Operation::Transaction(Transaction::Start) => {
                self.conn
                    .query_drop("START TRANSACTION")
                    .await
                    .map_err(Error::driver)?;
                return Ok(Response::count(0));
            }
            Operation::Transaction(Transaction::Commit) => {
                self.conn.query_drop("COMMIT").await.map_err(Error::driver)?;
                return Ok(Response::count(0));
            }
            Operation::Transaction(Transaction::Rollback) => {
                self.conn
                    .query_drop("ROLLBACK")
                    .await
                    .map_err(Error::driver)?;
                return Ok(Response::count(0));
            }
        };

        let statement = self.conn.prep(query.text.as_str()).await.map_err(Error::driver)?;

        let args: Vec<mysql_async::Value> = query.args.iter().map(value::to_mysql).collect();
        let params = Params::Positional(args);

        let Some(tys) = query.ret else {
            let result = self
                .conn
                .exec_iter(&statement, params)
                .await
                .map_err(Error::driver)?;

            let affected = result.affected_rows();

            // MySQL reports the FIRST key of a multi-row insert; normalize
            // to the last so key-range derivation is uniform.
            let last_insert_id = result
                .last_insert_id()
                .map(|first| first + affected.saturating_sub(1));

            drop(result);
            return Ok(Response::count_with_last_id(affected, last_insert_id));
        };

        let rows: Vec<mysql_async::Row> = self
            .conn
            .exec(&statement, params)
            .await
            .map_err(Error::driver)?;

        let mut ret = Vec::with_capacity(rows.len());
        for mut row in rows {
            if row.len() != tys.len() {
                return Err(Error::scan(format!(
                    "expected {} columns, got {}",
                    tys.len(),
                    row.len()
                )));
            }

            let mut items = Vec::with_capacity(tys.len());
            for (index, ty) in tys.iter().enumerate() {
                items.push(value::from_mysql(&mut row, index, ty)?);
            }
            ret.push(ValueRecord::from_vec(items));
        }

        Ok(Response::values(ret))
    }
}

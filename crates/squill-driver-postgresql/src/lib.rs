mod value;
pub(crate) use value::Value;

use postgres::types::ToSql;
use squill_core::{
    async_trait,
    driver::{Operation, Response, SqlQuery, Transaction},
    DialectKind, Error, Result,
};
use tokio_postgres::{Client, Config};
use url::Url;

/// PostgreSQL-backed connection.
#[derive(Debug)]
pub struct Connection {
    client: Client,
}

impl Connection {
    /// Initialize from an already-connected client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connects using a `postgresql:` connection URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(Error::driver)?;

        if url.scheme() != "postgresql" && url.scheme() != "postgres" {
            return Err(Error::schema(format!(
                "connection URL does not have a `postgresql` scheme; url={url}"
            )));
        }

        let host = url.host_str().ok_or_else(|| {
            Error::schema(format!("missing host in connection URL; url={url}"))
        })?;

        if url.path().is_empty() {
            return Err(Error::schema(format!(
                "no database specified - missing path in connection URL; url={url}"
            )));
        }

        let mut config = Config::new();
        config.host(host);
        config.dbname(url.path().trim_start_matches('/'));

        if let Some(port) = url.port() {
            config.port(port);
        }

        if !url.username().is_empty() {
            config.user(url.username());
        }

        if let Some(password) = url.password() {
            config.password(password);
        }

        let (client, connection) = config
            .connect(tokio_postgres::NoTls)
            .await
            .map_err(Error::driver)?;

        // The connection task drives the socket; it ends when the client is
        // dropped.
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                eprintln!("connection error: {err}");
            }
        });

        Ok(Self::new(client))
    }

    /// Executes raw SQL outside the compiled-statement path. Used for schema
    /// setup; the engine itself owns no DDL.
    pub async fn execute_batch(&self, sql: &str) -> Result<()> {
        self.client.batch_execute(sql).await.map_err(Error::driver)
    }
}

impl From<Client> for Connection {
    fn from(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl squill_core::Connection for Connection {
    fn dialect(&self) -> DialectKind {
        DialectKind::Postgresql
    }

    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let query: SqlQuery = match op {
            Operation::Query(query) => query,
            Operation::Transaction(transaction) => {
                let sql = match transaction {
                    Transaction::Start => "BEGIN",
                    Transaction::Commit => "COMMIT",
                    Transaction::Rollback => "ROLLBACK",
                };
                self.client.batch_execute(sql).await.map_err(Error::driver)?;
                return Ok(Response::count(0));
            }
        };

        let params: Vec<Value> = query.args.iter().cloned().map(Value::from).collect();
        let refs: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect();

        let Some(tys) = query.ret else {
            let affected = self
                .client
                .execute(query.text.as_str(), &refs)
                .await
                .map_err(Error::driver)?;
            return Ok(Response::count(affected));
        };

        let rows = self
            .client
            .query(query.text.as_str(), &refs)
            .await
            .map_err(Error::driver)?;

        let mut ret = Vec::with_capacity(rows.len());
        for row in &rows {
            ret.push(value::decode_row(row, &tys)?);
        }

        Ok(Response::values(ret))
    }
}

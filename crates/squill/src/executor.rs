use crate::{mapper, Record};

use squill_core::{
    driver::{ExecCount, Operation, SqlQuery, Transaction},
    schema::FieldMap,
    stmt::{ColumnType, FilterNode, OrderSpec, Page, Value, ValueRecord},
    Connection, Error, Result, SchemaRegistry,
};
use squill_sql::{stmt, Dialect, ReturningMode, Serializer, Statement};

use std::sync::Arc;
use tracing::{debug, warn};

/// Orchestrates the four operations against a single connection.
///
/// Statements are compiled for the connection's dialect, executed (inside a
/// transaction when a plan takes more than one statement), and the result
/// rows are mapped back into records. Zero matching rows is an empty vec,
/// never an error; translating that into "not found" is the caller's policy.
pub struct Executor<C> {
    connection: C,
    registry: Arc<SchemaRegistry>,
    dialect: Dialect,
}

impl<C: Connection> Executor<C> {
    /// The dialect comes from the connection, so compiled statements always
    /// match the backend they run against.
    pub fn new(connection: C, registry: Arc<SchemaRegistry>) -> Executor<C> {
        let dialect = Dialect::new(connection.dialect());
        Executor {
            connection,
            registry,
            dialect,
        }
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Fetches records matching `filter`, ordered per `order`, bounded by
    /// `page`. Single statement, no transaction.
    pub async fn fetch<R: Record>(
        &mut self,
        filter: Option<FilterNode>,
        order: OrderSpec,
        page: Page,
    ) -> Result<Vec<R>> {
        let map = self.field_map::<R>()?;

        let statement: Statement = stmt::Select::new(map.table())
            .filter(filter)
            .order(order)
            .page(page)
            .into();

        let query = self.compile(&statement, Some(map.column_types()))?;
        let rows = self.exec_rows(query).await?;
        mapper::scan(rows, &map)
    }

    /// Inserts the records in one multi-row statement and returns them as
    /// stored, generated keys and defaults included.
    ///
    /// Backends without a native way to return the inserted rows get the
    /// statement and a select-back wrapped in one transaction.
    pub async fn insert<R: Record>(&mut self, records: Vec<R>) -> Result<Vec<R>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let map = self.field_map::<R>()?;
        let pk = map.primary_key_ordinal();
        let rows = self.decompose(&map, records)?;

        // Either every record carries its key or none does; a mixed batch
        // cannot pick one key-generation strategy.
        let keyed = rows.iter().all(|row| !row[pk].is_null());
        if !keyed && rows.iter().any(|row| !row[pk].is_null()) {
            return Err(Error::validation(format!(
                "insert batch mixes records with and without `{}` keys",
                map.primary_key().name
            )));
        }

        let sentinel = self.dialect.key_sentinel();

        let mut columns = Vec::with_capacity(map.columns().len());
        for (ordinal, column) in map.columns().iter().enumerate() {
            if ordinal == pk && !keyed && sentinel.is_none() {
                continue;
            }
            columns.push(column.name.clone());
        }

        let supplied_keys: Vec<Value> = if keyed {
            rows.iter().map(|row| row[pk].clone()).collect()
        } else {
            Vec::new()
        };

        let cells: Vec<Vec<stmt::Cell>> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .enumerate()
                    .filter_map(|(ordinal, value)| {
                        if ordinal == pk && !keyed {
                            sentinel.map(|_| stmt::Cell::Generated)
                        } else {
                            Some(stmt::Cell::Bind(value))
                        }
                    })
                    .collect()
            })
            .collect();

        match self.dialect.returning_mode() {
            ReturningMode::NativeReturning | ReturningMode::OutputClause => {
                let statement: Statement = stmt::Insert {
                    table: map.table().into(),
                    columns,
                    rows: cells,
                    returning: true,
                }
                .into();

                let query = self.compile(&statement, Some(map.column_types()))?;
                let rows = self.exec_rows(query).await?;
                mapper::scan(rows, &map)
            }
            ReturningMode::SelectAround => {
                self.transaction(Transaction::Start).await?;
                let result = self
                    .insert_select_around(&map, columns, cells, supplied_keys)
                    .await;
                self.finish_transaction(result).await
            }
        }
    }

    /// Fully updates each record by its primary key and returns the stored
    /// rows. The whole batch shares one transaction: any failure rolls back
    /// every record's update.
    pub async fn replace<R: Record>(&mut self, records: Vec<R>) -> Result<Vec<R>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let map = self.field_map::<R>()?;
        let pk = map.primary_key_ordinal();
        let rows = self.decompose(&map, records)?;

        // Derive each record's point filter up front; a keyless record fails
        // the batch before any statement runs.
        let mut updates = Vec::with_capacity(rows.len());
        for row in rows {
            let key = row[pk].clone();
            if key.is_null() {
                return Err(Error::validation(format!(
                    "replace requires a `{}` key on every record",
                    map.primary_key().name
                )));
            }

            let assignments: Vec<(String, Value)> = row
                .into_iter()
                .enumerate()
                .filter(|(ordinal, _)| *ordinal != pk)
                .map(|(ordinal, value)| (map.columns()[ordinal].name.clone(), value))
                .collect();

            updates.push((key, assignments));
        }

        self.transaction(Transaction::Start).await?;
        let result = self.replace_in_transaction(&map, updates).await;
        self.finish_transaction(result).await
    }

    /// Deletes the records matching `filter` and returns them. An absent
    /// filter deletes everything; that is the caller's explicit choice.
    pub async fn delete<R: Record>(&mut self, filter: Option<FilterNode>) -> Result<Vec<R>> {
        let map = self.field_map::<R>()?;

        match self.dialect.returning_mode() {
            ReturningMode::NativeReturning | ReturningMode::OutputClause => {
                let statement: Statement = stmt::Delete {
                    table: map.table().into(),
                    filter,
                    returning: true,
                }
                .into();

                let query = self.compile(&statement, Some(map.column_types()))?;
                let rows = self.exec_rows(query).await?;
                mapper::scan(rows, &map)
            }
            ReturningMode::SelectAround => {
                self.transaction(Transaction::Start).await?;
                let result = self.delete_select_around(&map, filter).await;
                self.finish_transaction(result).await
            }
        }
    }

    async fn insert_select_around<R: Record>(
        &mut self,
        map: &FieldMap,
        columns: Vec<String>,
        cells: Vec<Vec<stmt::Cell>>,
        supplied_keys: Vec<Value>,
    ) -> Result<Vec<R>> {
        let row_count = cells.len() as u64;

        let statement: Statement = stmt::Insert {
            table: map.table().into(),
            columns,
            rows: cells,
            returning: false,
        }
        .into();

        let query = self.compile(&statement, None)?;
        let count = self.exec_count(query).await?;

        let keys = if supplied_keys.is_empty() {
            self.recover_generated_keys(map, count, row_count)?
        } else {
            supplied_keys
        };

        let filter = FilterNode::is_in(map.primary_key().name.clone(), keys);
        let statement: Statement = stmt::Select::new(map.table()).filter(Some(filter)).into();
        let query = self.compile(&statement, Some(map.column_types()))?;
        let rows = self.exec_rows(query).await?;
        mapper::scan(rows, map)
    }

    /// Reconstructs the generated keys of a multi-row insert from the
    /// driver-reported last key and affected-row count.
    ///
    /// Only correct when the statement was allotted one contiguous range
    /// from a single auto-increment sequence; supplying keys on the records
    /// avoids the assumption entirely.
    fn recover_generated_keys(
        &self,
        map: &FieldMap,
        count: ExecCount,
        row_count: u64,
    ) -> Result<Vec<Value>> {
        warn!(
            table = map.table(),
            rows = row_count,
            "recovering generated keys from a contiguous auto-increment range"
        );

        if count.affected != row_count {
            return Err(Error::invalid_result(format!(
                "inserted {} rows but the driver reported {} affected",
                row_count, count.affected
            )));
        }

        let last = count.last_insert_id.ok_or_else(|| {
            Error::invalid_result("driver reported no generated key for the insert".to_string())
        })?;

        let first = (last + 1).checked_sub(count.affected).ok_or_else(|| {
            Error::invalid_result(format!(
                "driver reported last key {} for {} inserted rows",
                last, count.affected
            ))
        })?;

        Ok((first..=last).map(|id| Value::I64(id as i64)).collect())
    }

    async fn replace_in_transaction<R: Record>(
        &mut self,
        map: &FieldMap,
        updates: Vec<(Value, Vec<(String, Value)>)>,
    ) -> Result<Vec<R>> {
        let mut replaced = Vec::new();

        for (key, assignments) in updates {
            let filter = FilterNode::eq(map.primary_key().name.clone(), key);

            match self.dialect.returning_mode() {
                ReturningMode::NativeReturning | ReturningMode::OutputClause => {
                    let statement: Statement = stmt::Update {
                        table: map.table().into(),
                        assignments,
                        filter,
                        returning: true,
                    }
                    .into();

                    let query = self.compile(&statement, Some(map.column_types()))?;
                    let rows = self.exec_rows(query).await?;
                    replaced.extend(mapper::scan::<R>(rows, map)?);
                }
                ReturningMode::SelectAround => {
                    let statement: Statement = stmt::Update {
                        table: map.table().into(),
                        assignments,
                        filter: filter.clone(),
                        returning: false,
                    }
                    .into();

                    let query = self.compile(&statement, None)?;
                    self.exec_count(query).await?;

                    // Select the updated row back with the identical point
                    // filter.
                    let statement: Statement =
                        stmt::Select::new(map.table()).filter(Some(filter)).into();
                    let query = self.compile(&statement, Some(map.column_types()))?;
                    let rows = self.exec_rows(query).await?;
                    replaced.extend(mapper::scan::<R>(rows, map)?);
                }
            }
        }

        Ok(replaced)
    }

    async fn delete_select_around<R: Record>(
        &mut self,
        map: &FieldMap,
        filter: Option<FilterNode>,
    ) -> Result<Vec<R>> {
        // The doomed rows are selected before the delete. Both statements
        // compile the same filter tree, so the clause text and arguments
        // match byte for byte and the returned set is exactly what the
        // delete removes.
        let statement: Statement = stmt::Select::new(map.table()).filter(filter.clone()).into();
        let query = self.compile(&statement, Some(map.column_types()))?;
        let rows = self.exec_rows(query).await?;
        let deleted = mapper::scan::<R>(rows, map)?;

        let statement: Statement = stmt::Delete {
            table: map.table().into(),
            filter,
            returning: false,
        }
        .into();

        let query = self.compile(&statement, None)?;
        self.exec_count(query).await?;

        Ok(deleted)
    }

    fn field_map<R: Record>(&self) -> Result<Arc<FieldMap>> {
        let descriptor = R::descriptor();
        Ok(self.registry.field_map(descriptor.table)?.clone())
    }

    /// Decomposes records into value rows, checking each row's width against
    /// the field map.
    fn decompose<R: Record>(&self, map: &FieldMap, records: Vec<R>) -> Result<Vec<Vec<Value>>> {
        let width = map.columns().len();

        records
            .into_iter()
            .map(|record| {
                let values = record.into_values();
                if values.len() != width {
                    return Err(Error::scan(format!(
                        "record type `{}` produced {} values for {} columns",
                        map.record(),
                        values.len(),
                        width
                    )));
                }
                Ok(values)
            })
            .collect()
    }

    fn compile(&self, statement: &Statement, ret: Option<Vec<ColumnType>>) -> Result<SqlQuery> {
        let serializer = Serializer::new(&self.registry, self.dialect);
        let mut args = Vec::new();
        let text = serializer.serialize(statement, &mut args)?;
        Ok(SqlQuery { text, args, ret })
    }

    async fn exec_rows(&mut self, query: SqlQuery) -> Result<Vec<ValueRecord>> {
        debug!(sql = %query.text, args = query.args.len(), "executing statement");
        let response = self.connection.exec(Operation::Query(query)).await?;
        response.rows.into_values()
    }

    async fn exec_count(&mut self, query: SqlQuery) -> Result<ExecCount> {
        debug!(sql = %query.text, args = query.args.len(), "executing statement");
        let response = self.connection.exec(Operation::Query(query)).await?;
        response.rows.into_count()
    }

    async fn transaction(&mut self, op: Transaction) -> Result<()> {
        self.connection.exec(Operation::Transaction(op)).await?;
        Ok(())
    }

    /// Commits on success; rolls back on failure. The statement error wins
    /// over any rollback error.
    async fn finish_transaction<T>(&mut self, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.transaction(Transaction::Commit).await?;
                Ok(value)
            }
            Err(err) => {
                let _ = self.transaction(Transaction::Rollback).await;
                Err(err)
            }
        }
    }
}

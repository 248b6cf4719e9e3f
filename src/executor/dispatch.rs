//! Statement dispatch.

use std::sync::Arc;

use crate::error::Result;
use crate::server::Connection;
use crate::sql::{ParseError, Statement};

use super::ops::{DataOps, ErrorReporter, ReturnOriginal, SchemaOps, TransactionOps, Unimplemented};
use super::QueryResult;

/// One object per capability, composed.
///
/// ```
/// use std::sync::Arc;
/// use mysql_wire_server::backend::MemoryBackend;
/// use mysql_wire_server::executor::{Executor, SuppressParseErrors};
///
/// let backend = Arc::new(MemoryBackend::new());
/// let executor = Executor::builder()
///     .backend(backend)
///     .reporter(Arc::new(SuppressParseErrors))
///     .build();
/// # let _ = executor;
/// ```
#[derive(Clone)]
pub struct Executor {
    schema: Arc<dyn SchemaOps>,
    data: Arc<dyn DataOps>,
    transactions: Arc<dyn TransactionOps>,
    reporter: Arc<dyn ErrorReporter>,
}

impl Executor {
    /// Start from the stock parts.
    pub fn builder() -> ExecutorBuilder {
        ExecutorBuilder::default()
    }

    /// Use `backend` for schema, data and transaction statements and report
    /// parse errors unchanged.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: SchemaOps + DataOps + TransactionOps + 'static,
    {
        Self::builder().backend(backend).build()
    }

    /// Run one statement.
    ///
    /// A successful `USE` also switches the connection's database.
    pub async fn execute(&self, conn: &dyn Connection, stmt: &Statement) -> Result<QueryResult> {
        trace!(conn_id = conn.id(), kind = stmt.kind(), "Dispatching statement");

        let result = match stmt {
            Statement::CreateDatabase(s) => {
                self.schema.create_database(conn, s).await?;
                QueryResult::ok(1)
            }
            Statement::AlterDatabase(s) => {
                self.schema.alter_database(conn, s).await?;
                QueryResult::ok(0)
            }
            Statement::DropDatabase(s) => {
                self.schema.drop_database(conn, s).await?;
                QueryResult::ok(0)
            }
            Statement::CreateTable(s) => {
                self.schema.create_table(conn, s).await?;
                QueryResult::ok(0)
            }
            Statement::AlterTable(s) => {
                self.schema.alter_table(conn, s).await?;
                QueryResult::ok(0)
            }
            Statement::DropTable(s) => {
                self.schema.drop_table(conn, s).await?;
                QueryResult::ok(0)
            }
            Statement::Use(s) => {
                self.schema.use_database(conn, s).await?;
                conn.set_database(Some(s.database.clone()));
                QueryResult::ok(0)
            }
            Statement::Insert(s) => {
                self.data.insert(conn, s).await?;
                QueryResult::ok(s.rows.len() as u64)
            }
            Statement::Select(s) => QueryResult::Rows(self.data.select(conn, s).await?),
            Statement::Update(s) => QueryResult::ok(self.data.update(conn, s).await?),
            Statement::Delete(s) => QueryResult::ok(self.data.delete(conn, s).await?),
            Statement::Begin(s) => {
                self.transactions.begin(conn, s).await?;
                QueryResult::ok(0)
            }
            Statement::Commit(s) => {
                self.transactions.commit(conn, s).await?;
                QueryResult::ok(0)
            }
            Statement::Rollback(s) => {
                self.transactions.rollback(conn, s).await?;
                QueryResult::ok(0)
            }
        };

        Ok(result)
    }

    /// Route a parse failure through the error reporter.
    ///
    /// Returns the replacement error, or an OK-with-one-warning result when
    /// the reporter suppressed it.
    pub fn report_parse_error(
        &self,
        conn: &dyn Connection,
        query: &str,
        err: ParseError,
    ) -> Result<QueryResult> {
        match self.reporter.report(conn, query, err) {
            Some(err) => Err(err),
            None => Ok(QueryResult::warning()),
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor").finish_non_exhaustive()
    }
}

/// Builder for [`Executor`].
///
/// Unset schema, data and transaction capabilities fall back to
/// [`Unimplemented`]; an unset reporter falls back to [`ReturnOriginal`].
/// Backends that want to accept transaction statements without doing
/// anything can plug in [`NoopTransactions`](super::NoopTransactions).
#[derive(Default)]
pub struct ExecutorBuilder {
    schema: Option<Arc<dyn SchemaOps>>,
    data: Option<Arc<dyn DataOps>>,
    transactions: Option<Arc<dyn TransactionOps>>,
    reporter: Option<Arc<dyn ErrorReporter>>,
}

impl ExecutorBuilder {
    pub fn schema(mut self, schema: Arc<dyn SchemaOps>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn data(mut self, data: Arc<dyn DataOps>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn transactions(mut self, transactions: Arc<dyn TransactionOps>) -> Self {
        self.transactions = Some(transactions);
        self
    }

    pub fn reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Use one object for schema, data and transactions.
    pub fn backend<B>(self, backend: Arc<B>) -> Self
    where
        B: SchemaOps + DataOps + TransactionOps + 'static,
    {
        self.schema(Arc::clone(&backend) as Arc<dyn SchemaOps>)
            .data(Arc::clone(&backend) as Arc<dyn DataOps>)
            .transactions(backend as Arc<dyn TransactionOps>)
    }

    pub fn build(self) -> Executor {
        Executor {
            schema: self.schema.unwrap_or_else(|| Arc::new(Unimplemented)),
            data: self.data.unwrap_or_else(|| Arc::new(Unimplemented)),
            transactions: self
                .transactions
                .unwrap_or_else(|| Arc::new(Unimplemented)),
            reporter: self.reporter.unwrap_or_else(|| Arc::new(ReturnOriginal)),
        }
    }
}

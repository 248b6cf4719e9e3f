//! Reference in-memory backend.
//!
//! [`MemoryBackend`] implements the schema, data and transaction
//! capabilities over a [`Catalog`]. It exists to exercise the executor
//! contract; it is not a database: no persistence, no joins, no
//! aggregation, and transaction statements are accepted and ignored.
//!
//! The catalog sits behind a single [`tokio::sync::RwLock`], so each
//! statement is atomic with respect to other connections. There is no
//! isolation across statements.
//!
//! Behaviour worth knowing about:
//! - `DROP DATABASE` on a missing name fails unless `IF EXISTS` is given,
//!   while `DROP TABLE` silently skips missing tables either way.
//! - `SELECT` only scans the first table in `FROM`; `FROM dual` (or no
//!   `FROM`) returns an empty result.
//! - `UPDATE` and `DELETE` resolve every target table, and check the
//!   filter and assigned columns against each, before touching any of them.
//!   They report the total affected rows across all targets.

mod catalog;
mod matcher;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Result, ServerError};
use crate::executor::{DataOps, ResultSet, SchemaOps, TransactionOps};
use crate::server::Connection;
use crate::sql::{
    AlterDatabase, AlterTable, Begin, Commit, CreateDatabase, CreateTable, Delete, DropDatabase,
    DropTable, Insert, Rollback, Select, TableName, Update, Use,
};

pub use catalog::{Catalog, Database, Row, Table};
pub use matcher::{coerced_eq, is_matched, validate_condition};

/// Name of the pseudo table accepted by `SELECT ... FROM dual`.
const DUAL: &str = "dual";

/// In-memory executor backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    catalog: RwLock<Catalog>,
}

impl MemoryBackend {
    /// Empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with the given databases already created.
    ///
    /// # Errors
    ///
    /// [`ServerError::DatabaseExists`] when a name repeats.
    pub fn with_databases<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Catalog::new();
        for name in names {
            catalog.create_database(Database::new(name))?;
        }
        Ok(Self {
            catalog: RwLock::new(catalog),
        })
    }

    /// Names of all databases.
    pub async fn database_names(&self) -> Vec<String> {
        self.catalog.read().await.database_names()
    }

    /// Names of the tables in `database`.
    pub async fn table_names(&self, database: &str) -> Result<Vec<String>> {
        Ok(self.catalog.read().await.database(database)?.table_names())
    }

    /// Character set recorded for `database`.
    pub async fn database_charset(&self, database: &str) -> Result<Option<String>> {
        Ok(self
            .catalog
            .read()
            .await
            .database(database)?
            .charset()
            .map(str::to_string))
    }
}

/// Database a table reference lives in: its qualifier, else the
/// connection's current database.
fn database_for(conn: &dyn Connection, table: &TableName) -> Result<String> {
    table
        .database
        .clone()
        .or_else(|| conn.database())
        .ok_or(ServerError::NoDatabaseSelected)
}

#[async_trait]
impl SchemaOps for MemoryBackend {
    async fn create_database(&self, conn: &dyn Connection, stmt: &CreateDatabase) -> Result<()> {
        let mut catalog = self.catalog.write().await;
        if catalog.contains_database(&stmt.name) {
            if stmt.if_not_exists {
                debug!(conn_id = conn.id(), database = %stmt.name, "Database exists, skipping");
                return Ok(());
            }
            return Err(ServerError::DatabaseExists(stmt.name.clone()));
        }

        let mut database = Database::new(&stmt.name);
        database.set_charset(stmt.charset.clone());
        catalog.create_database(database)?;
        info!(conn_id = conn.id(), database = %stmt.name, "Database created");
        Ok(())
    }

    async fn alter_database(&self, conn: &dyn Connection, stmt: &AlterDatabase) -> Result<()> {
        let name = stmt
            .name
            .clone()
            .or_else(|| conn.database())
            .ok_or(ServerError::NoDatabaseSelected)?;

        let mut catalog = self.catalog.write().await;
        let database = catalog.database_mut(&name)?;
        if stmt.charset.is_some() {
            database.set_charset(stmt.charset.clone());
        }
        debug!(conn_id = conn.id(), database = %name, "Database altered");
        Ok(())
    }

    async fn drop_database(&self, conn: &dyn Connection, stmt: &DropDatabase) -> Result<()> {
        let mut catalog = self.catalog.write().await;
        if !catalog.contains_database(&stmt.name) {
            if stmt.if_exists {
                debug!(conn_id = conn.id(), database = %stmt.name, "Database absent, skipping");
                return Ok(());
            }
            return Err(ServerError::DatabaseNotFound(stmt.name.clone()));
        }

        catalog.drop_database(&stmt.name)?;
        drop(catalog);

        if conn.database().as_deref() == Some(stmt.name.as_str()) {
            conn.set_database(None);
        }
        info!(conn_id = conn.id(), database = %stmt.name, "Database dropped");
        Ok(())
    }

    async fn create_table(&self, conn: &dyn Connection, stmt: &CreateTable) -> Result<()> {
        let db_name = database_for(conn, &stmt.table)?;
        let mut catalog = self.catalog.write().await;
        let database = catalog.database_mut(&db_name)?;

        if database.contains_table(&stmt.table.name) {
            if stmt.if_not_exists {
                debug!(conn_id = conn.id(), table = %stmt.table, "Table exists, skipping");
                return Ok(());
            }
            return Err(ServerError::CollectionExists(format!(
                "{}.{}",
                db_name, stmt.table.name
            )));
        }

        database.create_table(Table::new(&stmt.table.name, stmt.columns.clone())?)?;
        info!(conn_id = conn.id(), database = %db_name, table = %stmt.table.name, "Table created");
        Ok(())
    }

    async fn alter_table(&self, conn: &dyn Connection, stmt: &AlterTable) -> Result<()> {
        let db_name = database_for(conn, &stmt.table)?;
        let mut catalog = self.catalog.write().await;
        catalog
            .database_mut(&db_name)?
            .alter_table(&stmt.table.name, &stmt.actions)?;
        debug!(conn_id = conn.id(), database = %db_name, table = %stmt.table.name, "Table altered");
        Ok(())
    }

    async fn drop_table(&self, conn: &dyn Connection, stmt: &DropTable) -> Result<()> {
        let targets = stmt
            .tables
            .iter()
            .map(|t| Ok((database_for(conn, t)?, t.name.as_str())))
            .collect::<Result<Vec<_>>>()?;

        let mut catalog = self.catalog.write().await;
        for (db_name, _) in &targets {
            catalog.database(db_name)?;
        }

        for (db_name, table) in targets {
            let database = catalog.database_mut(&db_name)?;
            if !database.contains_table(table) {
                debug!(conn_id = conn.id(), database = %db_name, table = %table, "Table absent, skipping");
                continue;
            }
            database.drop_table(table)?;
            info!(conn_id = conn.id(), database = %db_name, table = %table, "Table dropped");
        }
        Ok(())
    }

    async fn use_database(&self, _conn: &dyn Connection, stmt: &Use) -> Result<()> {
        self.catalog.read().await.database(&stmt.database)?;
        Ok(())
    }
}

#[async_trait]
impl DataOps for MemoryBackend {
    async fn insert(&self, conn: &dyn Connection, stmt: &Insert) -> Result<()> {
        // INSERT reports every unresolvable target as a missing table.
        let db_name = database_for(conn, &stmt.table)
            .map_err(|_| ServerError::CollectionNotFound(stmt.table.to_string()))?;
        let qualified = format!("{}.{}", db_name, stmt.table.name);
        let mut catalog = self.catalog.write().await;
        let table = catalog
            .database_mut(&db_name)
            .and_then(|db| db.table_mut(&stmt.table.name))
            .map_err(|_| ServerError::CollectionNotFound(qualified))?;

        let rows = stmt
            .rows
            .iter()
            .enumerate()
            .map(|(i, values)| table.build_row(&stmt.columns, values.clone(), i + 1))
            .collect::<Result<Vec<_>>>()?;
        let count = rows.len();
        table.append(rows);

        trace!(conn_id = conn.id(), table = %stmt.table, rows = count, "Rows inserted");
        Ok(())
    }

    async fn select(&self, conn: &dyn Connection, stmt: &Select) -> Result<ResultSet> {
        let Some(first) = stmt.from.first() else {
            return Ok(ResultSet::default());
        };
        if first.database.is_none() && first.name.eq_ignore_ascii_case(DUAL) {
            return Ok(ResultSet::default());
        }
        if stmt.from.len() > 1 {
            debug!(
                conn_id = conn.id(),
                tables = stmt.from.len(),
                "Joins are not supported, scanning first table only"
            );
        }

        let db_name = database_for(conn, first)?;
        let catalog = self.catalog.read().await;
        let table = catalog.database(&db_name)?.table(&first.name)?;
        table.select(&stmt.columns, stmt.filter.as_ref())
    }

    async fn update(&self, conn: &dyn Connection, stmt: &Update) -> Result<u64> {
        let targets = stmt
            .tables
            .iter()
            .map(|t| Ok((database_for(conn, t)?, t.name.as_str())))
            .collect::<Result<Vec<_>>>()?;

        let mut catalog = self.catalog.write().await;
        for (db_name, table) in &targets {
            let table = catalog.database(db_name)?.table(table)?;
            validate_condition(stmt.filter.as_ref(), table.columns())?;
            table.validate_assignments(&stmt.assignments)?;
        }

        let mut affected = 0;
        for (db_name, table) in &targets {
            affected += catalog
                .database_mut(db_name)?
                .table_mut(table)?
                .update_where(stmt.filter.as_ref(), &stmt.assignments)?;
        }

        trace!(conn_id = conn.id(), tables = targets.len(), affected, "Rows updated");
        Ok(affected)
    }

    async fn delete(&self, conn: &dyn Connection, stmt: &Delete) -> Result<u64> {
        let targets = stmt
            .tables
            .iter()
            .map(|t| Ok((database_for(conn, t)?, t.name.as_str())))
            .collect::<Result<Vec<_>>>()?;

        let mut catalog = self.catalog.write().await;
        for (db_name, table) in &targets {
            let table = catalog.database(db_name)?.table(table)?;
            validate_condition(stmt.filter.as_ref(), table.columns())?;
        }

        let mut affected = 0;
        for (db_name, table) in &targets {
            affected += catalog
                .database_mut(db_name)?
                .table_mut(table)?
                .delete_where(stmt.filter.as_ref())?;
        }

        trace!(conn_id = conn.id(), tables = targets.len(), affected, "Rows deleted");
        Ok(affected)
    }
}

#[async_trait]
impl TransactionOps for MemoryBackend {
    async fn begin(&self, conn: &dyn Connection, stmt: &Begin) -> Result<()> {
        trace!(conn_id = conn.id(), read_only = stmt.read_only, "BEGIN ignored");
        Ok(())
    }

    async fn commit(&self, conn: &dyn Connection, _stmt: &Commit) -> Result<()> {
        trace!(conn_id = conn.id(), "COMMIT ignored");
        Ok(())
    }

    async fn rollback(&self, conn: &dyn Connection, _stmt: &Rollback) -> Result<()> {
        trace!(conn_id = conn.id(), "ROLLBACK ignored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::Session;
    use crate::sql::{AlterTableAction, Assignment, ColumnDef, Condition, DataType, Value};

    fn create_db(name: &str, if_not_exists: bool) -> CreateDatabase {
        CreateDatabase {
            name: name.into(),
            if_not_exists,
            charset: None,
        }
    }

    fn drop_db(name: &str, if_exists: bool) -> DropDatabase {
        DropDatabase {
            name: name.into(),
            if_exists,
        }
    }

    fn create_table(name: &str) -> CreateTable {
        CreateTable {
            table: TableName::new(name),
            if_not_exists: false,
            columns: vec![
                ColumnDef::new("id", DataType::Int),
                ColumnDef::new("v", DataType::Text),
            ],
        }
    }

    fn insert(table: &str, rows: Vec<Vec<Value>>) -> Insert {
        Insert {
            table: TableName::new(table),
            columns: vec![],
            rows,
        }
    }

    async fn backend_with_table(conn: &Session) -> MemoryBackend {
        let backend = MemoryBackend::with_databases(["ycsb"]).unwrap();
        conn.set_database(Some("ycsb".into()));
        backend.create_table(conn, &create_table("t")).await.unwrap();
        backend
    }

    #[tokio::test]
    async fn test_create_database_twice() {
        let conn = Session::new(1);
        let backend = MemoryBackend::new();

        backend.create_database(&conn, &create_db("ycsb", false)).await.unwrap();
        let err = backend
            .create_database(&conn, &create_db("ycsb", false))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::DatabaseExists(ref n) if n == "ycsb"));

        backend.create_database(&conn, &create_db("ycsb", true)).await.unwrap();
        assert_eq!(backend.database_names().await, vec!["ycsb"]);
    }

    #[tokio::test]
    async fn test_create_database_records_charset() {
        let conn = Session::new(1);
        let backend = MemoryBackend::new();
        let stmt = CreateDatabase {
            name: "d".into(),
            if_not_exists: false,
            charset: Some("utf8mb4".into()),
        };
        backend.create_database(&conn, &stmt).await.unwrap();
        assert_eq!(
            backend.database_charset("d").await.unwrap().as_deref(),
            Some("utf8mb4")
        );
    }

    #[tokio::test]
    async fn test_drop_database() {
        let conn = Session::new(1);
        let backend = MemoryBackend::new();

        let err = backend
            .drop_database(&conn, &drop_db("missing", false))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::DatabaseNotFound(_)));
        backend.drop_database(&conn, &drop_db("missing", true)).await.unwrap();

        backend.create_database(&conn, &create_db("d", false)).await.unwrap();
        conn.set_database(Some("d".into()));
        backend.drop_database(&conn, &drop_db("d", false)).await.unwrap();
        assert!(backend.database_names().await.is_empty());
        assert!(conn.database().is_none());
    }

    #[tokio::test]
    async fn test_alter_database() {
        let conn = Session::new(1);
        let backend = MemoryBackend::with_databases(["d"]).unwrap();

        let stmt = AlterDatabase {
            name: None,
            charset: Some("latin1".into()),
        };
        assert!(matches!(
            backend.alter_database(&conn, &stmt).await.unwrap_err(),
            ServerError::NoDatabaseSelected
        ));

        conn.set_database(Some("d".into()));
        backend.alter_database(&conn, &stmt).await.unwrap();
        assert_eq!(
            backend.database_charset("d").await.unwrap().as_deref(),
            Some("latin1")
        );

        let missing = AlterDatabase {
            name: Some("nope".into()),
            charset: None,
        };
        assert!(matches!(
            backend.alter_database(&conn, &missing).await.unwrap_err(),
            ServerError::DatabaseNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_create_table_requires_database() {
        let conn = Session::new(1);
        let backend = MemoryBackend::new();

        assert!(matches!(
            backend.create_table(&conn, &create_table("t")).await.unwrap_err(),
            ServerError::NoDatabaseSelected
        ));

        conn.set_database(Some("gone".into()));
        assert!(matches!(
            backend.create_table(&conn, &create_table("t")).await.unwrap_err(),
            ServerError::DatabaseNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_create_table_twice() {
        let conn = Session::new(1);
        let backend = backend_with_table(&conn).await;

        let err = backend
            .create_table(&conn, &create_table("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::CollectionExists(ref n) if n == "ycsb.t"));

        let mut lenient = create_table("t");
        lenient.if_not_exists = true;
        backend.create_table(&conn, &lenient).await.unwrap();
    }

    #[tokio::test]
    async fn test_qualified_table_ignores_current_database() {
        let conn = Session::new(1);
        let backend = MemoryBackend::with_databases(["a", "b"]).unwrap();
        conn.set_database(Some("a".into()));

        let mut stmt = create_table("t");
        stmt.table = TableName::qualified("b", "t");
        backend.create_table(&conn, &stmt).await.unwrap();

        assert!(backend.table_names("a").await.unwrap().is_empty());
        assert_eq!(backend.table_names("b").await.unwrap(), vec!["t"]);
    }

    #[tokio::test]
    async fn test_drop_table_is_lenient() {
        let conn = Session::new(1);
        let backend = backend_with_table(&conn).await;

        let stmt = DropTable {
            tables: vec![TableName::new("missing"), TableName::new("t")],
            if_exists: false,
        };
        backend.drop_table(&conn, &stmt).await.unwrap();
        assert!(backend.table_names("ycsb").await.unwrap().is_empty());

        // Missing database is still an error
        let stmt = DropTable {
            tables: vec![TableName::qualified("nope", "t")],
            if_exists: true,
        };
        assert!(matches!(
            backend.drop_table(&conn, &stmt).await.unwrap_err(),
            ServerError::DatabaseNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_alter_table() {
        let conn = Session::new(1);
        let backend = backend_with_table(&conn).await;

        let stmt = AlterTable {
            table: TableName::new("t"),
            actions: vec![AlterTableAction::RenameTable("t2".into())],
        };
        backend.alter_table(&conn, &stmt).await.unwrap();
        assert_eq!(backend.table_names("ycsb").await.unwrap(), vec!["t2"]);

        assert!(matches!(
            backend.alter_table(&conn, &stmt).await.unwrap_err(),
            ServerError::CollectionNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_use_database() {
        let conn = Session::new(1);
        let backend = MemoryBackend::with_databases(["ycsb"]).unwrap();
        backend
            .use_database(&conn, &Use { database: "ycsb".into() })
            .await
            .unwrap();
        assert!(matches!(
            backend
                .use_database(&conn, &Use { database: "nope".into() })
                .await
                .unwrap_err(),
            ServerError::DatabaseNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_insert_select_coercion() {
        let conn = Session::new(1);
        let backend = backend_with_table(&conn).await;

        backend
            .insert(
                &conn,
                &insert(
                    "t",
                    vec![
                        vec![5.into(), "five".into()],
                        vec![6.into(), "six".into()],
                    ],
                ),
            )
            .await
            .unwrap();

        let select = Select {
            columns: vec!["v".into()],
            from: vec![TableName::new("t")],
            filter: Some(Condition::equals("id", "5")),
        };
        let rs = backend.select(&conn, &select).await.unwrap();
        assert_eq!(rs.rows, vec![vec![Value::from("five")]]);
    }

    #[tokio::test]
    async fn test_insert_missing_table() {
        let conn = Session::new(1);
        let backend = backend_with_table(&conn).await;

        let err = backend
            .insert(&conn, &insert("nope", vec![vec![1.into(), "x".into()]]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::CollectionNotFound(_)));

        let mut stmt = insert("t", vec![vec![1.into(), "x".into()]]);
        stmt.table = TableName::qualified("nodb", "t");
        assert!(matches!(
            backend.insert(&conn, &stmt).await.unwrap_err(),
            ServerError::CollectionNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_insert_without_database_is_missing_table() {
        let conn = Session::new(1);
        let backend = MemoryBackend::with_databases(["ycsb"]).unwrap();

        let err = backend
            .insert(&conn, &insert("t", vec![vec![1.into(), "x".into()]]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::CollectionNotFound(ref n) if n == "t"));
    }

    #[tokio::test]
    async fn test_insert_is_all_or_nothing() {
        let conn = Session::new(1);
        let backend = backend_with_table(&conn).await;

        let stmt = insert("t", vec![vec![1.into(), "ok".into()], vec![2.into()]]);
        assert!(matches!(
            backend.insert(&conn, &stmt).await.unwrap_err(),
            ServerError::ValueCountMismatch(2)
        ));

        let all = Select {
            columns: vec![],
            from: vec![TableName::new("t")],
            filter: None,
        };
        assert!(backend.select(&conn, &all).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_select_dual_and_no_from() {
        let conn = Session::new(1);
        let backend = MemoryBackend::new();

        for from in [vec![TableName::new("DUAL")], vec![]] {
            let select = Select {
                columns: vec![],
                from,
                filter: None,
            };
            let rs = backend.select(&conn, &select).await.unwrap();
            assert!(rs.is_empty());
            assert!(rs.columns.is_empty());
        }
    }

    #[tokio::test]
    async fn test_select_missing_table() {
        let conn = Session::new(1);
        let backend = backend_with_table(&conn).await;
        let select = Select {
            columns: vec![],
            from: vec![TableName::new("nope")],
            filter: None,
        };
        assert!(matches!(
            backend.select(&conn, &select).await.unwrap_err(),
            ServerError::CollectionNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_update_delete_across_tables() {
        let conn = Session::new(1);
        let backend = backend_with_table(&conn).await;
        backend.create_table(&conn, &create_table("u")).await.unwrap();

        backend
            .insert(
                &conn,
                &insert("t", vec![vec![1.into(), "a".into()], vec![2.into(), "a".into()]]),
            )
            .await
            .unwrap();
        backend
            .insert(&conn, &insert("u", vec![vec![1.into(), "a".into()]]))
            .await
            .unwrap();

        let update = Update {
            tables: vec![TableName::new("t"), TableName::new("u")],
            assignments: vec![Assignment::new("v", "b")],
            filter: Some(Condition::equals("v", "a")),
        };
        assert_eq!(backend.update(&conn, &update).await.unwrap(), 3);

        let delete = Delete {
            tables: vec![TableName::new("t"), TableName::new("u")],
            filter: Some(Condition::equals("id", 1)),
        };
        assert_eq!(backend.delete(&conn, &delete).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_target_changes_nothing() {
        let conn = Session::new(1);
        let backend = backend_with_table(&conn).await;
        backend
            .insert(&conn, &insert("t", vec![vec![1.into(), "a".into()]]))
            .await
            .unwrap();

        let update = Update {
            tables: vec![TableName::new("t"), TableName::new("missing")],
            assignments: vec![Assignment::new("v", "b")],
            filter: None,
        };
        assert!(matches!(
            backend.update(&conn, &update).await.unwrap_err(),
            ServerError::CollectionNotFound(_)
        ));

        let select = Select {
            columns: vec!["v".into()],
            from: vec![TableName::new("t")],
            filter: None,
        };
        assert_eq!(
            backend.select(&conn, &select).await.unwrap().rows,
            vec![vec![Value::from("a")]]
        );

        let delete = Delete {
            tables: vec![TableName::qualified("nodb", "t")],
            filter: None,
        };
        assert!(matches!(
            backend.delete(&conn, &delete).await.unwrap_err(),
            ServerError::DatabaseNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_column_error_on_later_target_changes_nothing() {
        let conn = Session::new(1);
        let backend = backend_with_table(&conn).await;
        let narrow = CreateTable {
            table: TableName::new("u"),
            if_not_exists: false,
            columns: vec![ColumnDef::new("id", DataType::Int)],
        };
        backend.create_table(&conn, &narrow).await.unwrap();
        backend
            .insert(&conn, &insert("t", vec![vec![1.into(), "a".into()]]))
            .await
            .unwrap();

        let targets = vec![TableName::new("t"), TableName::new("u")];
        let update = Update {
            tables: targets.clone(),
            assignments: vec![Assignment::new("v", "b")],
            filter: None,
        };
        assert!(matches!(
            backend.update(&conn, &update).await.unwrap_err(),
            ServerError::ColumnNotFound(ref c) if c == "v"
        ));

        let delete = Delete {
            tables: targets,
            filter: Some(Condition::equals("v", "a")),
        };
        assert!(matches!(
            backend.delete(&conn, &delete).await.unwrap_err(),
            ServerError::ColumnNotFound(ref c) if c == "v"
        ));

        let select = Select {
            columns: vec!["v".into()],
            from: vec![TableName::new("t")],
            filter: None,
        };
        assert_eq!(
            backend.select(&conn, &select).await.unwrap().rows,
            vec![vec![Value::from("a")]]
        );
    }

    #[tokio::test]
    async fn test_transactions_are_noops() {
        let conn = Session::new(1);
        let backend = MemoryBackend::new();
        backend.begin(&conn, &Begin { read_only: true }).await.unwrap();
        backend.commit(&conn, &Commit).await.unwrap();
        backend.rollback(&conn, &Rollback).await.unwrap();
    }
}

//! In-memory catalog: databases own tables, tables own rows.
//!
//! Everything here is synchronous. [`MemoryBackend`](super::MemoryBackend)
//! holds the catalog behind one lock and calls into it per statement.

use std::collections::BTreeMap;

use crate::error::{Result, ServerError};
use crate::executor::ResultSet;
use crate::sql::{AlterTableAction, Assignment, ColumnDef, Condition, Value};

use super::matcher::{is_matched, validate_condition};

/// One stored row, values in table column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Values in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// A table: ordered schema plus rows.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<ColumnDef>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table.
    ///
    /// # Errors
    ///
    /// [`ServerError::DuplicateColumn`] when two columns share a name.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Result<Self> {
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(ServerError::DuplicateColumn(col.name.clone()));
            }
        }
        Ok(Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| ServerError::ColumnNotFound(name.to_string()))
    }

    /// Build a row from an INSERT column list and one value tuple.
    ///
    /// An empty `columns` list means every column in schema order. Columns
    /// not named get their default, or NULL. Values are conformed to the
    /// column types.
    ///
    /// `row_number` is 1-based and only used in error messages.
    pub fn build_row(
        &self,
        columns: &[String],
        values: Vec<Value>,
        row_number: usize,
    ) -> Result<Row> {
        let targets: Vec<usize> = if columns.is_empty() {
            (0..self.columns.len()).collect()
        } else {
            columns
                .iter()
                .map(|c| self.column_index(c))
                .collect::<Result<_>>()?
        };
        if targets.len() != values.len() {
            return Err(ServerError::ValueCountMismatch(row_number));
        }

        let mut row: Vec<Option<Value>> = vec![None; self.columns.len()];
        for (idx, value) in targets.into_iter().zip(values) {
            row[idx] = Some(self.columns[idx].data_type.conform(value));
        }

        let values = row
            .into_iter()
            .zip(&self.columns)
            .map(|(value, col)| {
                value
                    .or_else(|| col.default.clone())
                    .unwrap_or(Value::Null)
            })
            .collect();
        Ok(Row { values })
    }

    /// Append rows built with [`build_row`](Self::build_row).
    pub fn append(&mut self, rows: Vec<Row>) {
        self.rows.extend(rows);
    }

    /// Check that every assigned column exists.
    pub fn validate_assignments(&self, assignments: &[Assignment]) -> Result<()> {
        for assignment in assignments {
            self.column_index(&assignment.column)?;
        }
        Ok(())
    }

    /// Apply `assignments` to every matching row; returns the match count.
    pub fn update_where(
        &mut self,
        filter: Option<&Condition>,
        assignments: &[Assignment],
    ) -> Result<u64> {
        validate_condition(filter, &self.columns)?;
        let resolved: Vec<(usize, Value)> = assignments
            .iter()
            .map(|a| {
                let idx = self.column_index(&a.column)?;
                Ok((idx, self.columns[idx].data_type.conform(a.value.clone())))
            })
            .collect::<Result<_>>()?;

        let mut affected = 0;
        for row in &mut self.rows {
            if is_matched(filter, &self.columns, &row.values) {
                for (idx, value) in &resolved {
                    row.values[*idx] = value.clone();
                }
                affected += 1;
            }
        }
        Ok(affected)
    }

    /// Remove every matching row; returns the number removed.
    pub fn delete_where(&mut self, filter: Option<&Condition>) -> Result<u64> {
        validate_condition(filter, &self.columns)?;
        let before = self.rows.len();
        let columns = &self.columns;
        self.rows.retain(|row| !is_matched(filter, columns, &row.values));
        Ok((before - self.rows.len()) as u64)
    }

    /// Matching rows projected onto `projection` (empty or `*` means all).
    pub fn select(&self, projection: &[String], filter: Option<&Condition>) -> Result<ResultSet> {
        validate_condition(filter, &self.columns)?;

        let mut indices = Vec::new();
        if projection.is_empty() {
            indices.extend(0..self.columns.len());
        }
        for name in projection {
            if name == "*" {
                indices.extend(0..self.columns.len());
            } else {
                indices.push(self.column_index(name)?);
            }
        }

        let columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .filter(|row| is_matched(filter, &self.columns, &row.values))
            .map(|row| indices.iter().map(|&i| row.values[i].clone()).collect())
            .collect();
        Ok(ResultSet { columns, rows })
    }

    /// Apply one ALTER TABLE action.
    ///
    /// A table rename only changes the name here; [`Database::alter_table`]
    /// re-keys the table afterwards.
    fn alter(&mut self, action: &AlterTableAction) -> Result<()> {
        match action {
            AlterTableAction::AddColumn(def) => {
                if self.columns.iter().any(|c| c.name == def.name) {
                    return Err(ServerError::DuplicateColumn(def.name.clone()));
                }
                let fill = def.default.clone().unwrap_or(Value::Null);
                for row in &mut self.rows {
                    row.values.push(fill.clone());
                }
                self.columns.push(def.clone());
            }
            AlterTableAction::DropColumn(name) => {
                let idx = self.column_index(name)?;
                if self.columns.len() == 1 {
                    return Err(ServerError::InvalidArgument(
                        "can't delete all columns with ALTER TABLE; use DROP TABLE instead".into(),
                    ));
                }
                self.columns.remove(idx);
                for row in &mut self.rows {
                    row.values.remove(idx);
                }
            }
            AlterTableAction::RenameColumn { from, to } => {
                let idx = self.column_index(from)?;
                if from != to && self.columns.iter().any(|c| &c.name == to) {
                    return Err(ServerError::DuplicateColumn(to.clone()));
                }
                self.columns[idx].name = to.clone();
            }
            AlterTableAction::RenameTable(name) => {
                self.name = name.clone();
            }
        }
        Ok(())
    }
}

/// A named collection of tables.
#[derive(Debug, Clone)]
pub struct Database {
    name: String,
    charset: Option<String>,
    tables: BTreeMap<String, Table>,
}

impl Database {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            charset: None,
            tables: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    pub fn set_charset(&mut self, charset: Option<String>) {
        self.charset = charset;
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Table names in sorted order.
    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| ServerError::CollectionNotFound(self.qualify(name)))
    }

    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        let qualified = self.qualify(name);
        self.tables
            .get_mut(name)
            .ok_or(ServerError::CollectionNotFound(qualified))
    }

    /// Add a table. Fails with [`ServerError::CollectionExists`] on a name clash.
    pub fn create_table(&mut self, table: Table) -> Result<()> {
        if self.tables.contains_key(table.name()) {
            return Err(ServerError::CollectionExists(self.qualify(table.name())));
        }
        self.tables.insert(table.name().to_string(), table);
        Ok(())
    }

    /// Remove a table. Fails with [`ServerError::Deletion`] when absent.
    pub fn drop_table(&mut self, name: &str) -> Result<Table> {
        let qualified = self.qualify(name);
        self.tables
            .remove(name)
            .ok_or_else(|| ServerError::Deletion(format!("table '{}'", qualified)))
    }

    /// Apply ALTER TABLE actions in order.
    ///
    /// Works on a copy, so a failing action leaves the table untouched.
    pub fn alter_table(&mut self, name: &str, actions: &[AlterTableAction]) -> Result<()> {
        let mut altered = self.table(name)?.clone();
        for action in actions {
            if let AlterTableAction::RenameTable(to) = action {
                // The original name is freed by the rename itself.
                if to != altered.name() && to != name && self.tables.contains_key(to) {
                    return Err(ServerError::CollectionExists(self.qualify(to)));
                }
            }
            altered.alter(action)?;
        }

        self.tables.remove(name);
        self.tables.insert(altered.name().to_string(), altered);
        Ok(())
    }

    fn qualify(&self, table: &str) -> String {
        format!("{}.{}", self.name, table)
    }
}

/// Root collection of databases.
#[derive(Debug, Default)]
pub struct Catalog {
    databases: BTreeMap<String, Database>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_database(&self, name: &str) -> bool {
        self.databases.contains_key(name)
    }

    /// Database names in sorted order.
    pub fn database_names(&self) -> Vec<String> {
        self.databases.keys().cloned().collect()
    }

    pub fn database(&self, name: &str) -> Result<&Database> {
        self.databases
            .get(name)
            .ok_or_else(|| ServerError::DatabaseNotFound(name.to_string()))
    }

    pub fn database_mut(&mut self, name: &str) -> Result<&mut Database> {
        self.databases
            .get_mut(name)
            .ok_or_else(|| ServerError::DatabaseNotFound(name.to_string()))
    }

    /// Add a database. Fails with [`ServerError::DatabaseExists`] on a name clash.
    pub fn create_database(&mut self, database: Database) -> Result<()> {
        if self.databases.contains_key(database.name()) {
            return Err(ServerError::DatabaseExists(database.name().to_string()));
        }
        self.databases.insert(database.name().to_string(), database);
        Ok(())
    }

    /// Remove a database. Fails with [`ServerError::Deletion`] when absent.
    pub fn drop_database(&mut self, name: &str) -> Result<Database> {
        self.databases
            .remove(name)
            .ok_or_else(|| ServerError::Deletion(format!("database '{}'", name)))
    }
}

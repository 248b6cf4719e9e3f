//! Statement results handed back to the codec.

use crate::sql::{ColumnDef, Value};

/// Rows returned by SELECT, paired with the schema that describes them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// Column definitions, in output order
    pub columns: Vec<ColumnDef>,
    /// Row values, each in `columns` order
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Result set with a schema and no rows.
    pub fn empty(columns: Vec<ColumnDef>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

/// Outcome of one statement: an OK packet or a result set.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Mutating or control statement
    Ok {
        /// Rows inserted, updated or deleted
        affected_rows: u64,
        /// Warning count reported to the client
        warnings: u16,
    },
    /// SELECT
    Rows(ResultSet),
}

impl QueryResult {
    /// OK with `affected_rows` and no warnings.
    pub fn ok(affected_rows: u64) -> Self {
        Self::Ok {
            affected_rows,
            warnings: 0,
        }
    }

    /// OK with nothing affected and one warning.
    pub fn warning() -> Self {
        Self::Ok {
            affected_rows: 0,
            warnings: 1,
        }
    }

    /// Affected rows for OK results, `None` for result sets.
    pub fn affected_rows(&self) -> Option<u64> {
        match self {
            Self::Ok { affected_rows, .. } => Some(*affected_rows),
            Self::Rows(_) => None,
        }
    }

    /// The result set, if this is one.
    pub fn rows(&self) -> Option<&ResultSet> {
        match self {
            Self::Rows(rs) => Some(rs),
            Self::Ok { .. } => None,
        }
    }
}

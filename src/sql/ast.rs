//! Statement tree produced by a [`StatementParser`](super::StatementParser).
//!
//! Only the shapes the executor contract consumes are modelled; anything
//! else is a parse error from the collaborator's point of view.

use std::fmt;

use super::value::{DataType, Value};

/// Column definition inside CREATE TABLE / ALTER TABLE.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Declared type
    pub data_type: DataType,
    /// Whether NULL is accepted
    pub nullable: bool,
    /// DEFAULT clause, used when an INSERT omits the column
    pub default: Option<Value>,
}

impl ColumnDef {
    /// Nullable column without a default.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            default: None,
        }
    }

    /// Mark the column NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Set the DEFAULT value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Possibly database-qualified table reference (`db.table` or `table`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    /// Explicit database qualifier
    pub database: Option<String>,
    /// Table name
    pub name: String,
}

impl TableName {
    /// Unqualified name, resolved against the connection's database.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            database: None,
            name: name.into(),
        }
    }

    /// `database.name`
    pub fn qualified(database: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.database {
            Some(db) => write!(f, "{}.{}", db, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Boolean condition tree from a WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column = literal`
    Comparison {
        /// Column on the left-hand side
        column: String,
        /// Literal on the right-hand side
        value: Value,
    },
    /// Both sides must hold
    And(Box<Condition>, Box<Condition>),
    /// At least one side must hold
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    /// `column = value`
    pub fn equals(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Comparison {
            column: column.into(),
            value: value.into(),
        }
    }

    /// `self AND other`
    pub fn and(self, other: Condition) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// `self OR other`
    pub fn or(self, other: Condition) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }
}

/// `CREATE DATABASE [IF NOT EXISTS] name [CHARACTER SET cs]`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDatabase {
    pub name: String,
    pub if_not_exists: bool,
    pub charset: Option<String>,
}

/// `ALTER DATABASE [name] CHARACTER SET cs`
#[derive(Debug, Clone, PartialEq)]
pub struct AlterDatabase {
    /// None targets the connection's current database
    pub name: Option<String>,
    pub charset: Option<String>,
}

/// `DROP DATABASE [IF EXISTS] name`
#[derive(Debug, Clone, PartialEq)]
pub struct DropDatabase {
    pub name: String,
    pub if_exists: bool,
}

/// `CREATE TABLE [IF NOT EXISTS] t (columns...)`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub table: TableName,
    pub if_not_exists: bool,
    pub columns: Vec<ColumnDef>,
}

/// One action of an ALTER TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterTableAction {
    AddColumn(ColumnDef),
    DropColumn(String),
    RenameColumn { from: String, to: String },
    RenameTable(String),
}

/// `ALTER TABLE t action[, action...]`
#[derive(Debug, Clone, PartialEq)]
pub struct AlterTable {
    pub table: TableName,
    pub actions: Vec<AlterTableAction>,
}

/// `DROP TABLE [IF EXISTS] t[, t...]`
#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    pub tables: Vec<TableName>,
    pub if_exists: bool,
}

/// `INSERT INTO t [(columns)] VALUES (...)[, (...)]`
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: TableName,
    /// Empty means "every column, in schema order"
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// `SELECT columns FROM t[, ...] [WHERE cond]`
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Empty means `*`
    pub columns: Vec<String>,
    pub from: Vec<TableName>,
    pub filter: Option<Condition>,
}

/// `column = value` inside UPDATE ... SET
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

impl Assignment {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// `UPDATE t[, t...] SET assignments [WHERE cond]`
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub tables: Vec<TableName>,
    pub assignments: Vec<Assignment>,
    pub filter: Option<Condition>,
}

/// `DELETE t[, t...] FROM ... [WHERE cond]`
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub tables: Vec<TableName>,
    pub filter: Option<Condition>,
}

/// `BEGIN` / `START TRANSACTION [READ ONLY]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Begin {
    pub read_only: bool,
}

/// `COMMIT`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Commit;

/// `ROLLBACK`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rollback;

/// `USE database`
#[derive(Debug, Clone, PartialEq)]
pub struct Use {
    pub database: String,
}

/// Parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateDatabase(CreateDatabase),
    AlterDatabase(AlterDatabase),
    DropDatabase(DropDatabase),
    CreateTable(CreateTable),
    AlterTable(AlterTable),
    DropTable(DropTable),
    Insert(Insert),
    Select(Select),
    Update(Update),
    Delete(Delete),
    Begin(Begin),
    Commit(Commit),
    Rollback(Rollback),
    Use(Use),
}

impl Statement {
    /// Short uppercase tag for logs and "not implemented" messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateDatabase(_) => "CREATE DATABASE",
            Self::AlterDatabase(_) => "ALTER DATABASE",
            Self::DropDatabase(_) => "DROP DATABASE",
            Self::CreateTable(_) => "CREATE TABLE",
            Self::AlterTable(_) => "ALTER TABLE",
            Self::DropTable(_) => "DROP TABLE",
            Self::Insert(_) => "INSERT",
            Self::Select(_) => "SELECT",
            Self::Update(_) => "UPDATE",
            Self::Delete(_) => "DELETE",
            Self::Begin(_) => "BEGIN",
            Self::Commit(_) => "COMMIT",
            Self::Rollback(_) => "ROLLBACK",
            Self::Use(_) => "USE",
        }
    }
}

//! Statement tree consumed by the executor contract.
//!
//! - [`Value`] / [`DataType`] - typed literals and column types
//! - [`Statement`] and its per-kind structs - what a parser produces
//! - [`Condition`] - WHERE clause tree evaluated by row matching
//! - [`StatementParser`] / [`ParseError`] - the parser collaborator seam

mod ast;
mod parser;
mod value;

pub use ast::{
    AlterDatabase, AlterTable, AlterTableAction, Assignment, Begin, ColumnDef, Commit, Condition,
    CreateDatabase, CreateTable, Delete, DropDatabase, DropTable, Insert, Rollback, Select,
    Statement, TableName, Update, Use,
};
pub use parser::{ParseError, StatementParser};
pub use value::{DataType, Value};

//! Record schemas
//!
//! A `Record` describes one table: its name, its non-key columns in table
//! order, and how to move values between a row and the in-memory object.
//! `Repository` is written once against this trait and instantiated per
//! entity.

use rusqlite::types::Value;

use crate::errors::Result;
use crate::row::RawRow;

/// Primary key column shared by every table
pub const ID_COLUMN: &str = "id";

/// Storage class of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
}

impl ColumnType {
    pub fn sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "TEXT",
        }
    }
}

/// Target of a foreign-key column (always the parent's `id`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
}

/// A non-key column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: ColumnType,
    pub references: Option<ForeignKey>,
}

impl Column {
    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            sql_type: ColumnType::Integer,
            references: None,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            sql_type: ColumnType::Text,
            references: None,
        }
    }

    /// Declare this column as a foreign key to `table(id)`
    pub const fn references(self, table: &'static str) -> Self {
        Self {
            references: Some(ForeignKey { table }),
            ..self
        }
    }
}

mod sealed {
    /// Id assignment stays inside this crate so a persisted id cannot be
    /// rewritten by callers.
    pub trait Keyed {
        fn assign_id(&mut self, id: Option<i64>);
    }
}

pub(crate) use sealed::Keyed;

/// Mapping between one table and one in-memory type
pub trait Record: Keyed + Sized + std::fmt::Debug {
    /// Table name
    const TABLE: &'static str;

    /// Non-key columns, in table order (the `id` column precedes them)
    const COLUMNS: &'static [Column];

    /// Primary key, `None` until first saved
    fn id(&self) -> Option<i64>;

    /// Values for `COLUMNS`, in the same order
    fn values(&self) -> Vec<Value>;

    /// Build a record from a full row (`id` first, then `COLUMNS`)
    fn from_row(row: &RawRow) -> Result<Self>;

    /// Overwrite field values from a full row, leaving the id alone
    fn refresh(&mut self, row: &RawRow) -> Result<()>;

    /// Number of values in a full row
    fn width() -> usize {
        Self::COLUMNS.len() + 1
    }

    fn has_column(name: &str) -> bool {
        name == ID_COLUMN || Self::COLUMNS.iter().any(|c| c.name == name)
    }
}

/// Records with a `name` column that can be looked up by it
pub trait NamedRecord: Record {
    const NAME_COLUMN: &'static str = "name";
}

// ===== SQL generation =====

pub(crate) fn create_table_sql<R: Record>() -> String {
    let mut defs = vec![format!("{} INTEGER PRIMARY KEY", ID_COLUMN)];
    defs.extend(
        R::COLUMNS
            .iter()
            .map(|c| format!("{} {}", c.name, c.sql_type.sql())),
    );
    defs.extend(R::COLUMNS.iter().filter_map(|c| {
        c.references.map(|fk| {
            format!(
                "FOREIGN KEY ({}) REFERENCES {}({})",
                c.name, fk.table, ID_COLUMN
            )
        })
    }));
    format!("CREATE TABLE IF NOT EXISTS {} ({})", R::TABLE, defs.join(", "))
}

pub(crate) fn drop_table_sql<R: Record>() -> String {
    format!("DROP TABLE IF EXISTS {}", R::TABLE)
}

pub(crate) fn select_sql<R: Record>() -> String {
    let mut names = vec![ID_COLUMN];
    names.extend(R::COLUMNS.iter().map(|c| c.name));
    format!("SELECT {} FROM {}", names.join(", "), R::TABLE)
}

pub(crate) fn insert_sql<R: Record>() -> String {
    let names: Vec<&str> = R::COLUMNS.iter().map(|c| c.name).collect();
    let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        R::TABLE,
        names.join(", "),
        placeholders.join(", ")
    )
}

pub(crate) fn update_sql<R: Record>() -> String {
    let assignments: Vec<String> = R::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ?{}", c.name, i + 1))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE {} = ?{}",
        R::TABLE,
        assignments.join(", "),
        ID_COLUMN,
        R::COLUMNS.len() + 1
    )
}

pub(crate) fn delete_sql<R: Record>() -> String {
    format!("DELETE FROM {} WHERE {} = ?1", R::TABLE, ID_COLUMN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Department, Employee, Review};

    #[test]
    fn test_department_ddl_has_no_foreign_key() {
        assert_eq!(
            create_table_sql::<Department>(),
            "CREATE TABLE IF NOT EXISTS departments (id INTEGER PRIMARY KEY, name TEXT, location TEXT)"
        );
    }

    #[test]
    fn test_employee_ddl_declares_foreign_key() {
        assert_eq!(
            create_table_sql::<Employee>(),
            "CREATE TABLE IF NOT EXISTS employees (id INTEGER PRIMARY KEY, name TEXT, job_title TEXT, \
             department_id INTEGER, FOREIGN KEY (department_id) REFERENCES departments(id))"
        );
    }

    #[test]
    fn test_review_statements() {
        assert_eq!(
            select_sql::<Review>(),
            "SELECT id, year, summary, employee_id FROM reviews"
        );
        assert_eq!(
            insert_sql::<Review>(),
            "INSERT INTO reviews (year, summary, employee_id) VALUES (?1, ?2, ?3)"
        );
        assert_eq!(
            update_sql::<Review>(),
            "UPDATE reviews SET year = ?1, summary = ?2, employee_id = ?3 WHERE id = ?4"
        );
        assert_eq!(delete_sql::<Review>(), "DELETE FROM reviews WHERE id = ?1");
    }

    #[test]
    fn test_has_column() {
        assert!(Review::has_column("id"));
        assert!(Review::has_column("employee_id"));
        assert!(!Review::has_column("name"));
        assert_eq!(Review::width(), 4);
    }
}

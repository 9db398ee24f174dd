//! Raw rows: ordered column values as read from a table

use rusqlite::types::{FromSql, Value, ValueRef};

use crate::errors::{column_conversion, from_rusqlite, Result};
use staffdb_core::errors::{ExError, ExErrorKind};

/// One row of column values, in table column order
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    values: Vec<Value>,
}

impl RawRow {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Copy the first `width` columns out of a driver row
    pub fn from_sql_row(row: &rusqlite::Row<'_>, width: usize) -> rusqlite::Result<Self> {
        let values = (0..width)
            .map(|i| row.get::<_, Value>(i))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Typed value at `index`
    ///
    /// # Errors
    ///
    /// Returns `Serialization` when the index is out of range or the stored
    /// value does not convert to `T`.
    pub fn get<T: FromSql>(&self, index: usize) -> Result<T> {
        let value = self.values.get(index).ok_or_else(|| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("instance_from_db")
                .with_message(format!(
                    "Column {} out of range for row of {} values",
                    index,
                    self.values.len()
                ))
        })?;
        T::column_result(ValueRef::from(value)).map_err(|e| column_conversion(index, e))
    }

    /// The leading `id` column; `None` when it is NULL
    pub fn id(&self) -> Result<Option<i64>> {
        self.get(0)
    }
}

impl From<Vec<Value>> for RawRow {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// Run `sql` and collect every row as a `RawRow` of `width` values
pub(crate) fn query_raw<P: rusqlite::Params>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: P,
    width: usize,
) -> Result<Vec<RawRow>> {
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(params, |row| RawRow::from_sql_row(row, width))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        let row = RawRow::new(vec![
            Value::Integer(1),
            Value::Integer(2023),
            Value::Text("Excellent work!".to_string()),
            Value::Null,
        ]);

        assert_eq!(row.id().unwrap(), Some(1));
        assert_eq!(row.get::<i64>(1).unwrap(), 2023);
        assert_eq!(row.get::<String>(2).unwrap(), "Excellent work!");
        assert_eq!(row.get::<Option<i64>>(3).unwrap(), None);
    }

    #[test]
    fn test_type_mismatch_is_serialization_error() {
        let row = RawRow::new(vec![Value::Text("one".to_string())]);
        let err = row.get::<i64>(0).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }

    #[test]
    fn test_out_of_range_index() {
        let row = RawRow::new(vec![Value::Integer(1)]);
        let err = row.get::<String>(5).unwrap_err();
        assert!(err.message().contains("out of range"));
    }

    #[test]
    fn test_query_raw_reads_width_columns() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, a TEXT);
             INSERT INTO t (a) VALUES ('x'), ('y');",
        )
        .unwrap();

        let rows = query_raw(&conn, "SELECT id, a FROM t ORDER BY id", [], 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get::<String>(1).unwrap(), "y");
    }
}

//! Generic repository over one `Record` type
//!
//! Every read is funnelled through `instance_from_db`, which consults the
//! identity map before building a new object.
//!
//! Mutating operations emit:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure

use std::cell::{Ref, RefMut};
use std::time::Instant;

use rusqlite::{params_from_iter, Connection, OptionalExtension, ToSql};
use staffdb_core::errors::{ExError, ExErrorKind, StaffError};
use staffdb_core::{log_op_end, log_op_error, log_op_start};

use crate::errors::{from_rusqlite, not_persisted, record_borrowed, Result};
use crate::identity::{Handle, IdentityMap};
use crate::row::{query_raw, RawRow};
use crate::schema::{self, Keyed, NamedRecord, Record, ID_COLUMN};

/// Row mapper for `R`, borrowing a connection and the session's identity map
pub struct Repository<'s, R: Record> {
    conn: &'s Connection,
    identity: &'s mut IdentityMap<R>,
}

impl<'s, R: Record> Repository<'s, R> {
    pub fn new(conn: &'s Connection, identity: &'s mut IdentityMap<R>) -> Self {
        Self { conn, identity }
    }

    pub fn identity_map(&self) -> &IdentityMap<R> {
        &*self.identity
    }

    // ===== Table lifecycle =====

    /// Create the table (and its foreign-key declarations) if absent
    pub fn create_table(&self) -> Result<()> {
        self.logged("create_table", None, || {
            self.conn
                .execute(&schema::create_table_sql::<R>(), [])
                .map_err(from_rusqlite)?;
            Ok(())
        })
    }

    /// Drop the table if present
    ///
    /// Cached instances are not touched; handles keep their ids.
    ///
    /// # Errors
    ///
    /// With foreign keys enforced, dropping a table whose rows are still
    /// referenced by another table fails with `ConstraintViolation` and the
    /// table is kept. Drop child tables first.
    pub fn drop_table(&self) -> Result<()> {
        self.logged("drop_table", None, || {
            self.conn
                .execute(&schema::drop_table_sql::<R>(), [])
                .map_err(from_rusqlite)?;
            Ok(())
        })
    }

    pub fn table_exists(&self) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [R::TABLE],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?;
        Ok(found.is_some())
    }

    // ===== Instance persistence =====

    /// Insert a new row for `handle` and register it under the new id
    ///
    /// # Errors
    ///
    /// Returns `AlreadyPersisted` if the record already has an id, `Internal`
    /// if the caller holds a borrow of it, or a storage error (such as
    /// `ConstraintViolation`) from the insert.
    pub fn save(&mut self, handle: &Handle<R>) -> Result<()> {
        let start = Instant::now();
        log_op_start!("save", table = R::TABLE);

        let id = self.save_impl(handle).map_err(|e| {
            log_op_error!(
                "save",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                table = R::TABLE
            );
            e
        })?;

        log_op_end!(
            "save",
            duration_ms = start.elapsed().as_millis() as u64,
            table = R::TABLE,
            record_id = id
        );
        Ok(())
    }

    fn save_impl(&mut self, handle: &Handle<R>) -> Result<i64> {
        let mut record = Self::write(handle, "save")?;
        if let Some(id) = record.id() {
            return Err(StaffError::AlreadyPersisted {
                table: R::TABLE.to_string(),
                id,
            }
            .into());
        }

        self.conn
            .execute(&schema::insert_sql::<R>(), params_from_iter(record.values()))
            .map_err(from_rusqlite)?;

        let id = self.conn.last_insert_rowid();
        record.assign_id(Some(id));
        drop(record);
        self.identity.insert(id, handle.clone());
        Ok(id)
    }

    /// Wrap `record` in a handle, save it, and return the handle
    pub fn create(&mut self, record: R) -> Result<Handle<R>> {
        let handle = Handle::new(record);
        self.save(&handle)?;
        Ok(handle)
    }

    /// Write the record's current field values to its row
    ///
    /// # Errors
    ///
    /// Returns `NotPersisted` if the record has never been saved or its row
    /// no longer exists, and `Internal` if the caller holds a mutable borrow.
    pub fn update(&mut self, handle: &Handle<R>) -> Result<()> {
        let id = handle.try_borrow().ok().and_then(|r| r.id());
        self.logged("update", id, || self.update_impl(handle))
    }

    fn update_impl(&self, handle: &Handle<R>) -> Result<()> {
        let record = Self::read(handle, "update")?;
        let id = record
            .id()
            .ok_or_else(|| not_persisted(R::TABLE, "update"))?;
        let mut values = record.values();
        values.push(id.into());

        let changed = self
            .conn
            .execute(&schema::update_sql::<R>(), params_from_iter(values))
            .map_err(from_rusqlite)?;
        if changed == 0 {
            return Err(not_persisted(R::TABLE, "update")
                .with_record_id(id)
                .with_message(format!("{} row {} no longer exists", R::TABLE, id)));
        }
        Ok(())
    }

    /// Remove the record's row, evict it from the identity map and clear its id
    ///
    /// Other fields keep their in-memory values. If the map caches a
    /// different instance for the same id (after `IdentityMap::clear`), that
    /// instance loses its id too.
    ///
    /// # Errors
    ///
    /// Returns `NotPersisted` if the record has never been saved, and
    /// `Internal` if the caller holds a borrow of either instance.
    pub fn delete(&mut self, handle: &Handle<R>) -> Result<()> {
        let start = Instant::now();
        log_op_start!("delete", table = R::TABLE);

        let id = self.delete_impl(handle).map_err(|e| {
            log_op_error!(
                "delete",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                table = R::TABLE
            );
            e
        })?;

        log_op_end!(
            "delete",
            duration_ms = start.elapsed().as_millis() as u64,
            table = R::TABLE,
            record_id = id
        );
        Ok(())
    }

    fn delete_impl(&mut self, handle: &Handle<R>) -> Result<i64> {
        let mut record = Self::write(handle, "delete")?;
        let id = record
            .id()
            .ok_or_else(|| not_persisted(R::TABLE, "delete"))?;

        let other = self.identity.get(id).filter(|cached| !cached.ptr_eq(handle));
        let mut other_record = other
            .as_ref()
            .map(|cached| Self::write(cached, "delete"))
            .transpose()?;

        self.conn
            .execute(&schema::delete_sql::<R>(), [id])
            .map_err(from_rusqlite)?;

        self.identity.remove(id);
        record.assign_id(None);
        if let Some(cached) = other_record.as_mut() {
            cached.assign_id(None);
        }
        Ok(id)
    }

    // ===== Retrieval =====

    /// Map a raw row to its shared instance
    ///
    /// A cached instance for the row's id is refreshed from the row and
    /// returned; otherwise a new instance is built and cached.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the row has the wrong number of values, a
    /// NULL id, or a value that does not fit its field. Returns `Internal`
    /// if the caller still holds a borrow of the cached instance.
    pub fn instance_from_db(&mut self, row: &RawRow) -> Result<Handle<R>> {
        if row.len() != R::width() {
            return Err(StaffError::RowShape {
                table: R::TABLE.to_string(),
                expected: R::width(),
                actual: row.len(),
            }
            .into());
        }

        let id = row
            .id()
            .map_err(|e| e.with_table(R::TABLE))?
            .ok_or_else(|| {
                ExError::new(ExErrorKind::Serialization)
                    .with_op("instance_from_db")
                    .with_table(R::TABLE)
                    .with_message("Row has a NULL id")
            })?;

        if let Some(cached) = self.identity.get(id) {
            Self::write(&cached, "instance_from_db")
                .map_err(|e| e.with_record_id(id))?
                .refresh(row)
                .map_err(|e| e.with_table(R::TABLE).with_record_id(id))?;
            return Ok(cached);
        }

        let record = R::from_row(row).map_err(|e| e.with_table(R::TABLE).with_record_id(id))?;
        let handle = Handle::new(record);
        self.identity.insert(id, handle.clone());
        Ok(handle)
    }

    /// Look up a row by primary key; `None` when no row matches
    pub fn find_by_id(&mut self, id: i64) -> Result<Option<Handle<R>>> {
        self.find_first_by(ID_COLUMN, id)
    }

    /// First row (in id order) whose `column` equals `value`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `column` is not part of the table.
    pub fn find_first_by<V: ToSql>(&mut self, column: &str, value: V) -> Result<Option<Handle<R>>> {
        self.check_column(column)?;
        let sql = format!(
            "{} WHERE {} = ?1 ORDER BY {} LIMIT 1",
            schema::select_sql::<R>(),
            column,
            ID_COLUMN
        );
        let rows = query_raw(self.conn, &sql, rusqlite::params![value], R::width())?;
        tracing::debug!(table = R::TABLE, column, found = !rows.is_empty(), "find_first_by");

        rows.first().map(|row| self.instance_from_db(row)).transpose()
    }

    /// Every row whose `column` equals `value`, in id order
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `column` is not part of the table.
    pub fn find_where<V: ToSql>(&mut self, column: &str, value: V) -> Result<Vec<Handle<R>>> {
        self.check_column(column)?;
        let sql = format!(
            "{} WHERE {} = ?1 ORDER BY {}",
            schema::select_sql::<R>(),
            column,
            ID_COLUMN
        );
        let rows = query_raw(self.conn, &sql, rusqlite::params![value], R::width())?;
        tracing::debug!(table = R::TABLE, column, row_count = rows.len(), "find_where");

        rows.iter().map(|row| self.instance_from_db(row)).collect()
    }

    /// Every row in the table, in id order
    pub fn get_all(&mut self) -> Result<Vec<Handle<R>>> {
        let sql = format!("{} ORDER BY {}", schema::select_sql::<R>(), ID_COLUMN);
        let rows = query_raw(self.conn, &sql, [], R::width())?;
        tracing::debug!(table = R::TABLE, row_count = rows.len(), "get_all");

        rows.iter().map(|row| self.instance_from_db(row)).collect()
    }

    // ===== Helpers =====

    fn read<'h>(handle: &'h Handle<R>, op: &str) -> Result<Ref<'h, R>> {
        handle.try_borrow().map_err(|_| record_borrowed(R::TABLE, op))
    }

    fn write<'h>(handle: &'h Handle<R>, op: &str) -> Result<RefMut<'h, R>> {
        handle
            .try_borrow_mut()
            .map_err(|_| record_borrowed(R::TABLE, op))
    }

    fn check_column(&self, column: &str) -> Result<()> {
        if R::has_column(column) {
            Ok(())
        } else {
            Err(StaffError::UnknownColumn {
                table: R::TABLE.to_string(),
                column: column.to_string(),
            }
            .into())
        }
    }

    fn logged<T>(&self, op: &str, id: Option<i64>, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let start = Instant::now();
        log_op_start!(op, table = R::TABLE, record_id = id);

        let result = f().map_err(|e| {
            log_op_error!(
                op,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                table = R::TABLE
            );
            e
        })?;

        log_op_end!(
            op,
            duration_ms = start.elapsed().as_millis() as u64,
            table = R::TABLE
        );
        Ok(result)
    }
}

impl<R: NamedRecord> Repository<'_, R> {
    /// First row (in id order) with the given name; `None` when none match
    pub fn find_by_name(&mut self, name: &str) -> Result<Option<Handle<R>>> {
        self.find_first_by(R::NAME_COLUMN, name)
    }
}

//! Session: one connection plus the identity maps scoped to it

use rusqlite::Connection;
use staffdb_core::logging_facility;
use staffdb_core::{DatabaseConfig, StaffConfig};
use std::path::Path;

use crate::db;
use crate::errors::Result;
use crate::identity::IdentityMap;
use crate::model::{Department, Employee, Review};
use crate::repo::Repository;

/// Owns the connection and one identity map per record type
///
/// Handles are `Rc`-based, so a session and everything read through it
/// stay on the thread that opened it.
pub struct Session {
    conn: Connection,
    departments: IdentityMap<Department>,
    employees: IdentityMap<Employee>,
    reviews: IdentityMap<Review>,
}

impl Session {
    /// Wrap an already configured connection
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            departments: IdentityMap::new(),
            employees: IdentityMap::new(),
            reviews: IdentityMap::new(),
        }
    }

    /// Open a database file with default settings (foreign keys on)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = db::open(path)?;
        db::configure_pragmas(&conn, DatabaseConfig::default().foreign_keys, true)?;
        Ok(Self::new(conn))
    }

    /// Open a private in-memory database with default settings
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(db::open_with_config(&DatabaseConfig::default())?))
    }

    /// Initialize logging for the configured profile and open the database
    pub fn from_config(config: &StaffConfig) -> Result<Self> {
        config.validate()?;
        logging_facility::init(config.logging.profile);
        tracing::debug!(path = %config.database.path, foreign_keys = config.database.foreign_keys, "open_session");
        Ok(Self::new(db::open_with_config(&config.database)?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn departments(&mut self) -> Repository<'_, Department> {
        Repository::new(&self.conn, &mut self.departments)
    }

    pub fn employees(&mut self) -> Repository<'_, Employee> {
        Repository::new(&self.conn, &mut self.employees)
    }

    pub fn reviews(&mut self) -> Repository<'_, Review> {
        Repository::new(&self.conn, &mut self.reviews)
    }

    /// Create all three tables, parents first
    pub fn create_tables(&mut self) -> Result<()> {
        self.departments().create_table()?;
        self.employees().create_table()?;
        self.reviews().create_table()
    }

    /// Drop all three tables, children first
    pub fn drop_tables(&mut self) -> Result<()> {
        self.reviews().drop_table()?;
        self.employees().drop_table()?;
        self.departments().drop_table()
    }

    /// Forget every cached instance
    pub fn clear_identity_maps(&mut self) {
        self.departments.clear();
        self.employees.clear();
        self.reviews.clear();
    }

    /// Release the connection
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

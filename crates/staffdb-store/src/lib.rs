//! staffdb Store - SQLite record mappers for departments, employees and reviews
//!
//! Provides:
//! - Connection management (`db`)
//! - Record schemas and the generic `Repository` that maps rows to objects
//! - Per-session identity maps so one row yields one shared instance
//! - Relationship traversal (department → employees, employee → reviews)
//!
//! ```
//! use staffdb_store::model::{Department, Employee};
//! use staffdb_store::Session;
//!
//! let mut session = Session::open_in_memory()?;
//! session.departments().create_table()?;
//! session.employees().create_table()?;
//!
//! let payroll = session
//!     .departments()
//!     .create(Department::new("Payroll", "Building A, 5th Floor"))?;
//! let dept_id = payroll.id().expect("saved");
//! session.employees().create(Employee::new("Sasha", "Manager", dept_id))?;
//!
//! let found = session.employees().find_by_name("Sasha")?.expect("row exists");
//! assert_eq!(found.borrow().department_id, dept_id);
//! # Ok::<(), staffdb_core::ExError>(())
//! ```

pub mod db;
pub mod errors;
pub mod identity;
pub mod model;
pub mod repo;
pub mod row;
pub mod schema;
pub mod session;

// Re-export key types
pub use errors::Result;
pub use identity::{Handle, IdentityMap};
pub use repo::Repository;
pub use row::RawRow;
pub use schema::{Column, ColumnType, NamedRecord, Record};
pub use session::Session;

//! staffdb Core - shared facilities for the staffdb record mappers
//!
//! This crate provides the pieces every staffdb crate leans on:
//! - Structured error facility (`ExError`, `ExErrorKind`) and the domain
//!   error enum `StaffError`
//! - Logging facility with a single init point and `log_op_*` macros
//! - Configuration loading for the database and logging profile

pub mod config;
pub mod errors;
pub mod logging_facility;

// Macros expand to `$crate::core_types::...` so callers need no extra dependency
#[doc(hidden)]
pub use staffdb_core_types as core_types;

// Re-export commonly used types
pub use config::{DatabaseConfig, LoggingConfig, StaffConfig};
pub use errors::{ExError, ExErrorKind, StaffError};

use thiserror::Error;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on without
/// parsing messages. Lookup misses are not errors: repositories return
/// `Ok(None)` for "no such record".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    InvalidConfig,

    // Record lifecycle
    /// The operation needs a stored row but the object has no id yet
    NotPersisted,
    /// The object already owns a row; saving again would duplicate it
    AlreadyPersisted,

    // Storage
    /// The storage engine rejected a statement (foreign key, unique, not null)
    ConstraintViolation,
    /// A stored value could not be mapped onto the record's field type
    Serialization,
    Persistence,

    // Internal
    /// The record is borrowed elsewhere and cannot be read or refreshed
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::NotPersisted => "ERR_NOT_PERSISTED",
            ExErrorKind::AlreadyPersisted => "ERR_ALREADY_PERSISTED",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context (operation, table,
/// record id) for programmatic handling and debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    table: Option<String>,
    record_id: Option<i64>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            table: None,
            record_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add record id context
    pub fn with_record_id(mut self, id: i64) -> Self {
        self.record_id = Some(id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the table context, if any
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Get the record id context, if any
    pub fn record_id(&self) -> Option<i64> {
        self.record_id
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(id) = self.record_id {
            write!(f, " (record_id: {})", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain failures raised by the record mappers themselves
///
/// Storage-engine failures never pass through here; they are classified
/// directly from the driver error in the store crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StaffError {
    /// Operation needs a stored row but the record has no id
    #[error("{table} record has not been saved; cannot {op}")]
    NotPersisted { table: String, op: String },

    /// Record already has an id and a row
    #[error("{table} record {id} is already saved; use update instead")]
    AlreadyPersisted { table: String, id: i64 },

    /// Column name is not part of the table schema
    #[error("Unknown column {column} on table {table}")]
    UnknownColumn { table: String, column: String },

    /// Raw row does not carry one value per table column
    #[error("Row for table {table} has {actual} values, expected {expected}")]
    RowShape {
        table: String,
        expected: usize,
        actual: usize,
    },

    /// Record is borrowed by the caller while the mapper needs it
    #[error("{table} record is borrowed; cannot {op}")]
    RecordBorrowed { table: String, op: String },

    /// Configuration value rejected during validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<StaffError> for ExError {
    fn from(err: StaffError) -> Self {
        let message = err.to_string();
        match err {
            StaffError::NotPersisted { table, op } => ExError::new(ExErrorKind::NotPersisted)
                .with_op(op)
                .with_table(table)
                .with_message(message),

            StaffError::AlreadyPersisted { table, id } => {
                ExError::new(ExErrorKind::AlreadyPersisted)
                    .with_op("save")
                    .with_table(table)
                    .with_record_id(id)
                    .with_message(message)
            }

            StaffError::UnknownColumn { table, .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_table(table)
                .with_message(message),

            StaffError::RowShape { table, .. } => ExError::new(ExErrorKind::Serialization)
                .with_op("instance_from_db")
                .with_table(table)
                .with_message(message),

            StaffError::RecordBorrowed { table, op } => ExError::new(ExErrorKind::Internal)
                .with_op(op)
                .with_table(table)
                .with_message(message),

            StaffError::InvalidConfig { .. } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_config")
                .with_message(message),
        }
    }
}

impl From<config::ConfigError> for ExError {
    fn from(err: config::ConfigError) -> Self {
        ExError::new(ExErrorKind::InvalidConfig)
            .with_op("load_config")
            .with_message(err.to_string())
    }
}

//! Error types for ndo

use thiserror::Error;

/// Result type alias for ndo operations
pub type NdoResult<T> = Result<T, NdoError>;

/// Status code carried by errors that do not set one explicitly.
pub const DEFAULT_STATUS: u16 = 500;

/// Error types for building and executing statements
#[derive(Debug, Error)]
pub enum NdoError {
    /// Missing or blank table name
    #[error("Invalid table: {0:?}")]
    InvalidTable(String),

    /// Condition tree that cannot be rendered consistently
    #[error("Validation error: {0}")]
    Validation(String),

    /// Blank SQL handed to the executor
    #[error("Empty statement: {0}")]
    EmptyStatement(&'static str),

    /// PostgreSQL driver error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// SAP HANA driver error
    #[cfg(feature = "hana")]
    #[error("HANA error: {0}")]
    Hana(#[from] hdbconnect::HdbError),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Row decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Error with an explicit HTTP-style status
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl NdoError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an error carrying an HTTP-style status code
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Rewrap this error with the given status code, keeping its message.
    pub fn with_status(self, status: u16) -> Self {
        match self {
            Self::Status { message, .. } => Self::Status { status, message },
            other => Self::Status {
                status,
                message: other.to_string(),
            },
        }
    }

    /// HTTP-style status code for this error (500 unless set explicitly).
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Status { status, .. } => *status,
            _ => DEFAULT_STATUS,
        }
    }

    /// Check if this is an invalid table error
    pub fn is_invalid_table(&self) -> bool {
        matches!(self, Self::InvalidTable(_))
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for NdoError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

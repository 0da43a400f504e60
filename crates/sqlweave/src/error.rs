//! Error types for sqlweave

use thiserror::Error;

/// Result type alias for sqlweave operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Every failure the crate can report.
///
/// Construction of expressions and statements never fails; the variants below
/// surface when a tree is serialized, when rows are hydrated, or when the
/// database driver rejects a call.
#[derive(Debug, Error)]
pub enum SqlError {
    /// A statement or expression could not be rendered.
    #[error("{clause}: {message}")]
    Serialize {
        clause: &'static str,
        message: String,
    },

    /// A cell could not be assigned to its destination field.
    #[error("hydrate error at row {row}, column '{column}', field '{field}': {message}")]
    Hydrate {
        row: usize,
        column: String,
        field: String,
        message: String,
    },

    /// The destination type or dialect is unusable as configured.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Query execution error, passed through from the driver.
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Query timeout error
    #[error("Query timeout after {0:?}")]
    Timeout(std::time::Duration),
}

impl SqlError {
    /// Create a serialization error for the named clause or node.
    pub fn serialize(clause: &'static str, message: impl Into<String>) -> Self {
        Self::Serialize {
            clause,
            message: message.into(),
        }
    }

    /// Create a hydration error carrying row/column/field coordinates.
    pub fn hydrate(
        row: usize,
        column: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Hydrate {
            row,
            column: column.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a serialization error
    pub fn is_serialize(&self) -> bool {
        matches!(self, Self::Serialize { .. })
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// SQLSTATE of the wrapped driver error, if any.
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            Self::Query(err) => err.as_db_error().map(|db| db.code().code()),
            _ => None,
        }
    }

    /// Check if the driver reported a unique constraint violation
    pub fn is_unique_violation(&self) -> bool {
        self.sqlstate() == Some("23505")
    }

    /// Check if the driver reported a foreign key violation
    pub fn is_foreign_key_violation(&self) -> bool {
        self.sqlstate() == Some("23503")
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for SqlError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn constructors_render_their_context() {
        let cases = [
            (SqlError::serialize("WHERE", "empty list"), "WHERE: empty list"),
            (SqlError::config("no columns"), "Configuration error: no columns"),
            (
                SqlError::decode("film.id", "bad bytes"),
                "Decode error on column 'film.id': bad bytes",
            ),
            (SqlError::not_found("film"), "Not found: film"),
            (SqlError::validation("bad"), "Validation error: bad"),
            (
                SqlError::Timeout(Duration::from_millis(5)),
                "Query timeout after 5ms",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
            assert_eq!(err.sqlstate(), None);
            assert!(!err.is_unique_violation());
        }
    }

    #[test]
    fn every_variant_has_a_producer() {
        // exhaustive: a new variant must name what produces it
        fn producer(err: &SqlError) -> &'static str {
            match err {
                SqlError::Serialize { .. } => "SqlError::serialize",
                SqlError::Hydrate { .. } => "SqlError::hydrate",
                SqlError::Config(_) => "SqlError::config",
                SqlError::Query(_) => "From<tokio_postgres::Error>",
                SqlError::Decode { .. } => "SqlError::decode",
                SqlError::NotFound(_) => "SqlError::not_found",
                SqlError::Validation(_) => "SqlError::validation",
                #[cfg(feature = "pool")]
                SqlError::Pool(_) => "From<deadpool_postgres::PoolError>",
                SqlError::Timeout(_) => "Executable::*_within",
            }
        }
        assert_eq!(producer(&SqlError::config("x")), "SqlError::config");
        assert!(SqlError::Timeout(Duration::ZERO).is_timeout());
    }
}

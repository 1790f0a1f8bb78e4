//! Error types for statement building and rendering.

use thiserror::Error;

/// Errors raised by a malformed column specification or statement fragment.
///
/// These are produced at build or render time, are local to the call that
/// triggered them, and are never worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// A column specification has an empty name.
    #[error("column name must not be empty")]
    EmptyColumnName,

    /// A user-defined default was requested without a value.
    #[error("column '{0}' declares a user-defined default without a value")]
    MissingDefaultValue(String),

    /// A length string could not be parsed.
    #[error("invalid column length '{0}'")]
    InvalidLength(String),

    /// A default kind string was not recognised.
    #[error("unknown default kind '{0}'")]
    UnknownDefaultKind(String),

    /// A SELECT has no source table.
    #[error("no FROM expression specified")]
    MissingSource,

    /// A statement has no target table or database name.
    #[error("no name specified")]
    MissingName,

    /// An INSERT or UPDATE has no column bindings.
    #[error("no values bound for {0}")]
    MissingValues(&'static str),

    /// An INSERT row does not match the declared columns.
    #[error("row {row} binds {found} values but {expected} columns were declared")]
    ColumnCountMismatch {
        /// Zero-based row index.
        row: usize,
        /// Number of declared columns.
        expected: usize,
        /// Number of values in the row.
        found: usize,
    },

    /// An ALTER TABLE has nothing to do.
    #[error("ALTER TABLE {0} has no alterations")]
    NoAlterations(String),

    /// The dialect cannot express the statement.
    #[error("{statement} is not supported by the {dialect} dialect")]
    Unsupported {
        /// Dialect name.
        dialect: &'static str,
        /// Statement description.
        statement: &'static str,
    },

    /// A dialect identifier was not recognised.
    #[error("unknown dialect '{0}'")]
    UnknownDialect(String),
}

/// Result type for statement building.
pub type Result<T> = std::result::Result<T, SpecError>;

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    /// A value fell outside its allowed range; `field` names the offending input.
    #[error("{message}")]
    Range { field: &'static str, message: String },

    #[error("Conflict {0}")]
    Conflict(String),

    #[error("Duplicate {0}")]
    Duplicate(String),

    #[error("ORM error")]
    OrmError(#[from] DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn range(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Range {
            field,
            message: message.into(),
        }
    }

    /// Field name for `Range` errors, `None` otherwise.
    pub fn range_field(&self) -> Option<&'static str> {
        match self {
            AppError::Range { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// True when the store rejected a write because of a unique index.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// True when the store rejected a write that referenced a missing row.
pub fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_error_exposes_field_and_message() {
        let err = AppError::range("row", "row number must be in available range");
        assert_eq!(err.range_field(), Some("row"));
        assert_eq!(err.to_string(), "row number must be in available range");
        assert_eq!(AppError::NotFound.range_field(), None);
    }

    #[test]
    fn non_sql_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&DbErr::Custom("boom".into())));
        assert!(!is_unique_violation(&DbErr::RecordNotInserted));
        assert!(!is_foreign_key_violation(&DbErr::RecordNotInserted));
    }
}

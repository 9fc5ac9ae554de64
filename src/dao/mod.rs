use std::borrow::Cow;

use crate::model::apperror::{ApplicationError, ErrorType};

pub mod contamination;
pub mod maladie;
pub mod mosquito;
pub mod traitement;

/**
 * Handles database errors and maps them to application errors.
 *
 * # Arguments
 * `error`: The database error to handle.
 *
 * # Returns
 * An `ApplicationError` corresponding to the database error.
 */
pub(crate) fn handle_database_error(error: Option<&dyn sqlx::error::DatabaseError>) -> ApplicationError {
    if let Some(db_error) = error {
        tracing::debug!("Database error: {}", db_error);
        if db_error.code() == Some(Cow::Borrowed("23505")) {
            // Unique violation
            return ApplicationError::new(ErrorType::ConstraintViolation, "Already exists".to_string());
        } else if db_error.code() == Some(Cow::Borrowed("23503")) {
            // Foreign key violation
            return ApplicationError::new(ErrorType::ConstraintViolation, "Missing parent value".to_string());
        } else if db_error.code() == Some(Cow::Borrowed("22001")) {
            // Value too long
            return ApplicationError::new(ErrorType::Validation, "Value too long".to_string());
        }
        tracing::error!("Unhandled database error: {}", db_error);
        return ApplicationError::new(ErrorType::DatabaseError, "Unhandled database error".to_string());
    }
    ApplicationError::new(ErrorType::DatabaseError, "Failed to execute database operation".to_string())
}

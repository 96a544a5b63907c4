use thiserror::Error;

/// Centralized error types for the application
///
/// Store, validation and access failures all surface as this enum. The
/// dispatcher converts every variant into a user-visible notice, so none of
/// them terminate the process.
///
/// # Example
///
/// ```no_run
/// use chanbot::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Caller-supplied input is missing required fields or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Caller is not the configured administrator
    #[error("Access denied")]
    AccessDenied,
}

impl AppError {
    /// True when the backing store could not be opened or queried.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::DatabasePool(_))
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

//! Application-wide error types using thiserror.

use relprune_common::PruneError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// The token could not fetch a profile.
    #[error("Invalid token! Please check your Discord token.")]
    InvalidToken,

    /// Configuration, transport, or cache failure.
    #[error(transparent)]
    Api(#[from] PruneError),
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::views;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Username already taken")]
    DuplicateUsername,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Wrong username or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Feedback not found")]
    FeedbackNotFound,

    #[error("Please log in first")]
    Unauthorized,

    #[error("Session error: {0}")]
    Session(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Translate constraint violations raised by an insert into `users`.
    ///
    /// The explicit uniqueness pre-check can race with a concurrent
    /// registration, so the store's own constraints have the final word.
    pub fn from_user_insert(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return if db_err.message().contains("users.email") {
                    AppError::DuplicateEmail
                } else {
                    AppError::DuplicateUsername
                };
            }
        }
        AppError::Database(err)
    }

    /// Translate a foreign key failure on `feedback.username`
    pub fn from_feedback_insert(err: sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db_err) if db_err.is_foreign_key_violation() => AppError::UserNotFound,
            _ => AppError::Database(err),
        }
    }
}

// Convert AppError to an HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // Wrong session and no session look the same from the outside
            AppError::Unauthorized => return Redirect::to("/login").into_response(),
            AppError::UserNotFound | AppError::FeedbackNotFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::DuplicateUsername
            | AppError::DuplicateEmail
            | AppError::InvalidCredentials => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Session(_)
            | AppError::Hashing(_)
            | AppError::Database(_)
            | AppError::Template(_)
            | AppError::Internal(_) => {
                tracing::error!(error = ?self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong, please try again".to_string(),
                )
            }
        };

        views::error_page(status, &message)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

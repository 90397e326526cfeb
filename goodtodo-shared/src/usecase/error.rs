use crate::auth::{JwtError, PasswordError};
use crate::repository::RepositoryError;

/// Failures an interactor can report
///
/// The named variants are expected outcomes the HTTP layer maps to fixed
/// status codes; the wrapped ones are infrastructure failures.
#[derive(Debug, thiserror::Error)]
pub enum UseCaseError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email not verified")]
    EmailNotVerified,

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("user not found")]
    UserNotFound,

    #[error("todo not found")]
    TodoNotFound,

    #[error("not todo owner")]
    NotTodoOwner,

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] JwtError),
}

pub type UseCaseResult<T> = Result<T, UseCaseError>;

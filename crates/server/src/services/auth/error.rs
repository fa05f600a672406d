//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::google::VerifierError;
use crate::services::token::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] bigear_core::EmailError),

    /// Display name missing or empty.
    #[error("name is required")]
    NameRequired,

    /// Password too short.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Invalid credentials. Deliberately covers both "no such user" and
    /// "wrong password" so login never reveals whether an account exists.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The supplied current password does not match the stored hash.
    #[error("current password is incorrect")]
    CurrentPasswordMismatch,

    /// The verified token email does not match the email the client claimed.
    #[error("token email does not match request email")]
    EmailMismatch,

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// The authenticated identity no longer resolves to a user.
    #[error("user not found")]
    UserNotFound,

    /// Identity token verification failed or the provider was unreachable.
    #[error(transparent)]
    Verifier(#[from] VerifierError),

    /// Bearer credential could not be minted.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

//! User repository for database operations.

use bigear_core::{Email, UserId};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{RepositoryError, map_unique_violation};
use crate::models::User;

/// Row used only by the credential-verification paths.
#[derive(sqlx::FromRow)]
struct UserWithHashRow {
    id: UserId,
    email: Email,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserWithHashRow {
    fn split(self) -> (User, String) {
        (
            User {
                id: self.id,
                email: self.email,
                name: self.name,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            self.password_hash,
        )
    }
}

/// Repository for user database operations.
///
/// The public [`User`] model never carries the password hash; the
/// credential paths fetch it explicitly via [`Self::get_password_hash`].
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user together with their stored password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(
            "SELECT id, email, name, password_hash, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(UserWithHashRow::split))
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING id, email, name, created_at, updated_at",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "email already exists"))?;

        Ok(user)
    }

    /// Update a user's display name. The email never changes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_name(&self, id: UserId, name: &str) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET name = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING id, email, name, created_at, updated_at",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(user)
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

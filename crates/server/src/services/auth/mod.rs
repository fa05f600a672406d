//! Authentication service.
//!
//! Orchestrates login, registration, Google sign-in, profile updates, and
//! password changes. All operations take the caller's identity explicitly
//! (resolved once at the request boundary); nothing here reads ambient
//! authentication state.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use bigear_core::Email;
use sqlx::PgPool;

use crate::db::{RepositoryError, UserRepository};
use crate::models::User;
use crate::services::google::IdentityVerifier;
use crate::services::token::TokenIssuer;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenIssuer,
    verifier: &'a dyn IdentityVerifier,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        tokens: &'a TokenIssuer,
        verifier: &'a dyn IdentityVerifier,
    ) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
            verifier,
        }
    }

    /// Login with email and password; returns the user and a fresh bearer
    /// credential bound to their email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for a malformed email and
    /// `AuthError::InvalidCredentials` when the account does not exist or
    /// the password does not verify - the two cases are indistinguishable
    /// to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !password_matches(password, &password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.email)?;
        Ok((user, token))
    }

    /// Register a new account with a local password.
    ///
    /// This is the only path that creates a user with a password the owner
    /// actually knows.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NameRequired`, `AuthError::InvalidEmail`, or
    /// `AuthError::WeakPassword` for invalid input, and
    /// `AuthError::UserAlreadyExists` when the normalized email is taken.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        let name = validate_name(name)?;
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password.as_bytes())?;

        // The unique index on users.email is the arbiter under concurrency;
        // no pre-check needed.
        let user = self
            .users
            .create(name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let token = self.tokens.issue(&user.email)?;
        Ok((user, token))
    }

    /// Sign in with a Google ID token.
    ///
    /// The token is verified against the configured audience set, and the
    /// verified email must equal the email the client claimed (guards against
    /// token substitution). First sign-in provisions an account with a random
    /// placeholder password hash that is never issued to anyone, so federated
    /// accounts can never log in through the local password path.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Verifier` when token verification fails and
    /// `AuthError::EmailMismatch` when the verified and claimed emails differ.
    pub async fn google_sign_in(
        &self,
        id_token: &str,
        claimed_email: &str,
    ) -> Result<(User, String), AuthError> {
        let identity = self.verifier.verify(id_token).await?;
        let claimed = Email::parse(claimed_email)?;

        if identity.email != claimed {
            return Err(AuthError::EmailMismatch);
        }

        let user = match self.users.get_by_email(&identity.email).await? {
            Some(existing) => existing,
            None => {
                let placeholder = random_placeholder_hash()?;
                match self
                    .users
                    .create(&identity.name, &identity.email, &placeholder)
                    .await
                {
                    Ok(created) => created,
                    // Lost a first-sign-in race; the account now exists.
                    Err(RepositoryError::Conflict(_)) => self
                        .users
                        .get_by_email(&identity.email)
                        .await?
                        .ok_or(AuthError::UserNotFound)?,
                    Err(other) => return Err(AuthError::Repository(other)),
                }
            }
        };

        let token = self.tokens.issue(&user.email)?;
        Ok((user, token))
    }

    /// Update the caller's display name. The email never changes.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NameRequired` when the new name is empty.
    pub async fn update_profile(&self, user: &User, new_name: &str) -> Result<User, AuthError> {
        let new_name = validate_name(new_name)?;

        let updated = self
            .users
            .update_name(user.id, new_name)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        Ok(updated)
    }

    /// Replace the caller's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::CurrentPasswordMismatch` when the current password
    /// does not verify (the stored hash is left untouched) and
    /// `AuthError::WeakPassword` when the new password is too short.
    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let (_, stored_hash) = self
            .users
            .get_password_hash(&user.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !password_matches(current_password, &stored_hash) {
            return Err(AuthError::CurrentPasswordMismatch);
        }

        validate_password(new_password)?;

        let new_hash = hash_password(new_password.as_bytes())?;
        self.users
            .update_password_hash(user.id, &new_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        Ok(())
    }
}

/// Validate a display name: non-blank after trimming.
fn validate_name(name: &str) -> Result<&str, AuthError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthError::NameRequired);
    }

    Ok(name)
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password (or placeholder secret) using Argon2id.
fn hash_password(password: &[u8]) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password, &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn password_matches(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Hash of a random secret for accounts provisioned by federated sign-in.
///
/// The plaintext is discarded immediately, so no local login can ever match.
fn random_placeholder_hash() -> Result<String, AuthError> {
    let noise: [u8; 32] = rand::random();
    hash_password(&noise)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify_roundtrip() {
        let hash = hash_password(b"hunter42").unwrap();
        assert!(password_matches("hunter42", &hash));
        assert!(!password_matches("hunter43", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password(b"hunter42").unwrap();
        let b = hash_password(b"hunter42").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_password_matches_rejects_garbage_hash() {
        assert!(!password_matches("hunter42", "not-a-phc-string"));
    }

    #[test]
    fn test_validate_name_rejects_blank() {
        assert!(matches!(validate_name(""), Err(AuthError::NameRequired)));
        assert!(matches!(
            validate_name("   \t"),
            Err(AuthError::NameRequired)
        ));
    }

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("  Jane  ").unwrap(), "Jane");
    }

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(
            validate_password("12345"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_placeholder_hash_never_matches_known_inputs() {
        let hash = random_placeholder_hash().unwrap();
        assert!(!password_matches("", &hash));
        assert!(!password_matches("password", &hash));
    }
}

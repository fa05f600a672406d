//! Bearer credential issuance and verification.
//!
//! Credentials are stateless HS256 JWTs binding a subject email to an expiry.
//! Nothing is persisted server-side: validity is signature plus expiry, so a
//! token survives server restarts and cannot be revoked before it expires.

use bigear_core::Email;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from token verification or issuance.
///
/// `Expired` and `Invalid` are distinguished for diagnostics; both surface to
/// the caller as the same 401.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token's expiry has passed.
    #[error("token expired")]
    Expired,

    /// Malformed token, bad signature, or unparseable subject.
    #[error("token invalid")]
    Invalid,

    /// Signing failed (should not happen with a valid key).
    #[error("token signing failed")]
    Signing,
}

/// Claims carried by a bearer credential.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the user's normalized email.
    sub: String,
    /// Issued-at, seconds since epoch.
    iat: i64,
    /// Expiry, seconds since epoch.
    exp: i64,
}

/// Mints and verifies bearer credentials.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: Duration,
}

impl TokenIssuer {
    /// Create an issuer from the configured signing secret and lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, expiry_hours: i64) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret_bytes),
            decoding: DecodingKey::from_secret(secret_bytes),
            expiry: Duration::hours(expiry_hours),
        }
    }

    /// Issue a signed, time-bounded credential for the given subject.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, subject: &Email) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.as_str().to_owned(),
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    /// Verify a credential and return its subject email.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` if the expiry has passed, and
    /// `TokenError::Invalid` for any other failure (bad signature, malformed
    /// token, unparseable subject).
    pub fn verify(&self, token: &str) -> Result<Email, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            },
        )?;

        Email::parse(&data.claims.sub).map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_secret() -> SecretString {
        SecretString::from("fJ8#mQ2!xT5@kW9$rN4%bH7&vL0^cD3*")
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let issuer = TokenIssuer::new(&test_secret(), 24);
        let email = Email::parse("Jane@Example.com").unwrap();

        let token = issuer.issue(&email).unwrap();
        let subject = issuer.verify(&token).unwrap();

        // Subject is the normalized email
        assert_eq!(subject.as_str(), "jane@example.com");
    }

    #[test]
    fn test_expired_token_is_distinguished() {
        // Negative lifetime: issued already expired (well past the default
        // validation leeway)
        let issuer = TokenIssuer::new(&test_secret(), -2);
        let email = Email::parse("jane@example.com").unwrap();

        let token = issuer.issue(&email).unwrap();
        assert!(matches!(issuer.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let issuer = TokenIssuer::new(&test_secret(), 24);
        assert!(matches!(
            issuer.verify("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let issuer = TokenIssuer::new(&test_secret(), 24);
        let other = TokenIssuer::new(
            &SecretString::from("zY6!pK1@wM8#qF3$tV7%nB2&hJ5^xC0*"),
            24,
        );
        let email = Email::parse("jane@example.com").unwrap();

        let token = issuer.issue(&email).unwrap();
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }
}

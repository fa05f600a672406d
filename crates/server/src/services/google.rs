//! Federated identity verification against Google.
//!
//! A Google ID token is accepted when its signature checks out against
//! Google's published JWKS, it has not expired, its issuer is Google, and its
//! audience matches ANY of the configured client IDs (web and, when distinct,
//! Android).

use async_trait::async_trait;
use bigear_core::Email;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

/// Google's JWKS endpoint for ID token signing keys.
const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Issuer values Google uses in ID tokens.
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Errors from identity token verification.
#[derive(Debug, Error)]
pub enum VerifierError {
    /// The token failed verification (signature, expiry, issuer, audience,
    /// or claim shape). Surfaces to the caller as 401.
    #[error("identity token rejected: {0}")]
    Rejected(String),

    /// The provider's signing keys could not be fetched. Surfaces as 500.
    #[error("identity provider unavailable: {0}")]
    KeyFetch(#[from] reqwest::Error),
}

/// The identity attested by a verified token.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// Verified email address.
    pub email: Email,
    /// Display name from the token (falls back to the email's local part).
    pub name: String,
}

/// Validates a third-party identity token and extracts the attested identity.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify `token` and return the identity it attests.
    ///
    /// # Errors
    ///
    /// Returns `VerifierError::Rejected` for any verification failure and
    /// `VerifierError::KeyFetch` if the provider's keys are unreachable.
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifierError>;
}

/// Claims of a Google ID token that this backend cares about.
#[derive(Debug, Deserialize)]
struct GoogleClaims {
    iss: String,
    aud: String,
    email: String,
    name: Option<String>,
}

/// A single JSON Web Key as published by Google.
#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

/// Production [`IdentityVerifier`] backed by Google's JWKS endpoint.
pub struct GoogleTokenVerifier {
    client: reqwest::Client,
    audiences: Vec<String>,
    certs_url: String,
}

impl GoogleTokenVerifier {
    /// Create a verifier accepting the given audience set.
    ///
    /// The set must contain at least the web client ID; see
    /// [`crate::config::GoogleAuthConfig::audiences`].
    #[must_use]
    pub fn new(audiences: Vec<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            audiences,
            certs_url: GOOGLE_CERTS_URL.to_owned(),
        }
    }

    async fn fetch_keys(&self) -> Result<Jwks, VerifierError> {
        let jwks = self
            .client
            .get(&self.certs_url)
            .send()
            .await?
            .error_for_status()?
            .json::<Jwks>()
            .await?;

        Ok(jwks)
    }
}

#[async_trait]
impl IdentityVerifier for GoogleTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifierError> {
        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| VerifierError::Rejected(format!("bad header: {e}")))?;
        let kid = header
            .kid
            .ok_or_else(|| VerifierError::Rejected("missing key id".to_owned()))?;

        let jwks = self.fetch_keys().await?;
        let jwk = jwks
            .keys
            .iter()
            .find(|k| k.kid == kid)
            .ok_or_else(|| VerifierError::Rejected(format!("unknown key id {kid}")))?;

        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| VerifierError::Rejected(format!("bad signing key: {e}")))?;

        // Signature and expiry are checked here; issuer and audience are
        // checked separately so the claim rules stay unit-testable.
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_aud = false;

        let data = jsonwebtoken::decode::<GoogleClaims>(token, &key, &validation)
            .map_err(|e| VerifierError::Rejected(format!("verification failed: {e}")))?;

        validate_claims(&data.claims, &self.audiences)?;

        identity_from_claims(&data.claims)
    }
}

/// Check issuer and audience rules on already signature-verified claims.
fn validate_claims(claims: &GoogleClaims, audiences: &[String]) -> Result<(), VerifierError> {
    if !GOOGLE_ISSUERS.contains(&claims.iss.as_str()) {
        return Err(VerifierError::Rejected(format!(
            "unexpected issuer {}",
            claims.iss
        )));
    }

    // The token is acceptable if its audience matches ANY configured client
    if !audiences.iter().any(|a| a == &claims.aud) {
        return Err(VerifierError::Rejected(format!(
            "audience {} not accepted",
            claims.aud
        )));
    }

    Ok(())
}

/// Build the attested identity from verified claims.
fn identity_from_claims(claims: &GoogleClaims) -> Result<VerifiedIdentity, VerifierError> {
    let email = Email::parse(&claims.email)
        .map_err(|e| VerifierError::Rejected(format!("bad email claim: {e}")))?;

    let name = claims.name.clone().unwrap_or_else(|| {
        claims
            .email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_owned()
    });

    Ok(VerifiedIdentity { email, name })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn claims(iss: &str, aud: &str) -> GoogleClaims {
        GoogleClaims {
            iss: iss.to_owned(),
            aud: aud.to_owned(),
            email: "jane@example.com".to_owned(),
            name: Some("Jane".to_owned()),
        }
    }

    fn audiences() -> Vec<String> {
        vec!["web-client".to_owned(), "android-client".to_owned()]
    }

    #[test]
    fn test_accepts_any_configured_audience() {
        assert!(validate_claims(&claims("accounts.google.com", "web-client"), &audiences()).is_ok());
        assert!(
            validate_claims(
                &claims("https://accounts.google.com", "android-client"),
                &audiences()
            )
            .is_ok()
        );
    }

    #[test]
    fn test_rejects_unknown_audience() {
        let result = validate_claims(&claims("accounts.google.com", "someone-else"), &audiences());
        assert!(matches!(result, Err(VerifierError::Rejected(_))));
    }

    #[test]
    fn test_rejects_unknown_issuer() {
        let result = validate_claims(&claims("evil.example.com", "web-client"), &audiences());
        assert!(matches!(result, Err(VerifierError::Rejected(_))));
    }

    #[test]
    fn test_identity_normalizes_email_and_keeps_name() {
        let mut c = claims("accounts.google.com", "web-client");
        c.email = "Jane@Example.COM".to_owned();

        let identity = identity_from_claims(&c).unwrap();
        assert_eq!(identity.email.as_str(), "jane@example.com");
        assert_eq!(identity.name, "Jane");
    }

    #[test]
    fn test_identity_falls_back_to_local_part() {
        let mut c = claims("accounts.google.com", "web-client");
        c.name = None;

        let identity = identity_from_claims(&c).unwrap();
        assert_eq!(identity.name, "jane");
    }

    #[test]
    fn test_rejects_bad_email_claim() {
        let mut c = claims("accounts.google.com", "web-client");
        c.email = "not-an-email".to_owned();

        assert!(matches!(
            identity_from_claims(&c),
            Err(VerifierError::Rejected(_))
        ));
    }
}

//! Business logic services.

pub mod auth;
pub mod google;
pub mod reviews;
pub mod token;

pub use auth::{AuthError, AuthService};
pub use google::{GoogleTokenVerifier, IdentityVerifier, VerifiedIdentity, VerifierError};
pub use reviews::{ReviewError, ReviewService};
pub use token::{TokenError, TokenIssuer};

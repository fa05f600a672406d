//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::services::{IdentityVerifier, TokenIssuer};

/// Shared application state, cheap to clone per request.
///
/// Holds only what handlers need at request time; configuration is consumed
/// at startup to build these pieces and is not carried along.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    pool: PgPool,
    tokens: TokenIssuer,
    verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    /// Assemble the application state.
    #[must_use]
    pub fn new(pool: PgPool, tokens: TokenIssuer, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            inner: Arc::new(Inner {
                pool,
                tokens,
                verifier,
            }),
        }
    }

    /// Database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Bearer credential issuer.
    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.inner.tokens
    }

    /// Federated identity verifier.
    #[must_use]
    pub fn verifier(&self) -> &dyn IdentityVerifier {
        self.inner.verifier.as_ref()
    }
}

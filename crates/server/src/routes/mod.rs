//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (pings the database)
//!
//! # Auth
//! POST /api/auth/login                  - Email/password login
//! POST /api/auth/register               - Create an account (201)
//! POST /api/auth/google-signin          - Google ID token sign-in
//! GET  /api/auth/me                     - Current user (requires auth)
//! PUT  /api/auth/profile                - Update display name (requires auth)
//! PUT  /api/auth/change-password        - Change password (requires auth)
//!
//! # Items
//! GET  /api/items                       - Catalog listing, reviews nested
//! GET  /api/items/{id}                  - Item detail with its reviews
//!
//! # Reviews
//! POST   /api/reviews                   - Create a review (201, requires auth)
//! GET    /api/reviews                   - All reviews
//! PUT    /api/reviews/{id}              - Update own review (requires auth)
//! DELETE /api/reviews/{id}              - Delete own review (204, requires auth)
//! GET    /api/reviews/{id}              - Single review
//! GET    /api/reviews/springbeditem/{itemId} - Reviews for an item
//! GET    /api/reviews/user/my-reviews   - Caller's reviews (requires auth)
//! ```

pub mod auth;
pub mod items;
pub mod reviews;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth API router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/google-signin", post(auth::google_sign_in))
        .route("/me", get(auth::me))
        .route("/profile", put(auth::update_profile))
        .route("/change-password", put(auth::change_password))
}

/// Create the item API router.
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list))
        .route("/{id}", get(items::get))
}

/// Create the review API router.
///
/// The literal segments (`springbeditem`, `user/my-reviews`) take priority
/// over the `{id}` capture, so a path like `/user/my-reviews` never reaches
/// the by-id handler.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(reviews::create).get(reviews::list_all))
        .route("/springbeditem/{item_id}", get(reviews::list_for_item))
        .route("/user/my-reviews", get(reviews::my_reviews))
        .route(
            "/{id}",
            get(reviews::get)
                .put(reviews::update)
                .delete(reviews::delete),
        )
}

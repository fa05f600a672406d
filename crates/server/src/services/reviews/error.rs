//! Review service error types.

use bigear_core::{ItemId, ReviewId};
use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Rating outside [1.0, 5.0].
    #[error(transparent)]
    InvalidRating(#[from] bigear_core::RatingError),

    /// The referenced item does not exist.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// The referenced review does not exist.
    #[error("review not found: {0}")]
    ReviewNotFound(ReviewId),

    /// The user already has a review for this item; use update instead.
    #[error("user has already reviewed this item")]
    AlreadyReviewed,

    /// The caller is authenticated but does not own the review.
    #[error("not the owner of this review")]
    NotOwner,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

//! Review service: the aggregation engine behind `Item.average_rating`.
//!
//! Invariant: an item's cached `average_rating` always equals the mean of its
//! current reviews' ratings rounded to one decimal (0.0 with no reviews).
//!
//! Every mutation runs in a single transaction that
//! 1. takes a `FOR UPDATE` row lock on the parent item,
//! 2. applies the review change,
//! 3. re-reads the item's full rating set,
//! 4. recomputes the average from scratch and writes the item row.
//!
//! The row lock serializes concurrent mutations per item, so a recompute can
//! never run against a review set another in-flight transaction is changing.
//! The average is always recomputed from the full set - never patched
//! incrementally - which rules out floating-point drift. Readers outside the
//! transaction see either none or all of (review change + aggregate update).

mod error;

pub use error::ReviewError;

use bigear_core::{ItemId, Rating, ReviewId, UserId};
use sqlx::PgPool;

use crate::db::{ItemRepository, RepositoryError, ReviewRepository};
use crate::models::{Review, ReviewView};

/// Review service.
pub struct ReviewService<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewService<'a> {
    /// Create a new review service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a review and update the item's cached average, atomically.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::InvalidRating` for an out-of-range rating,
    /// `ReviewError::ItemNotFound` for an unknown item, and
    /// `ReviewError::AlreadyReviewed` when the caller already has a review
    /// for this item (including when a concurrent create wins the race).
    pub async fn create(
        &self,
        item_id: ItemId,
        requester: UserId,
        rating: f64,
        comment: Option<&str>,
    ) -> Result<ReviewView, ReviewError> {
        // Validate before touching the store
        let rating = Rating::new(rating)?;
        let comment = comment.map_or("", str::trim);

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        if !ItemRepository::lock_for_update(&mut tx, item_id).await? {
            return Err(ReviewError::ItemNotFound(item_id));
        }

        // Friendly early conflict; the unique index backstops the race
        if ReviewRepository::exists_for_item_and_user(&mut tx, item_id, requester).await? {
            return Err(ReviewError::AlreadyReviewed);
        }

        let review = ReviewRepository::insert(&mut tx, item_id, requester, rating, comment)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ReviewError::AlreadyReviewed,
                other => ReviewError::Repository(other),
            })?;

        Self::recompute_average(&mut tx, item_id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(review_id = %review.id, item_id = %item_id, "review created");
        self.view_of(review.id).await
    }

    /// Update a review the caller owns; absent fields stay unchanged. The
    /// item average is recomputed in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::ReviewNotFound` for an unknown review,
    /// `ReviewError::NotOwner` when the caller does not own it, and
    /// `ReviewError::InvalidRating` for an out-of-range new rating.
    pub async fn update(
        &self,
        review_id: ReviewId,
        requester: UserId,
        new_rating: Option<f64>,
        new_comment: Option<&str>,
    ) -> Result<ReviewView, ReviewError> {
        let new_rating = new_rating.map(Rating::new).transpose()?;
        let new_comment = new_comment.map(str::trim);

        let existing = self.owned_review(review_id, requester).await?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        if !ItemRepository::lock_for_update(&mut tx, existing.item_id).await? {
            return Err(ReviewError::ReviewNotFound(review_id));
        }

        let review = ReviewRepository::update(&mut tx, review_id, new_rating, new_comment)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ReviewError::ReviewNotFound(review_id),
                other => ReviewError::Repository(other),
            })?;

        Self::recompute_average(&mut tx, review.item_id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(review_id = %review_id, item_id = %review.item_id, "review updated");
        self.view_of(review_id).await
    }

    /// Delete a review the caller owns and recompute the item average (0.0 if
    /// no reviews remain), atomically.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::ReviewNotFound` for an unknown review and
    /// `ReviewError::NotOwner` when the caller does not own it.
    pub async fn delete(&self, review_id: ReviewId, requester: UserId) -> Result<(), ReviewError> {
        let existing = self.owned_review(review_id, requester).await?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        if !ItemRepository::lock_for_update(&mut tx, existing.item_id).await? {
            return Err(ReviewError::ReviewNotFound(review_id));
        }

        ReviewRepository::delete(&mut tx, review_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ReviewError::ReviewNotFound(review_id),
                other => ReviewError::Repository(other),
            })?;

        Self::recompute_average(&mut tx, existing.item_id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(review_id = %review_id, item_id = %existing.item_id, "review deleted");
        Ok(())
    }

    /// Get a review by ID, joined with item and author names.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Repository` if the query fails.
    pub async fn get_by_id(&self, review_id: ReviewId) -> Result<Option<ReviewView>, ReviewError> {
        let view = ReviewRepository::new(self.pool)
            .get_view_by_id(review_id)
            .await?;
        Ok(view)
    }

    /// List all reviews for an item. An unknown item yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Repository` if the query fails.
    pub async fn list_by_item(&self, item_id: ItemId) -> Result<Vec<ReviewView>, ReviewError> {
        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;
        let views = ReviewRepository::list_views_by_item(&mut conn, item_id).await?;
        Ok(views)
    }

    /// List every review in the store.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Repository` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<ReviewView>, ReviewError> {
        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;
        let views = ReviewRepository::list_views_all(&mut conn).await?;
        Ok(views)
    }

    /// List all reviews written by a user.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Repository` if the query fails.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<ReviewView>, ReviewError> {
        let views = ReviewRepository::new(self.pool)
            .list_views_by_user(user_id)
            .await?;
        Ok(views)
    }

    /// Fetch a review and check the caller owns it.
    async fn owned_review(
        &self,
        review_id: ReviewId,
        requester: UserId,
    ) -> Result<Review, ReviewError> {
        let review = ReviewRepository::new(self.pool)
            .get_by_id(review_id)
            .await?
            .ok_or(ReviewError::ReviewNotFound(review_id))?;

        if review.user_id != requester {
            return Err(ReviewError::NotOwner);
        }

        Ok(review)
    }

    /// Recompute and persist an item's average inside the open transaction.
    ///
    /// Reads the full rating set as visible to this transaction (which holds
    /// the item row lock), so the just-applied mutation is always included.
    async fn recompute_average(
        tx: &mut sqlx::PgTransaction<'_>,
        item_id: ItemId,
    ) -> Result<(), ReviewError> {
        let ratings = ReviewRepository::ratings_for_item(tx, item_id).await?;
        let average = average_of(&ratings);
        ItemRepository::set_average_rating(tx, item_id, average).await?;
        Ok(())
    }

    async fn view_of(&self, review_id: ReviewId) -> Result<ReviewView, ReviewError> {
        ReviewRepository::new(self.pool)
            .get_view_by_id(review_id)
            .await?
            .ok_or(ReviewError::ReviewNotFound(review_id))
    }
}

/// Mean of the ratings rounded to one decimal (half-up); 0.0 for an empty set.
///
/// This is the single definition of the cached average. It is always applied
/// to the full current rating set, never adjusted incrementally.
#[must_use]
pub fn average_of(ratings: &[f64]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)] // Review counts stay far below 2^52
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;

    // f64::round is half-away-from-zero, i.e. half-up on this positive domain
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_empty_is_zero() {
        assert_eq!(average_of(&[]), 0.0);
    }

    #[test]
    fn test_average_of_single() {
        assert_eq!(average_of(&[4.0]), 4.0);
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        // [5, 4, 3] -> 4.0
        assert_eq!(average_of(&[5.0, 4.0, 3.0]), 4.0);
        // remove the 3 -> 4.5
        assert_eq!(average_of(&[5.0, 4.0]), 4.5);
        // 10/3 = 3.333... -> 3.3
        assert_eq!(average_of(&[5.0, 4.0, 1.0]), 3.3);
        // 11/3 = 3.666... -> 3.7
        assert_eq!(average_of(&[5.0, 5.0, 1.0]), 3.7);
    }

    #[test]
    fn test_average_rounds_half_up() {
        // 1.25 -> 1.3, 1.35 -> 1.4 (exactly representable halves)
        assert_eq!(average_of(&[1.0, 1.5]), 1.3);
        assert_eq!(average_of(&[1.2, 1.5]), 1.4);
    }

    #[test]
    fn test_average_full_recompute_matches_sequence() {
        // The documented create/delete sequence from the aggregate contract
        let mut ratings = vec![5.0, 4.0, 3.0];
        assert_eq!(average_of(&ratings), 4.0);

        ratings.retain(|r| (*r - 3.0).abs() > f64::EPSILON);
        assert_eq!(average_of(&ratings), 4.5);

        ratings.clear();
        assert_eq!(average_of(&ratings), 0.0);
    }
}

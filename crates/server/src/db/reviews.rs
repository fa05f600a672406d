//! Review repository for database operations.
//!
//! Single-row reads take the pool. Mutations, and the list reads that get
//! paired with item reads, take an open connection so callers can run them
//! inside one transaction: the item-average recompute next to its mutation,
//! and the catalog's nested review lists against the same snapshot as the
//! cached averages.

use bigear_core::{ItemId, Rating, ReviewId, UserId};
use sqlx::{PgConnection, PgPool};

use super::{RepositoryError, map_unique_violation};
use crate::models::{Review, ReviewView};

const REVIEW_VIEW_SELECT: &str = "SELECT r.id, r.item_id, i.name AS item_name, \
            r.user_id, u.name AS user_name, \
            r.rating, r.comment, r.created_at, r.updated_at \
     FROM reviews r \
     JOIN items i ON i.id = r.item_id \
     JOIN users u ON u.id = r.user_id";

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a review row by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ReviewId) -> Result<Option<Review>, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(
            "SELECT id, item_id, user_id, rating, comment, created_at, updated_at \
             FROM reviews WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(review)
    }

    /// Get a review joined with item and author names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_view_by_id(
        &self,
        id: ReviewId,
    ) -> Result<Option<ReviewView>, RepositoryError> {
        let view =
            sqlx::query_as::<_, ReviewView>(&format!("{REVIEW_VIEW_SELECT} WHERE r.id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(view)
    }

    /// List all reviews for an item, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_views_by_item(
        conn: &mut PgConnection,
        item_id: ItemId,
    ) -> Result<Vec<ReviewView>, RepositoryError> {
        let views = sqlx::query_as::<_, ReviewView>(&format!(
            "{REVIEW_VIEW_SELECT} WHERE r.item_id = $1 ORDER BY r.created_at DESC"
        ))
        .bind(item_id)
        .fetch_all(conn)
        .await?;

        Ok(views)
    }

    /// List every review in the store, grouped by item then newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_views_all(
        conn: &mut PgConnection,
    ) -> Result<Vec<ReviewView>, RepositoryError> {
        let views = sqlx::query_as::<_, ReviewView>(&format!(
            "{REVIEW_VIEW_SELECT} ORDER BY r.item_id, r.created_at DESC"
        ))
        .fetch_all(conn)
        .await?;

        Ok(views)
    }

    /// List all reviews written by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_views_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ReviewView>, RepositoryError> {
        let views = sqlx::query_as::<_, ReviewView>(&format!(
            "{REVIEW_VIEW_SELECT} WHERE r.user_id = $1 ORDER BY r.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(views)
    }

    /// Check (inside an open transaction) whether a user already reviewed an
    /// item. This only exists to report a friendly conflict early; the unique
    /// index on (item_id, user_id) is the real arbiter under concurrency.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists_for_item_and_user(
        conn: &mut PgConnection,
        item_id: ItemId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM reviews WHERE item_id = $1 AND user_id = $2)",
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_one(conn)
        .await?;

        Ok(exists)
    }

    /// Insert a review inside an open transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the (item, user) pair already
    /// has a review. Returns `RepositoryError::Database` for other errors.
    pub async fn insert(
        conn: &mut PgConnection,
        item_id: ItemId,
        user_id: UserId,
        rating: Rating,
        comment: &str,
    ) -> Result<Review, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (item_id, user_id, rating, comment) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, item_id, user_id, rating, comment, created_at, updated_at",
        )
        .bind(item_id)
        .bind(user_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(conn)
        .await
        .map_err(|e| map_unique_violation(e, "user has already reviewed this item"))?;

        Ok(review)
    }

    /// Update a review inside an open transaction.
    ///
    /// `None` leaves the corresponding field unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review no longer exists.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        conn: &mut PgConnection,
        id: ReviewId,
        rating: Option<Rating>,
        comment: Option<&str>,
    ) -> Result<Review, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(
            "UPDATE reviews \
             SET rating = COALESCE($2, rating), \
                 comment = COALESCE($3, comment), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING id, item_id, user_id, rating, comment, created_at, updated_at",
        )
        .bind(id)
        .bind(rating)
        .bind(comment)
        .fetch_optional(conn)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(review)
    }

    /// Delete a review inside an open transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review no longer exists.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(conn: &mut PgConnection, id: ReviewId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Read the full rating set of an item inside an open transaction.
    ///
    /// The review service recomputes the item average from this set after
    /// every mutation, in the same transaction, so the read always sees the
    /// just-applied change.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn ratings_for_item(
        conn: &mut PgConnection,
        item_id: ItemId,
    ) -> Result<Vec<f64>, RepositoryError> {
        let ratings: Vec<f64> = sqlx::query_scalar("SELECT rating FROM reviews WHERE item_id = $1")
            .bind(item_id)
            .fetch_all(conn)
            .await?;

        Ok(ratings)
    }
}

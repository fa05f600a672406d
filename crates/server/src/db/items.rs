//! Item repository for database operations.
//!
//! The catalog is read-only through the API; the only write is the cached
//! `average_rating`, owned by the review service and always performed inside
//! the same transaction as the review mutation it follows.
//!
//! All methods take an open connection: item reads are always paired with
//! review reads or writes, and the pairing only means anything when both run
//! against the same snapshot.

use bigear_core::ItemId;
use sqlx::PgConnection;

use super::RepositoryError;
use crate::models::Item;

/// Repository for catalog item operations.
pub struct ItemRepository;

impl ItemRepository {
    /// List all catalog items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(conn: &mut PgConnection) -> Result<Vec<Item>, RepositoryError> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT id, name, description, image_asset, average_rating \
             FROM items ORDER BY id",
        )
        .fetch_all(conn)
        .await?;

        Ok(items)
    }

    /// Get an item by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        conn: &mut PgConnection,
        id: ItemId,
    ) -> Result<Option<Item>, RepositoryError> {
        let item = sqlx::query_as::<_, Item>(
            "SELECT id, name, description, image_asset, average_rating \
             FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(item)
    }

    /// Take a row lock on an item inside an open transaction.
    ///
    /// Review mutations call this first: the lock serializes all concurrent
    /// review writes (and their aggregate recomputes) for one item, so two
    /// transactions can never compute the average from different review sets.
    ///
    /// Returns `false` if the item does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: ItemId,
    ) -> Result<bool, RepositoryError> {
        let locked: Option<ItemId> = sqlx::query_scalar("SELECT id FROM items WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(locked.is_some())
    }

    /// Write the cached average rating inside an open transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_average_rating(
        conn: &mut PgConnection,
        id: ItemId,
        average_rating: f64,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE items SET average_rating = $2 WHERE id = $1")
            .bind(id)
            .bind(average_rating)
            .execute(conn)
            .await?;

        Ok(())
    }
}

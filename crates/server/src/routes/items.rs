//! Catalog item handlers. Both endpoints are public and return items with
//! their reviews nested, the shape mobile clients already consume.
//!
//! Item rows and review rows are read inside one transaction, so the cached
//! average and the nested review list always come from the same snapshot. A
//! review committing between two separate pool reads could otherwise appear
//! in the list while the average still predates it.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use bigear_core::ItemId;

use crate::db::{ItemRepository, RepositoryError, ReviewRepository};
use crate::error::AppError;
use crate::models::{Item, ItemWithReviews, ReviewView};
use crate::state::AppState;

/// GET /api/items
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ItemWithReviews>>, AppError> {
    let mut tx = state.pool().begin().await.map_err(RepositoryError::from)?;
    let items = ItemRepository::list_all(&mut tx).await?;
    let reviews = ReviewRepository::list_views_all(&mut tx).await?;
    tx.commit().await.map_err(RepositoryError::from)?;

    Ok(Json(with_reviews(items, reviews)))
}

/// GET /api/items/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<ItemWithReviews>, AppError> {
    let mut tx = state.pool().begin().await.map_err(RepositoryError::from)?;
    let item = ItemRepository::get_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item not found: {id}")))?;
    let reviews = ReviewRepository::list_views_by_item(&mut tx, id).await?;
    tx.commit().await.map_err(RepositoryError::from)?;

    Ok(Json(ItemWithReviews { item, reviews }))
}

/// Attach each review to its item. Items without reviews get an empty list.
fn with_reviews(items: Vec<Item>, reviews: Vec<ReviewView>) -> Vec<ItemWithReviews> {
    let mut by_item: HashMap<ItemId, Vec<ReviewView>> = HashMap::new();
    for view in reviews {
        by_item.entry(view.item_id).or_default().push(view);
    }

    items
        .into_iter()
        .map(|item| {
            let reviews = by_item.remove(&item.id).unwrap_or_default();
            ItemWithReviews { item, reviews }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use bigear_core::{Rating, ReviewId, UserId};
    use chrono::Utc;

    fn item(id: i64, average_rating: f64) -> Item {
        Item {
            id: ItemId::new(id),
            name: format!("item {id}"),
            description: None,
            image_asset: None,
            average_rating,
        }
    }

    fn view(id: i64, item_id: i64, rating: f64) -> ReviewView {
        ReviewView {
            id: ReviewId::new(id),
            item_id: ItemId::new(item_id),
            item_name: format!("item {item_id}"),
            user_id: UserId::new(1),
            user_name: "Jane".to_string(),
            rating: Rating::new(rating).unwrap(),
            comment: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_groups_reviews_under_their_item() {
        let items = vec![item(1, 4.5), item(2, 0.0), item(3, 3.0)];
        let reviews = vec![view(10, 1, 5.0), view(11, 3, 3.0), view(12, 1, 4.0)];

        let combined = with_reviews(items, reviews);

        assert_eq!(combined.len(), 3);
        assert_eq!(combined[0].reviews.len(), 2);
        assert!(combined[1].reviews.is_empty());
        assert_eq!(combined[2].reviews.len(), 1);

        // Every nested review belongs to the item it is nested under
        for entry in &combined {
            assert!(entry.reviews.iter().all(|r| r.item_id == entry.item.id));
        }
    }
}

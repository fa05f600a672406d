//! Review handlers.
//!
//! Mutations require authentication and go through the review service, which
//! keeps the item's cached average in step transactionally. Reads are public
//! except for the caller's own review list.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use bigear_core::{ItemId, ReviewId};
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::ReviewView;
use crate::services::ReviewService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub item_id: ItemId,
    pub rating: f64,
    pub comment: Option<String>,
}

/// Partial update: absent fields keep their current value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

/// POST /api/reviews
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewView>), AppError> {
    let review = ReviewService::new(state.pool())
        .create(req.item_id, user.id, req.rating, req.comment.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// PUT /api/reviews/{id}
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<ReviewId>,
    Json(req): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewView>, AppError> {
    let review = ReviewService::new(state.pool())
        .update(id, user.id, req.rating, req.comment.as_deref())
        .await?;
    Ok(Json(review))
}

/// DELETE /api/reviews/{id}
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<ReviewId>,
) -> Result<StatusCode, AppError> {
    ReviewService::new(state.pool()).delete(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/reviews
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<ReviewView>>, AppError> {
    let reviews = ReviewService::new(state.pool()).list_all().await?;
    Ok(Json(reviews))
}

/// GET /api/reviews/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
) -> Result<Json<ReviewView>, AppError> {
    let review = ReviewService::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("review not found: {id}")))?;
    Ok(Json(review))
}

/// GET /api/reviews/springbeditem/{itemId}
///
/// An unknown item yields an empty list rather than 404.
pub async fn list_for_item(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> Result<Json<Vec<ReviewView>>, AppError> {
    let reviews = ReviewService::new(state.pool()).list_by_item(item_id).await?;
    Ok(Json(reviews))
}

/// GET /api/reviews/user/my-reviews
pub async fn my_reviews(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ReviewView>>, AppError> {
    let reviews = ReviewService::new(state.pool()).list_by_user(user.id).await?;
    Ok(Json(reviews))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_deserializes_camel_case() {
        let req: CreateReviewRequest =
            serde_json::from_str(r#"{"itemId": 3, "rating": 4.5, "comment": "firm but fair"}"#)
                .unwrap();
        assert_eq!(req.item_id, ItemId::new(3));
        assert!((req.rating - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_request_fields_are_optional() {
        let req: UpdateReviewRequest = serde_json::from_str(r#"{"rating": 2.0}"#).unwrap();
        assert!(req.comment.is_none());

        let req: UpdateReviewRequest = serde_json::from_str("{}").unwrap();
        assert!(req.rating.is_none());
        assert!(req.comment.is_none());
    }
}

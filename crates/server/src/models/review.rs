//! Review models.

use bigear_core::{ItemId, Rating, ReviewId, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A review row as stored.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Internal identifier.
    pub id: ReviewId,
    /// The reviewed item.
    pub item_id: ItemId,
    /// The authoring user.
    pub user_id: UserId,
    /// Star rating in [1.0, 5.0].
    pub rating: Rating,
    /// Free-form comment (may be empty).
    pub comment: String,
    /// When the review was created.
    pub created_at: DateTime<Utc>,
    /// When the review was last edited.
    pub updated_at: DateTime<Utc>,
}

/// A review joined with the names of its item and author.
///
/// This is the shape the API exposes: flat, assembled by an explicit join,
/// with no reachable object graph behind it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    /// Internal identifier.
    pub id: ReviewId,
    /// The reviewed item.
    pub item_id: ItemId,
    /// Name of the reviewed item.
    pub item_name: String,
    /// The authoring user.
    pub user_id: UserId,
    /// Display name of the author.
    pub user_name: String,
    /// Star rating in [1.0, 5.0].
    pub rating: Rating,
    /// Free-form comment (may be empty).
    pub comment: String,
    /// When the review was created.
    pub created_at: DateTime<Utc>,
    /// When the review was last edited.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_view_serializes_camel_case() {
        let view = ReviewView {
            id: ReviewId::new(1),
            item_id: ItemId::new(2),
            item_name: "CloudRest Classic".to_string(),
            user_id: UserId::new(3),
            user_name: "Jane".to_string(),
            rating: Rating::new(4.5).unwrap(),
            comment: "Comfy".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["itemId"], 2);
        assert_eq!(json["itemName"], "CloudRest Classic");
        assert_eq!(json["userName"], "Jane");
        assert_eq!(json["rating"], 4.5);
    }
}

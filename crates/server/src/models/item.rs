//! Catalog item model.

use bigear_core::ItemId;
use serde::Serialize;

use super::review::ReviewView;

/// A reviewable catalog item.
///
/// `average_rating` is a derived, cached value. It is only ever written by the
/// review service, which recomputes it from the full review set inside the
/// same transaction as every review mutation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Internal identifier.
    pub id: ItemId,
    /// Item name.
    pub name: String,
    /// Longer marketing description.
    pub description: Option<String>,
    /// Reference to the item image asset.
    pub image_asset: Option<String>,
    /// Cached mean of the item's review ratings, rounded to one decimal.
    /// 0.0 when the item has no reviews. Serialized as `rate`, the field
    /// name mobile clients already consume.
    #[serde(rename = "rate")]
    pub average_rating: f64,
}

/// An item together with its reviews, as returned by the catalog endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemWithReviews {
    /// The item itself.
    #[serde(flatten)]
    pub item: Item,
    /// All reviews for the item.
    pub reviews: Vec<ReviewView>,
}

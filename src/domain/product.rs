use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lifecycle::ActiveFlag;
use crate::merge_fields;

/// A catalog product.
///
/// See [`impl Entity for Product`](crate::actor_framework::Entity) in
/// `product_actor` for creation defaults and row constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<u64>,
    pub prod_type_id: Option<u64>,
    /// Position on the specials list; `None` or `0` keeps it off the list.
    pub special_order: Option<i32>,
    pub is_active: ActiveFlag,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<u64>,
    pub prod_type_id: Option<u64>,
    pub special_order: Option<i32>,
}

/// Partial update of a product. Absent fields are left as stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<u64>,
    pub prod_type_id: Option<u64>,
    pub special_order: Option<i32>,
}

merge_fields!(ProductPatch => Product {
    title,
    subtitle,
    description,
    price,
    category_id,
    prod_type_id,
    special_order,
});

/// Reference to a media file owned by a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMedia {
    pub id: u64,
    pub prod_id: u64,
    /// Location of the file relative to the media root.
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMediaCreate {
    pub prod_id: u64,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMediaPatch {
    pub url: Option<String>,
}

merge_fields!(ProductMediaPatch => ProductMedia { url });

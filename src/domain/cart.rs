use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lifecycle::ActiveFlag;
use crate::merge_fields;

/// A shopping cart. Line items live in their own table as [`CartItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: u64,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub planned_time: Option<DateTime<Utc>>,
    pub is_active: ActiveFlag,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub contact_id: Option<u64>,
    pub user_id: Option<u64>,
    pub delivery_fee: Option<f64>,
    pub deposit_fee: Option<f64>,
    pub is_pickup: Option<bool>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCreate {
    pub price: Option<f64>,
    pub location: Option<String>,
    pub planned_time: Option<DateTime<Utc>>,
    pub contact_id: Option<u64>,
    pub user_id: Option<u64>,
    pub delivery_fee: Option<f64>,
    pub deposit_fee: Option<f64>,
    pub is_pickup: Option<bool>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPatch {
    pub price: Option<f64>,
    pub location: Option<String>,
    pub planned_time: Option<DateTime<Utc>>,
    pub contact_id: Option<u64>,
    pub user_id: Option<u64>,
    pub delivery_fee: Option<f64>,
    pub deposit_fee: Option<f64>,
    pub is_pickup: Option<bool>,
    pub region: Option<String>,
}

merge_fields!(CartPatch => Cart {
    price,
    location,
    planned_time,
    contact_id,
    user_id,
    delivery_fee,
    deposit_fee,
    is_pickup,
    region,
});

/// One product line in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: u64,
    pub cart_id: u64,
    pub prod_id: u64,
    pub quantity: u32,
    pub price: Option<f64>,
    pub is_active: ActiveFlag,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemCreate {
    pub cart_id: u64,
    pub prod_id: u64,
    pub quantity: u32,
    pub price: Option<f64>,
}

/// Partial update of a line item.
///
/// `quantity` is a plain number: a missing value deserializes to `0`, and
/// whether `0` overwrites the stored quantity is decided by the engine's
/// [`ZeroPolicy`](crate::merge::ZeroPolicy). Under `Write`, a patch that
/// omits `quantity` writes `0`, which the positive-quantity constraint
/// rejects, so every item update must then carry the quantity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemPatch {
    pub prod_id: Option<u64>,
    #[serde(default)]
    pub quantity: u32,
    pub price: Option<f64>,
}

merge_fields!(CartItemPatch => CartItem { prod_id, quantity, price });

/// A cart together with its live line items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub cart: Cart,
    pub items: Vec<CartItem>,
}

use tracing::{debug, instrument};

use crate::actor_framework::{Entity, ListFilter, ResourceClient};
use crate::domain::{Cart, CartCreate, CartItem, CartItemCreate, CartView};
use crate::error::OperationError;
use crate::impl_crud_methods;
use crate::lifecycle::{self, NoDependents, OperationSettings};
use crate::outcome::Outcome;

/// Client for cart line items.
#[derive(Clone)]
pub struct CartItemClient {
    inner: ResourceClient<CartItem>,
    carts: ResourceClient<Cart>,
    cleanup: NoDependents,
    settings: OperationSettings,
}

impl_crud_methods!(CartItemClient, CartItem, cart_item);

impl CartItemClient {
    pub fn new(
        inner: ResourceClient<CartItem>,
        carts: ResourceClient<Cart>,
        settings: OperationSettings,
    ) -> Self {
        Self {
            inner,
            carts,
            cleanup: NoDependents,
            settings,
        }
    }

    /// Adds a line item to an existing cart.
    #[instrument(skip(self, payload), fields(cart_id = payload.cart_id, prod_id = payload.prod_id))]
    pub async fn create_cart_item(&self, payload: CartItemCreate) -> Outcome<CartItem> {
        debug!("Sending request");
        if let Err(e) = lifecycle::load_entity(&self.carts, payload.cart_id).await {
            return e.into();
        }
        Outcome::from_result(lifecycle::create_entity(&self.inner, payload).await)
    }

    /// Live line items of a cart.
    #[instrument(skip(self))]
    pub async fn items_for_cart(&self, cart_id: u64) -> Outcome<Vec<CartItem>> {
        debug!("Sending request");
        Outcome::from_result(self.active_items(cart_id).await)
    }

    async fn active_items(&self, cart_id: u64) -> Result<Vec<CartItem>, OperationError> {
        let items = self.inner.list(ListFilter::OwnedBy(cart_id)).await?;
        Ok(items
            .into_iter()
            .filter(|item| Entity::is_active(item))
            .collect())
    }
}

/// Client for carts. Carts own no external resources, so delete is a plain
/// status flip.
#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<Cart>,
    items: CartItemClient,
    cleanup: NoDependents,
    settings: OperationSettings,
}

impl_crud_methods!(CartClient, Cart, cart);

impl CartClient {
    pub fn new(inner: ResourceClient<Cart>, items: CartItemClient, settings: OperationSettings) -> Self {
        Self {
            inner,
            items,
            cleanup: NoDependents,
            settings,
        }
    }

    pub fn items(&self) -> &CartItemClient {
        &self.items
    }

    #[instrument(skip(self, payload))]
    pub async fn create_cart(&self, payload: CartCreate) -> Outcome<Cart> {
        debug!("Sending request");
        Outcome::from_result(lifecycle::create_entity(&self.inner, payload).await)
    }

    #[instrument(skip(self))]
    pub async fn cart_with_items(&self, id: u64) -> Outcome<CartView> {
        debug!("Sending request");
        let cart = match lifecycle::load_entity(&self.inner, id).await {
            Ok(cart) => cart,
            Err(e) => return e.into(),
        };
        match self.items.active_items(id).await {
            Ok(items) => Outcome::success(CartView { cart, items }),
            Err(e) => e.into(),
        }
    }
}

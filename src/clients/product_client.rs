use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::actor_framework::{ListFilter, ResourceClient};
use crate::domain::{Product, ProductCreate, ProductMedia, ProductMediaCreate};
use crate::error::OperationError;
use crate::impl_crud_methods;
use crate::lifecycle::{self, MediaCleanup, OperationSettings};
use crate::outcome::Outcome;
use crate::storage::FileStorage;

/// Client for products and the media they own.
///
/// Deleting a product removes its media files and media rows before the
/// product is flipped inactive.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
    media: ResourceClient<ProductMedia>,
    cleanup: MediaCleanup,
    settings: OperationSettings,
}

impl_crud_methods!(ProductClient, Product, product);

impl ProductClient {
    pub fn new(
        inner: ResourceClient<Product>,
        media: ResourceClient<ProductMedia>,
        files: Arc<dyn FileStorage>,
        settings: OperationSettings,
    ) -> Self {
        let cleanup = MediaCleanup::new(media.clone(), files);
        Self {
            inner,
            media,
            cleanup,
            settings,
        }
    }

    #[instrument(skip(self, payload), fields(title = %payload.title))]
    pub async fn create_product(&self, payload: ProductCreate) -> Outcome<Product> {
        debug!("Sending request");
        Outcome::from_result(lifecycle::create_entity(&self.inner, payload).await)
    }

    /// Active products flagged as specials, in `special_order` order.
    /// An empty list is reported as not found.
    #[instrument(skip(self))]
    pub async fn special_products(&self) -> Outcome<Vec<Product>> {
        debug!("Sending request");
        let mut specials: Vec<Product> = match self.inner.list(ListFilter::Active).await {
            Ok(products) => products
                .into_iter()
                .filter(|p| p.special_order.unwrap_or(0) > 0)
                .collect(),
            Err(e) => return OperationError::from(e).into(),
        };
        if specials.is_empty() {
            return Outcome::not_found();
        }
        specials.sort_by_key(|p| p.special_order);
        info!(count = specials.len(), "Special products listed");
        Outcome::success(specials)
    }

    /// Active products of one product type whose title contains `text`,
    /// ignoring case.
    #[instrument(skip(self))]
    pub async fn search_products(&self, prod_type_id: u64, text: &str) -> Outcome<Vec<Product>> {
        debug!("Sending request");
        let needle = text.to_lowercase();
        match self.inner.list(ListFilter::Active).await {
            Ok(products) => Outcome::success(
                products
                    .into_iter()
                    .filter(|p| {
                        p.prod_type_id == Some(prod_type_id)
                            && p.title.to_lowercase().contains(&needle)
                    })
                    .collect(),
            ),
            Err(e) => OperationError::from(e).into(),
        }
    }

    #[instrument(skip(self))]
    pub async fn add_media(&self, prod_id: u64, url: String) -> Outcome<ProductMedia> {
        debug!("Sending request");
        if let Err(e) = lifecycle::load_entity(&self.inner, prod_id).await {
            return e.into();
        }
        Outcome::from_result(
            lifecycle::create_entity(&self.media, ProductMediaCreate { prod_id, url }).await,
        )
    }

    #[instrument(skip(self))]
    pub async fn product_media(&self, prod_id: u64) -> Outcome<Vec<ProductMedia>> {
        debug!("Sending request");
        if let Err(e) = lifecycle::load_entity(&self.inner, prod_id).await {
            return e.into();
        }
        Outcome::from_result(
            self.media
                .list(ListFilter::OwnedBy(prod_id))
                .await
                .map_err(OperationError::from),
        )
    }
}

mod actor_framework;
mod app_system;
mod cart_actor;
mod clients;
mod config;
mod domain;
mod error;
mod lifecycle;
mod merge;
mod outcome;
mod product_actor;
mod storage;

#[cfg(test)]
mod mock_framework;

use std::sync::Arc;
use tracing::{error, info, warn, Instrument};

use crate::app_system::{setup_tracing, CatalogSystem};
use crate::config::Config;
use crate::domain::{CartCreate, CartItemCreate, CartPatch, ProductCreate, ProductPatch};
use crate::storage::LocalFileStorage;

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = Config::load().map_err(|e| e.to_string())?;
    setup_tracing(&config.log_filter);

    info!(media_root = %config.media_root.display(), "Starting catalog service");

    let files = Arc::new(LocalFileStorage::new(config.media_root.clone()));
    let system = CatalogSystem::new(&config, files);
    let products = system.product_client.clone();

    let span = tracing::info_span!("product_creation");
    let product = async {
        info!("Creating demo product");
        products
            .create_product(ProductCreate {
                title: "Reading Lamp".into(),
                price: Some(10.0),
                special_order: Some(1),
                ..Default::default()
            })
            .await
            .into_data()
            .ok_or_else(|| "demo product was not created".to_string())
    }
    .instrument(span)
    .await?;

    // A media file on disk so the delete below has something to clean up.
    let media_url = format!("/images/product-{}.jpg", product.id);
    let media_path = config.media_root.join(media_url.trim_start_matches('/'));
    if let Some(parent) = media_path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| e.to_string())?;
    }
    tokio::fs::write(&media_path, b"demo").await.map_err(|e| e.to_string())?;
    let media = products.add_media(product.id, media_url).await;
    info!(success = media.is_success(), "Attached media");

    let span = tracing::info_span!("product_update");
    let updated = async {
        info!("Applying partial update");
        products
            .update_product(
                product.id,
                ProductPatch {
                    price: Some(12.0),
                    ..Default::default()
                },
            )
            .await
    }
    .instrument(span)
    .await;

    match updated.error_message() {
        None => info!(product_id = product.id, "Product updated"),
        Some(message) => error!(error = %message, "Product update failed"),
    }

    let deleted = products.delete_product(product.id).await;
    match deleted.data() {
        Some(summary) if summary.warnings.is_empty() => {
            info!(removed = summary.removed_dependents, "Product deactivated")
        }
        Some(summary) => warn!(warnings = ?summary.warnings, "Product deactivated with warnings"),
        None => error!(error = ?deleted.error_message(), "Product delete failed"),
    }

    let active = products.list_active_products().await;
    info!(
        active = active.data().map(Vec::len).unwrap_or_default(),
        "Active products after delete"
    );

    let carts = system.cart_client.clone();
    let cart = carts
        .create_cart(CartCreate {
            location: Some("Front desk".into()),
            ..Default::default()
        })
        .await
        .into_data()
        .ok_or_else(|| "demo cart was not created".to_string())?;
    carts
        .items()
        .create_cart_item(CartItemCreate {
            cart_id: cart.id,
            prod_id: product.id,
            quantity: 2,
            price: Some(12.0),
        })
        .await;
    let moved = carts
        .update_cart(
            cart.id,
            CartPatch {
                region: Some("North".into()),
                ..Default::default()
            },
        )
        .await;
    info!(success = moved.is_success(), "Cart updated");
    if let Some(view) = carts.cart_with_items(cart.id).await.data() {
        info!(items = view.items.len(), region = ?view.cart.region, "Cart loaded");
    }

    drop(products);
    drop(carts);
    system.shutdown().await?;

    info!("Catalog service stopped");
    Ok(())
}

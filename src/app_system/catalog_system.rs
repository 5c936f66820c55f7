use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::actor_framework::{Entity, ResourceActor, ResourceClient};
use crate::clients::{CartClient, CartItemClient, ProductClient};
use crate::config::Config;
use crate::domain::{Cart, CartItem, Product, ProductMedia};
use crate::lifecycle::OperationSettings;
use crate::merge::MergeEngine;
use crate::storage::FileStorage;

/// The application system that owns one actor per table.
///
/// Responsible for starting up actors, wiring clients together, and handling shutdown.
pub struct CatalogSystem {
    pub product_client: ProductClient,
    pub cart_client: CartClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

fn spawn_table<T: Entity<Id = u64>>(
    capacity: usize,
    handles: &mut Vec<tokio::task::JoinHandle<()>>,
) -> ResourceClient<T> {
    let id_counter = Arc::new(AtomicU64::new(1));
    let next_id = move || id_counter.fetch_add(1, Ordering::SeqCst);
    let (actor, client) = ResourceActor::<T>::new(capacity, next_id);
    handles.push(tokio::spawn(actor.run()));
    client
}

impl CatalogSystem {
    #[instrument(name = "catalog_system", skip(config, files))]
    pub fn new(config: &Config, files: Arc<dyn FileStorage>) -> Self {
        info!("Starting catalog system");
        let capacity = config.mailbox_capacity.max(1);
        let settings = OperationSettings {
            engine: MergeEngine::new(config.zero_policy),
            delete_policy: config.delete_policy,
        };
        let mut handles = Vec::new();

        let products = spawn_table::<Product>(capacity, &mut handles);
        let media = spawn_table::<ProductMedia>(capacity, &mut handles);
        let carts = spawn_table::<Cart>(capacity, &mut handles);
        let cart_items = spawn_table::<CartItem>(capacity, &mut handles);

        let product_client = ProductClient::new(products, media, files, settings);
        let item_client = CartItemClient::new(cart_items, carts.clone(), settings);
        let cart_client = CartClient::new(carts, item_client, settings);

        info!(
            zero_policy = ?settings.engine.zero_policy(),
            delete_policy = ?settings.delete_policy,
            "Catalog system started"
        );

        Self {
            product_client,
            cart_client,
            handles,
        }
    }

    /// Drops every client (closing the actor channels) and waits for the
    /// actors to stop.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down catalog system");
        drop(self.product_client);
        drop(self.cart_client);

        let mut failures = Vec::new();
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                failures.push(e.to_string());
            }
        }

        if failures.is_empty() {
            info!("Catalog system shutdown complete");
            Ok(())
        } else {
            Err(format!("Actor tasks failed: {}", failures.join("; ")))
        }
    }
}

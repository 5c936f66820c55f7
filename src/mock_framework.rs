//! # Mock Framework
//!
//! Utilities for testing the update and delete procedures against a store
//! whose answers the test controls.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_get`] or [`expect_save`] to assert behavior.

use crate::actor_framework::{Entity, ListFilter, Response, ResourceClient, ResourceRequest};
use tokio::sync::mpsc;

/// Creates a mock client and a receiver for asserting requests.
///
/// Requests the client sends arrive on `receiver`; the test answers them
/// through the `respond_to` channel, which lets it inject storage failures
/// (for example a rejected save) at a precise step.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Save request
pub async fn expect_save<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Save { entity, respond_to }) => Some((entity, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(ListFilter, Response<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Remove request
pub async fn expect_remove<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<()>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Remove { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cart, CartCreate};
    use crate::actor_framework::FrameworkError;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Cart>(10);

        let get_task = tokio::spawn(async move { client.get(7).await });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, 7);
        let cart = Cart::from_create(7, CartCreate::default()).unwrap();
        responder.send(Ok(Some(cart.clone()))).unwrap();

        let result = get_task.await.unwrap();
        assert_eq!(result, Ok(Some(cart)));
    }

    #[tokio::test]
    async fn test_mock_client_reports_wrong_request() {
        let (client, mut receiver) = create_mock_client::<Cart>(10);
        let task = tokio::spawn(async move { client.remove(1).await });

        assert!(expect_save(&mut receiver).await.is_none());
        // The request was consumed without an answer.
        assert_eq!(task.await.unwrap(), Err(FrameworkError::ActorDropped));
    }
}

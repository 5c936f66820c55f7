use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

use crate::merge::PartialModel;

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks and DTOs)
// =============================================================================

/// Key used by dependent records to point at the row that owns them.
pub type OwnerKey = u64;

/// Trait that any persisted record must implement to be managed by ResourceActor
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    type Id: Ord + Clone + Send + Sync + Display + Debug;
    type CreatePayload: Send + Sync + Debug;
    type Patch: PartialModel<Self> + Send + Sync + Debug;

    /// Table name used in logs and error messages.
    const KIND: &'static str;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the ID and Payload
    fn from_create(id: Self::Id, payload: Self::CreatePayload) -> Result<Self, String>;

    /// Live rows report true; soft-deleted rows report false.
    fn is_active(&self) -> bool {
        true
    }

    /// Owning row for dependent records (media of a product, items of a cart).
    fn owner(&self) -> Option<OwnerKey> {
        None
    }

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Runs before a save is committed. An error rejects the save and leaves
    /// the stored row untouched.
    fn on_save(&mut self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Rejected(String),
}

/// Row selection for `List` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    All,
    Active,
    OwnedBy(OwnerKey),
}

impl ListFilter {
    fn matches<T: Entity>(&self, item: &T) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::Active => item.is_active(),
            ListFilter::OwnedBy(owner) => item.owner() == Some(*owner),
        }
    }
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        payload: T::CreatePayload,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        filter: ListFilter,
        respond_to: Response<Vec<T>>,
    },
    Save {
        entity: T,
        respond_to: Response<T>,
    },
    Remove {
        id: T::Id,
        respond_to: Response<()>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    #[instrument(name = "resource_actor", skip(self), fields(kind = T::KIND))]
    pub async fn run(mut self) {
        info!("Actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { payload, respond_to } => {
                    let _ = respond_to.send(self.handle_create(payload));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| filter.matches(*item))
                        .cloned()
                        .collect();
                    debug!(count = items.len(), ?filter, "Listed rows");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Save { entity, respond_to } => {
                    let _ = respond_to.send(self.handle_save(entity));
                }
                ResourceRequest::Remove { id, respond_to } => {
                    let result = match self.store.remove(&id) {
                        Some(_) => Ok(()),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
            }
        }
        info!("Actor stopped");
    }

    fn handle_create(&mut self, payload: T::CreatePayload) -> Result<T, FrameworkError> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create(id.clone(), payload).map_err(FrameworkError::Rejected)?;
        if let Err(e) = item.on_create() {
            warn!(%id, error = %e, "Create rejected");
            return Err(FrameworkError::Rejected(e));
        }
        self.store.insert(id, item.clone());
        Ok(item)
    }

    fn handle_save(&mut self, mut entity: T) -> Result<T, FrameworkError> {
        let id = entity.id().clone();
        if !self.store.contains_key(&id) {
            return Err(FrameworkError::NotFound(id.to_string()));
        }
        if let Err(e) = entity.on_save() {
            warn!(%id, error = %e, "Save rejected");
            return Err(FrameworkError::Rejected(e));
        }
        self.store.insert(id, entity.clone());
        Ok(entity)
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, payload: T::CreatePayload) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { payload, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn list(&self, filter: ListFilter) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { filter, respond_to })
            .await
    }

    pub async fn save(&self, entity: T) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Save { entity, respond_to })
            .await
    }

    pub async fn remove(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Remove { id, respond_to })
            .await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge_fields;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: u64,
        board: u64,
        text: String,
        active: bool,
    }

    #[derive(Debug)]
    struct NoteCreate {
        board: u64,
        text: String,
    }

    #[derive(Debug, Default)]
    struct NotePatch {
        text: Option<String>,
    }

    merge_fields!(NotePatch => Note { text });

    impl Entity for Note {
        type Id = u64;
        type CreatePayload = NoteCreate;
        type Patch = NotePatch;
        const KIND: &'static str = "note";

        fn id(&self) -> &u64 {
            &self.id
        }

        fn from_create(id: u64, payload: NoteCreate) -> Result<Self, String> {
            Ok(Self {
                id,
                board: payload.board,
                text: payload.text,
                active: true,
            })
        }

        fn is_active(&self) -> bool {
            self.active
        }

        fn owner(&self) -> Option<OwnerKey> {
            Some(self.board)
        }

        fn on_save(&mut self) -> Result<(), String> {
            if self.text.is_empty() {
                return Err("text must not be empty".to_string());
            }
            Ok(())
        }
    }

    fn spawn_notes() -> ResourceClient<Note> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || counter.fetch_add(1, Ordering::SeqCst);
        let (actor, client) = ResourceActor::new(10, next_id);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_resource_actor_crud() {
        let client = spawn_notes();

        let note = client
            .create(NoteCreate { board: 7, text: "first".into() })
            .await
            .unwrap();
        assert_eq!(note.id, 1);

        let mut edited = client.get(1).await.unwrap().unwrap();
        edited.text = "edited".into();
        client.save(edited).await.unwrap();
        assert_eq!(client.get(1).await.unwrap().unwrap().text, "edited");

        client.remove(1).await.unwrap();
        assert_eq!(client.get(1).await.unwrap(), None);
        assert_eq!(
            client.remove(1).await,
            Err(FrameworkError::NotFound("1".to_string()))
        );
    }

    #[tokio::test]
    async fn test_rejected_save_keeps_stored_row() {
        let client = spawn_notes();
        client
            .create(NoteCreate { board: 1, text: "keep".into() })
            .await
            .unwrap();

        let mut broken = client.get(1).await.unwrap().unwrap();
        broken.text.clear();
        let result = client.save(broken).await;
        assert_eq!(
            result,
            Err(FrameworkError::Rejected("text must not be empty".to_string()))
        );
        assert_eq!(client.get(1).await.unwrap().unwrap().text, "keep");
    }

    #[tokio::test]
    async fn test_save_of_unknown_row_is_not_found() {
        let client = spawn_notes();
        let ghost = Note {
            id: 42,
            board: 1,
            text: "ghost".into(),
            active: true,
        };
        assert_eq!(
            client.save(ghost).await,
            Err(FrameworkError::NotFound("42".to_string()))
        );
    }

    #[tokio::test]
    async fn test_list_filters() {
        let client = spawn_notes();
        for (board, text) in [(1, "a"), (2, "b"), (1, "c")] {
            client
                .create(NoteCreate { board, text: text.into() })
                .await
                .unwrap();
        }
        let mut hidden = client.get(3).await.unwrap().unwrap();
        hidden.active = false;
        client.save(hidden).await.unwrap();

        assert_eq!(client.list(ListFilter::All).await.unwrap().len(), 3);
        let active: Vec<u64> = client
            .list(ListFilter::Active)
            .await
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(active, vec![1, 2]);
        let owned: Vec<u64> = client
            .list(ListFilter::OwnedBy(1))
            .await
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(owned, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_closed_actor_reports_error() {
        let (sender, receiver) = mpsc::channel::<ResourceRequest<Note>>(1);
        drop(receiver);
        let client = ResourceClient::new(sender);
        assert_eq!(client.get(1).await, Err(FrameworkError::ActorClosed));
    }
}

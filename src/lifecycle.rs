//! Create, update and soft-delete procedures shared by every table.
//!
//! Rows are never removed through the API: delete flips the row to
//! [`ActiveFlag::Inactive`]. Rows that own external resources first have
//! those resources cleaned up through a [`DependentCleanup`]; that cleanup is
//! best effort unless [`DeletePolicy::Strict`] is configured.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::{Entity, ListFilter, ResourceClient};
use crate::domain::{Product, ProductMedia};
use crate::error::OperationError;
use crate::merge::MergeEngine;
use crate::storage::FileStorage;

/// Row status flag, stored and serialized as `1` (live) or `0` (deleted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ActiveFlag {
    #[default]
    Active,
    Inactive,
}

impl From<ActiveFlag> for u8 {
    fn from(flag: ActiveFlag) -> u8 {
        match flag {
            ActiveFlag::Active => 1,
            ActiveFlag::Inactive => 0,
        }
    }
}

impl TryFrom<u8> for ActiveFlag {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ActiveFlag::Active),
            0 => Ok(ActiveFlag::Inactive),
            other => Err(format!("invalid active flag: {other}")),
        }
    }
}

/// Entities whose delete is a status flip.
pub trait SoftDeletable: Entity {
    fn deactivate(&mut self);
}

/// What to do when dependent cleanup fails during a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Report cleanup failures and deactivate the row anyway.
    #[default]
    BestEffort,
    /// Any cleanup failure fails the delete; the row stays active.
    Strict,
}

impl FromStr for DeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best_effort" | "best-effort" => Ok(DeletePolicy::BestEffort),
            "strict" => Ok(DeletePolicy::Strict),
            other => Err(format!("unknown delete policy: {other}")),
        }
    }
}

/// Knobs every client passes to the procedures below.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationSettings {
    pub engine: MergeEngine,
    pub delete_policy: DeletePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupFailure {
    pub resource: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: usize,
    pub failures: Vec<CleanupFailure>,
}

/// Removes the external resources owned by a row before it is deactivated.
#[async_trait]
pub trait DependentCleanup<T: Entity>: Send + Sync {
    async fn cleanup(&self, owner: &T) -> CleanupReport;
}

/// For rows that own nothing outside their table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDependents;

#[async_trait]
impl<T: Entity> DependentCleanup<T> for NoDependents {
    async fn cleanup(&self, _owner: &T) -> CleanupReport {
        CleanupReport::default()
    }
}

/// Deletes the media files of a product, then their metadata rows.
///
/// A file that cannot be deleted keeps its metadata row.
#[derive(Clone)]
pub struct MediaCleanup {
    media: ResourceClient<ProductMedia>,
    files: Arc<dyn FileStorage>,
}

impl MediaCleanup {
    pub fn new(media: ResourceClient<ProductMedia>, files: Arc<dyn FileStorage>) -> Self {
        Self { media, files }
    }
}

#[async_trait]
impl DependentCleanup<Product> for MediaCleanup {
    #[instrument(skip(self, owner), fields(prod_id = owner.id))]
    async fn cleanup(&self, owner: &Product) -> CleanupReport {
        let mut report = CleanupReport::default();
        let media = match self.media.list(ListFilter::OwnedBy(owner.id)).await {
            Ok(media) => media,
            Err(e) => {
                warn!(error = %e, "Could not list product media");
                report.failures.push(CleanupFailure {
                    resource: format!("media of product {}", owner.id),
                    reason: e.to_string(),
                });
                return report;
            }
        };

        for item in media {
            if let Err(e) = self.files.delete_file(&item.url).await {
                warn!(media_id = item.id, url = %item.url, error = %e, "Media file not removed");
                report.failures.push(CleanupFailure {
                    resource: item.url.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
            match self.media.remove(item.id).await {
                Ok(()) => report.removed += 1,
                Err(e) => {
                    warn!(media_id = item.id, error = %e, "Media row not removed");
                    report.failures.push(CleanupFailure {
                        resource: format!("media row {}", item.id),
                        reason: e.to_string(),
                    });
                }
            }
        }
        debug!(removed = report.removed, failed = report.failures.len(), "Media cleanup finished");
        report
    }
}

/// Result of a successful delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary<T> {
    pub entity: T,
    pub removed_dependents: usize,
    pub warnings: Vec<String>,
}

#[instrument(skip(store, payload), fields(kind = T::KIND))]
pub async fn create_entity<T: Entity>(
    store: &ResourceClient<T>,
    payload: T::CreatePayload,
) -> Result<T, OperationError> {
    let created = store.create(payload).await.map_err(|e| {
        error!(error = %e, "Create failed");
        OperationError::from(e)
    })?;
    info!(id = %created.id(), "Row created");
    Ok(created)
}

#[instrument(skip(store), fields(kind = T::KIND))]
pub async fn load_entity<T: Entity>(store: &ResourceClient<T>, id: T::Id) -> Result<T, OperationError> {
    store.get(id).await?.ok_or(OperationError::NotFound)
}

/// Loads the row, merges the partial model onto it and saves it.
///
/// The merge happens on a loaded copy, so a rejected save leaves the stored
/// row exactly as it was.
#[instrument(skip(store, patch, engine), fields(kind = T::KIND))]
pub async fn update_entity<T: Entity>(
    store: &ResourceClient<T>,
    engine: &MergeEngine,
    id: T::Id,
    patch: &T::Patch,
) -> Result<T, OperationError> {
    let mut entity = match store.get(id).await? {
        Some(entity) => entity,
        None => {
            debug!("Update target not found");
            return Err(OperationError::NotFound);
        }
    };

    let report = engine.apply_with_report(patch, &mut entity);
    debug!(fields = ?report.applied, "Merged partial update");

    let saved = store.save(entity).await.map_err(|e| {
        error!(error = %e, "Save failed, merge discarded");
        OperationError::from(e)
    })?;
    info!("Row updated");
    Ok(saved)
}

/// Two-phase delete: dependent cleanup, then the status flip.
///
/// Cleanup failures become warnings on the summary under
/// [`DeletePolicy::BestEffort`] and fail the delete before the flip under
/// [`DeletePolicy::Strict`]. A failed flip is always the delete's failure.
#[instrument(skip(store, cleanup), fields(kind = T::KIND))]
pub async fn soft_delete<T, C>(
    store: &ResourceClient<T>,
    cleanup: &C,
    policy: DeletePolicy,
    id: T::Id,
) -> Result<DeleteSummary<T>, OperationError>
where
    T: SoftDeletable,
    C: DependentCleanup<T> + ?Sized,
{
    let mut entity = match store.get(id).await? {
        Some(entity) => entity,
        None => {
            debug!("Delete target not found");
            return Err(OperationError::NotFound);
        }
    };

    let report = cleanup.cleanup(&entity).await;
    let warnings: Vec<String> = report
        .failures
        .iter()
        .map(|f| format!("{}: {}", f.resource, f.reason))
        .collect();

    if !warnings.is_empty() && policy == DeletePolicy::Strict {
        error!(failures = warnings.len(), "Dependent cleanup failed, row left active");
        return Err(OperationError::DependentCleanupFailure(warnings.join("; ")));
    }

    entity.deactivate();
    let entity = store.save(entity).await.map_err(|e| {
        error!(error = %e, "Deactivation failed");
        OperationError::from(e)
    })?;

    if warnings.is_empty() {
        info!(removed = report.removed, "Row deactivated");
    } else {
        warn!(removed = report.removed, failures = warnings.len(), "Row deactivated with cleanup warnings");
    }

    Ok(DeleteSummary {
        entity,
        removed_dependents: report.removed,
        warnings,
    })
}

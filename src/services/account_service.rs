// ==================== ACCOUNT LIFECYCLE ====================
// Exclusão de conta e exportação de dados (LGPD/GDPR).
// Exclusão: purge best-effort por collection e, por último, remoção
// da identidade no provedor de auth (etapa fatal, sem rollback).

use crate::{
    models::{AuthenticatedUser, DeleteAccountResponse, ExportBundle, Identity},
    services::{
        collections::CollectionRegistry,
        events::{LifecycleEvent, LifecycleEvents},
        identity::IdentityProvider,
        pipeline::Pipeline,
        record_store::RecordStore,
    },
    utils::AccountError,
};
use futures::FutureExt;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Stage error inside the deletion pipeline
#[derive(Debug)]
enum PurgeFailure {
    Collection(String),
    Identity(String),
}

impl fmt::Display for PurgeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurgeFailure::Collection(msg) | PurgeFailure::Identity(msg) => f.write_str(msg),
        }
    }
}

pub struct AccountLifecycleManager {
    store: Arc<dyn RecordStore>,
    identities: Arc<dyn IdentityProvider>,
    events: Arc<dyn LifecycleEvents>,
    registry: CollectionRegistry,
}

impl AccountLifecycleManager {
    pub fn new(
        store: Arc<dyn RecordStore>,
        identities: Arc<dyn IdentityProvider>,
        events: Arc<dyn LifecycleEvents>,
        registry: CollectionRegistry,
    ) -> Self {
        Self {
            store,
            identities,
            events,
            registry,
        }
    }

    pub fn registry(&self) -> &CollectionRegistry {
        &self.registry
    }

    /// Resolves the caller to a live identity. No store access happens before this succeeds.
    async fn resolve(&self, caller: Option<&AuthenticatedUser>) -> Result<Identity, AccountError> {
        let caller = caller.ok_or(AccountError::Unauthenticated)?;
        let user_id = caller.id.trim();
        if user_id.is_empty() {
            return Err(AccountError::Unauthenticated);
        }

        match self.identities.get_user(user_id).await {
            Ok(Some(identity)) => Ok(Identity {
                user_id: identity.user_id,
                email: identity.email.or_else(|| caller.email.clone()),
            }),
            Ok(None) => {
                log::warn!("🔒 Identity {} no longer exists", user_id);
                Err(AccountError::Unauthenticated)
            }
            Err(e) => {
                log::error!("❌ Identity lookup failed for {}: {}", user_id, e);
                Err(AccountError::Internal(e.to_string()))
            }
        }
    }

    /// Purges every deletable collection for the caller, then removes the auth identity.
    ///
    /// Collection failures are logged and skipped. Identity deletion failure is fatal and
    /// already-purged rows are not restored.
    pub async fn delete_account(
        &self,
        caller: Option<&AuthenticatedUser>,
    ) -> Result<DeleteAccountResponse, AccountError> {
        let identity = self.resolve(caller).await?;
        let user_id = identity.user_id.as_str();

        log::info!("🗑️ Deleting account for user_id: {}", user_id);

        let mut pipeline = Pipeline::<PurgeFailure>::new();
        for collection in self.registry.purge_targets() {
            let stage = async move {
                let deleted = self
                    .store
                    .delete_where(collection, user_id)
                    .await
                    .map_err(|e| PurgeFailure::Collection(e.to_string()))?;
                self.events.emit(LifecycleEvent::CollectionPurged {
                    user_id: user_id.to_string(),
                    collection: collection.to_string(),
                    deleted,
                });
                Ok::<(), PurgeFailure>(())
            };
            pipeline = pipeline.best_effort(collection, stage.boxed());
        }

        let delete_identity = async move {
            self.identities
                .delete_user(user_id)
                .await
                .map_err(|e| PurgeFailure::Identity(e.to_string()))
        };
        let pipeline = pipeline.then_fatal("auth_identity", delete_identity.boxed());

        let outcome = pipeline
            .run(|stage, failure| {
                let event = match failure {
                    PurgeFailure::Collection(error) => LifecycleEvent::CollectionPurgeFailed {
                        user_id: user_id.to_string(),
                        collection: stage.to_string(),
                        error: error.clone(),
                    },
                    PurgeFailure::Identity(error) => LifecycleEvent::IdentityDeletionFailed {
                        user_id: user_id.to_string(),
                        error: error.clone(),
                    },
                };
                self.events.emit(event);
            })
            .await;

        match outcome {
            Ok(report) => {
                self.events.emit(LifecycleEvent::IdentityDeleted {
                    user_id: user_id.to_string(),
                });
                log::info!(
                    "🎉 Account deleted for user {} ({} collections purged, {} skipped)",
                    user_id,
                    report.succeeded.len(),
                    report.failed.len()
                );
                Ok(DeleteAccountResponse::success(user_id))
            }
            Err(failure) => {
                log::error!(
                    "❌ Account deletion for {} stopped at {} after purging {} collections",
                    user_id,
                    failure.stage,
                    failure.report.succeeded.len()
                );
                Err(AccountError::IdentityDeletion(failure.error.to_string()))
            }
        }
    }

    /// Collects the caller's rows from every exportable collection. Read-only.
    ///
    /// Unreadable collections come back as empty lists; the export itself never fails
    /// once the caller is resolved.
    pub async fn export_data(
        &self,
        caller: Option<&AuthenticatedUser>,
    ) -> Result<ExportBundle, AccountError> {
        let identity = self.resolve(caller).await?;
        let user_id = identity.user_id.as_str();

        log::info!("📦 Exporting data for user_id: {}", user_id);

        let targets = self.registry.export_targets();
        let reads = targets.iter().map(|collection| async move {
            (*collection, self.store.select_where(collection, user_id).await)
        });
        let results = futures::future::join_all(reads).await;

        let mut data = BTreeMap::new();
        let mut failed = 0;
        for (collection, result) in results {
            let rows = result.unwrap_or_else(|e| {
                failed += 1;
                self.events.emit(LifecycleEvent::CollectionExportFailed {
                    user_id: user_id.to_string(),
                    collection: collection.to_string(),
                    error: e.to_string(),
                });
                Vec::new()
            });
            data.insert(collection.to_string(), rows);
        }

        self.events.emit(LifecycleEvent::ExportCompleted {
            user_id: user_id.to_string(),
            collections: data.len(),
            failed,
        });

        Ok(ExportBundle {
            user_id: identity.user_id.clone(),
            email: identity.email.clone(),
            export_date: chrono::Utc::now().to_rfc3339(),
            data,
        })
    }
}

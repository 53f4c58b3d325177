use std::fmt;

/// Something that happened while purging or exporting a user's data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    CollectionPurged { user_id: String, collection: String, deleted: u64 },
    CollectionPurgeFailed { user_id: String, collection: String, error: String },
    CollectionExportFailed { user_id: String, collection: String, error: String },
    IdentityDeleted { user_id: String },
    IdentityDeletionFailed { user_id: String, error: String },
    ExportCompleted { user_id: String, collections: usize, failed: usize },
}

impl LifecycleEvent {
    pub fn level(&self) -> log::Level {
        match self {
            LifecycleEvent::CollectionPurged { .. } => log::Level::Debug,
            LifecycleEvent::CollectionPurgeFailed { .. }
            | LifecycleEvent::CollectionExportFailed { .. } => log::Level::Warn,
            LifecycleEvent::IdentityDeletionFailed { .. } => log::Level::Error,
            LifecycleEvent::IdentityDeleted { .. } | LifecycleEvent::ExportCompleted { .. } => {
                log::Level::Info
            }
        }
    }

    /// Collection the event refers to, if any
    #[cfg(test)]
    pub fn collection(&self) -> Option<&str> {
        match self {
            LifecycleEvent::CollectionPurged { collection, .. }
            | LifecycleEvent::CollectionPurgeFailed { collection, .. }
            | LifecycleEvent::CollectionExportFailed { collection, .. } => Some(collection),
            _ => None,
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::CollectionPurged { user_id, collection, deleted } => {
                write!(f, "🧹 Deleted {} rows from {} for user {}", deleted, collection, user_id)
            }
            LifecycleEvent::CollectionPurgeFailed { user_id, collection, error } => {
                write!(f, "⚠️ Could not delete from {} for user {}: {}", collection, user_id, error)
            }
            LifecycleEvent::CollectionExportFailed { user_id, collection, error } => {
                write!(f, "⚠️ Could not export {} for user {}: {}", collection, user_id, error)
            }
            LifecycleEvent::IdentityDeleted { user_id } => {
                write!(f, "✅ Auth identity {} deleted", user_id)
            }
            LifecycleEvent::IdentityDeletionFailed { user_id, error } => {
                write!(f, "❌ Failed to delete auth identity {}: {}", user_id, error)
            }
            LifecycleEvent::ExportCompleted { user_id, collections, failed } => {
                write!(
                    f,
                    "📦 Export ready for user {} ({} collections, {} unreadable)",
                    user_id, collections, failed
                )
            }
        }
    }
}

/// Logging port for the account lifecycle. Injected so tests can inspect emitted events.
pub trait LifecycleEvents: Send + Sync {
    fn emit(&self, event: LifecycleEvent);
}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEvents;

impl LifecycleEvents for LogEvents {
    fn emit(&self, event: LifecycleEvent) {
        log::log!(target: "account_lifecycle", event.level(), "{}", event);
    }
}

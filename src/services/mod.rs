pub mod account_service;
pub mod auth_service;
pub mod collections;
pub mod events;
pub mod identity;
pub mod pipeline;
pub mod record_store;

#[cfg(test)]
pub mod testing;

pub use account_service::AccountLifecycleManager;
pub use collections::CollectionRegistry;
pub use events::LogEvents;
pub use identity::{AdminApiIdentityProvider, IdentityProvider, MongoIdentityProvider};
pub use record_store::MongoRecordStore;

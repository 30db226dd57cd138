use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::domain::errors::CatalogError;

/// A record that can live in an [`EntityStore`].
pub trait StoredEntity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the top-level array in the persisted document.
    const COLLECTION: &'static str;
    /// Human name used in not-found errors.
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn timestamp(&self) -> Option<DateTime<Utc>>;
    fn set_timestamp(&mut self, at: DateTime<Utc>);

    /// Key that must be unique across the store, if any.
    fn unique_key(&self) -> Option<String> {
        None
    }
}

/// In-memory transformation applied by [`EntityStore::update_file`].
pub type Mutator<T> = Box<dyn FnOnce(&mut Vec<T>) -> Result<(), CatalogError> + Send>;

#[async_trait]
pub trait EntityStore<T>: Send + Sync
where
    T: StoredEntity,
{
    /// Snapshot of every entity in insertion order.
    async fn list(&self) -> Result<Vec<T>, CatalogError>;

    /// Persists `entity`, assigning an id and timestamp when absent.
    async fn append(&self, entity: T) -> Result<T, CatalogError>;

    async fn remove(&self, id: &str) -> Result<T, CatalogError>;

    /// Read-modify-write of the whole collection. Nothing is written when
    /// `mutator` fails. Returns the persisted collection.
    async fn update_file(&self, mutator: Mutator<T>) -> Result<Vec<T>, CatalogError>;
}

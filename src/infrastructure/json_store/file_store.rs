use async_trait::async_trait;
use serde_json::{Map, Value};
use std::{
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
};
use tokio::{fs, sync::Mutex};
use tracing::debug;

use crate::domain::{
    errors::CatalogError,
    repositories::entity_store::{EntityStore, Mutator, StoredEntity},
    value_objects::clock::{Clock, IdGenerator, system_clock, uuid_generator},
};

/// Entity store backed by a single JSON document of the form
/// `{"<collection>": [ ... ]}`.
///
/// Every operation holds the store lock for its whole read-modify-write
/// cycle. Two instances over the same path do not protect each other.
pub struct JsonFileStore<T> {
    path: PathBuf,
    lock: Mutex<()>,
    clock: Clock,
    id_generator: IdGenerator,
    _entity: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: StoredEntity,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            clock: system_clock(),
            id_generator: uuid_generator(),
            _entity: PhantomData,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, id_generator: IdGenerator) -> Self {
        self.id_generator = id_generator;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<T>, CatalogError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(CatalogError::Storage(format!(
                    "read {}: {err}",
                    self.path.display()
                )));
            }
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let mut document: Map<String, Value> = serde_json::from_slice(&raw).map_err(|err| {
            CatalogError::Storage(format!("decode {}: {err}", self.path.display()))
        })?;

        match document.remove(T::COLLECTION) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(entities) => serde_json::from_value(entities).map_err(|err| {
                CatalogError::Storage(format!(
                    "decode {} in {}: {err}",
                    T::COLLECTION,
                    self.path.display()
                ))
            }),
        }
    }

    /// Writes the full document to a sibling temp file and renames it over
    /// the store file, so readers never observe a partial write.
    async fn persist(&self, entities: &[T]) -> Result<(), CatalogError> {
        let mut document = Map::new();
        document.insert(T::COLLECTION.to_string(), serde_json::to_value(entities)?);
        let bytes = serde_json::to_vec_pretty(&Value::Object(document))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|err| {
                CatalogError::Storage(format!("create {}: {err}", parent.display()))
            })?;
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, &bytes).await.map_err(|err| {
            CatalogError::Storage(format!("write {}: {err}", temp_path.display()))
        })?;

        if let Err(err) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(CatalogError::Storage(format!(
                "replace {}: {err}",
                self.path.display()
            )));
        }

        debug!(
            path = %self.path.display(),
            collection = T::COLLECTION,
            count = entities.len(),
            "json_store: persisted collection"
        );

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| T::COLLECTION.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl<T> EntityStore<T> for JsonFileStore<T>
where
    T: StoredEntity,
{
    async fn list(&self) -> Result<Vec<T>, CatalogError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    async fn append(&self, mut entity: T) -> Result<T, CatalogError> {
        let _guard = self.lock.lock().await;
        let mut entities = self.load().await?;

        if entity.id().trim().is_empty() {
            entity.set_id((self.id_generator)());
        }
        if entity.timestamp().is_none() {
            entity.set_timestamp((self.clock)());
        }

        if entities.iter().any(|existing| existing.id() == entity.id()) {
            return Err(CatalogError::Conflict(format!(
                "{} id already exists: {}",
                T::KIND,
                entity.id()
            )));
        }

        if let Some(key) = entity.unique_key() {
            if entities
                .iter()
                .any(|existing| existing.unique_key().as_deref() == Some(key.as_str()))
            {
                return Err(CatalogError::Conflict(format!(
                    "alias already exists: {key}"
                )));
            }
        }

        entities.push(entity.clone());
        self.persist(&entities).await?;

        Ok(entity)
    }

    async fn remove(&self, id: &str) -> Result<T, CatalogError> {
        let _guard = self.lock.lock().await;
        let mut entities = self.load().await?;

        let position = entities
            .iter()
            .position(|entity| entity.id() == id)
            .ok_or_else(|| CatalogError::not_found(T::KIND, id))?;

        let removed = entities.remove(position);
        self.persist(&entities).await?;

        Ok(removed)
    }

    async fn update_file(&self, mutator: Mutator<T>) -> Result<Vec<T>, CatalogError> {
        let _guard = self.lock.lock().await;
        let mut entities = self.load().await?;

        mutator(&mut entities)?;
        self.persist(&entities).await?;

        Ok(entities)
    }
}

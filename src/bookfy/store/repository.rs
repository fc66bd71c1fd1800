use super::backend::StorageBackend;
use crate::error::{BookfyError, Result};
use crate::model::{Entity, EntityId};
use chrono::Utc;
use std::marker::PhantomData;
use tracing::{debug, error};

/// Get/create/update/remove over one collection of `E`.
///
/// Every mutation is a whole-collection read-modify-write: load the array,
/// change it in memory, write the array back.
pub struct Repository<'a, B: StorageBackend, E: Entity> {
    backend: &'a B,
    _entity: PhantomData<E>,
}

impl<'a, B: StorageBackend, E: Entity> Repository<'a, B, E> {
    pub fn new(backend: &'a B) -> Self {
        Self {
            backend,
            _entity: PhantomData,
        }
    }

    /// All records in stored order.
    ///
    /// A collection that cannot be read or decoded is logged and reported as
    /// empty; callers never see the failure.
    pub fn get_all(&self) -> Vec<E> {
        match self.load() {
            Ok(items) => items,
            Err(e) => {
                error!(collection = E::COLLECTION, error = %e, "failed to load collection");
                Vec::new()
            }
        }
    }

    pub fn get_by_id(&self, id: EntityId) -> Option<E> {
        self.get_all().into_iter().find(|e| e.id() == id)
    }

    /// Assigns a fresh id, appends and persists. Returns the stored record.
    pub fn create(&self, mut entity: E) -> Result<E> {
        let mut items = self.load()?;
        let id = next_id(&items, Utc::now().timestamp_millis())?;
        entity.set_id(id);
        items.push(entity.clone());
        self.save(&items)?;
        debug!(collection = E::COLLECTION, id, "created record");
        Ok(entity)
    }

    /// Replaces the record with the same id in place.
    /// Returns false, without writing, when no such record exists.
    pub fn update(&self, entity: &E) -> Result<bool> {
        let mut items = self.load()?;
        let Some(slot) = items.iter_mut().find(|e| e.id() == entity.id()) else {
            debug!(collection = E::COLLECTION, id = entity.id(), "update of unknown id ignored");
            return Ok(false);
        };
        *slot = entity.clone();
        self.save(&items)?;
        debug!(collection = E::COLLECTION, id = entity.id(), "updated record");
        Ok(true)
    }

    /// Returns false, without writing, when no such record exists.
    pub fn remove(&self, id: EntityId) -> Result<bool> {
        let mut items = self.load()?;
        let before = items.len();
        items.retain(|e| e.id() != id);
        if items.len() == before {
            return Ok(false);
        }
        self.save(&items)?;
        debug!(collection = E::COLLECTION, id, "removed record");
        Ok(true)
    }

    /// Strict load used by mutations: a damaged collection is an error here,
    /// so it is never overwritten by a rewrite of the recovered "empty" list.
    fn load(&self) -> Result<Vec<E>> {
        match self.backend.read(E::COLLECTION)? {
            None => Ok(Vec::new()),
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|e| BookfyError::CorruptCollection {
                    key: E::COLLECTION.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn save(&self, items: &[E]) -> Result<()> {
        let raw = serde_json::to_string(items).map_err(BookfyError::Serialization)?;
        self.backend.write(E::COLLECTION, &raw)
    }
}

/// Ids look like creation timestamps but stay strictly above every id
/// already in the collection.
pub(crate) fn next_id<E: Entity>(items: &[E], now_millis: i64) -> Result<EntityId> {
    let highest = items.iter().map(Entity::id).max().unwrap_or(0);
    let above = highest.checked_add(1).ok_or_else(|| {
        BookfyError::Store(format!(
            "{} has no id left above {}",
            E::COLLECTION,
            highest
        ))
    })?;
    Ok(now_millis.max(above))
}

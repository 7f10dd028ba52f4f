use std::sync::{Arc, RwLock};

use thiserror::Error;

use shopforge_core::Entity;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing storage cannot serve requests.
    #[error("entity store unavailable: {0}")]
    Unavailable(String),
}

/// Entity storage abstraction.
///
/// Collections keep insertion order: `list`, `filter` and `find` all walk the
/// collection in the order entities were first saved.
pub trait EntityStore: Send + Sync {
    type Entity: Entity;

    fn get(&self, id: &<Self::Entity as Entity>::Id) -> Result<Option<Self::Entity>, StoreError>;

    /// First entity (in collection order) matching `predicate`.
    fn find(
        &self,
        predicate: &dyn Fn(&Self::Entity) -> bool,
    ) -> Result<Option<Self::Entity>, StoreError>;

    fn filter(
        &self,
        predicate: &dyn Fn(&Self::Entity) -> bool,
    ) -> Result<Vec<Self::Entity>, StoreError>;

    fn list(&self) -> Result<Vec<Self::Entity>, StoreError>;

    /// Insert, or replace in place when the id already exists.
    fn save(&self, entity: Self::Entity) -> Result<(), StoreError>;

    /// Returns whether an entity was removed.
    fn delete(&self, id: &<Self::Entity as Entity>::Id) -> Result<bool, StoreError>;

    fn count(&self) -> Result<usize, StoreError>;
}

impl<S> EntityStore for Arc<S>
where
    S: EntityStore + ?Sized,
{
    type Entity = S::Entity;

    fn get(&self, id: &<Self::Entity as Entity>::Id) -> Result<Option<Self::Entity>, StoreError> {
        (**self).get(id)
    }

    fn find(
        &self,
        predicate: &dyn Fn(&Self::Entity) -> bool,
    ) -> Result<Option<Self::Entity>, StoreError> {
        (**self).find(predicate)
    }

    fn filter(
        &self,
        predicate: &dyn Fn(&Self::Entity) -> bool,
    ) -> Result<Vec<Self::Entity>, StoreError> {
        (**self).filter(predicate)
    }

    fn list(&self) -> Result<Vec<Self::Entity>, StoreError> {
        (**self).list()
    }

    fn save(&self, entity: Self::Entity) -> Result<(), StoreError> {
        (**self).save(entity)
    }

    fn delete(&self, id: &<Self::Entity as Entity>::Id) -> Result<bool, StoreError> {
        (**self).delete(id)
    }

    fn count(&self) -> Result<usize, StoreError> {
        (**self).count()
    }
}

/// In-memory entity store for tests/dev.
///
/// Lookups are linear scans. Not optimized for performance.
#[derive(Debug)]
pub struct InMemoryEntityStore<E> {
    rows: RwLock<Vec<E>>,
}

impl<E> InMemoryEntityStore<E> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    pub fn with_entities(entities: impl IntoIterator<Item = E>) -> Self {
        Self {
            rows: RwLock::new(entities.into_iter().collect()),
        }
    }
}

impl<E> Default for InMemoryEntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

impl<E> EntityStore for InMemoryEntityStore<E>
where
    E: Entity + Clone + Send + Sync,
{
    type Entity = E;

    fn get(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.iter().find(|e| e.id() == id).cloned())
    }

    fn find(&self, predicate: &dyn Fn(&E) -> bool) -> Result<Option<E>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.iter().find(|e| predicate(e)).cloned())
    }

    fn filter(&self, predicate: &dyn Fn(&E) -> bool) -> Result<Vec<E>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.iter().filter(|e| predicate(e)).cloned().collect())
    }

    fn list(&self) -> Result<Vec<E>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.clone())
    }

    fn save(&self, entity: E) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        match rows.iter_mut().find(|e| e.id() == entity.id()) {
            Some(existing) => *existing = entity,
            None => rows.push(entity),
        }
        Ok(())
    }

    fn delete(&self, id: &E::Id) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let before = rows.len();
        rows.retain(|e| e.id() != id);
        Ok(rows.len() != before)
    }

    fn count(&self) -> Result<usize, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.len())
    }
}

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use common::{AppError, AppResult, OptionExt};
use domain::{Entity, EntityId, FIRST_ENTITY_ID};

use super::store::Store;

/// Entries of one store plus the owner index kept beside them.
#[derive(Debug)]
pub struct StoreState<T> {
    entries: HashMap<EntityId, T>,
    by_owner: HashMap<EntityId, BTreeSet<EntityId>>,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            by_owner: HashMap::new(),
        }
    }
}

impl<T: Entity> StoreState<T> {
    /// Insert or replace an entity that already carries its identity.
    pub(crate) fn put(&mut self, id: EntityId, entity: T) {
        let owner = entity.owner_id();
        if let Some(previous) = self.entries.insert(id, entity) {
            if let Some(old_owner) = previous.owner_id() {
                if Some(old_owner) != owner {
                    self.unlink(old_owner, id);
                }
            }
        }
        if let Some(owner) = owner {
            self.by_owner.entry(owner).or_default().insert(id);
        }
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<T> {
        let removed = self.entries.remove(&id)?;
        if let Some(owner) = removed.owner_id() {
            self.unlink(owner, id);
        }
        Some(removed)
    }

    fn unlink(&mut self, owner: EntityId, id: EntityId) {
        if let Some(ids) = self.by_owner.get_mut(&owner) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_owner.remove(&owner);
            }
        }
    }

    fn owned_by(&self, owner: EntityId) -> Vec<T> {
        self.by_owner
            .get(&owner)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.entries.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Generic keyed in-memory store with identity generation.
///
/// Identities come from a per-store counter starting at 1. They are never
/// reused, even after deletion or a rolled back transaction.
pub struct EntityStore<T> {
    state: RwLock<StoreState<T>>,
    last_id: AtomicI64,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            last_id: AtomicI64::new(FIRST_ENTITY_ID - 1),
        }
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next identity. Safe under concurrent callers.
    ///
    /// Fails once the sequence has reached `EntityId::MAX`; it never wraps.
    pub(crate) fn next_id(&self) -> AppResult<EntityId> {
        self.last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .map(|last| last + 1)
            .map_err(|_| AppError::internal(format!("{} id sequence exhausted", T::KIND)))
    }

    /// Resolve the identity `entity` will be stored under.
    ///
    /// A caller-supplied identity is kept and moves the counter past it, so a
    /// later generated identity cannot land on the same key.
    pub(crate) fn identify(&self, entity: &mut T) -> AppResult<EntityId> {
        match entity.id() {
            Some(id) => {
                self.last_id.fetch_max(id, Ordering::SeqCst);
                Ok(id)
            }
            None => {
                let id = self.next_id()?;
                entity.assign_id(id);
                Ok(id)
            }
        }
    }

    pub(crate) fn read(&self) -> AppResult<RwLockReadGuard<'_, StoreState<T>>> {
        self.state
            .read()
            .map_err(|_| AppError::internal(format!("{} store lock poisoned", T::KIND)))
    }

    pub(crate) fn write(&self) -> AppResult<RwLockWriteGuard<'_, StoreState<T>>> {
        self.state
            .write()
            .map_err(|_| AppError::internal(format!("{} store lock poisoned", T::KIND)))
    }

    /// Number of stored entities
    pub fn len(&self) -> AppResult<usize> {
        Ok(self.read()?.entries.len())
    }

    pub fn is_empty(&self) -> AppResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl<T: Entity> Store<T> for EntityStore<T> {
    fn save(&self, mut entity: T) -> AppResult<T> {
        let id = self.identify(&mut entity)?;
        self.write()?.put(id, entity.clone());
        Ok(entity)
    }

    fn find_by_id(&self, id: EntityId) -> AppResult<T> {
        self.read()?
            .entries
            .get(&id)
            .cloned()
            .ok_or_not_found(T::KIND, id)
    }

    fn delete_by_id(&self, id: EntityId) -> AppResult<()> {
        self.write()?
            .remove(id)
            .map(|_| ())
            .ok_or_not_found(T::KIND, id)
    }

    fn find_all(&self) -> AppResult<Vec<T>> {
        Ok(self.read()?.entries.values().cloned().collect())
    }

    fn find_all_by_owner(&self, owner_id: EntityId) -> AppResult<Vec<T>> {
        Ok(self.read()?.owned_by(owner_id))
    }
}

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use common::{AppError, AppResult};
use domain::{Entity, EntityId};

use super::entity_store::{EntityStore, StoreState};
use super::store::Store;

/// Uncommitted writes layered over a live `EntityStore`.
///
/// Reads see the staged writes first and fall through to the live store.
/// Nothing reaches the live store until `publish`; dropping the overlay
/// discards every staged write. Identities are still drawn from the live
/// store's counter.
pub struct StagedStore<T> {
    base: Arc<EntityStore<T>>,
    /// `None` marks a staged deletion
    writes: Mutex<BTreeMap<EntityId, Option<T>>>,
}

impl<T: Entity> StagedStore<T> {
    pub fn new(base: Arc<EntityStore<T>>) -> Self {
        Self {
            base,
            writes: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn base(&self) -> &Arc<EntityStore<T>> {
        &self.base
    }

    fn writes(&self) -> AppResult<MutexGuard<'_, BTreeMap<EntityId, Option<T>>>> {
        self.writes
            .lock()
            .map_err(|_| AppError::internal(format!("staged {} writes poisoned", T::KIND)))
    }

    /// Number of staged inserts, replacements and deletions
    pub fn pending(&self) -> AppResult<usize> {
        Ok(self.writes()?.len())
    }

    /// Apply every staged write to `state` and clear the overlay.
    ///
    /// `state` must be the write-locked state of `self.base()`.
    pub(crate) fn publish(&self, state: &mut StoreState<T>) -> AppResult<()> {
        let writes = std::mem::take(&mut *self.writes()?);
        for (id, write) in writes {
            match write {
                Some(entity) => state.put(id, entity),
                None => {
                    state.remove(id);
                }
            }
        }
        Ok(())
    }
}

impl<T: Entity> Store<T> for StagedStore<T> {
    fn save(&self, mut entity: T) -> AppResult<T> {
        let id = self.base.identify(&mut entity)?;
        self.writes()?.insert(id, Some(entity.clone()));
        Ok(entity)
    }

    fn find_by_id(&self, id: EntityId) -> AppResult<T> {
        if let Some(staged) = self.writes()?.get(&id) {
            return staged
                .clone()
                .ok_or_else(|| AppError::not_found(T::KIND, id));
        }
        self.base.find_by_id(id)
    }

    fn delete_by_id(&self, id: EntityId) -> AppResult<()> {
        self.find_by_id(id)?;
        self.writes()?.insert(id, None);
        Ok(())
    }

    fn find_all(&self) -> AppResult<Vec<T>> {
        let live = self.base.find_all()?;
        let writes = self.writes()?;
        let mut all: Vec<T> = live
            .into_iter()
            .filter(|entity| entity.id().map_or(true, |id| !writes.contains_key(&id)))
            .collect();
        all.extend(writes.values().flatten().cloned());
        Ok(all)
    }

    fn find_all_by_owner(&self, owner_id: EntityId) -> AppResult<Vec<T>> {
        let live = self.base.find_all_by_owner(owner_id)?;
        let writes = self.writes()?;
        let mut owned: Vec<T> = live
            .into_iter()
            .filter(|entity| entity.id().map_or(true, |id| !writes.contains_key(&id)))
            .collect();
        owned.extend(
            writes
                .values()
                .flatten()
                .filter(|entity| entity.owner_id() == Some(owner_id))
                .cloned(),
        );
        owned.sort_by_key(|entity| entity.id());
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Book;

    fn book(owner: EntityId, title: &str) -> Book {
        Book {
            id: None,
            person_id: owner,
            title: title.to_string(),
            author: "X".to_string(),
            page_count: 10,
        }
    }

    #[test]
    fn test_staged_writes_stay_invisible_until_published() {
        let base = Arc::new(EntityStore::new());
        let staged = StagedStore::new(base.clone());

        let id = staged.save(book(1, "a")).unwrap().id.unwrap();
        assert_eq!(staged.find_by_id(id).unwrap().title, "a");
        assert!(base.find_by_id(id).unwrap_err().is_not_found());

        let mut state = base.write().unwrap();
        staged.publish(&mut state).unwrap();
        drop(state);

        assert_eq!(base.find_by_id(id).unwrap().title, "a");
        assert_eq!(staged.pending().unwrap(), 0);
    }

    #[test]
    fn test_dropped_overlay_leaves_base_untouched() {
        let base = Arc::new(EntityStore::new());
        let kept = base.save(book(1, "kept")).unwrap();

        {
            let staged = StagedStore::new(base.clone());
            staged.delete_by_id(kept.id.unwrap()).unwrap();
            staged.save(book(1, "extra")).unwrap();
            assert!(staged.find_by_id(kept.id.unwrap()).unwrap_err().is_not_found());
        }

        assert_eq!(base.find_all_by_owner(1).unwrap(), vec![kept]);
    }

    #[test]
    fn test_owner_lookup_merges_staged_and_live() {
        let base = Arc::new(EntityStore::new());
        let first = base.save(book(1, "first")).unwrap();
        let second = base.save(book(1, "second")).unwrap();
        base.save(book(2, "other")).unwrap();

        let staged = StagedStore::new(base.clone());
        staged.delete_by_id(first.id.unwrap()).unwrap();
        let mut renamed = second.clone();
        renamed.title = "renamed".to_string();
        staged.save(renamed).unwrap();
        staged.save(book(1, "third")).unwrap();

        let titles: Vec<_> = staged
            .find_all_by_owner(1)
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["renamed", "third"]);
        assert_eq!(staged.find_all().unwrap().len(), 3);
    }

    #[test]
    fn test_deleting_missing_entry_is_not_found() {
        let base: Arc<EntityStore<Book>> = Arc::new(EntityStore::new());
        let staged = StagedStore::new(base);
        assert!(staged.delete_by_id(4).unwrap_err().is_not_found());
        assert_eq!(staged.pending().unwrap(), 0);
    }
}

//! Storage capability shared by the in-memory stores.

use common::AppResult;
use domain::{Entity, EntityId};

/// Keyed persistence for one entity kind.
///
/// Implementations never suspend; every call completes or fails before
/// returning.
pub trait Store<T: Entity>: Send + Sync {
    /// Assign the next identity when `entity` has none, then insert or replace.
    fn save(&self, entity: T) -> AppResult<T>;

    /// Exact-key lookup; `NotFound` when absent.
    fn find_by_id(&self, id: EntityId) -> AppResult<T>;

    /// Remove the keyed entry; `NotFound` when absent.
    fn delete_by_id(&self, id: EntityId) -> AppResult<()>;

    /// Snapshot of every stored value, in no particular order.
    fn find_all(&self) -> AppResult<Vec<T>>;

    /// Every stored value whose owner is `owner_id`, ordered by identity.
    fn find_all_by_owner(&self, owner_id: EntityId) -> AppResult<Vec<T>>;
}

//! Identity capability shared by every stored entity.

/// Identity of a stored entity, unique within one entity collection.
pub type EntityId = i64;

/// A record that can be kept in an identity-keyed store.
///
/// The identity is `None` until the entity is first persisted; stores assign
/// it exactly once and never change it afterwards.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human readable kind, used in error messages ("User", "Book").
    const KIND: &'static str;

    fn id(&self) -> Option<EntityId>;

    fn assign_id(&mut self, id: EntityId);

    /// Identity of the owning entity, for kinds that belong to another one.
    fn owner_id(&self) -> Option<EntityId> {
        None
    }
}

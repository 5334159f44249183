//! Unit-of-work registry.
//!
//! # Responsibility
//! - Hold the new/dirty/deleted registries for one business transaction.
//! - Enforce the state transitions between those registries.
//!
//! # Invariants
//! - An entity id is present in at most one registry.
//! - Entities are held by shared reference; the caller keeps ownership.
//! - Validation always precedes mutation, so a failed call changes nothing.

use crate::model::category::Category;
use crate::model::entity::Entity;
use crate::uow::change_set::{ChangeSet, UnitOfWorkSummary};
use crate::uow::error::{UnitOfWorkError, UnitOfWorkResult};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

type Registry<E> = BTreeMap<String, Arc<E>>;

/// Transaction-scoped registry of pending entity changes.
///
/// Not meant to be shared across threads; create one per business
/// transaction and discard it (or call [`UnitOfWork::take_changes`]) once the
/// pending work has been handed to a persistence executor.
pub struct UnitOfWork<E: Entity + ?Sized = dyn Entity> {
    new_objects: Registry<E>,
    dirty_objects: Registry<E>,
    deleted_objects: Registry<E>,
}

impl<E: Entity + ?Sized> UnitOfWork<E> {
    /// Creates a registry with all three categories empty.
    pub fn new() -> Self {
        Self {
            new_objects: BTreeMap::new(),
            dirty_objects: BTreeMap::new(),
            deleted_objects: BTreeMap::new(),
        }
    }

    /// Registers an entity as pending insertion.
    ///
    /// # Errors
    /// - `MissingIdentity` when the entity id is empty.
    /// - `ConflictingState` when the id is already dirty, deleted or new
    ///   (checked in that order).
    pub fn register_new(&mut self, entity: &Arc<E>) -> UnitOfWorkResult<()> {
        let entity_id = entity.entity_id();
        let validated = require_identity(entity_id, Category::New)
            .and_then(|()| self.assert_id_not_registered_as(entity_id, Category::Dirty))
            .and_then(|()| self.assert_id_not_registered_as(entity_id, Category::Deleted))
            .and_then(|()| self.assert_id_not_registered_as(entity_id, Category::New));
        if let Err(err) = validated {
            log_rejected(Category::New, entity_id, &err);
            return Err(err);
        }

        self.new_objects.insert(entity_id.to_string(), Arc::clone(entity));
        log_outcome(Category::New, entity_id, "ok");
        Ok(())
    }

    /// Registers an entity as pending update.
    ///
    /// Re-registering a dirty entity replaces the stored reference. An entity
    /// that is still new stays new and this call does nothing.
    ///
    /// # Errors
    /// - `MissingIdentity` when the entity id is empty.
    /// - `ConflictingState` when the id is already registered as deleted.
    pub fn register_dirty(&mut self, entity: &Arc<E>) -> UnitOfWorkResult<()> {
        let entity_id = entity.entity_id();
        let validated = require_identity(entity_id, Category::Dirty)
            .and_then(|()| self.assert_id_not_registered_as(entity_id, Category::Deleted));
        if let Err(err) = validated {
            log_rejected(Category::Dirty, entity_id, &err);
            return Err(err);
        }

        if self.new_objects.contains_key(entity_id) {
            log_outcome(Category::Dirty, entity_id, "skipped");
            return Ok(());
        }

        self.dirty_objects.insert(entity_id.to_string(), Arc::clone(entity));
        log_outcome(Category::Dirty, entity_id, "ok");
        Ok(())
    }

    /// Registers an entity as pending removal.
    ///
    /// A new entity has never been persisted, so deleting it just cancels its
    /// creation and leaves no trace. Otherwise any pending update is dropped
    /// and the entity moves to the deleted registry; a repeat call keeps the
    /// first stored reference.
    ///
    /// # Errors
    /// - `MissingIdentity` when the entity id is empty.
    pub fn register_deleted(&mut self, entity: &Arc<E>) -> UnitOfWorkResult<()> {
        let entity_id = entity.entity_id();
        if let Err(err) = require_identity(entity_id, Category::Deleted) {
            log_rejected(Category::Deleted, entity_id, &err);
            return Err(err);
        }

        if self.new_objects.remove(entity_id).is_some() {
            log_outcome(Category::Deleted, entity_id, "discarded");
            return Ok(());
        }

        self.dirty_objects.remove(entity_id);
        self.deleted_objects
            .entry(entity_id.to_string())
            .or_insert_with(|| Arc::clone(entity));
        log_outcome(Category::Deleted, entity_id, "ok");
        Ok(())
    }

    /// Fails with `ConflictingState` when the entity id is already present in
    /// `category`.
    pub fn assert_not_registered_as(
        &self,
        entity: &E,
        category: Category,
    ) -> UnitOfWorkResult<()> {
        self.assert_id_not_registered_as(entity.entity_id(), category)
    }

    /// Pending insertions keyed by entity id.
    pub fn new_objects(&self) -> &BTreeMap<String, Arc<E>> {
        &self.new_objects
    }

    /// Pending updates keyed by entity id.
    pub fn dirty_objects(&self) -> &BTreeMap<String, Arc<E>> {
        &self.dirty_objects
    }

    /// Pending removals keyed by entity id.
    pub fn deleted_objects(&self) -> &BTreeMap<String, Arc<E>> {
        &self.deleted_objects
    }

    /// Returns the registry backing one category.
    pub fn objects(&self, category: Category) -> &BTreeMap<String, Arc<E>> {
        match category {
            Category::New => &self.new_objects,
            Category::Dirty => &self.dirty_objects,
            Category::Deleted => &self.deleted_objects,
        }
    }

    /// Returns the entity registered under `category` with `entity_id`.
    pub fn get(&self, category: Category, entity_id: &str) -> Option<&Arc<E>> {
        self.objects(category).get(entity_id)
    }

    /// Returns the category an entity id is currently registered under.
    pub fn state_of(&self, entity_id: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| self.objects(*category).contains_key(entity_id))
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.state_of(entity_id).is_some()
    }

    /// Total number of tracked entities across all categories.
    pub fn len(&self) -> usize {
        self.new_objects.len() + self.dirty_objects.len() + self.deleted_objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-category counts.
    pub fn summary(&self) -> UnitOfWorkSummary {
        UnitOfWorkSummary {
            new: self.new_objects.len(),
            dirty: self.dirty_objects.len(),
            deleted: self.deleted_objects.len(),
        }
    }

    /// Forgets every registration.
    pub fn clear(&mut self) {
        self.new_objects.clear();
        self.dirty_objects.clear();
        self.deleted_objects.clear();
    }

    /// Drains all pending work into a [`ChangeSet`], leaving this registry
    /// empty and ready for the next transaction.
    pub fn take_changes(&mut self) -> ChangeSet<E> {
        let changes = ChangeSet {
            inserts: std::mem::take(&mut self.new_objects).into_values().collect(),
            updates: std::mem::take(&mut self.dirty_objects)
                .into_values()
                .collect(),
            deletes: std::mem::take(&mut self.deleted_objects)
                .into_values()
                .collect(),
        };
        debug!(
            "event=uow_take_changes module=uow status=ok inserts={} updates={} deletes={}",
            changes.inserts.len(),
            changes.updates.len(),
            changes.deletes.len()
        );
        changes
    }

    fn assert_id_not_registered_as(
        &self,
        entity_id: &str,
        category: Category,
    ) -> UnitOfWorkResult<()> {
        if self.objects(category).contains_key(entity_id) {
            return Err(UnitOfWorkError::ConflictingState {
                entity_id: entity_id.to_string(),
                registered_as: category,
            });
        }
        Ok(())
    }
}

impl<E: Entity + ?Sized> Default for UnitOfWork<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity + ?Sized> Clone for UnitOfWork<E> {
    fn clone(&self) -> Self {
        Self {
            new_objects: self.new_objects.clone(),
            dirty_objects: self.dirty_objects.clone(),
            deleted_objects: self.deleted_objects.clone(),
        }
    }
}

impl<E: Entity + ?Sized> Debug for UnitOfWork<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("new", &self.new_objects.keys().collect::<Vec<_>>())
            .field("dirty", &self.dirty_objects.keys().collect::<Vec<_>>())
            .field("deleted", &self.deleted_objects.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn require_identity(entity_id: &str, target: Category) -> UnitOfWorkResult<()> {
    if entity_id.is_empty() {
        return Err(UnitOfWorkError::MissingIdentity { target });
    }
    Ok(())
}

fn log_outcome(category: Category, entity_id: &str, status: &str) {
    debug!(
        "event=uow_register module=uow status={} category={} entity_id={}",
        status,
        category,
        log_entity_id(entity_id)
    );
}

fn log_rejected(category: Category, entity_id: &str, err: &UnitOfWorkError) {
    warn!(
        "event=uow_register module=uow status=rejected category={} entity_id={} error_code={} error={}",
        category,
        log_entity_id(entity_id),
        err.error_code(),
        err
    );
}

fn log_entity_id(entity_id: &str) -> &str {
    if entity_id.is_empty() {
        "none"
    } else {
        entity_id
    }
}

#[cfg(test)]
mod tests {
    use super::{log_entity_id, UnitOfWork};
    use crate::model::category::Category;
    use crate::model::entity::Entity;
    use crate::uow::error::UnitOfWorkError;
    use std::sync::Arc;

    #[derive(Debug)]
    struct EntityStub {
        id: String,
    }

    impl EntityStub {
        fn shared(id: &str) -> Arc<Self> {
            Arc::new(Self { id: id.to_string() })
        }
    }

    impl Entity for EntityStub {
        fn entity_id(&self) -> &str {
            &self.id
        }
    }

    #[test]
    fn new_unit_of_work_is_empty() {
        let unit: UnitOfWork<EntityStub> = UnitOfWork::new();
        assert!(unit.new_objects.is_empty());
        assert!(unit.dirty_objects.is_empty());
        assert!(unit.deleted_objects.is_empty());
        assert!(unit.is_empty());
    }

    #[test]
    fn assert_not_registered_as_covers_every_category() {
        let mut unit = UnitOfWork::new();
        let entity = EntityStub::shared("5");
        unit.register_dirty(&entity).expect("dirty registration should succeed");

        assert!(unit.assert_not_registered_as(&entity, Category::New).is_ok());
        assert!(unit.assert_not_registered_as(&entity, Category::Deleted).is_ok());
        let err = unit
            .assert_not_registered_as(&entity, Category::Dirty)
            .expect_err("dirty entity must be reported");
        assert_eq!(
            err,
            UnitOfWorkError::ConflictingState {
                entity_id: "5".to_string(),
                registered_as: Category::Dirty,
            }
        );
    }

    #[test]
    fn log_entity_id_marks_missing_identity() {
        assert_eq!(log_entity_id(""), "none");
        assert_eq!(log_entity_id("5"), "5");
    }

    #[test]
    fn debug_lists_ids_per_category() {
        let mut unit = UnitOfWork::new();
        unit.register_new(&EntityStub::shared("1")).unwrap();
        unit.register_dirty(&EntityStub::shared("2")).unwrap();
        unit.register_deleted(&EntityStub::shared("3")).unwrap();

        let rendered = format!("{unit:?}");
        assert_eq!(
            rendered,
            r#"UnitOfWork { new: ["1"], dirty: ["2"], deleted: ["3"] }"#
        );
    }

    #[test]
    fn clone_shares_entity_references() {
        let mut unit = UnitOfWork::new();
        let entity = EntityStub::shared("5");
        unit.register_new(&entity).unwrap();

        let copy = unit.clone();
        unit.clear();

        assert!(unit.is_empty());
        let stored = copy.get(Category::New, "5").expect("clone keeps registration");
        assert!(Arc::ptr_eq(stored, &entity));
    }

    #[test]
    fn dyn_entity_registry_accepts_mixed_types() {
        struct Other;
        impl Entity for Other {
            fn entity_id(&self) -> &str {
                "other"
            }
        }

        let mut unit: UnitOfWork = UnitOfWork::new();
        let stub: Arc<dyn Entity> = EntityStub::shared("5");
        let other: Arc<dyn Entity> = Arc::new(Other);
        unit.register_new(&stub).unwrap();
        unit.register_dirty(&other).unwrap();

        assert_eq!(unit.state_of("5"), Some(Category::New));
        assert_eq!(unit.state_of("other"), Some(Category::Dirty));
    }
}

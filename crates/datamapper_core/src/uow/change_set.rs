//! Drained unit-of-work contents handed to a persistence executor.
//!
//! Nothing here talks to storage. A caller enumerates the change set and
//! issues inserts, updates and deletes against its own backend.

use crate::model::category::Category;
use crate::model::entity::Entity;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Per-category counts for one unit of work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOfWorkSummary {
    pub new: usize,
    pub dirty: usize,
    pub deleted: usize,
}

impl UnitOfWorkSummary {
    pub fn total(&self) -> usize {
        self.new + self.dirty + self.deleted
    }
}

/// Pending work drained from a [`crate::UnitOfWork`], ordered by entity id
/// within each category.
pub struct ChangeSet<E: Entity + ?Sized = dyn Entity> {
    pub inserts: Vec<Arc<E>>,
    pub updates: Vec<Arc<E>>,
    pub deletes: Vec<Arc<E>>,
}

impl<E: Entity + ?Sized> ChangeSet<E> {
    pub fn len(&self) -> usize {
        self.inserts.len() + self.updates.len() + self.deletes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summary(&self) -> UnitOfWorkSummary {
        UnitOfWorkSummary {
            new: self.inserts.len(),
            dirty: self.updates.len(),
            deleted: self.deletes.len(),
        }
    }

    /// Yields every entity tagged with its category: inserts, then updates,
    /// then deletes.
    ///
    /// This is a suggested default sequence only; executors are free to
    /// reorder.
    pub fn in_commit_order(&self) -> impl Iterator<Item = (Category, &Arc<E>)> + '_ {
        let inserts = self.inserts.iter().map(|entity| (Category::New, entity));
        let updates = self.updates.iter().map(|entity| (Category::Dirty, entity));
        let deletes = self
            .deletes
            .iter()
            .map(|entity| (Category::Deleted, entity));
        inserts.chain(updates).chain(deletes)
    }

    /// Entity ids per category, in commit order.
    pub fn entity_ids(&self) -> Vec<(Category, String)> {
        self.in_commit_order()
            .map(|(category, entity)| (category, entity.entity_id().to_string()))
            .collect()
    }
}

impl<E: Entity + ?Sized> Debug for ChangeSet<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeSet")
            .field("inserts", &ids(&self.inserts))
            .field("updates", &ids(&self.updates))
            .field("deletes", &ids(&self.deletes))
            .finish()
    }
}

fn ids<E: Entity + ?Sized>(entities: &[Arc<E>]) -> Vec<&str> {
    entities.iter().map(|entity| entity.entity_id()).collect()
}

#[cfg(test)]
mod tests {
    use super::{ChangeSet, UnitOfWorkSummary};
    use crate::model::entity::Entity;
    use std::sync::Arc;

    struct Row(&'static str);

    impl Entity for Row {
        fn entity_id(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn debug_lists_ids_per_category() {
        let changes = ChangeSet {
            inserts: vec![Arc::new(Row("a")), Arc::new(Row("b"))],
            updates: Vec::new(),
            deletes: vec![Arc::new(Row("z"))],
        };

        assert_eq!(
            format!("{changes:?}"),
            r#"ChangeSet { inserts: ["a", "b"], updates: [], deletes: ["z"] }"#
        );
    }

    #[test]
    fn summary_total_adds_categories() {
        let summary = UnitOfWorkSummary {
            new: 2,
            dirty: 1,
            deleted: 3,
        };
        assert_eq!(summary.total(), 6);
        assert_eq!(UnitOfWorkSummary::default().total(), 0);
    }

    #[test]
    fn summary_serializes_with_category_field_names() {
        let json = serde_json::to_value(UnitOfWorkSummary {
            new: 1,
            dirty: 0,
            deleted: 2,
        })
        .unwrap();
        assert_eq!(json["new"], 1);
        assert_eq!(json["dirty"], 0);
        assert_eq!(json["deleted"], 2);
    }
}

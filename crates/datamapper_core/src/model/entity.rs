//! Entity identity capability.
//!
//! # Responsibility
//! - Describe the only contract the unit of work needs from domain objects.
//!
//! # Invariants
//! - `entity_id` is stable for the lifetime of a unit of work.
//! - An empty id means "no identity yet"; such entities cannot be tracked.

use std::sync::Arc;

/// Anything that exposes a stable identity string.
///
/// Identity generation and field mapping live outside this crate; the unit of
/// work only keys its registries by `entity_id`.
pub trait Entity {
    /// Returns the stable identity, or an empty string when none is assigned.
    fn entity_id(&self) -> &str;

    /// Returns whether this entity carries a non-empty identity.
    fn has_identity(&self) -> bool {
        !self.entity_id().is_empty()
    }
}

impl<T: Entity + ?Sized> Entity for &T {
    fn entity_id(&self) -> &str {
        (**self).entity_id()
    }
}

impl<T: Entity + ?Sized> Entity for Box<T> {
    fn entity_id(&self) -> &str {
        (**self).entity_id()
    }
}

impl<T: Entity + ?Sized> Entity for Arc<T> {
    fn entity_id(&self) -> &str {
        (**self).entity_id()
    }
}

#[cfg(test)]
mod tests {
    use super::Entity;
    use std::sync::Arc;

    struct Stub(String);

    impl Entity for Stub {
        fn entity_id(&self) -> &str {
            &self.0
        }
    }

    #[test]
    fn has_identity_is_false_for_empty_id() {
        assert!(!Stub(String::new()).has_identity());
        assert!(Stub("5".to_string()).has_identity());
    }

    #[test]
    fn wrappers_forward_identity() {
        let boxed: Box<dyn Entity> = Box::new(Stub("7".to_string()));
        assert_eq!(boxed.entity_id(), "7");

        let shared = Arc::new(Stub("9".to_string()));
        assert_eq!(Entity::entity_id(&shared), "9");
        assert_eq!(Entity::entity_id(&&*shared), "9");
    }
}

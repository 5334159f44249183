//! Unit-of-work registry and the snapshot it hands to a persistence executor.
//!
//! # Responsibility
//! - Track entities as new, dirty or deleted for one business transaction.
//! - Reject registrations that would leave an entity in two categories.
//! - Expose pending work per category without performing any I/O.
//!
//! # Invariants
//! - An entity id appears in at most one category at any time.
//! - Every registration validates fully before mutating any category.

pub mod change_set;
pub mod error;
pub mod unit_of_work;

//! Domain-facing contracts consumed by the unit of work.
//!
//! # Responsibility
//! - Define the identity capability every tracked entity must expose.
//! - Define the closed set of registration categories.
//!
//! # Invariants
//! - The registry never inspects entity fields beyond `Entity::entity_id`.
//! - Category names only enter as strings at the outer boundary (`parse_category`).

pub mod category;
pub mod entity;

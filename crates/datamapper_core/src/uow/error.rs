//! Registration error taxonomy.

use crate::model::category::Category;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type UnitOfWorkResult<T> = Result<T, UnitOfWorkError>;

/// Recoverable registration failure returned to the caller.
///
/// Both variants indicate caller misuse; neither is expected during normal
/// operation and neither leaves a partially mutated registry behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOfWorkError {
    /// Entity returned an empty id when registering under `target`.
    MissingIdentity { target: Category },
    /// Entity id is already tracked under an incompatible category.
    ConflictingState {
        entity_id: String,
        registered_as: Category,
    },
}

impl UnitOfWorkError {
    /// Stable machine-readable code used in log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingIdentity { .. } => "missing_identity",
            Self::ConflictingState { .. } => "conflicting_state",
        }
    }
}

impl Display for UnitOfWorkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingIdentity { target } => {
                write!(f, "registering entity as {target} failed: entity has no ID")
            }
            Self::ConflictingState {
                entity_id,
                registered_as,
            } => write!(
                f,
                "registering entity failed: entity with ID \"{entity_id}\" is already registered as {registered_as}"
            ),
        }
    }
}

impl Error for UnitOfWorkError {}

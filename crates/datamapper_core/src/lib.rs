//! Transaction-scoped change tracking for domain entities.
//! This crate owns the unit-of-work registry and its state-transition rules.

pub mod logging;
pub mod model;
pub mod uow;

pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::category::{parse_category, Category, CategoryParseError};
pub use model::entity::Entity;
pub use uow::change_set::{ChangeSet, UnitOfWorkSummary};
pub use uow::error::{UnitOfWorkError, UnitOfWorkResult};
pub use uow::unit_of_work::UnitOfWork;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

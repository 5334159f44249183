//! Registration categories tracked by a unit of work.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Persistence state an entity can be registered under.
///
/// The set is closed: every lookup by category is total, so there is no
/// "unknown category" path inside the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Pending insertion; never persisted.
    New,
    /// Pending update of a persisted entity.
    Dirty,
    /// Pending removal of a persisted entity.
    Deleted,
}

/// Manifest-style string value for [`Category::New`].
pub const CATEGORY_NEW: &str = "new";
/// Manifest-style string value for [`Category::Dirty`].
pub const CATEGORY_DIRTY: &str = "dirty";
/// Manifest-style string value for [`Category::Deleted`].
pub const CATEGORY_DELETED: &str = "deleted";

impl Category {
    /// All categories, in the default commit sequence (inserts, updates, deletes).
    pub const ALL: [Category; 3] = [Category::New, Category::Dirty, Category::Deleted];

    /// Stable lowercase name used in messages and log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => CATEGORY_NEW,
            Self::Dirty => CATEGORY_DIRTY,
            Self::Deleted => CATEGORY_DELETED,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category name parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryParseError {
    Empty,
    Unsupported(String),
}

impl Display for CategoryParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "category name cannot be empty"),
            Self::Unsupported(value) => write!(
                f,
                "unknown registry for state of persistence: `{value}`; expected new|dirty|deleted"
            ),
        }
    }
}

impl Error for CategoryParseError {}

/// Parses one category from its string name.
///
/// Input is trimmed; matching is exact (lowercase).
pub fn parse_category(value: &str) -> Result<Category, CategoryParseError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(CategoryParseError::Empty);
    }

    match normalized {
        CATEGORY_NEW => Ok(Category::New),
        CATEGORY_DIRTY => Ok(Category::Dirty),
        CATEGORY_DELETED => Ok(Category::Deleted),
        other => Err(CategoryParseError::Unsupported(other.to_string())),
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_category(s)
    }
}

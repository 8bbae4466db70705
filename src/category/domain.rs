//! Category domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, TransactionType, database_id::CategoryId, user::UserID};

/// The name of a category, trimmed and lowercased.
///
/// Two names that differ only in case or surrounding whitespace are the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name from `name`, normalizing it.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let normalized = name.trim().to_lowercase();

        if normalized.is_empty() {
            Err(Error::Validation("category name cannot be empty".to_owned()))
        } else {
            Ok(Self(normalized))
        }
    }

    /// Create a category name without normalizing or validating it.
    ///
    /// The caller should ensure `name` is already normalized, e.g. it was read from the database.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user-defined label for classifying transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The user who owns the category.
    pub user_id: UserID,
    /// The normalized name, unique per user.
    pub name: CategoryName,
    /// Whether the category is for income or expenses.
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

/// The request body for creating or updating a category.
///
/// Both fields are required when creating and optional when updating.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryForm {
    /// The category name, normalized before use.
    pub name: Option<String>,
    /// "income" or "expense" in any case.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

//! This file defines the `Category` type and the types needed to create one.
//! A category labels transactions of one type; it is either owned by a
//! single user or shared across all users.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    models::{DatabaseID, TransactionType},
    ownership::Ownership,
};

/// The name of a category.
///
/// Guaranteed to be a non-empty string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] if `name` is empty or whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            Err(Error::Validation(
                "category name must not be empty".to_string(),
            ))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty. This function
    /// has `_unchecked` in the name but is not `unsafe`: violating the
    /// non-empty invariant causes incorrect behaviour, not memory unsafety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fields needed to create a [Category]; the store assigns the ID and
/// timestamps on insert.
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// The name of the category, unique within its ownership scope.
    pub name: CategoryName,
    /// A display color tag, e.g. "#ff6600".
    pub color: String,
    /// Which transaction type the category applies to.
    pub transaction_type: TransactionType,
    /// Whether the category belongs to one user or is shared.
    pub ownership: Ownership,
}

/// A label for transactions, e.g. 'Groceries', 'Wages'.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// The ID of the category.
    pub id: DatabaseID,
    /// The name of the category, unique within its ownership scope.
    pub name: CategoryName,
    /// A display color tag.
    pub color: String,
    /// Which transaction type the category applies to.
    pub transaction_type: TransactionType,
    /// Whether the category belongs to one user or is shared across all
    /// users.
    pub ownership: Ownership,
    /// When the category was created.
    pub created_at: OffsetDateTime,
    /// When the category was last changed.
    pub updated_at: OffsetDateTime,
}

impl Category {
    /// Update the category's name, color and type.
    pub fn update(&mut self, name: CategoryName, color: String, transaction_type: TransactionType) {
        self.name = name;
        self.color = color;
        self.transaction_type = transaction_type;
        self.updated_at = OffsetDateTime::now_utc();
    }
}

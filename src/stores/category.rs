//! Defines the category store trait.

use crate::{
    Error,
    models::{Category, CategoryName, DatabaseID, NewCategory, UserID},
    ownership::Ownership,
};

/// Creates and retrieves transaction categories.
pub trait CategoryStore {
    /// Create a new category and add it to the store.
    fn create(&self, new_category: NewCategory) -> Result<Category, Error>;

    /// Get a category by its ID.
    ///
    /// Returns [Error::NotFound] if no category with the given ID exists.
    fn get(&self, category_id: DatabaseID) -> Result<Category, Error>;

    /// Get all categories visible to a user: their own plus the shared
    /// scope. Owner filtering happens in the query, never by scanning in
    /// application code.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Category>, Error>;

    /// Whether a category with `name` exists within the given ownership
    /// scope.
    fn exists_by_name(&self, ownership: Ownership, name: &CategoryName) -> Result<bool, Error>;

    /// Persist changes to an existing category.
    ///
    /// Returns [Error::NotFound] if the category does not exist.
    fn update(&self, category: &Category) -> Result<(), Error>;

    /// Delete a category.
    ///
    /// Returns [Error::NotFound] if nothing was deleted.
    fn delete(&self, category_id: DatabaseID) -> Result<(), Error>;
}

//! Category management: validation, scope-unique names and the ownership
//! guard.

use crate::{
    Error,
    models::{Category, CategoryName, DatabaseID, NewCategory, TransactionType, UserID},
    ownership::Ownership,
    stores::CategoryStore,
};

/// Handles the creation and maintenance of transaction categories.
#[derive(Debug, Clone)]
pub struct CategoryService<C> {
    store: C,
}

impl<C> CategoryService<C>
where
    C: CategoryStore,
{
    /// Create a category service backed by `store`.
    pub fn new(store: C) -> Self {
        Self { store }
    }

    /// Create a category owned by `user_id`, or a shared category when
    /// `shared` is set.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] for an empty name or color and
    /// [Error::AlreadyExists] when the name is taken within the same
    /// ownership scope.
    pub fn create(
        &self,
        user_id: UserID,
        name: &str,
        color: &str,
        transaction_type: TransactionType,
        shared: bool,
    ) -> Result<Category, Error> {
        let name = CategoryName::new(name)?;
        validate_color(color)?;

        let ownership = if shared {
            Ownership::Shared
        } else {
            Ownership::Owned(user_id)
        };

        if self.store.exists_by_name(ownership, &name)? {
            return Err(Error::AlreadyExists("category".to_string()));
        }

        self.store.create(NewCategory {
            name,
            color: color.to_string(),
            transaction_type,
            ownership,
        })
    }

    /// Get a category the user may access.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] when the category does not exist and
    /// [Error::Forbidden] when it belongs to another user.
    pub fn get(&self, user_id: UserID, category_id: DatabaseID) -> Result<Category, Error> {
        let category = self.store.get(category_id)?;
        category.ownership.assert_accessible(user_id)?;

        Ok(category)
    }

    /// List the user's categories plus the shared scope.
    pub fn list(&self, user_id: UserID) -> Result<Vec<Category>, Error> {
        self.store.get_by_user(user_id)
    }

    /// Update a category's name, color and type.
    ///
    /// Shared categories may be updated by any authenticated user.
    pub fn update(
        &self,
        user_id: UserID,
        category_id: DatabaseID,
        name: &str,
        color: &str,
        transaction_type: TransactionType,
    ) -> Result<Category, Error> {
        let mut category = self.store.get(category_id)?;
        category.ownership.assert_accessible(user_id)?;

        let name = CategoryName::new(name)?;
        validate_color(color)?;

        if name != category.name && self.store.exists_by_name(category.ownership, &name)? {
            return Err(Error::AlreadyExists("category".to_string()));
        }

        category.update(name, color.to_string(), transaction_type);
        self.store.update(&category)?;

        Ok(category)
    }

    /// Delete a category the user may access.
    pub fn delete(&self, user_id: UserID, category_id: DatabaseID) -> Result<(), Error> {
        let category = self.store.get(category_id)?;
        category.ownership.assert_accessible(user_id)?;

        self.store.delete(category_id)
    }
}

fn validate_color(color: &str) -> Result<(), Error> {
    if color.trim().is_empty() {
        return Err(Error::Validation("color must not be empty".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod category_service_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        models::{NewUser, TransactionType, User},
        ownership::Ownership,
        stores::{
            UserStore,
            sqlite::{SQLiteCategoryStore, SQLiteUserStore},
        },
    };

    use super::CategoryService;

    fn get_service_and_users() -> (CategoryService<SQLiteCategoryStore>, User, User) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let connection = Arc::new(Mutex::new(connection));
        let user_store = SQLiteUserStore::new(connection.clone());

        let alice = user_store
            .create(NewUser {
                name: "Alice".to_string(),
                email: EmailAddress::from_str("alice@example.com").unwrap(),
                password_hash: "hash".to_string(),
            })
            .unwrap();
        let bob = user_store
            .create(NewUser {
                name: "Bob".to_string(),
                email: EmailAddress::from_str("bob@example.com").unwrap(),
                password_hash: "hash".to_string(),
            })
            .unwrap();

        (
            CategoryService::new(SQLiteCategoryStore::new(connection)),
            alice,
            bob,
        )
    }

    #[test]
    fn create_rejects_duplicate_name_in_same_scope() {
        let (service, alice, _) = get_service_and_users();
        service
            .create(alice.id, "Groceries", "#00ff00", TransactionType::Expense, false)
            .unwrap();

        let result =
            service.create(alice.id, "Groceries", "#ff0000", TransactionType::Expense, false);

        assert_eq!(result, Err(Error::AlreadyExists("category".to_string())));
    }

    #[test]
    fn same_name_is_allowed_across_scopes() {
        let (service, alice, bob) = get_service_and_users();
        service
            .create(alice.id, "Groceries", "#00ff00", TransactionType::Expense, false)
            .unwrap();

        // Bob's scope and the shared scope are separate namespaces.
        assert!(
            service
                .create(bob.id, "Groceries", "#00ff00", TransactionType::Expense, false)
                .is_ok()
        );
        assert!(
            service
                .create(alice.id, "Groceries", "#00ff00", TransactionType::Expense, true)
                .is_ok()
        );
    }

    #[test]
    fn create_rejects_empty_color() {
        let (service, alice, _) = get_service_and_users();

        let result = service.create(alice.id, "Groceries", "  ", TransactionType::Expense, false);

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn get_owned_category_is_forbidden_for_other_users() {
        let (service, alice, bob) = get_service_and_users();
        let category = service
            .create(alice.id, "Groceries", "#00ff00", TransactionType::Expense, false)
            .unwrap();

        assert_eq!(service.get(bob.id, category.id), Err(Error::Forbidden));
    }

    #[test]
    fn shared_category_is_accessible_and_mutable_by_anyone() {
        let (service, alice, bob) = get_service_and_users();
        let category = service
            .create(alice.id, "Utilities", "#0000ff", TransactionType::Expense, true)
            .unwrap();

        assert!(service.get(bob.id, category.id).is_ok());

        let updated = service
            .update(bob.id, category.id, "Bills", "#0000ff", TransactionType::Expense)
            .unwrap();
        assert_eq!(updated.name.as_ref(), "Bills");
        assert_eq!(updated.ownership, Ownership::Shared);
    }

    #[test]
    fn list_returns_own_and_shared_categories() {
        let (service, alice, bob) = get_service_and_users();
        service
            .create(alice.id, "Mine", "#00ff00", TransactionType::Expense, false)
            .unwrap();
        service
            .create(bob.id, "His", "#00ff00", TransactionType::Expense, false)
            .unwrap();
        service
            .create(alice.id, "Ours", "#00ff00", TransactionType::Expense, true)
            .unwrap();

        let categories = service.list(alice.id).unwrap();

        let names: Vec<&str> = categories
            .iter()
            .map(|category| category.name.as_ref())
            .collect();
        assert_eq!(names, vec!["Mine", "Ours"]);
    }

    #[test]
    fn update_allows_keeping_the_same_name() {
        let (service, alice, _) = get_service_and_users();
        let category = service
            .create(alice.id, "Groceries", "#00ff00", TransactionType::Expense, false)
            .unwrap();

        let updated = service
            .update(alice.id, category.id, "Groceries", "#ff6600", TransactionType::Expense)
            .unwrap();

        assert_eq!(updated.color, "#ff6600");
    }

    #[test]
    fn delete_is_forbidden_for_other_users() {
        let (service, alice, bob) = get_service_and_users();
        let category = service
            .create(alice.id, "Groceries", "#00ff00", TransactionType::Expense, false)
            .unwrap();

        assert_eq!(service.delete(bob.id, category.id), Err(Error::Forbidden));
        assert!(service.get(alice.id, category.id).is_ok());
    }

    #[test]
    fn delete_missing_category_returns_not_found() {
        let (service, alice, _) = get_service_and_users();

        assert_eq!(service.delete(alice.id, 999), Err(Error::NotFound));
    }
}

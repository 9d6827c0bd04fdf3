//! Implements a SQLite backed category store.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, Row, types::Type};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Category, CategoryName, DatabaseID, NewCategory, TransactionType, UserID},
    ownership::Ownership,
    stores::CategoryStore,
};

/// Creates and retrieves categories to/from a SQLite database.
///
/// A shared category is stored with a NULL `user_id`; owned categories
/// carry the owner's ID. The mapping between the nullable column and
/// [Ownership] happens only in this module.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    fn create(&self, new_category: NewCategory) -> Result<Category, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;
        let now = OffsetDateTime::now_utc();
        let owner = new_category.ownership.user_id().map(|id| id.as_i64());

        connection.execute(
            "INSERT INTO category (name, color, transaction_type, user_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                new_category.name.as_ref(),
                &new_category.color,
                new_category.transaction_type.as_str(),
                owner,
                now,
                now,
            ),
        )?;

        let id = connection.last_insert_rowid();

        Ok(Category {
            id,
            name: new_category.name,
            color: new_category.color,
            transaction_type: new_category.transaction_type,
            ownership: new_category.ownership,
            created_at: now,
            updated_at: now,
        })
    }

    fn get(&self, category_id: DatabaseID) -> Result<Category, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "SELECT id, name, color, transaction_type, user_id, created_at, updated_at
                 FROM category WHERE id = :id",
            )?
            .query_row(&[(":id", &category_id)], Self::map_row)
            .map_err(|error| error.into())
    }

    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Category>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "SELECT id, name, color, transaction_type, user_id, created_at, updated_at
                 FROM category WHERE user_id = :user_id OR user_id IS NULL
                 ORDER BY name ASC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }

    fn exists_by_name(&self, ownership: Ownership, name: &CategoryName) -> Result<bool, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        let count: i64 = match ownership {
            Ownership::Owned(user_id) => connection
                .prepare("SELECT COUNT(*) FROM category WHERE name = ?1 AND user_id = ?2")?
                .query_row((name.as_ref(), user_id.as_i64()), |row| row.get(0))?,
            Ownership::Shared => connection
                .prepare("SELECT COUNT(*) FROM category WHERE name = ?1 AND user_id IS NULL")?
                .query_row((name.as_ref(),), |row| row.get(0))?,
        };

        Ok(count > 0)
    }

    fn update(&self, category: &Category) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute(
                "UPDATE category SET name = ?1, color = ?2, transaction_type = ?3, updated_at = ?4
                 WHERE id = ?5",
                (
                    category.name.as_ref(),
                    &category.color,
                    category.transaction_type.as_str(),
                    category.updated_at,
                    category.id,
                ),
            )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    fn delete(&self, category_id: DatabaseID) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute("DELETE FROM category WHERE id = ?1", (category_id,))?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                color TEXT NOT NULL,
                transaction_type TEXT NOT NULL,
                user_id INTEGER REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;

        let raw_name: String = row.get(offset + 1)?;
        let name = CategoryName::new_unchecked(&raw_name);

        let color = row.get(offset + 2)?;

        let raw_type: String = row.get(offset + 3)?;
        let transaction_type = TransactionType::from_str(&raw_type).map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                offset + 3,
                Type::Text,
                raw_type.into(),
            )
        })?;

        let raw_user_id: Option<i64> = row.get(offset + 4)?;
        let ownership = Ownership::from(raw_user_id);

        let created_at = row.get(offset + 5)?;
        let updated_at = row.get(offset + 6)?;

        Ok(Category {
            id,
            name,
            color,
            transaction_type,
            ownership,
            created_at,
            updated_at,
        })
    }
}

#[cfg(test)]
mod category_store_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        models::{CategoryName, NewCategory, NewUser, TransactionType, User},
        ownership::Ownership,
        stores::{CategoryStore, UserStore, sqlite::SQLiteUserStore},
    };

    use super::SQLiteCategoryStore;

    fn get_test_store_and_user() -> (SQLiteCategoryStore, User) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let connection = Arc::new(Mutex::new(connection));

        let user = SQLiteUserStore::new(connection.clone())
            .create(NewUser {
                name: "Test User".to_string(),
                email: EmailAddress::from_str("hello@world.com").unwrap(),
                password_hash: "hunter2-hashed".to_string(),
            })
            .unwrap();

        (SQLiteCategoryStore::new(connection), user)
    }

    fn new_category(name: &str, ownership: Ownership) -> NewCategory {
        NewCategory {
            name: CategoryName::new(name).unwrap(),
            color: "#ff6600".to_string(),
            transaction_type: TransactionType::Expense,
            ownership,
        }
    }

    #[test]
    fn create_category_succeeds() {
        let (store, user) = get_test_store_and_user();

        let category = store
            .create(new_category("Groceries", Ownership::Owned(user.id)))
            .unwrap();

        assert!(category.id > 0);
        assert_eq!(category.name.as_ref(), "Groceries");
        assert_eq!(category.ownership, Ownership::Owned(user.id));
    }

    #[test]
    fn create_category_with_invalid_user_fails() {
        let (store, _) = get_test_store_and_user();

        let result = store.create(new_category(
            "Groceries",
            Ownership::Owned(crate::models::UserID::new(999)),
        ));

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn get_category_round_trips() {
        let (store, user) = get_test_store_and_user();
        let inserted = store
            .create(new_category("Rent", Ownership::Owned(user.id)))
            .unwrap();

        let retrieved = store.get(inserted.id).unwrap();

        assert_eq!(retrieved, inserted);
    }

    #[test]
    fn get_shared_category_round_trips() {
        let (store, _) = get_test_store_and_user();
        let inserted = store
            .create(new_category("Salary", Ownership::Shared))
            .unwrap();

        let retrieved = store.get(inserted.id).unwrap();

        assert_eq!(retrieved.ownership, Ownership::Shared);
    }

    #[test]
    fn get_by_user_includes_own_and_shared_only() {
        let (store, user) = get_test_store_and_user();
        store
            .create(new_category("Mine", Ownership::Owned(user.id)))
            .unwrap();
        store.create(new_category("Ours", Ownership::Shared)).unwrap();

        let categories = store.get_by_user(user.id).unwrap();

        let names: Vec<&str> = categories
            .iter()
            .map(|category| category.name.as_ref())
            .collect();
        assert_eq!(names, vec!["Mine", "Ours"]);
    }

    #[test]
    fn exists_by_name_is_scoped_by_ownership() {
        let (store, user) = get_test_store_and_user();
        let name = CategoryName::new("Groceries").unwrap();
        store
            .create(new_category("Groceries", Ownership::Owned(user.id)))
            .unwrap();

        assert!(
            store
                .exists_by_name(Ownership::Owned(user.id), &name)
                .unwrap()
        );
        assert!(!store.exists_by_name(Ownership::Shared, &name).unwrap());
    }

    #[test]
    fn update_category_persists_changes() {
        let (store, user) = get_test_store_and_user();
        let mut category = store
            .create(new_category("Foo", Ownership::Owned(user.id)))
            .unwrap();

        category.update(
            CategoryName::new("Bar").unwrap(),
            "#00ff00".to_string(),
            TransactionType::Income,
        );
        store.update(&category).unwrap();

        let retrieved = store.get(category.id).unwrap();
        assert_eq!(retrieved.name.as_ref(), "Bar");
        assert_eq!(retrieved.color, "#00ff00");
        assert_eq!(retrieved.transaction_type, TransactionType::Income);
    }

    #[test]
    fn delete_category_removes_it() {
        let (store, user) = get_test_store_and_user();
        let category = store
            .create(new_category("Foo", Ownership::Owned(user.id)))
            .unwrap();

        store.delete(category.id).unwrap();

        assert_eq!(store.get(category.id), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_category_returns_not_found() {
        let (store, _) = get_test_store_and_user();

        assert_eq!(store.delete(999), Err(Error::NotFound));
    }
}

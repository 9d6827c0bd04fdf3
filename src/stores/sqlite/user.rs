//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{NewUser, User, UserID},
    stores::UserStore,
};

/// Creates and retrieves users to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    fn create(&self, new_user: NewUser) -> Result<User, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;
        let now = OffsetDateTime::now_utc();

        connection.execute(
            "INSERT INTO user (name, email, password, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &new_user.name,
                new_user.email.as_str(),
                &new_user.password_hash,
                now,
                now,
            ),
        )?;

        let id = UserID::new(connection.last_insert_rowid());

        Ok(User {
            id,
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        })
    }

    fn get(&self, id: UserID) -> Result<User, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "SELECT id, name, email, password, created_at, updated_at
                 FROM user WHERE id = :id",
            )?
            .query_row(&[(":id", &id.as_i64())], Self::map_row)
            .map_err(|error| error.into())
    }

    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "SELECT id, name, email, password, created_at, updated_at
                 FROM user WHERE email = :email",
            )?
            .query_row(&[(":email", &email.as_str())], Self::map_row)
            .map_err(|error| error.into())
    }

    fn email_exists(&self, email: &EmailAddress) -> Result<bool, Error> {
        let count: i64 = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare("SELECT COUNT(*) FROM user WHERE email = :email")?
            .query_row(&[(":email", &email.as_str())], |row| row.get(0))?;

        Ok(count > 0)
    }

    fn update(&self, user: &User) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute(
                "UPDATE user SET name = ?1, email = ?2, password = ?3, updated_at = ?4
                 WHERE id = ?5",
                (
                    &user.name,
                    user.email.as_str(),
                    &user.password_hash,
                    user.updated_at,
                    user.id.as_i64(),
                ),
            )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id = row.get(offset)?;
        let name = row.get(offset + 1)?;
        let raw_email: String = row.get(offset + 2)?;
        let password_hash = row.get(offset + 3)?;
        let created_at = row.get(offset + 4)?;
        let updated_at = row.get(offset + 5)?;

        Ok(User {
            id: UserID::new(raw_id),
            name,
            email: EmailAddress::new_unchecked(raw_email),
            password_hash,
            created_at,
            updated_at,
        })
    }
}

#[cfg(test)]
mod user_store_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{Error, db::initialize, models::NewUser};

    use super::{SQLiteUserStore, UserStore};

    fn get_test_store() -> SQLiteUserStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SQLiteUserStore::new(Arc::new(Mutex::new(connection)))
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: EmailAddress::from_str(email).unwrap(),
            password_hash: "hunter2-hashed".to_string(),
        }
    }

    #[test]
    fn create_user_succeeds() {
        let store = get_test_store();

        let user = store.create(new_user("hello@world.com")).unwrap();

        assert!(user.id.as_i64() > 0);
        assert_eq!(user.email.as_str(), "hello@world.com");
    }

    #[test]
    fn create_user_fails_on_duplicate_email() {
        let store = get_test_store();

        store.create(new_user("hello@world.com")).unwrap();
        let result = store.create(new_user("hello@world.com"));

        assert_eq!(result, Err(Error::AlreadyExists("email".to_string())));
    }

    #[test]
    fn get_user_by_id_round_trips() {
        let store = get_test_store();
        let inserted = store.create(new_user("foo@bar.baz")).unwrap();

        let retrieved = store.get(inserted.id).unwrap();

        assert_eq!(retrieved, inserted);
    }

    #[test]
    fn get_user_with_invalid_id_returns_not_found() {
        let store = get_test_store();

        let result = store.get(crate::models::UserID::new(42));

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_user_by_email_round_trips() {
        let store = get_test_store();
        let inserted = store.create(new_user("foo@bar.baz")).unwrap();

        let retrieved = store.get_by_email(&inserted.email).unwrap();

        assert_eq!(retrieved, inserted);
    }

    #[test]
    fn email_exists_reflects_registration() {
        let store = get_test_store();
        let email = EmailAddress::from_str("someone@example.com").unwrap();

        assert!(!store.email_exists(&email).unwrap());

        store.create(new_user("someone@example.com")).unwrap();

        assert!(store.email_exists(&email).unwrap());
    }

    #[test]
    fn update_user_persists_changes() {
        let store = get_test_store();
        let mut user = store.create(new_user("foo@bar.baz")).unwrap();

        user.update(
            "Renamed".to_string(),
            EmailAddress::from_str("new@bar.baz").unwrap(),
        );
        store.update(&user).unwrap();

        let retrieved = store.get(user.id).unwrap();
        assert_eq!(retrieved.name, "Renamed");
        assert_eq!(retrieved.email.as_str(), "new@bar.baz");
    }

    #[test]
    fn update_missing_user_returns_not_found() {
        let store = get_test_store();
        let mut user = store.create(new_user("foo@bar.baz")).unwrap();
        user.id = crate::models::UserID::new(999);

        assert_eq!(store.update(&user), Err(Error::NotFound));
    }
}

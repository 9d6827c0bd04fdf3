//! Implements a SQLite backed saving goal store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, NewSavingGoal, SavingGoal, UserID},
    stores::SavingGoalStore,
};

/// Creates and retrieves saving goals to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteSavingGoalStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteSavingGoalStore {
    /// Create a new saving goal store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl SavingGoalStore for SQLiteSavingGoalStore {
    fn create(&self, new_goal: NewSavingGoal) -> Result<SavingGoal, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;
        let now = OffsetDateTime::now_utc();

        connection.execute(
            "INSERT INTO saving_goal
                (name, description, target_amount, current_amount, user_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                &new_goal.name,
                &new_goal.description,
                new_goal.target_amount,
                new_goal.current_amount,
                new_goal.user_id.as_i64(),
                now,
                now,
            ),
        )?;

        Ok(SavingGoal {
            id: connection.last_insert_rowid(),
            name: new_goal.name,
            description: new_goal.description,
            target_amount: new_goal.target_amount,
            current_amount: new_goal.current_amount,
            user_id: new_goal.user_id,
            created_at: now,
            updated_at: now,
        })
    }

    fn get(&self, goal_id: DatabaseID) -> Result<SavingGoal, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "SELECT id, name, description, target_amount, current_amount, user_id,
                        created_at, updated_at
                 FROM saving_goal WHERE id = :id",
            )?
            .query_row(&[(":id", &goal_id)], Self::map_row)
            .map_err(|error| error.into())
    }

    fn get_by_user(&self, user_id: UserID) -> Result<Vec<SavingGoal>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "SELECT id, name, description, target_amount, current_amount, user_id,
                        created_at, updated_at
                 FROM saving_goal WHERE user_id = :user_id ORDER BY created_at DESC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
            .collect()
    }

    fn update(&self, goal: &SavingGoal) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute(
                "UPDATE saving_goal
                 SET name = ?1, description = ?2, target_amount = ?3, current_amount = ?4,
                     updated_at = ?5
                 WHERE id = ?6",
                (
                    &goal.name,
                    &goal.description,
                    goal.target_amount,
                    goal.current_amount,
                    goal.updated_at,
                    goal.id,
                ),
            )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    fn delete(&self, goal_id: DatabaseID) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute("DELETE FROM saving_goal WHERE id = ?1", (goal_id,))?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    fn add_to_amount(&self, goal_id: DatabaseID, amount: f64) -> Result<SavingGoal, Error> {
        // A single UPDATE ... RETURNING so concurrent deposits cannot lose
        // increments to a read-modify-write race.
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "UPDATE saving_goal
                 SET current_amount = current_amount + ?1, updated_at = ?2
                 WHERE id = ?3
                 RETURNING id, name, description, target_amount, current_amount, user_id,
                           created_at, updated_at",
            )?
            .query_row((amount, OffsetDateTime::now_utc(), goal_id), Self::map_row)
            .map_err(|error| error.into())
    }
}

impl CreateTable for SQLiteSavingGoalStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS saving_goal (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                target_amount REAL NOT NULL,
                current_amount REAL NOT NULL DEFAULT 0,
                user_id INTEGER NOT NULL REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteSavingGoalStore {
    type ReturnType = SavingGoal;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(SavingGoal {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            description: row.get(offset + 2)?,
            target_amount: row.get(offset + 3)?,
            current_amount: row.get(offset + 4)?,
            user_id: UserID::new(row.get(offset + 5)?),
            created_at: row.get(offset + 6)?,
            updated_at: row.get(offset + 7)?,
        })
    }
}

#[cfg(test)]
mod saving_goal_store_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        models::{NewSavingGoal, NewUser, User},
        stores::{SavingGoalStore, UserStore, sqlite::SQLiteUserStore},
    };

    use super::SQLiteSavingGoalStore;

    fn get_test_store_and_user() -> (SQLiteSavingGoalStore, User) {
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

        (SQLiteSavingGoalStore::new(connection), user)
    }

    fn new_goal(user: &User, current: f64) -> NewSavingGoal {
        NewSavingGoal {
            name: "Emergency fund".to_string(),
            description: "Three months of expenses".to_string(),
            target_amount: 10000.0,
            current_amount: current,
            user_id: user.id,
        }
    }

    #[test]
    fn create_and_get_saving_goal_round_trips() {
        let (store, user) = get_test_store_and_user();

        let inserted = store.create(new_goal(&user, 2000.0)).unwrap();

        let retrieved = store.get(inserted.id).unwrap();
        assert_eq!(retrieved, inserted);
    }

    #[test]
    fn get_by_user_only_returns_own_goals() {
        let (store, user) = get_test_store_and_user();
        store.create(new_goal(&user, 0.0)).unwrap();

        assert_eq!(store.get_by_user(user.id).unwrap().len(), 1);
        assert!(
            store
                .get_by_user(crate::models::UserID::new(999))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn add_to_amount_increments_and_returns_updated_goal() {
        let (store, user) = get_test_store_and_user();
        let goal = store.create(new_goal(&user, 100.0)).unwrap();

        let updated = store.add_to_amount(goal.id, 50.0).unwrap();

        assert_eq!(updated.current_amount, 150.0);
        assert_eq!(store.get(goal.id).unwrap().current_amount, 150.0);
    }

    #[test]
    fn add_to_amount_accumulates_across_deposits() {
        let (store, user) = get_test_store_and_user();
        let goal = store.create(new_goal(&user, 0.0)).unwrap();

        store.add_to_amount(goal.id, 10.0).unwrap();
        store.add_to_amount(goal.id, 20.0).unwrap();
        let updated = store.add_to_amount(goal.id, 30.0).unwrap();

        assert_eq!(updated.current_amount, 60.0);
    }

    #[test]
    fn add_to_amount_on_missing_goal_returns_not_found() {
        let (store, _) = get_test_store_and_user();

        assert_eq!(store.add_to_amount(999, 10.0), Err(Error::NotFound));
    }

    #[test]
    fn update_saving_goal_persists_changes() {
        let (store, user) = get_test_store_and_user();
        let mut goal = store.create(new_goal(&user, 100.0)).unwrap();

        goal.update(
            "House deposit".to_string(),
            String::new(),
            50000.0,
            250.0,
        );
        store.update(&goal).unwrap();

        let retrieved = store.get(goal.id).unwrap();
        assert_eq!(retrieved.name, "House deposit");
        assert_eq!(retrieved.target_amount, 50000.0);
        assert_eq!(retrieved.current_amount, 250.0);
    }

    #[test]
    fn delete_saving_goal_removes_it() {
        let (store, user) = get_test_store_and_user();
        let goal = store.create(new_goal(&user, 0.0)).unwrap();

        store.delete(goal.id).unwrap();

        assert_eq!(store.get(goal.id), Err(Error::NotFound));
    }
}

//! Implements a SQLite backed goal store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Goal, NewGoal, UserID},
    stores::GoalStore,
};

/// Creates and retrieves goals to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteGoalStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteGoalStore {
    /// Create a new goal store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl GoalStore for SQLiteGoalStore {
    fn create(&self, new_goal: NewGoal) -> Result<Goal, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;
        let now = OffsetDateTime::now_utc();

        connection.execute(
            "INSERT INTO goal (name, description, amount, user_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &new_goal.name,
                &new_goal.description,
                new_goal.amount,
                new_goal.user_id.as_i64(),
                now,
                now,
            ),
        )?;

        Ok(Goal {
            id: connection.last_insert_rowid(),
            name: new_goal.name,
            description: new_goal.description,
            amount: new_goal.amount,
            user_id: new_goal.user_id,
            created_at: now,
            updated_at: now,
        })
    }

    fn get(&self, goal_id: DatabaseID) -> Result<Goal, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "SELECT id, name, description, amount, user_id, created_at, updated_at
                 FROM goal WHERE id = :id",
            )?
            .query_row(&[(":id", &goal_id)], Self::map_row)
            .map_err(|error| error.into())
    }

    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Goal>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "SELECT id, name, description, amount, user_id, created_at, updated_at
                 FROM goal WHERE user_id = :user_id ORDER BY created_at DESC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
            .collect()
    }

    fn update(&self, goal: &Goal) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute(
                "UPDATE goal SET name = ?1, description = ?2, amount = ?3, updated_at = ?4
                 WHERE id = ?5",
                (
                    &goal.name,
                    &goal.description,
                    goal.amount,
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
            .execute("DELETE FROM goal WHERE id = ?1", (goal_id,))?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteGoalStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS goal (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                user_id INTEGER NOT NULL REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteGoalStore {
    type ReturnType = Goal;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Goal {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            description: row.get(offset + 2)?,
            amount: row.get(offset + 3)?,
            user_id: UserID::new(row.get(offset + 4)?),
            created_at: row.get(offset + 5)?,
            updated_at: row.get(offset + 6)?,
        })
    }
}

//! Defines the saving goal store trait.

use crate::{
    Error,
    models::{DatabaseID, NewSavingGoal, SavingGoal, UserID},
};

/// Creates and retrieves savings goals ("piggy banks").
pub trait SavingGoalStore {
    /// Create a new saving goal and add it to the store.
    fn create(&self, new_goal: NewSavingGoal) -> Result<SavingGoal, Error>;

    /// Get a saving goal by its ID.
    ///
    /// Returns [Error::NotFound] if no saving goal with the given ID exists.
    fn get(&self, goal_id: DatabaseID) -> Result<SavingGoal, Error>;

    /// Get all saving goals for a given user.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<SavingGoal>, Error>;

    /// Persist changes to an existing saving goal.
    ///
    /// Returns [Error::NotFound] if the saving goal does not exist.
    fn update(&self, goal: &SavingGoal) -> Result<(), Error>;

    /// Delete a saving goal.
    ///
    /// Returns [Error::NotFound] if nothing was deleted.
    fn delete(&self, goal_id: DatabaseID) -> Result<(), Error>;

    /// Atomically add `amount` to the goal's current amount and return the
    /// updated goal.
    ///
    /// The increment is a single conditional update at the storage boundary
    /// so concurrent deposits to the same goal cannot lose updates.
    ///
    /// Returns [Error::NotFound] if the saving goal does not exist.
    fn add_to_amount(&self, goal_id: DatabaseID, amount: f64) -> Result<SavingGoal, Error>;
}

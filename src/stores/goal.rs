//! Defines the goal store trait.

use crate::{
    Error,
    models::{DatabaseID, Goal, NewGoal, UserID},
};

/// Creates and retrieves financial goals.
pub trait GoalStore {
    /// Create a new goal and add it to the store.
    fn create(&self, new_goal: NewGoal) -> Result<Goal, Error>;

    /// Get a goal by its ID.
    ///
    /// Returns [Error::NotFound] if no goal with the given ID exists.
    fn get(&self, goal_id: DatabaseID) -> Result<Goal, Error>;

    /// Get all goals for a given user.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Goal>, Error>;

    /// Persist changes to an existing goal.
    ///
    /// Returns [Error::NotFound] if the goal does not exist.
    fn update(&self, goal: &Goal) -> Result<(), Error>;

    /// Delete a goal.
    ///
    /// Returns [Error::NotFound] if nothing was deleted.
    fn delete(&self, goal_id: DatabaseID) -> Result<(), Error>;
}

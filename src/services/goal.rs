//! Goal management: simple financial targets scoped to their owner.

use crate::{
    Error,
    models::{DatabaseID, Goal, NewGoal, UserID},
    stores::GoalStore,
};

/// Handles the creation and maintenance of financial goals.
#[derive(Debug, Clone)]
pub struct GoalService<G> {
    store: G,
}

impl<G> GoalService<G>
where
    G: GoalStore,
{
    /// Create a goal service backed by `store`.
    pub fn new(store: G) -> Self {
        Self { store }
    }

    /// Create a goal for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] for an empty name or a non-positive
    /// amount.
    pub fn create(
        &self,
        user_id: UserID,
        name: &str,
        description: &str,
        amount: f64,
    ) -> Result<Goal, Error> {
        let name = validate_name(name)?;
        validate_amount(amount)?;

        self.store.create(NewGoal {
            name,
            description: description.to_string(),
            amount,
            user_id,
        })
    }

    /// Get a goal owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] when the goal does not exist and
    /// [Error::Forbidden] when it belongs to another user.
    pub fn get(&self, user_id: UserID, goal_id: DatabaseID) -> Result<Goal, Error> {
        let goal = self.store.get(goal_id)?;

        if goal.user_id != user_id {
            return Err(Error::Forbidden);
        }

        Ok(goal)
    }

    /// List the user's goals.
    pub fn list(&self, user_id: UserID) -> Result<Vec<Goal>, Error> {
        self.store.get_by_user(user_id)
    }

    /// Update a goal's name, description and amount.
    pub fn update(
        &self,
        user_id: UserID,
        goal_id: DatabaseID,
        name: &str,
        description: &str,
        amount: f64,
    ) -> Result<Goal, Error> {
        let mut goal = self.get(user_id, goal_id)?;

        let name = validate_name(name)?;
        validate_amount(amount)?;

        goal.update(name, description.to_string(), amount);
        self.store.update(&goal)?;

        Ok(goal)
    }

    /// Delete a goal owned by `user_id`.
    pub fn delete(&self, user_id: UserID, goal_id: DatabaseID) -> Result<(), Error> {
        self.get(user_id, goal_id)?;

        self.store.delete(goal_id)
    }
}

fn validate_name(name: &str) -> Result<String, Error> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(Error::Validation("name must not be empty".to_string()));
    }

    Ok(trimmed.to_string())
}

fn validate_amount(amount: f64) -> Result<(), Error> {
    if amount <= 0.0 {
        return Err(Error::Validation(
            "amount must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

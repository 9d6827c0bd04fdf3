//! This file defines the `SavingGoal` type, also referred to as a "piggy
//! bank" when linked from transactions.

use time::OffsetDateTime;

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// The fields needed to create a [SavingGoal]; the store assigns the ID and
/// timestamps on insert.
#[derive(Debug, Clone)]
pub struct NewSavingGoal {
    /// A short name for the goal.
    pub name: String,
    /// A free-text description.
    pub description: String,
    /// The amount the user wants to save, must be greater than zero.
    pub target_amount: f64,
    /// The amount saved so far, must not be negative.
    pub current_amount: f64,
    /// The user the goal belongs to.
    pub user_id: UserID,
}

/// A savings goal with progress tracking, e.g. 'Emergency fund: $2,000 of
/// $10,000'.
///
/// The current amount is not capped at the target; progress is clamped to
/// 100% for display only.
#[derive(Debug, Clone, PartialEq)]
pub struct SavingGoal {
    /// The ID of the saving goal.
    pub id: DatabaseID,
    /// A short name for the goal.
    pub name: String,
    /// A free-text description.
    pub description: String,
    /// The amount the user wants to save.
    pub target_amount: f64,
    /// The amount saved so far.
    pub current_amount: f64,
    /// The user the goal belongs to.
    pub user_id: UserID,
    /// When the goal was created.
    pub created_at: OffsetDateTime,
    /// When the goal was last changed.
    pub updated_at: OffsetDateTime,
}

impl SavingGoal {
    /// Add `amount` to the saved total.
    ///
    /// Service-level deposits go through
    /// [SavingGoalStore::add_to_amount](crate::stores::SavingGoalStore::add_to_amount)
    /// so the increment happens atomically at the storage boundary; this
    /// method exists for in-memory arithmetic on an already-loaded goal.
    pub fn deposit(&mut self, amount: f64) {
        self.current_amount += amount;
        self.updated_at = OffsetDateTime::now_utc();
    }

    /// Remove `amount` from the saved total.
    ///
    /// # Errors
    ///
    /// Returns [Error::InsufficientFunds] if `amount` exceeds the current
    /// amount.
    pub fn withdraw(&mut self, amount: f64) -> Result<(), Error> {
        if self.current_amount < amount {
            return Err(Error::InsufficientFunds);
        }

        self.current_amount -= amount;
        self.updated_at = OffsetDateTime::now_utc();

        Ok(())
    }

    /// The saved fraction of the target as a percentage, clamped to the
    /// range 0-100 for display.
    pub fn progress(&self) -> f64 {
        if self.target_amount == 0.0 {
            return 0.0;
        }

        let progress = (self.current_amount / self.target_amount) * 100.0;
        progress.min(100.0)
    }

    /// Whether the saved amount has reached the target.
    pub fn is_completed(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Replace the goal's name, description and amounts.
    pub fn update(
        &mut self,
        name: String,
        description: String,
        target_amount: f64,
        current_amount: f64,
    ) {
        self.name = name;
        self.description = description;
        self.target_amount = target_amount;
        self.current_amount = current_amount;
        self.updated_at = OffsetDateTime::now_utc();
    }
}

#[cfg(test)]
mod saving_goal_tests {
    use time::OffsetDateTime;

    use crate::{Error, models::UserID};

    use super::SavingGoal;

    fn test_goal(target: f64, current: f64) -> SavingGoal {
        SavingGoal {
            id: 1,
            name: "Emergency fund".to_string(),
            description: String::new(),
            target_amount: target,
            current_amount: current,
            user_id: UserID::new(1),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn deposit_increases_current_amount() {
        let mut goal = test_goal(1000.0, 100.0);

        goal.deposit(50.0);

        assert_eq!(goal.current_amount, 150.0);
        assert!(goal.updated_at > goal.created_at);
    }

    #[test]
    fn withdraw_decreases_current_amount() {
        let mut goal = test_goal(1000.0, 100.0);

        goal.withdraw(40.0).unwrap();

        assert_eq!(goal.current_amount, 60.0);
    }

    #[test]
    fn withdraw_rejects_overdraw() {
        let mut goal = test_goal(1000.0, 100.0);

        let result = goal.withdraw(100.01);

        assert_eq!(result, Err(Error::InsufficientFunds));
        assert_eq!(goal.current_amount, 100.0);
    }

    #[test]
    fn progress_is_clamped_to_one_hundred() {
        let goal = test_goal(100.0, 150.0);

        assert_eq!(goal.progress(), 100.0);
    }

    #[test]
    fn progress_reflects_partial_savings() {
        let goal = test_goal(200.0, 50.0);

        assert_eq!(goal.progress(), 25.0);
    }

    #[test]
    fn progress_is_zero_for_zero_target() {
        let goal = test_goal(0.0, 50.0);

        assert_eq!(goal.progress(), 0.0);
    }

    #[test]
    fn is_completed_when_current_reaches_target() {
        assert!(test_goal(100.0, 100.0).is_completed());
        assert!(test_goal(100.0, 120.0).is_completed());
        assert!(!test_goal(100.0, 99.99).is_completed());
    }
}

//! This file defines the `Goal` type: a simple financial target without
//! progress tracking.

use time::OffsetDateTime;

use crate::models::{DatabaseID, UserID};

/// The fields needed to create a [Goal]; the store assigns the ID and
/// timestamps on insert.
#[derive(Debug, Clone)]
pub struct NewGoal {
    /// A short name for the goal.
    pub name: String,
    /// A free-text description.
    pub description: String,
    /// The target amount, must be greater than zero.
    pub amount: f64,
    /// The user the goal belongs to.
    pub user_id: UserID,
}

/// A financial target set by a user, e.g. 'Save $5,000 for a holiday'.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    /// The ID of the goal.
    pub id: DatabaseID,
    /// A short name for the goal.
    pub name: String,
    /// A free-text description.
    pub description: String,
    /// The target amount.
    pub amount: f64,
    /// The user the goal belongs to.
    pub user_id: UserID,
    /// When the goal was created.
    pub created_at: OffsetDateTime,
    /// When the goal was last changed.
    pub updated_at: OffsetDateTime,
}

impl Goal {
    /// Update the goal's name, description and amount.
    pub fn update(&mut self, name: String, description: String, amount: f64) {
        self.name = name;
        self.description = description;
        self.amount = amount;
        self.updated_at = OffsetDateTime::now_utc();
    }
}

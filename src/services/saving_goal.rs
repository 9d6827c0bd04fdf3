//! Saving goal ("piggy bank") management, including deposits.

use crate::{
    Error,
    models::{DatabaseID, NewSavingGoal, SavingGoal, UserID},
    stores::SavingGoalStore,
};

/// Handles the creation and maintenance of saving goals.
#[derive(Debug, Clone)]
pub struct SavingGoalService<S> {
    store: S,
}

impl<S> SavingGoalService<S>
where
    S: SavingGoalStore,
{
    /// Create a saving goal service backed by `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a saving goal for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] for an empty name, a non-positive target
    /// amount or a negative current amount.
    pub fn create(
        &self,
        user_id: UserID,
        name: &str,
        description: &str,
        target_amount: f64,
        current_amount: f64,
    ) -> Result<SavingGoal, Error> {
        let name = validate_name(name)?;
        validate_target(target_amount)?;

        if current_amount < 0.0 {
            return Err(Error::Validation(
                "current amount must not be negative".to_string(),
            ));
        }

        self.store.create(NewSavingGoal {
            name,
            description: description.to_string(),
            target_amount,
            current_amount,
            user_id,
        })
    }

    /// Get a saving goal owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] when the goal does not exist and
    /// [Error::Forbidden] when it belongs to another user.
    pub fn get(&self, user_id: UserID, goal_id: DatabaseID) -> Result<SavingGoal, Error> {
        let goal = self.store.get(goal_id)?;

        if goal.user_id != user_id {
            return Err(Error::Forbidden);
        }

        Ok(goal)
    }

    /// List the user's saving goals.
    pub fn list(&self, user_id: UserID) -> Result<Vec<SavingGoal>, Error> {
        self.store.get_by_user(user_id)
    }

    /// Replace a saving goal's name, description and amounts.
    ///
    /// Quirk: unlike create, update rejects a current amount of zero. A
    /// goal can start empty but cannot be reset to empty through update.
    pub fn update(
        &self,
        user_id: UserID,
        goal_id: DatabaseID,
        name: &str,
        description: &str,
        target_amount: f64,
        current_amount: f64,
    ) -> Result<SavingGoal, Error> {
        let mut goal = self.get(user_id, goal_id)?;

        let name = validate_name(name)?;
        validate_target(target_amount)?;

        if current_amount <= 0.0 {
            return Err(Error::Validation(
                "current amount must be greater than zero".to_string(),
            ));
        }

        goal.update(name, description.to_string(), target_amount, current_amount);
        self.store.update(&goal)?;

        Ok(goal)
    }

    /// Add `amount` to a saving goal's saved total.
    ///
    /// The ownership check reads the goal first; the increment itself is a
    /// single atomic update in the store, so concurrent deposits cannot
    /// lose money.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] for a non-positive amount,
    /// [Error::NotFound] when the goal does not exist and
    /// [Error::Forbidden] when it belongs to another user.
    pub fn deposit(
        &self,
        user_id: UserID,
        goal_id: DatabaseID,
        amount: f64,
    ) -> Result<SavingGoal, Error> {
        if amount <= 0.0 {
            return Err(Error::Validation(
                "deposit amount must be greater than zero".to_string(),
            ));
        }

        self.get(user_id, goal_id)?;

        self.store.add_to_amount(goal_id, amount)
    }

    /// Delete a saving goal owned by `user_id`.
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

fn validate_target(target_amount: f64) -> Result<(), Error> {
    if target_amount <= 0.0 {
        return Err(Error::Validation(
            "target amount must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod saving_goal_service_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        models::{NewUser, User},
        stores::{
            UserStore,
            sqlite::{SQLiteSavingGoalStore, SQLiteUserStore},
        },
    };

    use super::SavingGoalService;

    fn get_service_and_users() -> (SavingGoalService<SQLiteSavingGoalStore>, User, User) {
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
            SavingGoalService::new(SQLiteSavingGoalStore::new(connection)),
            alice,
            bob,
        )
    }

    #[test]
    fn create_allows_zero_current_amount() {
        let (service, alice, _) = get_service_and_users();

        let goal = service
            .create(alice.id, "Emergency fund", "", 10000.0, 0.0)
            .unwrap();

        assert_eq!(goal.current_amount, 0.0);
    }

    #[test]
    fn create_rejects_negative_current_amount() {
        let (service, alice, _) = get_service_and_users();

        let result = service.create(alice.id, "Emergency fund", "", 10000.0, -1.0);

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn update_rejects_zero_current_amount() {
        let (service, alice, _) = get_service_and_users();
        let goal = service
            .create(alice.id, "Emergency fund", "", 10000.0, 100.0)
            .unwrap();

        let result = service.update(alice.id, goal.id, "Emergency fund", "", 10000.0, 0.0);

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn deposit_increments_the_saved_amount() {
        let (service, alice, _) = get_service_and_users();
        let goal = service
            .create(alice.id, "Emergency fund", "", 10000.0, 100.0)
            .unwrap();

        let updated = service.deposit(alice.id, goal.id, 50.0).unwrap();

        assert_eq!(updated.current_amount, 150.0);
    }

    #[test]
    fn deposit_rejects_non_positive_amount() {
        let (service, alice, _) = get_service_and_users();
        let goal = service
            .create(alice.id, "Emergency fund", "", 10000.0, 100.0)
            .unwrap();

        assert!(matches!(
            service.deposit(alice.id, goal.id, 0.0),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.deposit(alice.id, goal.id, -5.0),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn deposit_into_another_users_goal_is_forbidden_and_unchanged() {
        let (service, alice, bob) = get_service_and_users();
        let goal = service
            .create(alice.id, "Emergency fund", "", 10000.0, 100.0)
            .unwrap();

        let result = service.deposit(bob.id, goal.id, 50.0);

        assert_eq!(result, Err(Error::Forbidden));
        assert_eq!(
            service.get(alice.id, goal.id).unwrap().current_amount,
            100.0
        );
    }

    #[test]
    fn deposit_into_missing_goal_returns_not_found() {
        let (service, alice, _) = get_service_and_users();

        assert_eq!(service.deposit(alice.id, 999, 50.0), Err(Error::NotFound));
    }

    #[test]
    fn delete_is_forbidden_for_other_users() {
        let (service, alice, bob) = get_service_and_users();
        let goal = service
            .create(alice.id, "Emergency fund", "", 10000.0, 0.0)
            .unwrap();

        assert_eq!(service.delete(bob.id, goal.id), Err(Error::Forbidden));
        assert!(service.get(alice.id, goal.id).is_ok());
    }
}

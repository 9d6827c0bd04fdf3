//! Implements the struct that holds the state of the REST server.

use std::marker::{Send, Sync};

use axum::extract::FromRef;

use crate::{
    auth::{AuthKeys, AuthState},
    services::{AuthService, CategoryService, GoalService, SavingGoalService, TransactionService},
    stores::{CategoryStore, GoalStore, SavingGoalStore, TransactionStore, UserStore},
};

/// The state of the REST server: the auth keys and one service per entity,
/// generic over the store implementations so handlers can be tested against
/// lightweight stores.
#[derive(Debug, Clone)]
pub struct AppState<C, G, S, T, U>
where
    C: CategoryStore + Clone + Send + Sync,
    G: GoalStore + Clone + Send + Sync,
    S: SavingGoalStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    /// The keys used to sign and verify bearer tokens.
    pub auth_keys: AuthKeys,
    /// Registration, login and profile management.
    pub auth_service: AuthService<U>,
    /// Category management.
    pub category_service: CategoryService<C>,
    /// Goal management.
    pub goal_service: GoalService<G>,
    /// Saving goal management.
    pub saving_goal_service: SavingGoalService<S>,
    /// Transaction management and reports.
    pub transaction_service: TransactionService<T>,
}

impl<C, G, S, T, U> AppState<C, G, S, T, U>
where
    C: CategoryStore + Clone + Send + Sync,
    G: GoalStore + Clone + Send + Sync,
    S: SavingGoalStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    /// Create a new [AppState] from the token secret and the five stores.
    pub fn new(
        secret: &str,
        category_store: C,
        goal_store: G,
        saving_goal_store: S,
        transaction_store: T,
        user_store: U,
    ) -> Self {
        Self {
            auth_keys: AuthKeys::new(secret),
            auth_service: AuthService::new(user_store),
            category_service: CategoryService::new(category_store),
            goal_service: GoalService::new(goal_store),
            saving_goal_service: SavingGoalService::new(saving_goal_store),
            transaction_service: TransactionService::new(transaction_store),
        }
    }
}

impl<C, G, S, T, U> FromRef<AppState<C, G, S, T, U>> for AuthKeys
where
    C: CategoryStore + Clone + Send + Sync,
    G: GoalStore + Clone + Send + Sync,
    S: SavingGoalStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, G, S, T, U>) -> Self {
        state.auth_keys.clone()
    }
}

impl<C, G, S, T, U> FromRef<AppState<C, G, S, T, U>> for AuthState
where
    C: CategoryStore + Clone + Send + Sync,
    G: GoalStore + Clone + Send + Sync,
    S: SavingGoalStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, G, S, T, U>) -> Self {
        Self {
            auth_keys: state.auth_keys.clone(),
        }
    }
}

/// The state needed by the registration, login and profile handlers.
#[derive(Debug, Clone)]
pub struct UserState<U>
where
    U: UserStore + Clone + Send + Sync,
{
    /// The keys used to sign bearer tokens at login.
    pub auth_keys: AuthKeys,
    /// Registration, login and profile management.
    pub auth_service: AuthService<U>,
}

impl<C, G, S, T, U> FromRef<AppState<C, G, S, T, U>> for UserState<U>
where
    C: CategoryStore + Clone + Send + Sync,
    G: GoalStore + Clone + Send + Sync,
    S: SavingGoalStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, G, S, T, U>) -> Self {
        Self {
            auth_keys: state.auth_keys.clone(),
            auth_service: state.auth_service.clone(),
        }
    }
}

/// The state needed by the category handlers.
#[derive(Debug, Clone)]
pub struct CategoryState<C>
where
    C: CategoryStore + Clone + Send + Sync,
{
    /// Category management.
    pub category_service: CategoryService<C>,
}

impl<C, G, S, T, U> FromRef<AppState<C, G, S, T, U>> for CategoryState<C>
where
    C: CategoryStore + Clone + Send + Sync,
    G: GoalStore + Clone + Send + Sync,
    S: SavingGoalStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, G, S, T, U>) -> Self {
        Self {
            category_service: state.category_service.clone(),
        }
    }
}

/// The state needed by the goal handlers.
#[derive(Debug, Clone)]
pub struct GoalState<G>
where
    G: GoalStore + Clone + Send + Sync,
{
    /// Goal management.
    pub goal_service: GoalService<G>,
}

impl<C, G, S, T, U> FromRef<AppState<C, G, S, T, U>> for GoalState<G>
where
    C: CategoryStore + Clone + Send + Sync,
    G: GoalStore + Clone + Send + Sync,
    S: SavingGoalStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, G, S, T, U>) -> Self {
        Self {
            goal_service: state.goal_service.clone(),
        }
    }
}

/// The state needed by the saving goal handlers.
#[derive(Debug, Clone)]
pub struct SavingGoalState<S>
where
    S: SavingGoalStore + Clone + Send + Sync,
{
    /// Saving goal management.
    pub saving_goal_service: SavingGoalService<S>,
}

impl<C, G, S, T, U> FromRef<AppState<C, G, S, T, U>> for SavingGoalState<S>
where
    C: CategoryStore + Clone + Send + Sync,
    G: GoalStore + Clone + Send + Sync,
    S: SavingGoalStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, G, S, T, U>) -> Self {
        Self {
            saving_goal_service: state.saving_goal_service.clone(),
        }
    }
}

/// The state needed by the transaction and report handlers.
#[derive(Debug, Clone)]
pub struct TransactionState<T>
where
    T: TransactionStore + Clone + Send + Sync,
{
    /// Transaction management and reports.
    pub transaction_service: TransactionService<T>,
}

impl<C, G, S, T, U> FromRef<AppState<C, G, S, T, U>> for TransactionState<T>
where
    C: CategoryStore + Clone + Send + Sync,
    G: GoalStore + Clone + Send + Sync,
    S: SavingGoalStore + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, G, S, T, U>) -> Self {
        Self {
            transaction_service: state.transaction_service.clone(),
        }
    }
}

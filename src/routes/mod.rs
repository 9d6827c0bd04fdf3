//! The JSON REST API: route registration and the handlers for each
//! resource.
//!
//! Handlers stay thin: extract the authenticated user, deserialize the
//! request, delegate to a service and map the result to a response DTO.

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, patch, post, put},
};

use crate::{
    auth::{AuthState, auth_guard},
    state::AppState,
    stores::{CategoryStore, GoalStore, SavingGoalStore, TransactionStore, UserStore},
};

pub mod category;
pub mod endpoints;
pub mod goal;
pub mod report;
pub mod saving_goal;
pub mod transaction;
pub mod user;

/// Create the API router.
///
/// Everything except registration and login sits behind the bearer-token
/// middleware.
pub fn build_router<C, G, S, T, U>(state: AppState<C, G, S, T, U>) -> Router
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    G: GoalStore + Clone + Send + Sync + 'static,
    S: SavingGoalStore + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    let auth_state = AuthState::from_ref(&state);

    let protected_routes = Router::new()
        .route(
            endpoints::PROFILE,
            get(user::get_profile).put(user::update_profile),
        )
        .route(endpoints::PASSWORD, put(user::change_password))
        .route(
            endpoints::CATEGORIES,
            post(category::create_category).get(category::list_categories),
        )
        .route(
            endpoints::CATEGORY,
            get(category::get_category)
                .put(category::update_category)
                .delete(category::delete_category),
        )
        .route(endpoints::GOALS, post(goal::create_goal).get(goal::list_goals))
        .route(
            endpoints::GOAL,
            get(goal::get_goal)
                .put(goal::update_goal)
                .delete(goal::delete_goal),
        )
        .route(
            endpoints::SAVING_GOALS,
            post(saving_goal::create_saving_goal).get(saving_goal::list_saving_goals),
        )
        .route(
            endpoints::SAVING_GOAL,
            get(saving_goal::get_saving_goal)
                .put(saving_goal::update_saving_goal)
                .delete(saving_goal::delete_saving_goal),
        )
        .route(endpoints::SAVING_GOAL_DEPOSIT, post(saving_goal::deposit))
        .route(
            endpoints::TRANSACTIONS,
            post(transaction::create_transaction).get(transaction::list_transactions),
        )
        .route(
            endpoints::TRANSACTION,
            get(transaction::get_transaction)
                .put(transaction::update_transaction)
                .delete(transaction::delete_transaction),
        )
        .route(endpoints::TRANSACTION_PAID, patch(transaction::toggle_paid))
        .route(endpoints::REPORTS, get(report::get_report))
        .route(endpoints::REPORTS_DASHBOARD, get(report::get_dashboard))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_guard));

    Router::new()
        .route(endpoints::REGISTER, post(user::register))
        .route(endpoints::LOG_IN, post(user::log_in))
        .merge(protected_routes)
        .with_state(state)
}

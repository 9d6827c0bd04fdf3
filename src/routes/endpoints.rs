//! Defines the paths for the API routes.
//!
//! Paths with `{...}` are parameterized routes (axum syntax). These can be
//! formatted for a concrete resource with [format_endpoint].

/// Register a new user.
pub const REGISTER: &str = "/api/register";
/// Exchange credentials for a bearer token.
pub const LOG_IN: &str = "/api/login";
/// Get or update the authenticated user's profile.
pub const PROFILE: &str = "/api/profile";
/// Change the authenticated user's password.
pub const PASSWORD: &str = "/api/password";
/// Create or list categories.
pub const CATEGORIES: &str = "/api/categories";
/// Get, update or delete one category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// Create or list goals.
pub const GOALS: &str = "/api/goals";
/// Get, update or delete one goal.
pub const GOAL: &str = "/api/goals/{goal_id}";
/// Create or list saving goals.
pub const SAVING_GOALS: &str = "/api/saving-goals";
/// Get, update or delete one saving goal.
pub const SAVING_GOAL: &str = "/api/saving-goals/{goal_id}";
/// Deposit into one saving goal.
pub const SAVING_GOAL_DEPOSIT: &str = "/api/saving-goals/{goal_id}/deposit";
/// Create or list transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// Get, update or delete one transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// Toggle the paid flag of one transaction.
pub const TRANSACTION_PAID: &str = "/api/transactions/{transaction_id}/paid";
/// The windowed summary report.
pub const REPORTS: &str = "/api/reports";
/// The dashboard report.
pub const REPORTS_DASHBOARD: &str = "/api/reports/dashboard";

/// Substitute a concrete ID into a parameterized route.
pub fn format_endpoint(endpoint: &str, id: i64) -> String {
    let start = endpoint.find('{');
    let end = endpoint.find('}');

    match (start, end) {
        (Some(start), Some(end)) => {
            format!("{}{}{}", &endpoint[..start], id, &endpoint[end + 1..])
        }
        _ => endpoint.to_owned(),
    }
}

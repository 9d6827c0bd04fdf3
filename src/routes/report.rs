//! Handlers and DTOs for the report routes.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::UserID,
    routes::transaction::TransactionResponse,
    services::{MonthlyStats, ReportQuery, SummaryReport, TotalsReport},
    state::TransactionState,
    stores::TransactionStore,
};

/// The dashboard report as sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// All-time totals.
    pub totals: TotalsReport,
    /// The ten most recent transactions, newest first.
    pub recent_transactions: Vec<TransactionResponse>,
    /// The current year's month-by-month trend.
    pub monthly_stats: Vec<MonthlyStats>,
}

/// Return the windowed summary report.
pub async fn get_report<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<SummaryReport>, Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    let report = state.transaction_service.report(user_id, &query)?;

    Ok(Json(report))
}

/// Return the dashboard report.
pub async fn get_dashboard<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<DashboardResponse>, Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    let dashboard = state.transaction_service.dashboard(user_id)?;

    Ok(Json(DashboardResponse {
        totals: dashboard.totals,
        recent_transactions: dashboard
            .recent_transactions
            .into_iter()
            .map(Into::into)
            .collect(),
        monthly_stats: dashboard.monthly_stats,
    }))
}

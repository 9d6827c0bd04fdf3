//! The use-case layer: one service per entity that validates input,
//! applies the ownership guard and orchestrates the stores. Route handlers
//! stay thin by delegating here.

mod auth;
mod category;
mod goal;
mod saving_goal;
mod transaction;

pub use auth::AuthService;
pub use category::CategoryService;
pub use goal::GoalService;
pub use saving_goal::SavingGoalService;
pub use transaction::{
    DashboardReport, MonthlyStats, ReportQuery, SummaryReport, TotalsReport, TransactionService,
};

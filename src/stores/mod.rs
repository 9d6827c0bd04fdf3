//! The persistence ports: one storage-agnostic trait per entity, plus the
//! filter and report-row types the specialized queries work with.

mod category;
mod goal;
mod saving_goal;
pub mod sqlite;
mod transaction;
mod user;

pub use category::CategoryStore;
pub use goal::GoalStore;
pub use saving_goal::SavingGoalStore;
pub use transaction::{CategoryTotal, MonthTotals, TransactionFilters, TransactionStore};
pub use user::UserStore;

//! SQLite-backed implementations of the persistence ports.
//!
//! All stores share a single `Arc<Mutex<Connection>>`; each operation locks
//! the connection for the duration of its statement.

mod category;
mod goal;
mod saving_goal;
mod transaction;
mod user;

pub use category::SQLiteCategoryStore;
pub use goal::SQLiteGoalStore;
pub use saving_goal::SQLiteSavingGoalStore;
pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;

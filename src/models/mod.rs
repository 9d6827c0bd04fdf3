//! The domain model: plain records with invariant-preserving mutation
//! methods. Identity is assigned by the persistence layer on create, and
//! every mutating method refreshes the record's `updated_at` timestamp.

mod category;
mod goal;
mod saving_goal;
mod transaction;
mod user;

pub use category::{Category, CategoryName, NewCategory};
pub use goal::{Goal, NewGoal};
pub use saving_goal::{NewSavingGoal, SavingGoal};
pub use transaction::{Recurrence, Transaction, TransactionBuilder, TransactionType};
pub use user::{NewUser, User, UserID};

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;

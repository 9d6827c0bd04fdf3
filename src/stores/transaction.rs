//! Defines the transaction store trait along with the filter and
//! aggregate-row types its queries work with.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    models::{DatabaseID, Transaction, TransactionBuilder, TransactionType, UserID},
};

/// Optional criteria for narrowing transaction listings and aggregates.
///
/// When `month` and `year` are both given without explicit dates, the
/// effective window is the full calendar month. The date window
/// `[start_date, end_date]` is inclusive on both ends.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct TransactionFilters {
    /// Only include transactions with this paid status.
    pub paid: Option<bool>,
    /// Only include transactions in this calendar month (1-12). Requires
    /// `year` to take effect.
    pub month: Option<u8>,
    /// Only include transactions in this calendar year. Requires `month` to
    /// take effect.
    pub year: Option<i32>,
    /// Only include transactions of this type.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// Only include transactions labelled with this category.
    pub category_id: Option<DatabaseID>,
    /// Only include transactions on or after this date.
    pub start_date: Option<Date>,
    /// Only include transactions on or before this date.
    pub end_date: Option<Date>,
}

/// The total amount of transactions for one (category, type) pair.
///
/// Produced by joining transactions against categories that still exist;
/// transactions whose category has been deleted are excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category's name.
    pub name: String,
    /// The sum of amounts for this category and type.
    pub total: f64,
    /// The transaction type the total applies to.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// Income and expense sums for one calendar month, as stored (sparse:
/// months with no transactions produce no row; the service zero-fills).
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTotals {
    /// The calendar month number, 1-12.
    pub month: u8,
    /// The sum of income amounts in the month.
    pub income: f64,
    /// The sum of expense amounts in the month.
    pub expense: f64,
}

/// Handles the creation, retrieval and aggregation of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store.
    ///
    /// Returns [Error::NotFound] if no transaction with the given ID exists.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error>;

    /// Retrieve a user's transactions matching `filters`, ordered by date
    /// descending.
    fn get_by_user(
        &self,
        user_id: UserID,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>, Error>;

    /// Retrieve a user's transactions that are flagged as recurring.
    fn get_recurring(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;

    /// Persist changes to an existing transaction.
    ///
    /// Returns [Error::NotFound] if the transaction does not exist.
    fn update(&self, transaction: &Transaction) -> Result<(), Error>;

    /// Delete a transaction.
    ///
    /// Returns [Error::NotFound] if nothing was deleted.
    fn delete(&self, id: DatabaseID) -> Result<(), Error>;

    /// The sum of amounts of a user's transactions of `transaction_type`,
    /// optionally bounded by the inclusive `[start, end]` window. A sum
    /// over no rows is 0, not an error.
    fn total_by_type(
        &self,
        user_id: UserID,
        transaction_type: TransactionType,
        start: Option<Date>,
        end: Option<Date>,
    ) -> Result<f64, Error>;

    /// Transaction totals grouped by (category name, type), joined against
    /// categories that still exist, ordered by total descending. Honors the
    /// date window and type criteria of `filters`.
    fn category_totals(
        &self,
        user_id: UserID,
        filters: &TransactionFilters,
    ) -> Result<Vec<CategoryTotal>, Error>;

    /// Income and expense sums grouped by calendar month for the given
    /// year. Months with no transactions are absent from the result.
    fn monthly_totals(&self, user_id: UserID, year: i32) -> Result<Vec<MonthTotals>, Error>;
}

//! Transaction management and the report/aggregation engine.
//!
//! Reports are composed from the store's aggregate queries: windowed
//! totals, per-category totals and a zero-filled twelve month trend.

use serde::{Deserialize, Serialize};
use time::{Date, Month, OffsetDateTime};

use crate::{
    Error,
    models::{DatabaseID, Recurrence, Transaction, TransactionBuilder, TransactionType, UserID},
    stores::{CategoryTotal, TransactionFilters, TransactionStore},
};

/// How many transactions the dashboard lists.
const DASHBOARD_RECENT_LIMIT: usize = 10;

/// Income, expense and investment sums with the derived balance.
///
/// Balance is income minus expense; investments do not count against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalsReport {
    /// The sum of income amounts.
    pub total_income: f64,
    /// The sum of expense amounts.
    pub total_expense: f64,
    /// The sum of investment amounts.
    pub total_investment: f64,
    /// `total_income - total_expense`.
    pub balance: f64,
}

/// Income, expense and balance for one calendar month.
///
/// The report engine always produces twelve of these in calendar order,
/// with zeroes for months that have no transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    /// The full English month name, e.g. "January".
    pub month: String,
    /// The sum of income amounts in the month.
    pub income: f64,
    /// The sum of expense amounts in the month.
    pub expense: f64,
    /// `income - expense` for the month.
    pub balance: f64,
}

/// The window and criteria a summary report is requested for.
///
/// Missing parts default to today: no year means the current year, no month
/// means the current month, and missing dates mean the first/last day of
/// the resolved month.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ReportQuery {
    /// The calendar month (1-12) to report on.
    pub month: Option<u8>,
    /// The calendar year to report on.
    pub year: Option<i32>,
    /// Report on transactions on or after this date.
    pub start_date: Option<Date>,
    /// Report on transactions on or before this date.
    pub end_date: Option<Date>,
}

/// A windowed summary: totals and category breakdown for the requested
/// window, plus the twelve month trend.
///
/// The monthly stats always cover the current server year, even when the
/// requested window lies in another year. The trend chart is a fixed
/// this-year view, not a view of the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    /// The first day of the effective window.
    pub start_date: Date,
    /// The last day of the effective window.
    pub end_date: Date,
    /// Totals within the window.
    pub totals: TotalsReport,
    /// Per-category totals within the window, largest first.
    pub category_totals: Vec<CategoryTotal>,
    /// The current year's month-by-month trend.
    pub monthly_stats: Vec<MonthlyStats>,
}

/// The dashboard view: all-time totals, the most recent transactions and
/// the current year's trend.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardReport {
    /// All-time totals.
    pub totals: TotalsReport,
    /// The ten most recent transactions, newest first.
    pub recent_transactions: Vec<Transaction>,
    /// The current year's month-by-month trend.
    pub monthly_stats: Vec<MonthlyStats>,
}

/// Handles the creation and maintenance of transactions, and builds the
/// derived reports.
#[derive(Debug, Clone)]
pub struct TransactionService<T> {
    store: T,
}

impl<T> TransactionService<T>
where
    T: TransactionStore,
{
    /// Create a transaction service backed by `store`.
    pub fn new(store: T) -> Self {
        Self { store }
    }

    /// Create a transaction from `builder`.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] for an empty description, a non-positive
    /// amount or a referenced category/saving goal that does not exist.
    pub fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        validate_description(&builder.description)?;
        validate_amount(builder.amount)?;

        self.store.create(builder)
    }

    /// Materialize the future entries of a recurring transaction.
    ///
    /// Recurring transactions are recorded with their cadence but never
    /// expanded into concrete future entries.
    ///
    /// # Errors
    ///
    /// Always returns [Error::NotImplemented].
    pub fn create_recurring_series(
        &self,
        _user_id: UserID,
        _transaction_id: DatabaseID,
    ) -> Result<Vec<Transaction>, Error> {
        Err(Error::NotImplemented)
    }

    /// Get a transaction owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] when the transaction does not exist and
    /// [Error::Forbidden] when it belongs to another user.
    pub fn get(&self, user_id: UserID, transaction_id: DatabaseID) -> Result<Transaction, Error> {
        let transaction = self.store.get(transaction_id)?;

        if transaction.user_id != user_id {
            return Err(Error::Forbidden);
        }

        Ok(transaction)
    }

    /// List the user's transactions matching `filters`, newest first.
    pub fn list(
        &self,
        user_id: UserID,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>, Error> {
        self.store.get_by_user(user_id, filters)
    }

    /// List the user's transactions that are flagged as recurring.
    pub fn list_recurring(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        self.store.get_recurring(user_id)
    }

    /// Update a transaction's fields.
    ///
    /// A `recurrence` of `None` leaves the cadence untouched; passing
    /// [Recurrence::None] explicitly clears it.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &self,
        user_id: UserID,
        transaction_id: DatabaseID,
        description: &str,
        amount: f64,
        transaction_type: TransactionType,
        date: Date,
        category_id: Option<DatabaseID>,
        piggy_bank_id: Option<DatabaseID>,
        recurrence: Option<Recurrence>,
        recurrence_end: Option<Date>,
    ) -> Result<Transaction, Error> {
        let mut transaction = self.get(user_id, transaction_id)?;

        validate_description(description)?;
        validate_amount(amount)?;

        transaction.update(description.to_string(), amount, transaction_type, date);
        transaction.set_category(category_id);
        transaction.set_piggy_bank(piggy_bank_id);

        if let Some(recurrence) = recurrence {
            transaction.set_recurrence(recurrence, recurrence_end);
        }

        self.store.update(&transaction)?;

        Ok(transaction)
    }

    /// Flip a transaction's paid flag and return the updated transaction.
    pub fn toggle_paid(
        &self,
        user_id: UserID,
        transaction_id: DatabaseID,
    ) -> Result<Transaction, Error> {
        let mut transaction = self.get(user_id, transaction_id)?;

        transaction.toggle_paid();
        self.store.update(&transaction)?;

        Ok(transaction)
    }

    /// Delete a transaction owned by `user_id`.
    pub fn delete(&self, user_id: UserID, transaction_id: DatabaseID) -> Result<(), Error> {
        self.get(user_id, transaction_id)?;

        self.store.delete(transaction_id)
    }

    /// Income, expense and investment totals with the derived balance,
    /// optionally bounded by the inclusive `[start, end]` window.
    pub fn stats(
        &self,
        user_id: UserID,
        start: Option<Date>,
        end: Option<Date>,
    ) -> Result<TotalsReport, Error> {
        let total_income =
            self.store
                .total_by_type(user_id, TransactionType::Income, start, end)?;
        let total_expense =
            self.store
                .total_by_type(user_id, TransactionType::Expense, start, end)?;
        let total_investment =
            self.store
                .total_by_type(user_id, TransactionType::Investment, start, end)?;

        Ok(TotalsReport {
            total_income,
            total_expense,
            total_investment,
            balance: total_income - total_expense,
        })
    }

    /// The month-by-month income/expense trend for `year`: exactly twelve
    /// entries in calendar order, zero-filled for silent months.
    pub fn monthly_stats(&self, user_id: UserID, year: i32) -> Result<Vec<MonthlyStats>, Error> {
        let totals = self.store.monthly_totals(user_id, year)?;

        let mut stats = Vec::with_capacity(12);

        for month_number in 1..=12u8 {
            let month = Month::try_from(month_number)
                .map_err(|error| Error::Validation(error.to_string()))?;

            let (income, expense) = totals
                .iter()
                .find(|month_totals| month_totals.month == month_number)
                .map(|month_totals| (month_totals.income, month_totals.expense))
                .unwrap_or((0.0, 0.0));

            stats.push(MonthlyStats {
                month: month.to_string(),
                income,
                expense,
                balance: income - expense,
            });
        }

        Ok(stats)
    }

    /// Build a summary report for the window described by `query`.
    ///
    /// The monthly stats in the result always cover the current year, even
    /// for a window in another year.
    pub fn report(&self, user_id: UserID, query: &ReportQuery) -> Result<SummaryReport, Error> {
        let (start_date, end_date) = resolve_window(query)?;

        let totals = self.stats(user_id, Some(start_date), Some(end_date))?;

        let category_filters = TransactionFilters {
            start_date: Some(start_date),
            end_date: Some(end_date),
            ..Default::default()
        };
        let category_totals = self.store.category_totals(user_id, &category_filters)?;

        let current_year = OffsetDateTime::now_utc().year();
        let monthly_stats = self.monthly_stats(user_id, current_year)?;

        Ok(SummaryReport {
            start_date,
            end_date,
            totals,
            category_totals,
            monthly_stats,
        })
    }

    /// Build the dashboard report: all-time totals, the ten most recent
    /// transactions and the current year's trend.
    pub fn dashboard(&self, user_id: UserID) -> Result<DashboardReport, Error> {
        let totals = self.stats(user_id, None, None)?;

        let mut recent_transactions = self
            .store
            .get_by_user(user_id, &TransactionFilters::default())?;
        recent_transactions.truncate(DASHBOARD_RECENT_LIMIT);

        let current_year = OffsetDateTime::now_utc().year();
        let monthly_stats = self.monthly_stats(user_id, current_year)?;

        Ok(DashboardReport {
            totals,
            recent_transactions,
            monthly_stats,
        })
    }
}

/// Resolve the effective inclusive date window for a report query.
///
/// A missing year or month defaults to today's; missing dates default to
/// the first and last day of the resolved month. Explicit dates override
/// the month/year parts.
fn resolve_window(query: &ReportQuery) -> Result<(Date, Date), Error> {
    let today = OffsetDateTime::now_utc().date();

    let year = query.year.unwrap_or_else(|| today.year());
    let month = match query.month {
        Some(month_number) => Month::try_from(month_number)
            .map_err(|_| Error::Validation(format!("'{month_number}' is not a valid month")))?,
        None => today.month(),
    };

    let start_date = match query.start_date {
        Some(date) => date,
        None => Date::from_calendar_date(year, month, 1)
            .map_err(|error| Error::Validation(error.to_string()))?,
    };

    let end_date = match query.end_date {
        Some(date) => date,
        None => Date::from_calendar_date(year, month, month.length(year))
            .map_err(|error| Error::Validation(error.to_string()))?,
    };

    if end_date < start_date {
        return Err(Error::Validation(
            "end date must not be before start date".to_string(),
        ));
    }

    Ok((start_date, end_date))
}

fn validate_description(description: &str) -> Result<(), Error> {
    if description.trim().is_empty() {
        return Err(Error::Validation(
            "description must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_amount(amount: f64) -> Result<(), Error> {
    if amount <= 0.0 {
        return Err(Error::Validation(
            "amount must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

//! This file defines the type `Transaction`, the core type of the
//! bookkeeping part of the application, together with its type and
//! recurrence enums and a builder for creating new transactions.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// The effect a transaction has on the user's money.
///
/// Amounts are stored as positive magnitudes; the sign/effect is derived
/// from this type, never from the stored amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
    /// Money moved into an investment or savings goal.
    Investment,
}

impl TransactionType {
    /// The lowercase string stored in the database and used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Investment => "investment",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            "investment" => Ok(TransactionType::Investment),
            other => Err(Error::Validation(format!(
                "'{other}' is not a valid transaction type"
            ))),
        }
    }
}

/// A transaction's declared repeat cadence.
///
/// Expansion into materialized future transactions is not implemented; the
/// cadence and end date are recorded as-is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    /// The transaction does not repeat.
    #[default]
    None,
    /// Repeats every day.
    Daily,
    /// Repeats every week.
    Weekly,
    /// Repeats every month.
    Monthly,
    /// Repeats every year.
    Yearly,
}

impl Recurrence {
    /// The lowercase string stored in the database and used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
        }
    }
}

impl FromStr for Recurrence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Recurrence::None),
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            "yearly" => Ok(Recurrence::Yearly),
            other => Err(Error::Validation(format!(
                "'{other}' is not a valid recurrence"
            ))),
        }
    }
}

/// An income, expense or investment entry.
///
/// To create a new `Transaction`, use [Transaction::build] and pass the
/// builder to the transaction store.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseID,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money, always a positive magnitude.
    pub amount: f64,
    /// Whether this entry is income, an expense or an investment.
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    pub date: Date,
    /// The category the transaction is labelled with, if any.
    pub category_id: Option<DatabaseID>,
    /// The savings goal ("piggy bank") the transaction feeds, if any.
    pub piggy_bank_id: Option<DatabaseID>,
    /// The first transaction of a recurring series this entry was generated
    /// from. Currently never set by any generator.
    pub parent_id: Option<DatabaseID>,
    /// The user that created this transaction.
    pub user_id: UserID,
    /// Whether the transaction has been paid/settled.
    pub paid: bool,
    /// Whether the transaction repeats.
    pub is_recurrent: bool,
    /// The repeat cadence, [Recurrence::None] unless `is_recurrent`.
    pub recurrence: Recurrence,
    /// When the recurrence stops, if ever.
    pub recurrence_end: Option<Date>,
    /// When the transaction record was created.
    pub created_at: OffsetDateTime,
    /// When the transaction record was last changed.
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a builder for a new transaction.
    pub fn build(
        description: String,
        amount: f64,
        transaction_type: TransactionType,
        date: Date,
        user_id: UserID,
    ) -> TransactionBuilder {
        TransactionBuilder::new(description, amount, transaction_type, date, user_id)
    }

    /// Update the transaction's core fields.
    pub fn update(
        &mut self,
        description: String,
        amount: f64,
        transaction_type: TransactionType,
        date: Date,
    ) {
        self.description = description;
        self.amount = amount;
        self.transaction_type = transaction_type;
        self.date = date;
        self.updated_at = OffsetDateTime::now_utc();
    }

    /// Label the transaction with a category.
    pub fn set_category(&mut self, category_id: Option<DatabaseID>) {
        self.category_id = category_id;
        self.updated_at = OffsetDateTime::now_utc();
    }

    /// Link the transaction to a savings goal.
    pub fn set_piggy_bank(&mut self, piggy_bank_id: Option<DatabaseID>) {
        self.piggy_bank_id = piggy_bank_id;
        self.updated_at = OffsetDateTime::now_utc();
    }

    /// Flip the paid/settled flag.
    pub fn toggle_paid(&mut self) {
        self.paid = !self.paid;
        self.updated_at = OffsetDateTime::now_utc();
    }

    /// Set the transaction's repeat cadence.
    ///
    /// A cadence of [Recurrence::None] clears the recurring flag and the
    /// end date.
    pub fn set_recurrence(&mut self, recurrence: Recurrence, end: Option<Date>) {
        self.is_recurrent = recurrence != Recurrence::None;
        self.recurrence = recurrence;
        self.recurrence_end = if self.is_recurrent { end } else { None };
        self.updated_at = OffsetDateTime::now_utc();
    }
}

/// Builds the field set for a new transaction; pass the finished builder to
/// [TransactionStore::create](crate::stores::TransactionStore::create).
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money, a positive magnitude.
    pub amount: f64,
    /// Whether this entry is income, an expense or an investment.
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    pub date: Date,
    /// The user creating the transaction.
    pub user_id: UserID,
    /// The category to label the transaction with, if any.
    pub category_id: Option<DatabaseID>,
    /// The savings goal the transaction feeds, if any.
    pub piggy_bank_id: Option<DatabaseID>,
    /// The series parent, if this entry was materialized from a recurring
    /// transaction.
    pub parent_id: Option<DatabaseID>,
    /// Whether the transaction has been paid/settled.
    pub paid: bool,
    /// Whether the transaction repeats.
    pub is_recurrent: bool,
    /// The repeat cadence.
    pub recurrence: Recurrence,
    /// When the recurrence stops, if ever.
    pub recurrence_end: Option<Date>,
}

impl TransactionBuilder {
    /// Create a builder with the required fields; optional fields default to
    /// unset/false.
    pub fn new(
        description: String,
        amount: f64,
        transaction_type: TransactionType,
        date: Date,
        user_id: UserID,
    ) -> Self {
        Self {
            description,
            amount,
            transaction_type,
            date,
            user_id,
            category_id: None,
            piggy_bank_id: None,
            parent_id: None,
            paid: false,
            is_recurrent: false,
            recurrence: Recurrence::None,
            recurrence_end: None,
        }
    }

    /// Label the transaction with a category.
    pub fn category(mut self, category_id: DatabaseID) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Link the transaction to a savings goal.
    pub fn piggy_bank(mut self, piggy_bank_id: DatabaseID) -> Self {
        self.piggy_bank_id = Some(piggy_bank_id);
        self
    }

    /// Mark the transaction as already paid/settled.
    pub fn paid(mut self, paid: bool) -> Self {
        self.paid = paid;
        self
    }

    /// Declare the transaction as recurring with the given cadence.
    pub fn recurring(mut self, recurrence: Recurrence, end: Option<Date>) -> Self {
        self.is_recurrent = true;
        self.recurrence = recurrence;
        self.recurrence_end = end;
        self
    }
}

#[cfg(test)]
mod transaction_tests {
    use std::str::FromStr;

    use time::macros::date;

    use crate::models::UserID;

    use super::{Recurrence, Transaction, TransactionType};

    #[test]
    fn transaction_type_round_trips_through_strings() {
        for transaction_type in [
            TransactionType::Income,
            TransactionType::Expense,
            TransactionType::Investment,
        ] {
            let parsed = TransactionType::from_str(transaction_type.as_str()).unwrap();
            assert_eq!(parsed, transaction_type);
        }
    }

    #[test]
    fn transaction_type_rejects_unknown_strings() {
        assert!(TransactionType::from_str("transfer").is_err());
        assert!(TransactionType::from_str("").is_err());
    }

    #[test]
    fn recurrence_round_trips_through_strings() {
        for recurrence in [
            Recurrence::None,
            Recurrence::Daily,
            Recurrence::Weekly,
            Recurrence::Monthly,
            Recurrence::Yearly,
        ] {
            let parsed = Recurrence::from_str(recurrence.as_str()).unwrap();
            assert_eq!(parsed, recurrence);
        }
    }

    #[test]
    fn builder_sets_optional_fields() {
        let builder = Transaction::build(
            "Rent".to_string(),
            1200.0,
            TransactionType::Expense,
            date!(2024 - 03 - 01),
            UserID::new(7),
        )
        .category(3)
        .paid(true)
        .recurring(Recurrence::Monthly, Some(date!(2024 - 12 - 01)));

        assert_eq!(builder.category_id, Some(3));
        assert!(builder.paid);
        assert!(builder.is_recurrent);
        assert_eq!(builder.recurrence, Recurrence::Monthly);
        assert_eq!(builder.recurrence_end, Some(date!(2024 - 12 - 01)));
        assert_eq!(builder.piggy_bank_id, None);
        assert_eq!(builder.parent_id, None);
    }

    #[test]
    fn set_recurrence_none_clears_recurring_state() {
        let mut transaction = Transaction {
            id: 1,
            description: "Rent".to_string(),
            amount: 1200.0,
            transaction_type: TransactionType::Expense,
            date: date!(2024 - 03 - 01),
            category_id: None,
            piggy_bank_id: None,
            parent_id: None,
            user_id: UserID::new(1),
            paid: false,
            is_recurrent: false,
            recurrence: Recurrence::None,
            recurrence_end: None,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
            updated_at: time::OffsetDateTime::UNIX_EPOCH,
        };

        transaction.set_recurrence(Recurrence::Monthly, Some(date!(2024 - 12 - 01)));
        assert!(transaction.is_recurrent);
        assert_eq!(transaction.recurrence, Recurrence::Monthly);

        transaction.set_recurrence(Recurrence::None, Some(date!(2024 - 12 - 01)));
        assert!(!transaction.is_recurrent);
        assert_eq!(transaction.recurrence, Recurrence::None);
        assert_eq!(transaction.recurrence_end, None);
    }

    #[test]
    fn toggle_paid_flips_flag() {
        let mut transaction = Transaction {
            id: 1,
            description: "Coffee".to_string(),
            amount: 4.5,
            transaction_type: TransactionType::Expense,
            date: date!(2024 - 01 - 15),
            category_id: None,
            piggy_bank_id: None,
            parent_id: None,
            user_id: UserID::new(1),
            paid: false,
            is_recurrent: false,
            recurrence: Recurrence::None,
            recurrence_end: None,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
            updated_at: time::OffsetDateTime::UNIX_EPOCH,
        };

        transaction.toggle_paid();
        assert!(transaction.paid);

        transaction.toggle_paid();
        assert!(!transaction.paid);
    }
}

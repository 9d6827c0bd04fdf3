//! Implements a SQLite backed transaction store.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, Row, params_from_iter, types::Type, types::Value};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Recurrence, Transaction, TransactionBuilder, TransactionType, UserID},
    stores::{CategoryTotal, MonthTotals, TransactionFilters, TransactionStore},
};

/// Creates and retrieves transactions to/from a SQLite database.
///
/// The table is named `transaction`, a SQL keyword, so every statement
/// quotes it.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new transaction store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Append WHERE fragments and their parameters for `filters`.
    ///
    /// `column_prefix` qualifies column names when the query joins other
    /// tables, e.g. `"t."`.
    fn push_filters(
        filters: &TransactionFilters,
        column_prefix: &str,
        clauses: &mut Vec<String>,
        params: &mut Vec<Value>,
    ) {
        if let Some(paid) = filters.paid {
            clauses.push(format!("{column_prefix}paid = ?"));
            params.push(Value::from(paid));
        }

        if let Some(transaction_type) = filters.transaction_type {
            clauses.push(format!("{column_prefix}transaction_type = ?"));
            params.push(Value::from(transaction_type.as_str().to_string()));
        }

        if let Some(category_id) = filters.category_id {
            clauses.push(format!("{column_prefix}category_id = ?"));
            params.push(Value::from(category_id));
        }

        if let (Some(month), Some(year)) = (filters.month, filters.year) {
            clauses.push(format!(
                "CAST(strftime('%m', {column_prefix}date) AS INTEGER) = ?"
            ));
            params.push(Value::from(month as i64));
            clauses.push(format!(
                "CAST(strftime('%Y', {column_prefix}date) AS INTEGER) = ?"
            ));
            params.push(Value::from(year as i64));
        }

        if let Some(start_date) = filters.start_date {
            clauses.push(format!("{column_prefix}date >= ?"));
            params.push(Value::from(start_date.to_string()));
        }

        if let Some(end_date) = filters.end_date {
            clauses.push(format!("{column_prefix}date <= ?"));
            params.push(Value::from(end_date.to_string()));
        }
    }
}

const TRANSACTION_COLUMNS: &str = "id, description, amount, transaction_type, date, category_id, \
     piggy_bank_id, parent_id, user_id, paid, is_recurrent, recurrence, recurrence_end, \
     created_at, updated_at";

impl TransactionStore for SQLiteTransactionStore {
    fn create(&self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;
        let now = OffsetDateTime::now_utc();

        connection.execute(
            "INSERT INTO \"transaction\"
                (description, amount, transaction_type, date, category_id, piggy_bank_id,
                 parent_id, user_id, paid, is_recurrent, recurrence, recurrence_end,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            (
                &builder.description,
                builder.amount,
                builder.transaction_type.as_str(),
                builder.date,
                builder.category_id,
                builder.piggy_bank_id,
                builder.parent_id,
                builder.user_id.as_i64(),
                builder.paid,
                builder.is_recurrent,
                builder.recurrence.as_str(),
                builder.recurrence_end,
                now,
                now,
            ),
        )?;

        Ok(Transaction {
            id: connection.last_insert_rowid(),
            description: builder.description,
            amount: builder.amount,
            transaction_type: builder.transaction_type,
            date: builder.date,
            category_id: builder.category_id,
            piggy_bank_id: builder.piggy_bank_id,
            parent_id: builder.parent_id,
            user_id: builder.user_id,
            paid: builder.paid,
            is_recurrent: builder.is_recurrent,
            recurrence: builder.recurrence,
            recurrence_end: builder.recurrence_end,
            created_at: now,
            updated_at: now,
        })
    }

    fn get(&self, id: DatabaseID) -> Result<Transaction, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
            ))?
            .query_row(&[(":id", &id)], Self::map_row)
            .map_err(|error| error.into())
    }

    fn get_by_user(
        &self,
        user_id: UserID,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>, Error> {
        let mut clauses = vec!["user_id = ?".to_string()];
        let mut params = vec![Value::from(user_id.as_i64())];
        Self::push_filters(filters, "", &mut clauses, &mut params);

        let query = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE {} ORDER BY date DESC, id DESC",
            clauses.join(" AND ")
        );

        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(&query)?
            .query_map(params_from_iter(params), Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }

    fn get_recurring(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
                 WHERE user_id = :user_id AND is_recurrent = 1
                 ORDER BY date DESC, id DESC"
            ))?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }

    fn update(&self, transaction: &Transaction) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute(
                "UPDATE \"transaction\"
                 SET description = ?1, amount = ?2, transaction_type = ?3, date = ?4,
                     category_id = ?5, piggy_bank_id = ?6, paid = ?7, is_recurrent = ?8,
                     recurrence = ?9, recurrence_end = ?10, updated_at = ?11
                 WHERE id = ?12",
                (
                    &transaction.description,
                    transaction.amount,
                    transaction.transaction_type.as_str(),
                    transaction.date,
                    transaction.category_id,
                    transaction.piggy_bank_id,
                    transaction.paid,
                    transaction.is_recurrent,
                    transaction.recurrence.as_str(),
                    transaction.recurrence_end,
                    transaction.updated_at,
                    transaction.id,
                ),
            )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    fn delete(&self, id: DatabaseID) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute("DELETE FROM \"transaction\" WHERE id = ?1", (id,))?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    fn total_by_type(
        &self,
        user_id: UserID,
        transaction_type: TransactionType,
        start: Option<Date>,
        end: Option<Date>,
    ) -> Result<f64, Error> {
        let mut clauses = vec!["user_id = ?".to_string(), "transaction_type = ?".to_string()];
        let mut params = vec![
            Value::from(user_id.as_i64()),
            Value::from(transaction_type.as_str().to_string()),
        ];

        if let Some(start_date) = start {
            clauses.push("date >= ?".to_string());
            params.push(Value::from(start_date.to_string()));
        }

        if let Some(end_date) = end {
            clauses.push("date <= ?".to_string());
            params.push(Value::from(end_date.to_string()));
        }

        let query = format!(
            "SELECT COALESCE(SUM(amount), 0) FROM \"transaction\" WHERE {}",
            clauses.join(" AND ")
        );

        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(&query)?
            .query_row(params_from_iter(params), |row| row.get(0))
            .map_err(|error| error.into())
    }

    fn category_totals(
        &self,
        user_id: UserID,
        filters: &TransactionFilters,
    ) -> Result<Vec<CategoryTotal>, Error> {
        // INNER JOIN drops transactions whose category was deleted or was
        // never set.
        let mut clauses = vec!["t.user_id = ?".to_string()];
        let mut params = vec![Value::from(user_id.as_i64())];
        Self::push_filters(filters, "t.", &mut clauses, &mut params);

        let query = format!(
            "SELECT c.name, SUM(t.amount) AS total, t.transaction_type
             FROM \"transaction\" t
             INNER JOIN category c ON c.id = t.category_id
             WHERE {}
             GROUP BY c.name, t.transaction_type
             ORDER BY total DESC",
            clauses.join(" AND ")
        );

        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(&query)?
            .query_map(params_from_iter(params), |row| {
                let name = row.get(0)?;
                let total = row.get(1)?;

                let raw_type: String = row.get(2)?;
                let transaction_type = TransactionType::from_str(&raw_type).map_err(|_| {
                    rusqlite::Error::FromSqlConversionFailure(2, Type::Text, raw_type.into())
                })?;

                Ok(CategoryTotal {
                    name,
                    total,
                    transaction_type,
                })
            })?
            .map(|maybe_total| maybe_total.map_err(|error| error.into()))
            .collect()
    }

    fn monthly_totals(&self, user_id: UserID, year: i32) -> Result<Vec<MonthTotals>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "SELECT CAST(strftime('%m', date) AS INTEGER) AS month,
                        COALESCE(SUM(CASE WHEN transaction_type = 'income' THEN amount ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN transaction_type = 'expense' THEN amount ELSE 0 END), 0)
                 FROM \"transaction\"
                 WHERE user_id = :user_id
                   AND CAST(strftime('%Y', date) AS INTEGER) = :year
                 GROUP BY month
                 ORDER BY month ASC",
            )?
            .query_map(
                &[
                    (":user_id", &user_id.as_i64()),
                    (":year", &(year as i64)),
                ],
                |row| {
                    Ok(MonthTotals {
                        month: row.get(0)?,
                        income: row.get(1)?,
                        expense: row.get(2)?,
                    })
                },
            )?
            .map(|maybe_totals| maybe_totals.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                transaction_type TEXT NOT NULL,
                date TEXT NOT NULL,
                category_id INTEGER REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL,
                piggy_bank_id INTEGER REFERENCES saving_goal(id) ON UPDATE CASCADE ON DELETE SET NULL,
                parent_id INTEGER REFERENCES \"transaction\"(id) ON UPDATE CASCADE ON DELETE SET NULL,
                user_id INTEGER NOT NULL REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                paid INTEGER NOT NULL DEFAULT 0,
                is_recurrent INTEGER NOT NULL DEFAULT 0,
                recurrence TEXT NOT NULL DEFAULT 'none',
                recurrence_end TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_type: String = row.get(offset + 3)?;
        let transaction_type = TransactionType::from_str(&raw_type).map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(offset + 3, Type::Text, raw_type.into())
        })?;

        let raw_recurrence: String = row.get(offset + 11)?;
        let recurrence = Recurrence::from_str(&raw_recurrence).map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                offset + 11,
                Type::Text,
                raw_recurrence.into(),
            )
        })?;

        Ok(Transaction {
            id: row.get(offset)?,
            description: row.get(offset + 1)?,
            amount: row.get(offset + 2)?,
            transaction_type,
            date: row.get(offset + 4)?,
            category_id: row.get(offset + 5)?,
            piggy_bank_id: row.get(offset + 6)?,
            parent_id: row.get(offset + 7)?,
            user_id: UserID::new(row.get(offset + 8)?),
            paid: row.get(offset + 9)?,
            is_recurrent: row.get(offset + 10)?,
            recurrence,
            recurrence_end: row.get(offset + 12)?,
            created_at: row.get(offset + 13)?,
            updated_at: row.get(offset + 14)?,
        })
    }
}

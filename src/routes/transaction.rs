//! Handlers and DTOs for the transaction routes.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    models::{DatabaseID, Recurrence, Transaction, TransactionType, UserID},
    state::TransactionState,
    stores::{TransactionFilters, TransactionStore},
};

/// A transaction as sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// The transaction's ID.
    pub id: DatabaseID,
    /// What the transaction was for.
    pub description: String,
    /// The amount of money, a positive magnitude.
    pub amount: f64,
    /// Whether this entry is income, an expense or an investment.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    pub date: Date,
    /// The category the transaction is labelled with, if any.
    pub category_id: Option<DatabaseID>,
    /// The saving goal the transaction feeds, if any.
    pub piggy_bank_id: Option<DatabaseID>,
    /// Whether the transaction has been paid/settled.
    pub paid: bool,
    /// Whether the transaction repeats.
    pub is_recurrent: bool,
    /// The repeat cadence.
    pub recurrence: Recurrence,
    /// When the recurrence stops, if ever.
    pub recurrence_end: Option<Date>,
    /// When the transaction record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction record was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id,
            description: transaction.description,
            amount: transaction.amount,
            transaction_type: transaction.transaction_type,
            date: transaction.date,
            category_id: transaction.category_id,
            piggy_bank_id: transaction.piggy_bank_id,
            paid: transaction.paid,
            is_recurrent: transaction.is_recurrent,
            recurrence: transaction.recurrence,
            recurrence_end: transaction.recurrence_end,
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
        }
    }
}

/// The data for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// What the transaction was for.
    pub description: String,
    /// The amount of money, must be greater than zero.
    pub amount: f64,
    /// Whether this entry is income, an expense or an investment.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    pub date: Date,
    /// The category to label the transaction with.
    pub category_id: Option<DatabaseID>,
    /// The saving goal the transaction feeds.
    pub piggy_bank_id: Option<DatabaseID>,
    /// Whether the transaction has already been paid/settled.
    #[serde(default)]
    pub paid: bool,
    /// The repeat cadence, when the transaction recurs.
    pub recurrence: Option<Recurrence>,
    /// When the recurrence stops.
    pub recurrence_end: Option<Date>,
}

/// The data for updating a transaction.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// The new description.
    pub description: String,
    /// The new amount, must be greater than zero.
    pub amount: f64,
    /// The new transaction type.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The new date.
    pub date: Date,
    /// The new category label.
    pub category_id: Option<DatabaseID>,
    /// The new saving goal link.
    pub piggy_bank_id: Option<DatabaseID>,
    /// The new repeat cadence. Omit to leave the cadence as is; send
    /// `"none"` to stop the transaction recurring.
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    /// When the recurrence stops.
    #[serde(default)]
    pub recurrence_end: Option<Date>,
}

/// Handle the creation of a transaction.
pub async fn create_transaction<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    let mut builder = Transaction::build(
        request.description,
        request.amount,
        request.transaction_type,
        request.date,
        user_id,
    )
    .paid(request.paid);

    builder.category_id = request.category_id;
    builder.piggy_bank_id = request.piggy_bank_id;

    if let Some(recurrence) = request.recurrence {
        builder = builder.recurring(recurrence, request.recurrence_end);
    }

    let transaction = state.transaction_service.create(builder)?;

    Ok((StatusCode::CREATED, Json(transaction.into())))
}

/// List the caller's transactions, filtered by the query string.
pub async fn list_transactions<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
    Query(filters): Query<TransactionFilters>,
) -> Result<Json<Vec<TransactionResponse>>, Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    let transactions = state.transaction_service.list(user_id, &filters)?;

    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}

/// Get a single transaction.
pub async fn get_transaction<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<Json<TransactionResponse>, Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    let transaction = state.transaction_service.get(user_id, transaction_id)?;

    Ok(Json(transaction.into()))
}

/// Update a transaction.
pub async fn update_transaction<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<DatabaseID>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<TransactionResponse>, Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    let transaction = state.transaction_service.update(
        user_id,
        transaction_id,
        &request.description,
        request.amount,
        request.transaction_type,
        request.date,
        request.category_id,
        request.piggy_bank_id,
        request.recurrence,
        request.recurrence_end,
    )?;

    Ok(Json(transaction.into()))
}

/// Toggle a transaction's paid flag.
pub async fn toggle_paid<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<Json<TransactionResponse>, Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    let transaction = state.transaction_service.toggle_paid(user_id, transaction_id)?;

    Ok(Json(transaction.into()))
}

/// Delete a transaction.
pub async fn delete_transaction<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<StatusCode, Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    state.transaction_service.delete(user_id, transaction_id)?;

    Ok(StatusCode::NO_CONTENT)
}

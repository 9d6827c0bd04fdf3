//! Handlers and DTOs for the category routes.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    models::{Category, DatabaseID, TransactionType, UserID},
    state::CategoryState,
    stores::CategoryStore,
};

/// A category as sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResponse {
    /// The category's ID.
    pub id: DatabaseID,
    /// The category's name.
    pub name: String,
    /// The category's display color.
    pub color: String,
    /// The transaction type the category applies to.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Whether the category is shared across all users.
    pub shared: bool,
    /// When the category was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the category was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name.to_string(),
            color: category.color,
            transaction_type: category.transaction_type,
            shared: category.ownership.is_shared(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

/// The data for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// The category's name, unique within its scope.
    pub name: String,
    /// The category's display color.
    pub color: String,
    /// The transaction type the category applies to.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Create the category in the shared scope instead of the caller's.
    #[serde(default)]
    pub shared: bool,
}

/// The data for updating a category.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    /// The new name.
    pub name: String,
    /// The new display color.
    pub color: String,
    /// The new transaction type.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// Handle the creation of a category.
pub async fn create_category<C>(
    State(state): State<CategoryState<C>>,
    Extension(user_id): Extension<UserID>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), Error>
where
    C: CategoryStore + Clone + Send + Sync,
{
    let category = state.category_service.create(
        user_id,
        &request.name,
        &request.color,
        request.transaction_type,
        request.shared,
    )?;

    Ok((StatusCode::CREATED, Json(category.into())))
}

/// List the caller's categories plus the shared scope.
pub async fn list_categories<C>(
    State(state): State<CategoryState<C>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<CategoryResponse>>, Error>
where
    C: CategoryStore + Clone + Send + Sync,
{
    let categories = state.category_service.list(user_id)?;

    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// Get a single category.
pub async fn get_category<C>(
    State(state): State<CategoryState<C>>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<DatabaseID>,
) -> Result<Json<CategoryResponse>, Error>
where
    C: CategoryStore + Clone + Send + Sync,
{
    let category = state.category_service.get(user_id, category_id)?;

    Ok(Json(category.into()))
}

/// Update a category.
pub async fn update_category<C>(
    State(state): State<CategoryState<C>>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<DatabaseID>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, Error>
where
    C: CategoryStore + Clone + Send + Sync,
{
    let category = state.category_service.update(
        user_id,
        category_id,
        &request.name,
        &request.color,
        request.transaction_type,
    )?;

    Ok(Json(category.into()))
}

/// Delete a category.
pub async fn delete_category<C>(
    State(state): State<CategoryState<C>>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<DatabaseID>,
) -> Result<StatusCode, Error>
where
    C: CategoryStore + Clone + Send + Sync,
{
    state.category_service.delete(user_id, category_id)?;

    Ok(StatusCode::NO_CONTENT)
}

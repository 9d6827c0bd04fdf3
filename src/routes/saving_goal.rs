//! Handlers and DTOs for the saving goal routes.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    models::{DatabaseID, SavingGoal, UserID},
    state::SavingGoalState,
    stores::SavingGoalStore,
};

/// A saving goal as sent to clients, with the computed progress fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingGoalResponse {
    /// The saving goal's ID.
    pub id: DatabaseID,
    /// The saving goal's name.
    pub name: String,
    /// The saving goal's description.
    pub description: String,
    /// The amount the user wants to save.
    pub target_amount: f64,
    /// The amount saved so far.
    pub current_amount: f64,
    /// The saved fraction of the target as a percentage, clamped to 100.
    pub progress: f64,
    /// Whether the saved amount has reached the target.
    pub is_completed: bool,
    /// When the saving goal was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the saving goal was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<SavingGoal> for SavingGoalResponse {
    fn from(goal: SavingGoal) -> Self {
        Self {
            id: goal.id,
            progress: goal.progress(),
            is_completed: goal.is_completed(),
            name: goal.name,
            description: goal.description,
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            created_at: goal.created_at,
            updated_at: goal.updated_at,
        }
    }
}

/// The data for creating or updating a saving goal.
#[derive(Debug, Deserialize)]
pub struct SavingGoalRequest {
    /// The saving goal's name.
    pub name: String,
    /// The saving goal's description.
    #[serde(default)]
    pub description: String,
    /// The amount the user wants to save.
    pub target_amount: f64,
    /// The amount saved so far.
    #[serde(default)]
    pub current_amount: f64,
}

/// The data for depositing into a saving goal.
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    /// The amount to add, must be greater than zero.
    pub amount: f64,
}

/// Handle the creation of a saving goal.
pub async fn create_saving_goal<S>(
    State(state): State<SavingGoalState<S>>,
    Extension(user_id): Extension<UserID>,
    Json(request): Json<SavingGoalRequest>,
) -> Result<(StatusCode, Json<SavingGoalResponse>), Error>
where
    S: SavingGoalStore + Clone + Send + Sync,
{
    let goal = state.saving_goal_service.create(
        user_id,
        &request.name,
        &request.description,
        request.target_amount,
        request.current_amount,
    )?;

    Ok((StatusCode::CREATED, Json(goal.into())))
}

/// List the caller's saving goals.
pub async fn list_saving_goals<S>(
    State(state): State<SavingGoalState<S>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<SavingGoalResponse>>, Error>
where
    S: SavingGoalStore + Clone + Send + Sync,
{
    let goals = state.saving_goal_service.list(user_id)?;

    Ok(Json(goals.into_iter().map(Into::into).collect()))
}

/// Get a single saving goal.
pub async fn get_saving_goal<S>(
    State(state): State<SavingGoalState<S>>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<DatabaseID>,
) -> Result<Json<SavingGoalResponse>, Error>
where
    S: SavingGoalStore + Clone + Send + Sync,
{
    let goal = state.saving_goal_service.get(user_id, goal_id)?;

    Ok(Json(goal.into()))
}

/// Update a saving goal.
pub async fn update_saving_goal<S>(
    State(state): State<SavingGoalState<S>>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<DatabaseID>,
    Json(request): Json<SavingGoalRequest>,
) -> Result<Json<SavingGoalResponse>, Error>
where
    S: SavingGoalStore + Clone + Send + Sync,
{
    let goal = state.saving_goal_service.update(
        user_id,
        goal_id,
        &request.name,
        &request.description,
        request.target_amount,
        request.current_amount,
    )?;

    Ok(Json(goal.into()))
}

/// Deposit into a saving goal.
pub async fn deposit<S>(
    State(state): State<SavingGoalState<S>>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<DatabaseID>,
    Json(request): Json<DepositRequest>,
) -> Result<Json<SavingGoalResponse>, Error>
where
    S: SavingGoalStore + Clone + Send + Sync,
{
    let goal = state
        .saving_goal_service
        .deposit(user_id, goal_id, request.amount)?;

    Ok(Json(goal.into()))
}

/// Delete a saving goal.
pub async fn delete_saving_goal<S>(
    State(state): State<SavingGoalState<S>>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<DatabaseID>,
) -> Result<StatusCode, Error>
where
    S: SavingGoalStore + Clone + Send + Sync,
{
    state.saving_goal_service.delete(user_id, goal_id)?;

    Ok(StatusCode::NO_CONTENT)
}

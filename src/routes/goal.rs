//! Handlers and DTOs for the goal routes.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    models::{DatabaseID, Goal, UserID},
    state::GoalState,
    stores::GoalStore,
};

/// A goal as sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalResponse {
    /// The goal's ID.
    pub id: DatabaseID,
    /// The goal's name.
    pub name: String,
    /// The goal's description.
    pub description: String,
    /// The target amount.
    pub amount: f64,
    /// When the goal was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the goal was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Goal> for GoalResponse {
    fn from(goal: Goal) -> Self {
        Self {
            id: goal.id,
            name: goal.name,
            description: goal.description,
            amount: goal.amount,
            created_at: goal.created_at,
            updated_at: goal.updated_at,
        }
    }
}

/// The data for creating or updating a goal.
#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    /// The goal's name.
    pub name: String,
    /// The goal's description.
    #[serde(default)]
    pub description: String,
    /// The target amount, must be greater than zero.
    pub amount: f64,
}

/// Handle the creation of a goal.
pub async fn create_goal<G>(
    State(state): State<GoalState<G>>,
    Extension(user_id): Extension<UserID>,
    Json(request): Json<GoalRequest>,
) -> Result<(StatusCode, Json<GoalResponse>), Error>
where
    G: GoalStore + Clone + Send + Sync,
{
    let goal = state.goal_service.create(
        user_id,
        &request.name,
        &request.description,
        request.amount,
    )?;

    Ok((StatusCode::CREATED, Json(goal.into())))
}

/// List the caller's goals.
pub async fn list_goals<G>(
    State(state): State<GoalState<G>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<GoalResponse>>, Error>
where
    G: GoalStore + Clone + Send + Sync,
{
    let goals = state.goal_service.list(user_id)?;

    Ok(Json(goals.into_iter().map(Into::into).collect()))
}

/// Get a single goal.
pub async fn get_goal<G>(
    State(state): State<GoalState<G>>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<DatabaseID>,
) -> Result<Json<GoalResponse>, Error>
where
    G: GoalStore + Clone + Send + Sync,
{
    let goal = state.goal_service.get(user_id, goal_id)?;

    Ok(Json(goal.into()))
}

/// Update a goal.
pub async fn update_goal<G>(
    State(state): State<GoalState<G>>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<DatabaseID>,
    Json(request): Json<GoalRequest>,
) -> Result<Json<GoalResponse>, Error>
where
    G: GoalStore + Clone + Send + Sync,
{
    let goal = state.goal_service.update(
        user_id,
        goal_id,
        &request.name,
        &request.description,
        request.amount,
    )?;

    Ok(Json(goal.into()))
}

/// Delete a goal.
pub async fn delete_goal<G>(
    State(state): State<GoalState<G>>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<DatabaseID>,
) -> Result<StatusCode, Error>
where
    G: GoalStore + Clone + Send + Sync,
{
    state.goal_service.delete(user_id, goal_id)?;

    Ok(StatusCode::NO_CONTENT)
}

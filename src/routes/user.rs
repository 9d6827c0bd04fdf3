//! Handlers and DTOs for registration, login, profile and password routes.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::encode_token,
    models::{User, UserID},
    state::UserState,
    stores::UserStore,
};

/// A user as sent to clients. The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    /// The user's ID.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// When the user registered.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.to_string(),
            created_at: user.created_at,
        }
    }
}

/// The data for registering a new user.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The user's plain-text password, hashed before storage.
    pub password: String,
}

/// The credentials for logging in.
#[derive(Debug, Deserialize)]
pub struct LogInRequest {
    /// The user's email address.
    pub email: String,
    /// The user's plain-text password.
    pub password: String,
}

/// A successful login: the bearer token and the user it belongs to.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogInResponse {
    /// The signed bearer token for subsequent requests.
    pub token: String,
    /// The logged-in user.
    pub user: UserResponse,
}

/// The data for updating a user's profile.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    /// The new display name.
    pub name: String,
    /// The new email address.
    pub email: String,
}

/// The data for changing a user's password.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    /// The user's current password, verified before the change.
    pub current_password: String,
    /// The new plain-text password.
    pub new_password: String,
}

/// Handle the registration of a new user.
pub async fn register<U>(
    State(state): State<UserState<U>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), Error>
where
    U: UserStore + Clone + Send + Sync,
{
    let user = state
        .auth_service
        .register(&request.name, &request.email, &request.password)?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Handle a login attempt, issuing a bearer token on success.
pub async fn log_in<U>(
    State(state): State<UserState<U>>,
    Json(request): Json<LogInRequest>,
) -> Result<Json<LogInResponse>, Error>
where
    U: UserStore + Clone + Send + Sync,
{
    let user = state.auth_service.login(&request.email, &request.password)?;
    let token = encode_token(&state.auth_keys, user.id)?;

    Ok(Json(LogInResponse {
        token,
        user: user.into(),
    }))
}

/// Return the authenticated user's profile.
pub async fn get_profile<U>(
    State(state): State<UserState<U>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<UserResponse>, Error>
where
    U: UserStore + Clone + Send + Sync,
{
    let user = state.auth_service.get_profile(user_id)?;

    Ok(Json(user.into()))
}

/// Update the authenticated user's name and email.
pub async fn update_profile<U>(
    State(state): State<UserState<U>>,
    Extension(user_id): Extension<UserID>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, Error>
where
    U: UserStore + Clone + Send + Sync,
{
    let user = state
        .auth_service
        .update_profile(user_id, &request.name, &request.email)?;

    Ok(Json(user.into()))
}

/// Change the authenticated user's password.
pub async fn change_password<U>(
    State(state): State<UserState<U>>,
    Extension(user_id): Extension<UserID>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, Error>
where
    U: UserStore + Clone + Send + Sync,
{
    state
        .auth_service
        .change_password(user_id, &request.current_password, &request.new_password)?;

    Ok(StatusCode::NO_CONTENT)
}

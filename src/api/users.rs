//! Account endpoints: signup, login, approval and profile updates

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::user::{ApprovalStatus, CreateUser, Role, UpdateUser, User},
};

use super::{AppJson, AppPath, AuthenticatedUser};

/// Signup response: the new account plus a status message
#[derive(Serialize, ToSchema)]
pub struct SignupResponse {
    #[serde(flatten)]
    pub user: User,
    pub message: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    #[serde(rename = "type")]
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Serialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Serialize, ToSchema)]
pub struct UserMessageResponse {
    pub message: String,
    pub user: User,
}

/// Create an account
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "Account created", body = SignupResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email or username already exists")
    )
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    AppJson(data): AppJson<CreateUser>,
) -> AppResult<(StatusCode, Json<SignupResponse>)> {
    let user = state.services.users.signup(data).await?;
    let message = match user.approval_status {
        ApprovalStatus::Pending => "Account created successfully. Please wait for admin approval.",
        _ => "Account created successfully.",
    };
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user,
            message: message.to_string(),
        }),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account inactive, pending or rejected"),
        (status = 404, description = "User not found")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state
        .services
        .users
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        role: user.role,
        first_name: user.first_name,
        last_name: user.last_name,
    }))
}

/// Get the current user
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_by_id(claims.user_id).await?;
    Ok(Json(user))
}

/// List every account
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = UsersResponse),
        (status = 403, description = "Admin or Editor role required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UsersResponse>> {
    let users = state.services.users.list_users(&claims).await?;
    Ok(Json(UsersResponse { users }))
}

/// List accounts waiting for approval
#[utoipa::path(
    get,
    path = "/users/pending",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pending users", body = UsersResponse),
        (status = 403, description = "Admin or Editor role required")
    )
)]
pub async fn list_pending(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UsersResponse>> {
    let users = state.services.users.list_pending(&claims).await?;
    Ok(Json(UsersResponse { users }))
}

/// Update an account
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 403, description = "Not allowed to edit this account"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email or username already exists")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(data): AppJson<UpdateUser>,
) -> AppResult<Json<User>> {
    let updated = state.services.users.update_user(&claims, id, data).await?;
    Ok(Json(updated))
}

/// Approve a pending account
#[utoipa::path(
    patch,
    path = "/users/{id}/approve",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User approved", body = UserMessageResponse),
        (status = 400, description = "User is not pending approval"),
        (status = 403, description = "Admin or Editor role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn approve_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<UserMessageResponse>> {
    let user = state
        .services
        .users
        .decide_approval(&claims, id, ApprovalStatus::Approved)
        .await?;
    Ok(Json(UserMessageResponse {
        message: "User approved successfully".to_string(),
        user,
    }))
}

/// Reject a pending account
#[utoipa::path(
    patch,
    path = "/users/{id}/reject",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User rejected", body = UserMessageResponse),
        (status = 400, description = "User is not pending approval"),
        (status = 403, description = "Admin or Editor role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn reject_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<UserMessageResponse>> {
    let user = state
        .services
        .users
        .decide_approval(&claims, id, ApprovalStatus::Rejected)
        .await?;
    Ok(Json(UserMessageResponse {
        message: "User rejected successfully".to_string(),
        user,
    }))
}

//! User account endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use festa_common::AppResult;
use festa_core::{SignupInput, UpdateUserInput};
use festa_db::entities::user;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{response::ApiResponse, state::AppState};

/// Signup request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub interests: Option<Vec<String>>,
}

/// User response. The stored credential is never serialized.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub interests: Vec<String>,
    pub join_date: String,
    pub admin: i32,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        let interests = user.interest_list();
        Self {
            user_id: user.id,
            name: user.name,
            email: user.email,
            interests,
            join_date: user.join_date.to_rfc3339(),
            admin: user.admin,
        }
    }
}

/// Register a new account.
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    req.validate()?;

    let user = state
        .user_service
        .signup(SignupInput {
            name: req.name,
            email: req.email,
            password: req.password,
            interests: req.interests,
        })
        .await?;

    Ok(ApiResponse::ok(user.into()))
}

/// Log in with email and password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.login(&req.email, &req.password).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// List all users.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state.user_service.list().await?;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Get one user.
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get(id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Partially update an account.
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .user_service
        .update(
            id,
            UpdateUserInput {
                name: req.name,
                password: req.password,
                interests: req.interests,
            },
        )
        .await?;

    Ok(ApiResponse::ok(user.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/", get(list))
        .route("/{id}", get(get_user).put(update))
}

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use yamdb_auth_types::identity::{Identity, MaybeIdentity};
use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::user::Role;

use crate::domain::types::{ProfilePatch, User};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeleteUserUseCase, GetSelfUseCase, GetUserUseCase,
    ListUsersUseCase, UpdateSelfUseCase, UpdateUserUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

/// Self-service profile update. A `role` key in the body is dropped by serde.
#[derive(Deserialize, Default)]
pub struct SelfPatchRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct UserPatchRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
}

#[derive(Deserialize, Default)]
pub struct UserListQuery {
    pub search: Option<String>,
}

// ── GET /users/me ────────────────────────────────────────────────────────────

pub async fn get_me(
    Identity(caller): Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let uc = GetSelfUseCase {
        repo: state.user_repo(),
    };
    let user = uc.execute(caller).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/me ──────────────────────────────────────────────────────────

pub async fn update_me(
    Identity(caller): Identity,
    State(state): State<AppState>,
    Json(body): Json<SelfPatchRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let uc = UpdateSelfUseCase {
        repo: state.user_repo(),
    };
    let patch = ProfilePatch {
        username: body.username,
        email: body.email,
        first_name: body.first_name,
        last_name: body.last_name,
        bio: body.bio,
        role: None,
    };
    let user = uc.execute(caller, patch).await?;
    Ok(Json(user.into()))
}

// ── GET /users ───────────────────────────────────────────────────────────────

pub async fn list_users(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<UserResponse>>, ApiError> {
    let uc = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = uc
        .execute(&identity.subject(), query.search.as_deref(), page)
        .await?;
    Ok(Json(users.map(UserResponse::from)))
}

// ── POST /users ──────────────────────────────────────────────────────────────

pub async fn create_user(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let uc = CreateUserUseCase {
        repo: state.user_repo(),
    };
    let user = uc
        .execute(
            &identity.subject(),
            CreateUserInput {
                username: body.username,
                email: body.email,
                role: body.role,
                first_name: body.first_name,
                last_name: body.last_name,
                bio: body.bio,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users/{username} ────────────────────────────────────────────────────

pub async fn get_user(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let uc = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = uc.execute(&identity.subject(), &username).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/{username} ──────────────────────────────────────────────────

pub async fn update_user(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(body): Json<UserPatchRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let uc = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    let patch = ProfilePatch {
        username: body.username,
        email: body.email,
        first_name: body.first_name,
        last_name: body.last_name,
        bio: body.bio,
        role: body.role,
    };
    let user = uc.execute(&identity.subject(), &username, patch).await?;
    Ok(Json(user.into()))
}

// ── DELETE /users/{username} ─────────────────────────────────────────────────

pub async fn delete_user(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiError> {
    let uc = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    uc.execute(&identity.subject(), &username).await?;
    Ok(StatusCode::NO_CONTENT)
}

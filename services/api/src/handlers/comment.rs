use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use yamdb_auth_types::identity::MaybeIdentity;
use yamdb_domain::pagination::{Page, PageRequest};

use crate::domain::types::Comment;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::comment::{
    CreateCommentUseCase, DeleteCommentUseCase, GetCommentUseCase, ListCommentsUseCase,
    UpdateCommentUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub review: Uuid,
    pub author: String,
    pub text: String,
    #[serde(serialize_with = "yamdb_core::serde::to_rfc3339_ms")]
    pub pub_date: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            review: comment.review_id,
            author: comment.author_username,
            text: comment.text,
            pub_date: comment.created_at,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Deserialize, Default)]
pub struct UpdateCommentRequest {
    pub text: Option<String>,
}

// ── GET /reviews/{review_id}/comments ────────────────────────────────────────

pub async fn list_comments(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<CommentResponse>>, ApiError> {
    let uc = ListCommentsUseCase {
        reviews: state.review_repo(),
        comments: state.comment_repo(),
    };
    let comments = uc.execute(&identity.subject(), review_id, page).await?;
    Ok(Json(comments.map(CommentResponse::from)))
}

// ── POST /reviews/{review_id}/comments ───────────────────────────────────────

pub async fn create_comment(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let uc = CreateCommentUseCase {
        reviews: state.review_repo(),
        comments: state.comment_repo(),
        users: state.user_repo(),
    };
    let comment = uc
        .execute(&identity.subject(), review_id, body.text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

// ── GET /reviews/{review_id}/comments/{comment_id} ───────────────────────────

pub async fn get_comment(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path((review_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CommentResponse>, ApiError> {
    let uc = GetCommentUseCase {
        comments: state.comment_repo(),
    };
    let comment = uc
        .execute(&identity.subject(), review_id, comment_id)
        .await?;
    Ok(Json(comment.into()))
}

// ── PATCH /reviews/{review_id}/comments/{comment_id} ─────────────────────────

pub async fn update_comment(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path((review_id, comment_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    let uc = UpdateCommentUseCase {
        comments: state.comment_repo(),
    };
    let comment = uc
        .execute(&identity.subject(), review_id, comment_id, body.text)
        .await?;
    Ok(Json(comment.into()))
}

// ── DELETE /reviews/{review_id}/comments/{comment_id} ────────────────────────

pub async fn delete_comment(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path((review_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let uc = DeleteCommentUseCase {
        comments: state.comment_repo(),
    };
    uc.execute(&identity.subject(), review_id, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

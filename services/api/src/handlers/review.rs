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
use yamdb_domain::review::Score;
use yamdb_domain::validation::ValidationReason;

use crate::domain::types::Review;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::require_caller;
use crate::usecase::review::{
    CreateReviewInput, CreateReviewUseCase, DeleteReviewUseCase, GetReviewUseCase,
    ListReviewsUseCase, ReviewPatch, UpdateReviewUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub title: Uuid,
    /// Author's username.
    pub author: String,
    pub score: Score,
    pub text: String,
    #[serde(serialize_with = "yamdb_core::serde::to_rfc3339_ms")]
    pub pub_date: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            title: review.title_id,
            author: review.author_username,
            score: review.score,
            text: review.text,
            pub_date: review.created_at,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub score: Option<i64>,
    #[serde(default)]
    pub text: String,
}

#[derive(Deserialize, Default)]
pub struct UpdateReviewRequest {
    pub score: Option<i64>,
    pub text: Option<String>,
}

// ── GET /titles/{title_id}/reviews ───────────────────────────────────────────

pub async fn list_reviews(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<ReviewResponse>>, ApiError> {
    let uc = ListReviewsUseCase {
        titles: state.title_repo(),
        reviews: state.review_repo(),
    };
    let reviews = uc.execute(&identity.subject(), title_id, page).await?;
    Ok(Json(reviews.map(ReviewResponse::from)))
}

// ── POST /titles/{title_id}/reviews ──────────────────────────────────────────

pub async fn create_review(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
    Json(body): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    let subject = identity.subject();
    require_caller(&subject)?;
    let score = body
        .score
        .ok_or(ApiError::validation("score", ValidationReason::Required))?;
    let uc = CreateReviewUseCase {
        titles: state.title_repo(),
        reviews: state.review_repo(),
        users: state.user_repo(),
    };
    let review = uc
        .execute(
            &subject,
            title_id,
            CreateReviewInput {
                score,
                text: body.text,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(review.into())))
}

// ── GET /titles/{title_id}/reviews/{review_id} ───────────────────────────────

pub async fn get_review(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let uc = GetReviewUseCase {
        reviews: state.review_repo(),
    };
    let review = uc
        .execute(&identity.subject(), title_id, review_id)
        .await?;
    Ok(Json(review.into()))
}

// ── PATCH /titles/{title_id}/reviews/{review_id} ─────────────────────────────

pub async fn update_review(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let uc = UpdateReviewUseCase {
        reviews: state.review_repo(),
    };
    let patch = ReviewPatch {
        score: body.score,
        text: body.text,
    };
    let review = uc
        .execute(&identity.subject(), title_id, review_id, patch)
        .await?;
    Ok(Json(review.into()))
}

// ── DELETE /titles/{title_id}/reviews/{review_id} ────────────────────────────

pub async fn delete_review(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let uc = DeleteReviewUseCase {
        reviews: state.review_repo(),
    };
    uc.execute(&identity.subject(), title_id, review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

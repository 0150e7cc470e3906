use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use yamdb_auth_types::identity::MaybeIdentity;
use yamdb_domain::pagination::{Page, PageRequest};

use crate::domain::types::{Title, TitleFilter};
use crate::error::ApiError;
use crate::handlers::catalog::ClassifierResponse;
use crate::state::AppState;
use crate::usecase::title::{
    CreateTitleUseCase, DeleteTitleUseCase, GetTitleUseCase, ListTitlesUseCase, TitleInput,
    TitlePatch, UpdateTitleUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TitleResponse {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub genre: Vec<ClassifierResponse>,
    pub category: Option<ClassifierResponse>,
    /// Mean review score; `null` until the title has a review.
    pub rating: Option<f64>,
}

impl From<Title> for TitleResponse {
    fn from(title: Title) -> Self {
        Self {
            id: title.id,
            name: title.name,
            year: title.year,
            description: title.description,
            genre: title.genres.into_iter().map(Into::into).collect(),
            category: title.category.map(Into::into),
            rating: title.rating,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

/// `rating` is not a field here; serde drops it if a client sends one.
#[derive(Deserialize)]
pub struct CreateTitleRequest {
    #[serde(default)]
    pub name: String,
    pub year: Option<i32>,
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
    pub category: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct UpdateTitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
    pub category: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct TitleListQuery {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
}

// ── GET /titles ──────────────────────────────────────────────────────────────

pub async fn list_titles(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Query(query): Query<TitleListQuery>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<TitleResponse>>, ApiError> {
    let uc = ListTitlesUseCase {
        titles: state.title_repo(),
        reviews: state.review_repo(),
    };
    let filter = TitleFilter {
        category: query.category,
        genre: query.genre,
        name: query.name,
        year: query.year,
    };
    let titles = uc.execute(&identity.subject(), &filter, page).await?;
    Ok(Json(titles.map(TitleResponse::from)))
}

// ── POST /titles ─────────────────────────────────────────────────────────────

pub async fn create_title(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Json(body): Json<CreateTitleRequest>,
) -> Result<(StatusCode, Json<TitleResponse>), ApiError> {
    let uc = CreateTitleUseCase {
        titles: state.title_repo(),
        catalog: state.classifier_repo(),
    };
    let input = TitleInput {
        name: body.name,
        year: body.year,
        description: body.description,
        genre: body.genre,
        category: body.category,
    };
    let title = uc.execute(&identity.subject(), input).await?;
    Ok((StatusCode::CREATED, Json(title.into())))
}

// ── GET /titles/{title_id} ───────────────────────────────────────────────────

pub async fn get_title(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
) -> Result<Json<TitleResponse>, ApiError> {
    let uc = GetTitleUseCase {
        titles: state.title_repo(),
        reviews: state.review_repo(),
    };
    let title = uc.execute(&identity.subject(), title_id).await?;
    Ok(Json(title.into()))
}

// ── PATCH /titles/{title_id} ─────────────────────────────────────────────────

pub async fn update_title(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
    Json(body): Json<UpdateTitleRequest>,
) -> Result<Json<TitleResponse>, ApiError> {
    let uc = UpdateTitleUseCase {
        titles: state.title_repo(),
        catalog: state.classifier_repo(),
        reviews: state.review_repo(),
    };
    let patch = TitlePatch {
        name: body.name,
        year: body.year,
        description: body.description,
        genre: body.genre,
        category: body.category,
    };
    let title = uc.execute(&identity.subject(), title_id, patch).await?;
    Ok(Json(title.into()))
}

// ── DELETE /titles/{title_id} ────────────────────────────────────────────────

pub async fn delete_title(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let uc = DeleteTitleUseCase {
        titles: state.title_repo(),
    };
    uc.execute(&identity.subject(), title_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use yamdb_auth_types::identity::MaybeIdentity;
use yamdb_domain::pagination::{Page, PageRequest};

use crate::domain::types::{Classifier, ClassifierKind};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::catalog::{
    CreateClassifierUseCase, DeleteClassifierUseCase, ListClassifiersUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

/// Wire shape of a category or genre, also nested inside titles.
#[derive(Serialize)]
pub struct ClassifierResponse {
    pub name: String,
    pub slug: String,
}

impl From<Classifier> for ClassifierResponse {
    fn from(item: Classifier) -> Self {
        Self {
            name: item.name,
            slug: item.slug,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ClassifierRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Deserialize, Default)]
pub struct ClassifierListQuery {
    pub search: Option<String>,
}

// ── Shared bodies ────────────────────────────────────────────────────────────

async fn list(
    kind: ClassifierKind,
    identity: MaybeIdentity,
    state: AppState,
    query: ClassifierListQuery,
    page: PageRequest,
) -> Result<Json<Page<ClassifierResponse>>, ApiError> {
    let uc = ListClassifiersUseCase {
        repo: state.classifier_repo(),
    };
    let items = uc
        .execute(&identity.subject(), kind, query.search.as_deref(), page)
        .await?;
    Ok(Json(items.map(ClassifierResponse::from)))
}

async fn create(
    kind: ClassifierKind,
    identity: MaybeIdentity,
    state: AppState,
    body: ClassifierRequest,
) -> Result<(StatusCode, Json<ClassifierResponse>), ApiError> {
    let uc = CreateClassifierUseCase {
        repo: state.classifier_repo(),
    };
    let item = uc
        .execute(&identity.subject(), kind, body.name, body.slug)
        .await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

async fn delete(
    kind: ClassifierKind,
    identity: MaybeIdentity,
    state: AppState,
    slug: String,
) -> Result<StatusCode, ApiError> {
    let uc = DeleteClassifierUseCase {
        repo: state.classifier_repo(),
    };
    uc.execute(&identity.subject(), kind, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── /categories ──────────────────────────────────────────────────────────────

pub async fn list_categories(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Query(query): Query<ClassifierListQuery>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<ClassifierResponse>>, ApiError> {
    list(ClassifierKind::Category, identity, state, query, page).await
}

pub async fn create_category(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Json(body): Json<ClassifierRequest>,
) -> Result<(StatusCode, Json<ClassifierResponse>), ApiError> {
    create(ClassifierKind::Category, identity, state, body).await
}

pub async fn delete_category(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete(ClassifierKind::Category, identity, state, slug).await
}

// ── /genres ──────────────────────────────────────────────────────────────────

pub async fn list_genres(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Query(query): Query<ClassifierListQuery>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<ClassifierResponse>>, ApiError> {
    list(ClassifierKind::Genre, identity, state, query, page).await
}

pub async fn create_genre(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Json(body): Json<ClassifierRequest>,
) -> Result<(StatusCode, Json<ClassifierResponse>), ApiError> {
    create(ClassifierKind::Genre, identity, state, body).await
}

pub async fn delete_genre(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete(ClassifierKind::Genre, identity, state, slug).await
}

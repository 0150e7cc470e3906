use chrono::{Datelike, Utc};
use uuid::Uuid;

use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::policy::{Action, Resource, Subject};
use yamdb_domain::slug::validate_name;
use yamdb_domain::validation::{FieldError, ValidationReason};

use crate::domain::repository::{ClassifierRepository, ReviewRepository, TitleRepository};
use crate::domain::types::{Classifier, ClassifierKind, Title, TitleFilter, TitleRecord};
use crate::error::ApiError;
use crate::usecase::authorize;
use crate::usecase::review::title_rating;

fn validate_year(year: i32) -> Result<(), FieldError> {
    if year > Utc::now().year() {
        return Err(FieldError::new("year", ValidationReason::InvalidYear));
    }
    Ok(())
}

async fn resolve_category<C: ClassifierRepository>(
    catalog: &C,
    slug: &str,
) -> Result<Classifier, ApiError> {
    catalog
        .find_by_slug(ClassifierKind::Category, slug)
        .await?
        .ok_or(ApiError::validation("category", ValidationReason::UnknownSlug))
}

async fn resolve_genres<C: ClassifierRepository>(
    catalog: &C,
    slugs: &[String],
) -> Result<Vec<Classifier>, ApiError> {
    let mut genres: Vec<Classifier> = Vec::with_capacity(slugs.len());
    for slug in slugs {
        if genres.iter().any(|g| &g.slug == slug) {
            continue;
        }
        let genre = catalog
            .find_by_slug(ClassifierKind::Genre, slug)
            .await?
            .ok_or(ApiError::validation("genre", ValidationReason::UnknownSlug))?;
        genres.push(genre);
    }
    Ok(genres)
}

fn record_of(title: &Title) -> TitleRecord {
    TitleRecord {
        name: title.name.clone(),
        year: title.year,
        description: title.description.clone(),
        category_id: title.category.as_ref().map(|c| c.id),
        genre_ids: title.genres.iter().map(|g| g.id).collect(),
    }
}

// ── List ─────────────────────────────────────────────────────────────────────

pub struct ListTitlesUseCase<T: TitleRepository, R: ReviewRepository> {
    pub titles: T,
    pub reviews: R,
}

impl<T: TitleRepository, R: ReviewRepository> ListTitlesUseCase<T, R> {
    pub async fn execute(
        &self,
        subject: &Subject,
        filter: &TitleFilter,
        page: PageRequest,
    ) -> Result<Page<Title>, ApiError> {
        authorize(subject, Action::List, &Resource::Title)?;
        let mut page = self.titles.list(filter, page.clamped()).await?;
        let ids: Vec<Uuid> = page.results.iter().map(|t| t.id).collect();
        let tallies = self.reviews.tallies(&ids).await?;
        for title in &mut page.results {
            title.rating = tallies.get(&title.id).and_then(|t| t.mean());
        }
        Ok(page)
    }
}

// ── Get ──────────────────────────────────────────────────────────────────────

pub struct GetTitleUseCase<T: TitleRepository, R: ReviewRepository> {
    pub titles: T,
    pub reviews: R,
}

impl<T: TitleRepository, R: ReviewRepository> GetTitleUseCase<T, R> {
    pub async fn execute(&self, subject: &Subject, id: Uuid) -> Result<Title, ApiError> {
        authorize(subject, Action::Retrieve, &Resource::Title)?;
        let mut title = self
            .titles
            .find(id)
            .await?
            .ok_or(ApiError::TitleNotFound)?;
        title.rating = title_rating(&self.reviews, id).await?;
        Ok(title)
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

/// Write payload. `genre` and `category` are slugs; there is no rating input.
#[derive(Debug, Default)]
pub struct TitleInput {
    pub name: String,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub genre: Vec<String>,
    pub category: Option<String>,
}

pub struct CreateTitleUseCase<T: TitleRepository, C: ClassifierRepository> {
    pub titles: T,
    pub catalog: C,
}

impl<T: TitleRepository, C: ClassifierRepository> CreateTitleUseCase<T, C> {
    pub async fn execute(&self, subject: &Subject, input: TitleInput) -> Result<Title, ApiError> {
        authorize(subject, Action::Create, &Resource::Title)?;
        validate_name(&input.name)?;
        let year = input
            .year
            .ok_or(ApiError::validation("year", ValidationReason::Required))?;
        validate_year(year)?;

        let category = match input.category.as_deref() {
            Some(slug) => Some(resolve_category(&self.catalog, slug).await?),
            None => None,
        };
        let genres = resolve_genres(&self.catalog, &input.genre).await?;

        let title = Title {
            id: Uuid::now_v7(),
            name: input.name,
            year,
            description: input.description,
            category,
            genres,
            rating: None,
        };
        self.titles.create(title.id, &record_of(&title)).await?;
        Ok(title)
    }
}

// ── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct TitlePatch {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
    pub category: Option<String>,
}

pub struct UpdateTitleUseCase<T: TitleRepository, C: ClassifierRepository, R: ReviewRepository> {
    pub titles: T,
    pub catalog: C,
    pub reviews: R,
}

impl<T, C, R> UpdateTitleUseCase<T, C, R>
where
    T: TitleRepository,
    C: ClassifierRepository,
    R: ReviewRepository,
{
    pub async fn execute(
        &self,
        subject: &Subject,
        id: Uuid,
        patch: TitlePatch,
    ) -> Result<Title, ApiError> {
        authorize(subject, Action::Update, &Resource::Title)?;
        let mut title = self
            .titles
            .find(id)
            .await?
            .ok_or(ApiError::TitleNotFound)?;

        if let Some(name) = patch.name {
            validate_name(&name)?;
            title.name = name;
        }
        if let Some(year) = patch.year {
            validate_year(year)?;
            title.year = year;
        }
        if let Some(description) = patch.description {
            title.description = Some(description);
        }
        if let Some(slug) = patch.category.as_deref() {
            title.category = Some(resolve_category(&self.catalog, slug).await?);
        }
        if let Some(slugs) = patch.genre.as_deref() {
            title.genres = resolve_genres(&self.catalog, slugs).await?;
        }

        self.titles.update(id, &record_of(&title)).await?;
        title.rating = title_rating(&self.reviews, id).await?;
        Ok(title)
    }
}

// ── Delete ───────────────────────────────────────────────────────────────────

pub struct DeleteTitleUseCase<T: TitleRepository> {
    pub titles: T,
}

impl<T: TitleRepository> DeleteTitleUseCase<T> {
    pub async fn execute(&self, subject: &Subject, id: Uuid) -> Result<(), ApiError> {
        authorize(subject, Action::Delete, &Resource::Title)?;
        if !self.titles.delete(id).await? {
            return Err(ApiError::TitleNotFound);
        }
        Ok(())
    }
}

use uuid::Uuid;

use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::policy::{Action, Subject};
use yamdb_domain::slug::{validate_name, validate_slug};
use yamdb_domain::validation::ValidationReason;

use crate::domain::repository::ClassifierRepository;
use crate::domain::types::{Classifier, ClassifierKind};
use crate::error::ApiError;
use crate::usecase::authorize;

fn not_found(kind: ClassifierKind) -> ApiError {
    match kind {
        ClassifierKind::Category => ApiError::CategoryNotFound,
        ClassifierKind::Genre => ApiError::GenreNotFound,
    }
}

// ── List ─────────────────────────────────────────────────────────────────────

pub struct ListClassifiersUseCase<R: ClassifierRepository> {
    pub repo: R,
}

impl<R: ClassifierRepository> ListClassifiersUseCase<R> {
    pub async fn execute(
        &self,
        subject: &Subject,
        kind: ClassifierKind,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Classifier>, ApiError> {
        authorize(subject, Action::List, &kind.resource())?;
        self.repo.list(kind, search, page.clamped()).await
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateClassifierUseCase<R: ClassifierRepository> {
    pub repo: R,
}

impl<R: ClassifierRepository> CreateClassifierUseCase<R> {
    pub async fn execute(
        &self,
        subject: &Subject,
        kind: ClassifierKind,
        name: String,
        slug: String,
    ) -> Result<Classifier, ApiError> {
        authorize(subject, Action::Create, &kind.resource())?;
        validate_name(&name)?;
        validate_slug(&slug)?;

        let item = Classifier {
            id: Uuid::now_v7(),
            name,
            slug,
        };
        if !self.repo.create(kind, &item).await? {
            return Err(ApiError::validation("slug", ValidationReason::Conflict));
        }
        Ok(item)
    }
}

// ── Delete ───────────────────────────────────────────────────────────────────

pub struct DeleteClassifierUseCase<R: ClassifierRepository> {
    pub repo: R,
}

impl<R: ClassifierRepository> DeleteClassifierUseCase<R> {
    /// Deleting a category detaches its titles; deleting a genre removes it
    /// from every title.
    pub async fn execute(
        &self,
        subject: &Subject,
        kind: ClassifierKind,
        slug: &str,
    ) -> Result<(), ApiError> {
        authorize(subject, Action::Delete, &kind.resource())?;
        if !self.repo.delete(kind, slug).await? {
            return Err(not_found(kind));
        }
        Ok(())
    }
}

use chrono::Utc;
use uuid::Uuid;

use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::policy::{Action, Principal, Resource, Subject};
use yamdb_domain::review::Score;
use yamdb_domain::validation::check_required;

use crate::domain::repository::{ReviewRepository, TitleRepository, UserRepository};
use crate::domain::types::Review;
use crate::error::ApiError;
use crate::usecase::{authorize, require_caller};

/// Mean score of the title's current reviews; `None` when it has none.
pub async fn title_rating<R: ReviewRepository>(
    reviews: &R,
    title_id: Uuid,
) -> Result<Option<f64>, ApiError> {
    let tallies = reviews.tallies(&[title_id]).await?;
    Ok(tallies.get(&title_id).and_then(|t| t.mean()))
}

async fn ensure_title<T: TitleRepository>(titles: &T, title_id: Uuid) -> Result<(), ApiError> {
    match titles.find(title_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::TitleNotFound),
    }
}

/// Look up a review as addressed under `title_id`. A review that exists under
/// another title is not found.
async fn find_review<R: ReviewRepository>(
    reviews: &R,
    title_id: Uuid,
    review_id: Uuid,
) -> Result<Review, ApiError> {
    reviews
        .find(review_id)
        .await?
        .filter(|r| r.title_id == title_id)
        .ok_or(ApiError::ReviewNotFound)
}

// ── List / Get ───────────────────────────────────────────────────────────────

pub struct ListReviewsUseCase<T: TitleRepository, R: ReviewRepository> {
    pub titles: T,
    pub reviews: R,
}

impl<T: TitleRepository, R: ReviewRepository> ListReviewsUseCase<T, R> {
    pub async fn execute(
        &self,
        subject: &Subject,
        title_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Review>, ApiError> {
        authorize(subject, Action::List, &Resource::Review { author: None })?;
        ensure_title(&self.titles, title_id).await?;
        self.reviews.list(title_id, page.clamped()).await
    }
}

pub struct GetReviewUseCase<R: ReviewRepository> {
    pub reviews: R,
}

impl<R: ReviewRepository> GetReviewUseCase<R> {
    pub async fn execute(
        &self,
        subject: &Subject,
        title_id: Uuid,
        review_id: Uuid,
    ) -> Result<Review, ApiError> {
        let review = find_review(&self.reviews, title_id, review_id).await?;
        authorize(subject, Action::Retrieve, &review.resource())?;
        Ok(review)
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateReviewInput {
    pub score: i64,
    pub text: String,
}

pub struct CreateReviewUseCase<T: TitleRepository, R: ReviewRepository, U: UserRepository> {
    pub titles: T,
    pub reviews: R,
    pub users: U,
}

impl<T, R, U> CreateReviewUseCase<T, R, U>
where
    T: TitleRepository,
    R: ReviewRepository,
    U: UserRepository,
{
    /// Fails with [`ApiError::DuplicateReview`] if the caller already reviewed
    /// this title. Nothing is recomputed; the rating is derived on read.
    pub async fn execute(
        &self,
        subject: &Subject,
        title_id: Uuid,
        input: CreateReviewInput,
    ) -> Result<Review, ApiError> {
        authorize(subject, Action::Create, &Resource::Review { author: None })?;
        let Some(&Principal { id: author_id, .. }) = subject.principal() else {
            return Err(ApiError::Unauthorized);
        };
        ensure_title(&self.titles, title_id).await?;
        let score = Score::new(input.score)?;
        check_required("text", &input.text)?;

        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let review = Review {
            id: Uuid::now_v7(),
            title_id,
            author_id,
            author_username: author.username,
            score,
            text: input.text,
            created_at: Utc::now(),
        };
        self.reviews.create(&review).await?;
        tracing::info!(review_id = %review.id, title_id = %title_id, author_id = %author_id, "review created");
        Ok(review)
    }
}

// ── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ReviewPatch {
    pub score: Option<i64>,
    pub text: Option<String>,
}

pub struct UpdateReviewUseCase<R: ReviewRepository> {
    pub reviews: R,
}

impl<R: ReviewRepository> UpdateReviewUseCase<R> {
    /// Author and title are immutable; only score and text change.
    pub async fn execute(
        &self,
        subject: &Subject,
        title_id: Uuid,
        review_id: Uuid,
        patch: ReviewPatch,
    ) -> Result<Review, ApiError> {
        require_caller(subject)?;
        let mut review = find_review(&self.reviews, title_id, review_id).await?;
        authorize(subject, Action::Update, &review.resource())?;

        if let Some(score) = patch.score {
            review.score = Score::new(score)?;
        }
        if let Some(text) = patch.text {
            check_required("text", &text)?;
            review.text = text;
        }
        self.reviews
            .update(review.id, review.score, &review.text)
            .await?;
        Ok(review)
    }
}

// ── Delete ───────────────────────────────────────────────────────────────────

pub struct DeleteReviewUseCase<R: ReviewRepository> {
    pub reviews: R,
}

impl<R: ReviewRepository> DeleteReviewUseCase<R> {
    /// Comments under the review are deleted with it.
    pub async fn execute(
        &self,
        subject: &Subject,
        title_id: Uuid,
        review_id: Uuid,
    ) -> Result<(), ApiError> {
        require_caller(subject)?;
        let review = find_review(&self.reviews, title_id, review_id).await?;
        authorize(subject, Action::Delete, &review.resource())?;
        if !self.reviews.delete(review.id).await? {
            return Err(ApiError::ReviewNotFound);
        }
        Ok(())
    }
}

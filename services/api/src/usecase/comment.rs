use chrono::Utc;
use uuid::Uuid;

use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::policy::{Action, Principal, Resource, Subject};
use yamdb_domain::validation::check_required;

use crate::domain::repository::{CommentRepository, ReviewRepository, UserRepository};
use crate::domain::types::Comment;
use crate::error::ApiError;
use crate::usecase::{authorize, require_caller};

async fn ensure_review<R: ReviewRepository>(reviews: &R, review_id: Uuid) -> Result<(), ApiError> {
    match reviews.find(review_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::ReviewNotFound),
    }
}

async fn find_comment<C: CommentRepository>(
    comments: &C,
    review_id: Uuid,
    comment_id: Uuid,
) -> Result<Comment, ApiError> {
    comments
        .find(comment_id)
        .await?
        .filter(|c| c.review_id == review_id)
        .ok_or(ApiError::CommentNotFound)
}

// ── List / Get ───────────────────────────────────────────────────────────────

pub struct ListCommentsUseCase<R: ReviewRepository, C: CommentRepository> {
    pub reviews: R,
    pub comments: C,
}

impl<R: ReviewRepository, C: CommentRepository> ListCommentsUseCase<R, C> {
    pub async fn execute(
        &self,
        subject: &Subject,
        review_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Comment>, ApiError> {
        authorize(subject, Action::List, &Resource::Comment { author: None })?;
        ensure_review(&self.reviews, review_id).await?;
        self.comments.list(review_id, page.clamped()).await
    }
}

pub struct GetCommentUseCase<C: CommentRepository> {
    pub comments: C,
}

impl<C: CommentRepository> GetCommentUseCase<C> {
    pub async fn execute(
        &self,
        subject: &Subject,
        review_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Comment, ApiError> {
        let comment = find_comment(&self.comments, review_id, comment_id).await?;
        authorize(subject, Action::Retrieve, &comment.resource())?;
        Ok(comment)
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateCommentUseCase<R: ReviewRepository, C: CommentRepository, U: UserRepository> {
    pub reviews: R,
    pub comments: C,
    pub users: U,
}

impl<R, C, U> CreateCommentUseCase<R, C, U>
where
    R: ReviewRepository,
    C: CommentRepository,
    U: UserRepository,
{
    pub async fn execute(
        &self,
        subject: &Subject,
        review_id: Uuid,
        text: String,
    ) -> Result<Comment, ApiError> {
        authorize(subject, Action::Create, &Resource::Comment { author: None })?;
        let Some(&Principal { id: author_id, .. }) = subject.principal() else {
            return Err(ApiError::Unauthorized);
        };
        ensure_review(&self.reviews, review_id).await?;
        check_required("text", &text)?;

        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let comment = Comment {
            id: Uuid::now_v7(),
            review_id,
            author_id,
            author_username: author.username,
            text,
            created_at: Utc::now(),
        };
        self.comments.create(&comment).await?;
        Ok(comment)
    }
}

// ── Update / Delete ──────────────────────────────────────────────────────────

pub struct UpdateCommentUseCase<C: CommentRepository> {
    pub comments: C,
}

impl<C: CommentRepository> UpdateCommentUseCase<C> {
    pub async fn execute(
        &self,
        subject: &Subject,
        review_id: Uuid,
        comment_id: Uuid,
        text: Option<String>,
    ) -> Result<Comment, ApiError> {
        require_caller(subject)?;
        let mut comment = find_comment(&self.comments, review_id, comment_id).await?;
        authorize(subject, Action::Update, &comment.resource())?;
        if let Some(text) = text {
            check_required("text", &text)?;
            self.comments.update(comment.id, &text).await?;
            comment.text = text;
        }
        Ok(comment)
    }
}

pub struct DeleteCommentUseCase<C: CommentRepository> {
    pub comments: C,
}

impl<C: CommentRepository> DeleteCommentUseCase<C> {
    pub async fn execute(
        &self,
        subject: &Subject,
        review_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), ApiError> {
        require_caller(subject)?;
        let comment = find_comment(&self.comments, review_id, comment_id).await?;
        authorize(subject, Action::Delete, &comment.resource())?;
        if !self.comments.delete(comment.id).await? {
            return Err(ApiError::CommentNotFound);
        }
        Ok(())
    }
}

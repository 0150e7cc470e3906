#![allow(async_fn_in_trait)]

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use yamdb_domain::id::UserId;
use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::review::{Score, ScoreTally};

use crate::domain::types::{
    Classifier, ClassifierKind, Comment, Review, Title, TitleFilter, TitleRecord, User,
};
use crate::error::ApiError;

/// Repository for accounts and their outstanding confirmation challenge.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    /// Insert a new account. Returns `false` if the username or email is taken.
    async fn create(&self, user: &User) -> Result<bool, ApiError>;

    /// Persist profile fields and role. Returns `false` if the new username or
    /// email is taken by another account.
    async fn update(&self, user: &User) -> Result<bool, ApiError>;

    /// Replace the outstanding challenge, superseding any earlier one.
    async fn set_challenge(
        &self,
        id: UserId,
        nonce: Uuid,
        issued_at: DateTime<Utc>,
    ) -> Result<(), ApiError>;

    /// Clear the challenge only if it still carries `nonce`. Returns `true` if
    /// this call cleared it.
    async fn consume_challenge(&self, id: UserId, nonce: Uuid) -> Result<bool, ApiError>;

    /// Ordered by username; `search` is a substring match on username.
    async fn list(&self, search: Option<&str>, page: PageRequest)
    -> Result<Page<User>, ApiError>;

    /// Returns `true` if a row was deleted. Reviews and comments cascade.
    async fn delete(&self, id: UserId) -> Result<bool, ApiError>;
}

/// Repository for categories and genres.
pub trait ClassifierRepository: Send + Sync {
    /// Ordered by name; `search` is a substring match on name.
    async fn list(
        &self,
        kind: ClassifierKind,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Classifier>, ApiError>;

    async fn find_by_slug(
        &self,
        kind: ClassifierKind,
        slug: &str,
    ) -> Result<Option<Classifier>, ApiError>;

    /// Returns `false` if the slug is taken.
    async fn create(&self, kind: ClassifierKind, item: &Classifier) -> Result<bool, ApiError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, kind: ClassifierKind, slug: &str) -> Result<bool, ApiError>;
}

/// Repository for titles. Returned titles carry `rating: None`; the rating is
/// derived from [`ReviewRepository::tallies`].
pub trait TitleRepository: Send + Sync {
    async fn list(&self, filter: &TitleFilter, page: PageRequest)
    -> Result<Page<Title>, ApiError>;
    async fn find(&self, id: Uuid) -> Result<Option<Title>, ApiError>;
    async fn create(&self, id: Uuid, record: &TitleRecord) -> Result<(), ApiError>;
    async fn update(&self, id: Uuid, record: &TitleRecord) -> Result<(), ApiError>;

    /// Returns `true` if a row was deleted. Reviews cascade.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Repository for reviews. Owns the one-review-per-author-per-title invariant.
pub trait ReviewRepository: Send + Sync {
    /// Ordered by `created_at` ascending.
    async fn list(&self, title_id: Uuid, page: PageRequest) -> Result<Page<Review>, ApiError>;
    async fn find(&self, id: Uuid) -> Result<Option<Review>, ApiError>;

    /// Atomic check-then-insert. Fails with [`ApiError::DuplicateReview`] if
    /// `(title_id, author_id)` already has a review, including when a
    /// concurrent insert wins the race.
    async fn create(&self, review: &Review) -> Result<(), ApiError>;

    async fn update(&self, id: Uuid, score: Score, text: &str) -> Result<(), ApiError>;

    /// Returns `true` if a row was deleted. Comments cascade.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;

    /// Score tallies for the given titles. Titles without reviews are absent.
    async fn tallies(&self, title_ids: &[Uuid]) -> Result<HashMap<Uuid, ScoreTally>, ApiError>;
}

/// Repository for comments under a review.
pub trait CommentRepository: Send + Sync {
    /// Ordered by `created_at` ascending.
    async fn list(&self, review_id: Uuid, page: PageRequest)
    -> Result<Page<Comment>, ApiError>;
    async fn find(&self, id: Uuid) -> Result<Option<Comment>, ApiError>;
    async fn create(&self, comment: &Comment) -> Result<(), ApiError>;
    async fn update(&self, id: Uuid, text: &str) -> Result<(), ApiError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Outbound mail failure. Never rolls back the operation that triggered it.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("mail relay unreachable: {0}")]
    Unreachable(String),
    #[error("mail relay rejected message: {0}")]
    Rejected(String),
}

/// Port for the outbound email channel.
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError>;
}

use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    TransactionError, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use yamdb_api_schema::{categories, comments, genres, reviews, title_genres, titles, users};
use yamdb_domain::id::UserId;
use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::review::{Score, ScoreTally};
use yamdb_domain::user::Role;

use crate::domain::repository::{
    ClassifierRepository, CommentRepository, ReviewRepository, TitleRepository, UserRepository,
};
use crate::domain::types::{
    Challenge, Classifier, ClassifierKind, Comment, Review, Title, TitleFilter, TitleRecord, User,
};
use crate::error::ApiError;

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn create(&self, user: &User) -> Result<bool, ApiError> {
        let result = users::ActiveModel {
            id: Set(user.id.0),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            role: Set(user.role.as_str().to_owned()),
            is_superuser: Set(user.is_superuser),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            bio: Set(user.bio.clone()),
            confirmation_nonce: Set(user.challenge.map(|c| c.nonce)),
            confirmation_issued_at: Set(user.challenge.map(|c| c.issued_at)),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn update(&self, user: &User) -> Result<bool, ApiError> {
        let result = users::ActiveModel {
            id: Set(user.id.0),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            role: Set(user.role.as_str().to_owned()),
            is_superuser: Set(user.is_superuser),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            bio: Set(user.bio.clone()),
            ..Default::default()
        }
        .update(&self.db)
        .await;
        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(anyhow::Error::new(e).context("update user").into()),
        }
    }

    async fn set_challenge(
        &self,
        id: UserId,
        nonce: Uuid,
        issued_at: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        users::Entity::update_many()
            .col_expr(users::Column::ConfirmationNonce, Expr::value(nonce))
            .col_expr(users::Column::ConfirmationIssuedAt, Expr::value(issued_at))
            .filter(users::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("set confirmation challenge")?;
        Ok(())
    }

    async fn consume_challenge(&self, id: UserId, nonce: Uuid) -> Result<bool, ApiError> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::ConfirmationNonce,
                Expr::value(Option::<Uuid>::None),
            )
            .col_expr(
                users::Column::ConfirmationIssuedAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .filter(users::Column::Id.eq(id.0))
            .filter(users::Column::ConfirmationNonce.eq(nonce))
            .exec(&self.db)
            .await
            .context("consume confirmation challenge")?;
        Ok(result.rows_affected == 1)
    }

    async fn list(&self, search: Option<&str>, page: PageRequest) -> Result<Page<User>, ApiError> {
        let mut query = users::Entity::find();
        if let Some(search) = search {
            query = query.filter(users::Column::Username.contains(search));
        }
        let count = query.clone().count(&self.db).await.context("count users")?;
        let models = query
            .order_by_asc(users::Column::Username)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list users")?;
        let results = models
            .into_iter()
            .map(user_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Page { count, results })
    }

    async fn delete(&self, id: UserId) -> Result<bool, ApiError> {
        let result = users::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> anyhow::Result<User> {
    let challenge = match (model.confirmation_nonce, model.confirmation_issued_at) {
        (Some(nonce), Some(issued_at)) => Some(Challenge { nonce, issued_at }),
        _ => None,
    };
    Ok(User {
        id: UserId(model.id),
        role: model.role.parse::<Role>().context("parse stored role")?,
        username: model.username,
        email: model.email,
        is_superuser: model.is_superuser,
        first_name: model.first_name,
        last_name: model.last_name,
        bio: model.bio,
        challenge,
        created_at: model.created_at,
    })
}

// ── Category / genre repository ──────────────────────────────────────────────

#[derive(Clone)]
pub struct DbClassifierRepository {
    pub db: DatabaseConnection,
}

impl ClassifierRepository for DbClassifierRepository {
    async fn list(
        &self,
        kind: ClassifierKind,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Classifier>, ApiError> {
        match kind {
            ClassifierKind::Category => {
                let mut query = categories::Entity::find();
                if let Some(search) = search {
                    query = query.filter(categories::Column::Name.contains(search));
                }
                let count = query
                    .clone()
                    .count(&self.db)
                    .await
                    .context("count categories")?;
                let models = query
                    .order_by_asc(categories::Column::Name)
                    .offset(page.offset)
                    .limit(page.limit)
                    .all(&self.db)
                    .await
                    .context("list categories")?;
                let results = models.into_iter().map(category_from_model).collect();
                Ok(Page { count, results })
            }
            ClassifierKind::Genre => {
                let mut query = genres::Entity::find();
                if let Some(search) = search {
                    query = query.filter(genres::Column::Name.contains(search));
                }
                let count = query.clone().count(&self.db).await.context("count genres")?;
                let models = query
                    .order_by_asc(genres::Column::Name)
                    .offset(page.offset)
                    .limit(page.limit)
                    .all(&self.db)
                    .await
                    .context("list genres")?;
                let results = models.into_iter().map(genre_from_model).collect();
                Ok(Page { count, results })
            }
        }
    }

    async fn find_by_slug(
        &self,
        kind: ClassifierKind,
        slug: &str,
    ) -> Result<Option<Classifier>, ApiError> {
        let found = match kind {
            ClassifierKind::Category => categories::Entity::find()
                .filter(categories::Column::Slug.eq(slug))
                .one(&self.db)
                .await
                .context("find category by slug")?
                .map(category_from_model),
            ClassifierKind::Genre => genres::Entity::find()
                .filter(genres::Column::Slug.eq(slug))
                .one(&self.db)
                .await
                .context("find genre by slug")?
                .map(genre_from_model),
        };
        Ok(found)
    }

    async fn create(&self, kind: ClassifierKind, item: &Classifier) -> Result<bool, ApiError> {
        let result = match kind {
            ClassifierKind::Category => categories::ActiveModel {
                id: Set(item.id),
                name: Set(item.name.clone()),
                slug: Set(item.slug.clone()),
            }
            .insert(&self.db)
            .await
            .map(drop),
            ClassifierKind::Genre => genres::ActiveModel {
                id: Set(item.id),
                name: Set(item.name.clone()),
                slug: Set(item.slug.clone()),
            }
            .insert(&self.db)
            .await
            .map(drop),
        };
        match result {
            Ok(()) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(anyhow::Error::new(e).context("create classifier").into()),
        }
    }

    async fn delete(&self, kind: ClassifierKind, slug: &str) -> Result<bool, ApiError> {
        // titles.category_id is SET NULL and title_genres cascades.
        let result = match kind {
            ClassifierKind::Category => categories::Entity::delete_many()
                .filter(categories::Column::Slug.eq(slug))
                .exec(&self.db)
                .await
                .context("delete category")?,
            ClassifierKind::Genre => genres::Entity::delete_many()
                .filter(genres::Column::Slug.eq(slug))
                .exec(&self.db)
                .await
                .context("delete genre")?,
        };
        Ok(result.rows_affected > 0)
    }
}

fn category_from_model(model: categories::Model) -> Classifier {
    Classifier {
        id: model.id,
        name: model.name,
        slug: model.slug,
    }
}

fn genre_from_model(model: genres::Model) -> Classifier {
    Classifier {
        id: model.id,
        name: model.name,
        slug: model.slug,
    }
}

// ── Title repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTitleRepository {
    pub db: DatabaseConnection,
}

impl DbTitleRepository {
    /// Attach category and genres to title rows.
    async fn hydrate(&self, models: Vec<titles::Model>) -> anyhow::Result<Vec<Title>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let title_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let category_ids: Vec<Uuid> = models.iter().filter_map(|m| m.category_id).collect();

        let categories: HashMap<Uuid, Classifier> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            categories::Entity::find()
                .filter(categories::Column::Id.is_in(category_ids))
                .all(&self.db)
                .await
                .context("load title categories")?
                .into_iter()
                .map(|m| (m.id, category_from_model(m)))
                .collect()
        };

        let links = title_genres::Entity::find()
            .filter(title_genres::Column::TitleId.is_in(title_ids))
            .find_also_related(genres::Entity)
            .order_by_asc(genres::Column::Name)
            .all(&self.db)
            .await
            .context("load title genres")?;
        let mut genres_by_title: HashMap<Uuid, Vec<Classifier>> = HashMap::new();
        for (link, genre) in links {
            if let Some(genre) = genre {
                genres_by_title
                    .entry(link.title_id)
                    .or_default()
                    .push(genre_from_model(genre));
            }
        }

        Ok(models
            .into_iter()
            .map(|m| Title {
                id: m.id,
                category: m.category_id.and_then(|id| categories.get(&id).cloned()),
                genres: genres_by_title.remove(&m.id).unwrap_or_default(),
                name: m.name,
                year: m.year,
                description: m.description,
                rating: None,
            })
            .collect())
    }
}

async fn replace_genres<C: ConnectionTrait>(
    conn: &C,
    title_id: Uuid,
    genre_ids: &[Uuid],
) -> Result<(), DbErr> {
    title_genres::Entity::delete_many()
        .filter(title_genres::Column::TitleId.eq(title_id))
        .exec(conn)
        .await?;
    for genre_id in genre_ids {
        title_genres::ActiveModel {
            title_id: Set(title_id),
            genre_id: Set(*genre_id),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

impl TitleRepository for DbTitleRepository {
    async fn list(&self, filter: &TitleFilter, page: PageRequest) -> Result<Page<Title>, ApiError> {
        let mut query = titles::Entity::find();
        if let Some(slug) = filter.category.as_deref() {
            query = query
                .inner_join(categories::Entity)
                .filter(categories::Column::Slug.eq(slug));
        }
        if let Some(slug) = filter.genre.as_deref() {
            let ids: Vec<Uuid> = title_genres::Entity::find()
                .inner_join(genres::Entity)
                .filter(genres::Column::Slug.eq(slug))
                .select_only()
                .column(title_genres::Column::TitleId)
                .into_tuple()
                .all(&self.db)
                .await
                .context("find titles by genre")?;
            query = query.filter(titles::Column::Id.is_in(ids));
        }
        if let Some(name) = filter.name.as_deref() {
            query = query.filter(titles::Column::Name.contains(name));
        }
        if let Some(year) = filter.year {
            query = query.filter(titles::Column::Year.eq(year));
        }

        let count = query.clone().count(&self.db).await.context("count titles")?;
        let models = query
            .order_by_asc(titles::Column::Name)
            .order_by_asc(titles::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list titles")?;
        let results = self.hydrate(models).await?;
        Ok(Page { count, results })
    }

    async fn find(&self, id: Uuid) -> Result<Option<Title>, ApiError> {
        let Some(model) = titles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find title by id")?
        else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![model]).await?.pop())
    }

    async fn create(&self, id: Uuid, record: &TitleRecord) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let record = record.clone();
                Box::pin(async move {
                    titles::ActiveModel {
                        id: Set(id),
                        name: Set(record.name),
                        year: Set(record.year),
                        description: Set(record.description),
                        category_id: Set(record.category_id),
                        created_at: Set(Utc::now()),
                    }
                    .insert(txn)
                    .await?;
                    replace_genres(txn, id, &record.genre_ids).await
                })
            })
            .await
            .context("create title")?;
        Ok(())
    }

    async fn update(&self, id: Uuid, record: &TitleRecord) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let record = record.clone();
                Box::pin(async move {
                    titles::ActiveModel {
                        id: Set(id),
                        name: Set(record.name),
                        year: Set(record.year),
                        description: Set(record.description),
                        category_id: Set(record.category_id),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    replace_genres(txn, id, &record.genre_ids).await
                })
            })
            .await
            .context("update title")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = titles::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete title")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct TallyRow {
    title_id: Uuid,
    sum: i64,
    count: i64,
}

impl ReviewRepository for DbReviewRepository {
    async fn list(&self, title_id: Uuid, page: PageRequest) -> Result<Page<Review>, ApiError> {
        let query = reviews::Entity::find().filter(reviews::Column::TitleId.eq(title_id));
        let count = query.clone().count(&self.db).await.context("count reviews")?;
        let rows = query
            .find_also_related(users::Entity)
            .order_by_asc(reviews::Column::CreatedAt)
            .order_by_asc(reviews::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list reviews")?;
        let results = rows
            .into_iter()
            .map(|(review, author)| review_from_model(review, author))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Page { count, results })
    }

    async fn find(&self, id: Uuid) -> Result<Option<Review>, ApiError> {
        let row = reviews::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find review by id")?;
        Ok(row
            .map(|(review, author)| review_from_model(review, author))
            .transpose()?)
    }

    async fn create(&self, review: &Review) -> Result<(), ApiError> {
        let outcome = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                let review = review.clone();
                Box::pin(async move {
                    let existing = reviews::Entity::find()
                        .filter(reviews::Column::TitleId.eq(review.title_id))
                        .filter(reviews::Column::AuthorId.eq(review.author_id.0))
                        .count(txn)
                        .await?;
                    if existing > 0 {
                        return Ok(false);
                    }
                    reviews::ActiveModel {
                        id: Set(review.id),
                        title_id: Set(review.title_id),
                        author_id: Set(review.author_id.0),
                        score: Set(review.score.get()),
                        text: Set(review.text),
                        created_at: Set(review.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(true)
                })
            })
            .await;
        match outcome {
            Ok(true) => Ok(()),
            Ok(false) => Err(ApiError::DuplicateReview),
            // A concurrent insert passed the check too; the unique index decides.
            Err(TransactionError::Transaction(e)) if is_unique_violation(&e) => {
                Err(ApiError::DuplicateReview)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create review").into()),
        }
    }

    async fn update(&self, id: Uuid, score: Score, text: &str) -> Result<(), ApiError> {
        reviews::ActiveModel {
            id: Set(id),
            score: Set(score.get()),
            text: Set(text.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update review")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = reviews::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete review")?;
        Ok(result.rows_affected > 0)
    }

    async fn tallies(&self, title_ids: &[Uuid]) -> Result<HashMap<Uuid, ScoreTally>, ApiError> {
        if title_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = reviews::Entity::find()
            .select_only()
            .column(reviews::Column::TitleId)
            .column_as(Expr::col(reviews::Column::Score).sum(), "sum")
            .column_as(Expr::col(reviews::Column::Id).count(), "count")
            .filter(reviews::Column::TitleId.is_in(title_ids.iter().copied()))
            .group_by(reviews::Column::TitleId)
            .into_model::<TallyRow>()
            .all(&self.db)
            .await
            .context("tally review scores")?;
        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    row.title_id,
                    ScoreTally {
                        sum: row.sum,
                        count: row.count,
                    },
                )
            })
            .collect())
    }
}

fn review_from_model(
    model: reviews::Model,
    author: Option<users::Model>,
) -> anyhow::Result<Review> {
    Ok(Review {
        id: model.id,
        title_id: model.title_id,
        author_id: UserId(model.author_id),
        author_username: author.map(|u| u.username).unwrap_or_default(),
        score: Score::new(i64::from(model.score)).context("stored score out of range")?,
        text: model.text,
        created_at: model.created_at,
    })
}

// ── Comment repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCommentRepository {
    pub db: DatabaseConnection,
}

impl CommentRepository for DbCommentRepository {
    async fn list(&self, review_id: Uuid, page: PageRequest) -> Result<Page<Comment>, ApiError> {
        let query = comments::Entity::find().filter(comments::Column::ReviewId.eq(review_id));
        let count = query.clone().count(&self.db).await.context("count comments")?;
        let rows = query
            .find_also_related(users::Entity)
            .order_by_asc(comments::Column::CreatedAt)
            .order_by_asc(comments::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list comments")?;
        let results = rows
            .into_iter()
            .map(|(comment, author)| comment_from_model(comment, author))
            .collect();
        Ok(Page { count, results })
    }

    async fn find(&self, id: Uuid) -> Result<Option<Comment>, ApiError> {
        let row = comments::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find comment by id")?;
        Ok(row.map(|(comment, author)| comment_from_model(comment, author)))
    }

    async fn create(&self, comment: &Comment) -> Result<(), ApiError> {
        comments::ActiveModel {
            id: Set(comment.id),
            review_id: Set(comment.review_id),
            author_id: Set(comment.author_id.0),
            text: Set(comment.text.clone()),
            created_at: Set(comment.created_at),
        }
        .insert(&self.db)
        .await
        .context("create comment")?;
        Ok(())
    }

    async fn update(&self, id: Uuid, text: &str) -> Result<(), ApiError> {
        comments::ActiveModel {
            id: Set(id),
            text: Set(text.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update comment")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = comments::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete comment")?;
        Ok(result.rows_affected > 0)
    }
}

fn comment_from_model(model: comments::Model, author: Option<users::Model>) -> Comment {
    Comment {
        id: model.id,
        review_id: model.review_id,
        author_id: UserId(model.author_id),
        author_username: author.map(|u| u.username).unwrap_or_default(),
        text: model.text,
        created_at: model.created_at,
    }
}

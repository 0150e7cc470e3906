use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use yamdb_api::domain::confirmation::ConfirmationCodes;
use yamdb_api::domain::repository::{
    ClassifierRepository, CommentRepository, DeliveryError, Mailer, ReviewRepository,
    TitleRepository, UserRepository,
};
use yamdb_api::domain::types::{
    Challenge, Classifier, ClassifierKind, Comment, Review, Title, TitleFilter, TitleRecord, User,
};
use yamdb_api::error::ApiError;
use yamdb_domain::id::UserId;
use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::review::{Score, ScoreTally};
use yamdb_domain::user::Role;
use yamdb_testing::auth::{MockAuth, TEST_SECRET};

// ── MemoryStore ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub categories: Vec<Classifier>,
    pub genres: Vec<Classifier>,
    pub titles: Vec<(Uuid, TitleRecord)>,
    pub reviews: Vec<Review>,
    pub comments: Vec<Comment>,
}

/// In-memory stand-in for every repository port. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, username: &str) -> Option<User> {
        let t = self.tables.lock().unwrap();
        t.users.iter().find(|u| u.username == username).cloned()
    }

    pub fn review_count(&self) -> usize {
        self.tables.lock().unwrap().reviews.len()
    }

    fn hydrate(t: &Tables, id: Uuid, record: &TitleRecord) -> Title {
        Title {
            id,
            name: record.name.clone(),
            year: record.year,
            description: record.description.clone(),
            category: record
                .category_id
                .and_then(|cid| t.categories.iter().find(|c| c.id == cid).cloned()),
            genres: record
                .genre_ids
                .iter()
                .filter_map(|gid| t.genres.iter().find(|g| g.id == *gid).cloned())
                .collect(),
            rating: None,
        }
    }
}

fn page_of<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let PageRequest { limit, offset } = page.clamped();
    Page {
        count: items.len() as u64,
        results: items
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect(),
    }
}

/// Same AND-combination of filters the SQL query applies.
fn title_matches(filter: &TitleFilter, title: &Title) -> bool {
    let category_ok = filter.category.as_deref().is_none_or(|slug| {
        title
            .category
            .as_ref()
            .is_some_and(|c| c.slug == slug)
    });
    let genre_ok = filter
        .genre
        .as_deref()
        .is_none_or(|slug| title.genres.iter().any(|g| g.slug == slug));
    let name_ok = filter
        .name
        .as_deref()
        .is_none_or(|part| title.name.contains(part));
    let year_ok = filter.year.is_none_or(|y| title.year == y);
    category_ok && genre_ok && name_ok && year_ok
}

impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        Ok(self.user(username))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: &User) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        if t
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Ok(false);
        }
        t.users.push(user.clone());
        Ok(true)
    }

    async fn update(&self, user: &User) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        if t.users.iter().any(|u| {
            u.id != user.id && (u.username == user.username || u.email == user.email)
        }) {
            return Ok(false);
        }
        match t.users.iter_mut().find(|u| u.id == user.id) {
            Some(stored) => {
                *stored = User {
                    challenge: stored.challenge,
                    ..user.clone()
                };
                Ok(true)
            }
            None => Err(ApiError::UserNotFound),
        }
    }

    async fn set_challenge(
        &self,
        id: UserId,
        nonce: Uuid,
        issued_at: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(u) = t.users.iter_mut().find(|u| u.id == id) {
            u.challenge = Some(Challenge { nonce, issued_at });
        }
        Ok(())
    }

    async fn consume_challenge(&self, id: UserId, nonce: Uuid) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        match t.users.iter_mut().find(|u| u.id == id) {
            Some(u) if u.challenge.is_some_and(|c| c.nonce == nonce) => {
                u.challenge = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list(&self, search: Option<&str>, page: PageRequest) -> Result<Page<User>, ApiError> {
        let t = self.tables.lock().unwrap();
        let mut users: Vec<User> = t
            .users
            .iter()
            .filter(|u| search.is_none_or(|s| u.username.contains(s)))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(page_of(users, page))
    }

    async fn delete(&self, id: UserId) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        let removed_reviews: Vec<Uuid> = t
            .reviews
            .iter()
            .filter(|r| r.author_id == id)
            .map(|r| r.id)
            .collect();
        t.reviews.retain(|r| r.author_id != id);
        t.comments
            .retain(|c| c.author_id != id && !removed_reviews.contains(&c.review_id));
        Ok(t.users.len() < before)
    }
}

impl ClassifierRepository for MemoryStore {
    async fn list(
        &self,
        kind: ClassifierKind,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Classifier>, ApiError> {
        let t = self.tables.lock().unwrap();
        let source = match kind {
            ClassifierKind::Category => &t.categories,
            ClassifierKind::Genre => &t.genres,
        };
        let mut items: Vec<Classifier> = source
            .iter()
            .filter(|c| search.is_none_or(|s| c.name.contains(s)))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(page_of(items, page))
    }

    async fn find_by_slug(
        &self,
        kind: ClassifierKind,
        slug: &str,
    ) -> Result<Option<Classifier>, ApiError> {
        let t = self.tables.lock().unwrap();
        let source = match kind {
            ClassifierKind::Category => &t.categories,
            ClassifierKind::Genre => &t.genres,
        };
        Ok(source.iter().find(|c| c.slug == slug).cloned())
    }

    async fn create(&self, kind: ClassifierKind, item: &Classifier) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let target = match kind {
            ClassifierKind::Category => &mut t.categories,
            ClassifierKind::Genre => &mut t.genres,
        };
        if target.iter().any(|c| c.slug == item.slug) {
            return Ok(false);
        }
        target.push(item.clone());
        Ok(true)
    }

    async fn delete(&self, kind: ClassifierKind, slug: &str) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let target = match kind {
            ClassifierKind::Category => &mut t.categories,
            ClassifierKind::Genre => &mut t.genres,
        };
        let Some(pos) = target.iter().position(|c| c.slug == slug) else {
            return Ok(false);
        };
        let removed = target.remove(pos);
        for (_, record) in t.titles.iter_mut() {
            match kind {
                ClassifierKind::Category => {
                    if record.category_id == Some(removed.id) {
                        record.category_id = None;
                    }
                }
                ClassifierKind::Genre => record.genre_ids.retain(|g| *g != removed.id),
            }
        }
        Ok(true)
    }
}

impl TitleRepository for MemoryStore {
    async fn list(&self, filter: &TitleFilter, page: PageRequest) -> Result<Page<Title>, ApiError> {
        let t = self.tables.lock().unwrap();
        let mut titles: Vec<Title> = t
            .titles
            .iter()
            .map(|(id, record)| Self::hydrate(&t, *id, record))
            .filter(|title| title_matches(filter, title))
            .collect();
        titles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(page_of(titles, page))
    }

    async fn find(&self, id: Uuid) -> Result<Option<Title>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t
            .titles
            .iter()
            .find(|(tid, _)| *tid == id)
            .map(|(tid, record)| Self::hydrate(&t, *tid, record)))
    }

    async fn create(&self, id: Uuid, record: &TitleRecord) -> Result<(), ApiError> {
        self.tables
            .lock()
            .unwrap()
            .titles
            .push((id, record.clone()));
        Ok(())
    }

    async fn update(&self, id: Uuid, record: &TitleRecord) -> Result<(), ApiError> {
        let mut t = self.tables.lock().unwrap();
        match t.titles.iter_mut().find(|(tid, _)| *tid == id) {
            Some((_, stored)) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(ApiError::TitleNotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.titles.len();
        t.titles.retain(|(tid, _)| *tid != id);
        let removed_reviews: Vec<Uuid> = t
            .reviews
            .iter()
            .filter(|r| r.title_id == id)
            .map(|r| r.id)
            .collect();
        t.reviews.retain(|r| r.title_id != id);
        t.comments.retain(|c| !removed_reviews.contains(&c.review_id));
        Ok(t.titles.len() < before)
    }
}

impl ReviewRepository for MemoryStore {
    async fn list(&self, title_id: Uuid, page: PageRequest) -> Result<Page<Review>, ApiError> {
        let t = self.tables.lock().unwrap();
        let reviews: Vec<Review> = t
            .reviews
            .iter()
            .filter(|r| r.title_id == title_id)
            .cloned()
            .collect();
        Ok(page_of(reviews, page))
    }

    async fn find(&self, id: Uuid) -> Result<Option<Review>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, review: &Review) -> Result<(), ApiError> {
        // Let every concurrent caller reach this point before any of them commits.
        tokio::task::yield_now().await;
        let mut t = self.tables.lock().unwrap();
        if t
            .reviews
            .iter()
            .any(|r| r.title_id == review.title_id && r.author_id == review.author_id)
        {
            return Err(ApiError::DuplicateReview);
        }
        t.reviews.push(review.clone());
        Ok(())
    }

    async fn update(&self, id: Uuid, score: Score, text: &str) -> Result<(), ApiError> {
        let mut t = self.tables.lock().unwrap();
        match t.reviews.iter_mut().find(|r| r.id == id) {
            Some(r) => {
                r.score = score;
                r.text = text.to_owned();
                Ok(())
            }
            None => Err(ApiError::ReviewNotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.reviews.len();
        t.reviews.retain(|r| r.id != id);
        t.comments.retain(|c| c.review_id != id);
        Ok(t.reviews.len() < before)
    }

    async fn tallies(&self, title_ids: &[Uuid]) -> Result<HashMap<Uuid, ScoreTally>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(title_ids
            .iter()
            .filter_map(|id| {
                let tally = t
                    .reviews
                    .iter()
                    .filter(|r| r.title_id == *id)
                    .fold(ScoreTally::default(), |tally, r| ScoreTally {
                        sum: tally.sum + i64::from(r.score.get()),
                        count: tally.count + 1,
                    });
                (tally.count > 0).then_some((*id, tally))
            })
            .collect())
    }
}

impl CommentRepository for MemoryStore {
    async fn list(&self, review_id: Uuid, page: PageRequest) -> Result<Page<Comment>, ApiError> {
        let t = self.tables.lock().unwrap();
        let comments: Vec<Comment> = t
            .comments
            .iter()
            .filter(|c| c.review_id == review_id)
            .cloned()
            .collect();
        Ok(page_of(comments, page))
    }

    async fn find(&self, id: Uuid) -> Result<Option<Comment>, ApiError> {
        let t = self.tables.lock().unwrap();
        Ok(t.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, comment: &Comment) -> Result<(), ApiError> {
        self.tables.lock().unwrap().comments.push(comment.clone());
        Ok(())
    }

    async fn update(&self, id: Uuid, text: &str) -> Result<(), ApiError> {
        let mut t = self.tables.lock().unwrap();
        match t.comments.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.text = text.to_owned();
                Ok(())
            }
            None => Err(ApiError::CommentNotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.comments.len();
        t.comments.retain(|c| c.id != id);
        Ok(t.comments.len() < before)
    }
}

// ── RecordingMailer ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<SentMail>>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Code from the most recent message, parsed from `Your code - {code}`.
    pub fn last_code(&self) -> String {
        let sent = self.sent.lock().unwrap();
        let body = &sent.last().expect("no mail sent").body;
        body.rsplit(' ').next().unwrap().to_owned()
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Unreachable("connection refused".to_owned()));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_owned(),
            subject: subject.to_owned(),
            body: body.to_owned(),
        });
        Ok(())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_codes() -> ConfirmationCodes {
    ConfirmationCodes::new(TEST_SECRET, 3600).unwrap()
}

/// Insert an account and return a caller bound to it.
pub fn seed_user(store: &MemoryStore, username: &str, role: Role) -> MockAuth {
    let user = User {
        role,
        ..User::new(username.to_owned(), format!("{username}@example.com"))
    };
    let auth = MockAuth::new(role).with_id(user.id);
    store.tables.lock().unwrap().users.push(user);
    auth
}

pub fn seed_classifier(store: &MemoryStore, kind: ClassifierKind, slug: &str) -> Classifier {
    let item = Classifier {
        id: Uuid::now_v7(),
        name: slug.to_uppercase(),
        slug: slug.to_owned(),
    };
    let mut t = store.tables.lock().unwrap();
    match kind {
        ClassifierKind::Category => t.categories.push(item.clone()),
        ClassifierKind::Genre => t.genres.push(item.clone()),
    }
    item
}

pub fn seed_title(store: &MemoryStore, name: &str) -> Uuid {
    let id = Uuid::now_v7();
    store.tables.lock().unwrap().titles.push((
        id,
        TitleRecord {
            name: name.to_owned(),
            year: 1999,
            description: None,
            category_id: None,
            genre_ids: Vec::new(),
        },
    ));
    id
}

pub fn seed_review(store: &MemoryStore, title_id: Uuid, author: &MockAuth, score: i64) -> Uuid {
    let mut t = store.tables.lock().unwrap();
    let author_username = t
        .users
        .iter()
        .find(|u| u.id == author.id())
        .map(|u| u.username.clone())
        .unwrap_or_default();
    let review = Review {
        id: Uuid::now_v7(),
        title_id,
        author_id: author.id(),
        author_username,
        score: Score::new(score).unwrap(),
        text: "seeded".to_owned(),
        created_at: Utc::now(),
    };
    let id = review.id;
    t.reviews.push(review);
    id
}

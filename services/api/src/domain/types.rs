use chrono::{DateTime, Utc};
use uuid::Uuid;

use yamdb_domain::id::UserId;
use yamdb_domain::policy::{Principal, Resource};
use yamdb_domain::review::Score;
use yamdb_domain::user::Role;

/// Outstanding confirmation challenge. At most one per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    pub nonce: Uuid,
    pub issued_at: DateTime<Utc>,
}

/// Account record.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_superuser: bool,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub challenge: Option<Challenge>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Fresh `role = user` account with an empty profile.
    pub fn new(username: String, email: String) -> Self {
        Self {
            id: UserId::generate(),
            username,
            email,
            role: Role::User,
            is_superuser: false,
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            challenge: None,
            created_at: Utc::now(),
        }
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            role: self.role,
            is_superuser: self.is_superuser,
        }
    }
}

/// Partial profile update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    /// Honoured on the admin path only.
    pub role: Option<Role>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.bio.is_none()
            && self.role.is_none()
    }
}

/// Categories and genres share one shape and differ only in table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierKind {
    Category,
    Genre,
}

impl ClassifierKind {
    pub fn resource(self) -> Resource {
        match self {
            Self::Category => Resource::Category,
            Self::Genre => Resource::Genre,
        }
    }
}

/// A category or genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// A rated work. `rating` is filled in at read time from the reviews.
#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<Classifier>,
    pub genres: Vec<Classifier>,
    pub rating: Option<f64>,
}

/// Resolved title fields as written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRecord {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub genre_ids: Vec<Uuid>,
}

/// Title list filters; every field is optional and they combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleFilter {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: Uuid,
    pub title_id: Uuid,
    pub author_id: UserId,
    pub author_username: String,
    pub score: Score,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn resource(&self) -> Resource {
        Resource::Review {
            author: Some(self.author_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub review_id: Uuid,
    pub author_id: UserId,
    pub author_username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn resource(&self) -> Resource {
        Resource::Comment {
            author: Some(self.author_id),
        }
    }
}

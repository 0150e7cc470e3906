//! Mock callers for integration tests.
//!
//! `MockAuth` signs a real access token with the test secret, so requests go
//! through the same bearer extractor as production traffic.

use axum::http::{HeaderName, HeaderValue, header};
use uuid::Uuid;

use yamdb_auth_types::token::issue_access_token;
use yamdb_domain::id::UserId;
use yamdb_domain::policy::{Principal, Subject};
use yamdb_domain::user::Role;

pub const TEST_SECRET: &str = "yamdb-test-secret";

/// Configurable identity minted into test requests.
#[derive(Debug, Clone, Copy)]
pub struct MockAuth {
    pub principal: Principal,
}

impl MockAuth {
    pub fn new(role: Role) -> Self {
        Self {
            principal: Principal {
                id: UserId(Uuid::now_v7()),
                role,
                is_superuser: false,
            },
        }
    }

    pub fn user() -> Self {
        Self::new(Role::User)
    }

    pub fn moderator() -> Self {
        Self::new(Role::Moderator)
    }

    pub fn admin() -> Self {
        Self::new(Role::Admin)
    }

    pub fn superuser() -> Self {
        let mut auth = Self::new(Role::User);
        auth.principal.is_superuser = true;
        auth
    }

    pub fn with_id(mut self, id: UserId) -> Self {
        self.principal.id = id;
        self
    }

    pub fn id(&self) -> UserId {
        self.principal.id
    }

    pub fn subject(&self) -> Subject {
        Subject::Authenticated(self.principal)
    }

    /// Signed bearer token for this caller, valid for one hour.
    pub fn token(&self, secret: &str) -> String {
        issue_access_token(&self.principal, secret, 3600)
            .unwrap()
            .0
    }

    /// `Authorization: Bearer …` header signed with [`TEST_SECRET`].
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        let value = format!("Bearer {}", self.token(TEST_SECRET));
        (header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap())
    }
}

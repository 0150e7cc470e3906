use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use yamdb_auth_types::identity::TokenSecret;

use crate::domain::confirmation::ConfirmationCodes;
use crate::infra::db::{
    DbClassifierRepository, DbCommentRepository, DbReviewRepository, DbTitleRepository,
    DbUserRepository,
};
use crate::infra::mail::AppMailer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub token_secret: TokenSecret,
    pub codes: ConfirmationCodes,
    pub access_token_ttl_secs: u64,
    pub mailer: AppMailer,
}

impl FromRef<AppState> for TokenSecret {
    fn from_ref(state: &AppState) -> Self {
        state.token_secret.clone()
    }
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn classifier_repo(&self) -> DbClassifierRepository {
        DbClassifierRepository {
            db: self.db.clone(),
        }
    }

    pub fn title_repo(&self) -> DbTitleRepository {
        DbTitleRepository {
            db: self.db.clone(),
        }
    }

    pub fn review_repo(&self) -> DbReviewRepository {
        DbReviewRepository {
            db: self.db.clone(),
        }
    }

    pub fn comment_repo(&self) -> DbCommentRepository {
        DbCommentRepository {
            db: self.db.clone(),
        }
    }
}

use anyhow::Context as _;
use chrono::Utc;

use yamdb_auth_types::identity::TokenSecret;
use yamdb_auth_types::token::issue_access_token;
use yamdb_domain::validation::ValidationReason;

use crate::domain::confirmation::ConfirmationCodes;
use crate::domain::repository::UserRepository;
use crate::error::ApiError;

pub struct AccessToken {
    pub token: String,
    pub exp: u64,
}

/// Exchange a confirmation code for a bearer token. A code is accepted at
/// most once.
pub struct IssueTokenUseCase<R: UserRepository> {
    pub repo: R,
    pub codes: ConfirmationCodes,
    pub secret: TokenSecret,
    pub ttl_secs: u64,
}

impl<R: UserRepository> IssueTokenUseCase<R> {
    pub async fn execute(&self, username: &str, code: &str) -> Result<AccessToken, ApiError> {
        let bad_code = || ApiError::validation("confirmation_code", ValidationReason::BadCode);
        if username.trim().is_empty() {
            return Err(ApiError::validation("username", ValidationReason::Required));
        }
        if code.trim().is_empty() {
            return Err(ApiError::validation(
                "confirmation_code",
                ValidationReason::Required,
            ));
        }

        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let challenge = self
            .codes
            .verify(&user, code, Utc::now())
            .ok_or_else(bad_code)?;
        if !self.repo.consume_challenge(user.id, challenge.nonce).await? {
            return Err(bad_code());
        }

        let (token, exp) = issue_access_token(&user.principal(), self.secret.as_str(), self.ttl_secs)
            .context("sign access token")?;
        tracing::info!(user_id = %user.id, "access token issued");
        Ok(AccessToken { token, exp })
    }
}

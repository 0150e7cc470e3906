use chrono::Utc;
use uuid::Uuid;

use yamdb_domain::user::{validate_email, validate_username};
use yamdb_domain::validation::ValidationReason;

use crate::domain::confirmation::ConfirmationCodes;
use crate::domain::repository::{Mailer, UserRepository};
use crate::domain::types::{Challenge, User};
use crate::error::ApiError;

pub const CONFIRMATION_SUBJECT: &str = "Confirmation code";

pub fn confirmation_body(code: &str) -> String {
    format!("Your code - {code}")
}

// ── Signup ───────────────────────────────────────────────────────────────────

pub struct SignupInput {
    pub username: String,
    pub email: String,
}

/// Register (or re-identify) an account and mail it a fresh confirmation code.
pub struct SignupUseCase<R: UserRepository, M: Mailer> {
    pub repo: R,
    pub mailer: M,
    pub codes: ConfirmationCodes,
}

impl<R: UserRepository, M: Mailer> SignupUseCase<R, M> {
    pub async fn execute(&self, input: SignupInput) -> Result<User, ApiError> {
        let mut user = self.register(input).await?;
        issue_challenge(&self.repo, &self.mailer, &self.codes, &mut user).await?;
        Ok(user)
    }

    /// Idempotent on an exact `(username, email)` match, conflict on a partial one.
    pub async fn register(&self, input: SignupInput) -> Result<User, ApiError> {
        validate_username(&input.username)?;
        validate_email(&input.email)?;

        if let Some(existing) = find_exact(&self.repo, &input.username, &input.email).await? {
            return Ok(existing);
        }
        let user = User::new(input.username, input.email);
        if self.repo.create(&user).await? {
            tracing::info!(user_id = %user.id, username = %user.username, "user registered");
            return Ok(user);
        }
        // Lost a race against a concurrent signup; the winner may be us.
        find_exact(&self.repo, &user.username, &user.email)
            .await?
            .ok_or(ApiError::validation("username", ValidationReason::Conflict))
    }
}

/// `Some` on an exact match, `None` when neither value is taken, and a
/// conflict when only one of them matches an account.
pub(crate) async fn find_exact<R: UserRepository>(
    repo: &R,
    username: &str,
    email: &str,
) -> Result<Option<User>, ApiError> {
    if let Some(user) = repo.find_by_username(username).await? {
        return if user.email == email {
            Ok(Some(user))
        } else {
            Err(ApiError::validation("username", ValidationReason::Conflict))
        };
    }
    if repo.find_by_email(email).await?.is_some() {
        return Err(ApiError::validation("email", ValidationReason::Conflict));
    }
    Ok(None)
}

/// Rotate the user's challenge and mail the new code.
///
/// The new challenge is committed before dispatch. A delivery failure is
/// returned as [`ApiError::Delivery`] but leaves the account and challenge in
/// place; repeating signup sends a fresh code.
pub async fn issue_challenge<R: UserRepository, M: Mailer>(
    repo: &R,
    mailer: &M,
    codes: &ConfirmationCodes,
    user: &mut User,
) -> Result<String, ApiError> {
    let challenge = Challenge {
        nonce: Uuid::new_v4(),
        issued_at: Utc::now(),
    };
    repo.set_challenge(user.id, challenge.nonce, challenge.issued_at)
        .await?;
    user.challenge = Some(challenge);

    let code = codes.code_for(user, &challenge);
    if let Err(e) = mailer
        .send(&user.email, CONFIRMATION_SUBJECT, &confirmation_body(&code))
        .await
    {
        tracing::warn!(error = %e, to = %user.email, "confirmation code delivery failed");
        return Err(e.into());
    }
    Ok(code)
}

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::signup::{SignupInput, SignupUseCase};
use crate::usecase::token::IssueTokenUseCase;

// ── POST /auth/signup ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, ApiError> {
    let uc = SignupUseCase {
        repo: state.user_repo(),
        mailer: state.mailer.clone(),
        codes: state.codes.clone(),
    };
    let user = uc
        .execute(SignupInput {
            username: body.username,
            email: body.email,
        })
        .await?;
    Ok(Json(SignupResponse {
        username: user.username,
        email: user.email,
    }))
}

// ── POST /auth/token ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub confirmation_code: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn create_token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let uc = IssueTokenUseCase {
        repo: state.user_repo(),
        codes: state.codes.clone(),
        secret: state.token_secret.clone(),
        ttl_secs: state.access_token_ttl_secs,
    };
    let issued = uc.execute(&body.username, &body.confirmation_code).await?;
    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

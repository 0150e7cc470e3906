//! Bearer-token identity extractors.
//!
//! `Authorization: Bearer <jwt>` is resolved to a [`Principal`] with a pure
//! signature + expiry check. Handlers that serve anonymous callers take
//! [`MaybeIdentity`]; handlers that require a caller take [`Identity`].

use std::sync::Arc;

use axum::Json;
use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use http::StatusCode;
use http::request::Parts;

use yamdb_domain::policy::{Principal, Subject};

use crate::token::validate_access_token;

/// HMAC secret used to verify access tokens. Provided by the app state via `FromRef`.
#[derive(Clone)]
pub struct TokenSecret(pub Arc<str>);

impl TokenSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rejection for a missing, malformed, forged or expired bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityRejection;

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "kind": "UNAUTHORIZED",
            "message": "unauthorized",
        }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Resolve the bearer header. `Ok(None)` when no `Authorization` header is sent.
fn resolve(parts: &Parts, secret: &TokenSecret) -> Result<Option<Principal>, IdentityRejection> {
    let header = parts
        .headers
        .typed_try_get::<Authorization<Bearer>>()
        .map_err(|_| IdentityRejection)?;
    let Some(Authorization(bearer)) = header else {
        return Ok(None);
    };
    match validate_access_token(bearer.token(), secret.as_str()) {
        Ok(info) => Ok(Some(info.principal)),
        Err(e) => {
            tracing::debug!(error = %e, "rejected bearer token");
            Err(IdentityRejection)
        }
    }
}

/// An authenticated caller. Rejects with 401 when no valid token is present.
#[derive(Debug, Clone, Copy)]
pub struct Identity(pub Principal);

impl Identity {
    pub fn subject(&self) -> Subject {
        Subject::Authenticated(self.0)
    }
}

// axum-core 0.5 defines this as `fn -> impl Future + Send`: resolve synchronously,
// then hand back a 'static async block.
impl<S> FromRequestParts<S> for Identity
where
    TokenSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let resolved = resolve(parts, &TokenSecret::from_ref(state));
        async move {
            let principal = resolved?.ok_or(IdentityRejection)?;
            Ok(Self(principal))
        }
    }
}

/// A caller that may be anonymous. A token that is present but invalid is
/// still rejected with 401 rather than downgraded to anonymous.
#[derive(Debug, Clone, Copy)]
pub struct MaybeIdentity(pub Option<Principal>);

impl MaybeIdentity {
    pub fn subject(&self) -> Subject {
        match self.0 {
            Some(p) => Subject::Authenticated(p),
            None => Subject::Anonymous,
        }
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    TokenSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let resolved = resolve(parts, &TokenSecret::from_ref(state));
        async move { Ok(Self(resolved?)) }
    }
}

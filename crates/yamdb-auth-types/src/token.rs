//! Stateless JWT access tokens.
//!
//! Verification is a pure signature + expiry check; no store is consulted.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "token-issuer", test))]
use serde::Serialize;
use uuid::Uuid;

use yamdb_domain::id::UserId;
use yamdb_domain::policy::Principal;
use yamdb_domain::user::Role;

/// Identity extracted from a validated access token.
#[derive(Debug, Clone, Copy)]
pub struct TokenInfo {
    pub principal: Principal,
    pub exp: u64,
}

/// Errors returned by [`validate_access_token`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user id (UUID string) |
/// | `role` | custom | `"user"`, `"moderator"` or `"admin"` |
/// | `is_superuser` | custom | admin-equivalent flag, absent means `false` |
/// | `exp` | `exp` | seconds since UNIX epoch |
///
/// [`Serialize`] requires the **`token-issuer`** feature.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "token-issuer", test), derive(Serialize))]
pub struct JwtClaims {
    pub sub: String,
    pub role: Role,
    #[serde(default)]
    pub is_superuser: bool,
    pub exp: u64,
}

/// HS256, `exp` checked with the default 60s leeway, `exp` + `sub` required.
fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}

/// Validate a bearer token, returning the caller it asserts.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    let claims = data.claims;
    let id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(TokenInfo {
        principal: Principal {
            id: UserId(id),
            role: claims.role,
            is_superuser: claims.is_superuser,
        },
        exp: claims.exp,
    })
}

#[cfg(any(feature = "token-issuer", test))]
fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Sign an access token for `principal` valid for `ttl_secs`.
///
/// Returns the token and its `exp`.
#[cfg(any(feature = "token-issuer", test))]
pub fn issue_access_token(
    principal: &Principal,
    secret: &str,
    ttl_secs: u64,
) -> Result<(String, u64), jsonwebtoken::errors::Error> {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let exp = now_secs() + ttl_secs;
    let claims = JwtClaims {
        sub: principal.id.to_string(),
        role: principal.role,
        is_superuser: principal.is_superuser,
        exp,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok((token, exp))
}

//! Confirmation codes.
//!
//! A code is never stored. It is an HMAC over the user's current profile
//! snapshot and the outstanding challenge `(nonce, issued_at)` held on the
//! user row, so it stops verifying when:
//!
//! - a newer challenge replaces the nonce,
//! - any profile field changes,
//! - the challenge is older than the configured TTL,
//! - the challenge is consumed by a token exchange.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::types::{Challenge, User};

type HmacSha256 = Hmac<Sha256>;

/// Truncated tag length in bytes; the code is its hex form (24 chars).
pub const CODE_BYTES: usize = 12;

const SALT: &[u8] = b"yamdb.confirmation-code.v1";

#[derive(Clone)]
pub struct ConfirmationCodes {
    mac: HmacSha256,
    ttl: Duration,
}

impl ConfirmationCodes {
    pub fn new(secret: &str, ttl_secs: u64) -> Result<Self, hmac::digest::InvalidLength> {
        Ok(Self {
            mac: HmacSha256::new_from_slice(secret.as_bytes())?,
            ttl: Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX)),
        })
    }

    fn keyed(&self, user: &User, challenge: &Challenge) -> HmacSha256 {
        let mut mac = self.mac.clone();
        let id = user.id.to_string();
        let nonce = challenge.nonce.to_string();
        // Microseconds: the precision the timestamp survives storage with.
        let issued_at = challenge.issued_at.timestamp_micros().to_string();
        let superuser: &[u8] = if user.is_superuser { b"1" } else { b"0" };
        for part in [
            SALT,
            id.as_bytes(),
            user.username.as_bytes(),
            user.email.as_bytes(),
            user.role.as_str().as_bytes(),
            superuser,
            user.first_name.as_bytes(),
            user.last_name.as_bytes(),
            user.bio.as_bytes(),
            nonce.as_bytes(),
            issued_at.as_bytes(),
        ] {
            mac.update(&(part.len() as u64).to_be_bytes());
            mac.update(part);
        }
        mac
    }

    /// Code for `challenge` as bound to `user`'s current profile.
    pub fn code_for(&self, user: &User, challenge: &Challenge) -> String {
        let tag = self.keyed(user, challenge).finalize().into_bytes();
        hex::encode(&tag[..CODE_BYTES])
    }

    /// Returns the challenge `code` proves, if it matches the user's
    /// outstanding, unexpired challenge.
    pub fn verify(&self, user: &User, code: &str, now: DateTime<Utc>) -> Option<Challenge> {
        let challenge = user.challenge?;
        if now - challenge.issued_at > self.ttl {
            return None;
        }
        let bytes = hex::decode(code.trim()).ok()?;
        if bytes.len() != CODE_BYTES {
            return None;
        }
        self.keyed(user, &challenge)
            .verify_truncated_left(&bytes)
            .ok()
            .map(|()| challenge)
    }
}

//! Access-token types shared across YaMDb crates.
//!
//! Provides stateless JWT validation, token issuance (behind the
//! `token-issuer` feature) and the bearer-token `Identity` extractors.

pub mod identity;
pub mod token;

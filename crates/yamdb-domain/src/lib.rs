//! Domain types shared across YaMDb crates.
//!
//! This crate contains only pure types and pure functions with no framework
//! dependencies. The authorization engine lives in [`policy`].

pub mod id;
pub mod pagination;
pub mod policy;
pub mod review;
pub mod slug;
pub mod user;
pub mod validation;

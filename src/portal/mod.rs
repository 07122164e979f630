//! Consumers of an authenticated portal session.
//!
//! Everything here rides on the request capability a [`crate::auth::Session`]
//! exposes after login; no module in this tree touches credentials or the
//! login protocol.

pub mod courses;

pub use courses::fetch_courses;

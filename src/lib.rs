//! Core client for Blackboard learning portals.
//!
//! Blackboard's challenge login never transmits the password itself: the
//! client fetches a one-time token from the login page, derives two MD5
//! digests from the password and that token, and submits only the digests.
//! [`auth::Session`] owns that protocol and the cookie-backed session it
//! produces; [`portal`] consumes the session to pull the enrolled-course
//! listing.

pub mod auth;
pub mod config;
pub mod models;
pub mod portal;

pub use auth::{AuthError, ChallengeDigests, Credentials, Session};
pub use models::Course;
pub use portal::fetch_courses;

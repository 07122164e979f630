//! Authentication module for the Blackboard challenge login.
//!
//! This module provides:
//! - `Session`: the login protocol and the authenticated request capability
//! - `ChallengeDigests`: password digest derivation from the one-time token
//! - `Credentials`: username/password pair plus OS keychain storage
//!
//! A session is authenticated exactly once, at construction. Cookies live in
//! process memory for the session's lifetime; nothing is persisted across
//! runs.

pub mod challenge;
pub mod credentials;
pub mod error;
pub mod session;

pub use challenge::ChallengeDigests;
pub use credentials::{CredentialStore, Credentials};
pub use error::AuthError;
pub use session::Session;

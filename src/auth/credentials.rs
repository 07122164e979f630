use std::fmt;

use anyhow::{Context, Result};
use keyring::Entry;

/// Keychain service name for stored portal passwords.
const SERVICE_NAME: &str = "bbclient";

/// A username/password pair for the portal login.
///
/// The password is sensitive - Debug output redacts it, and nothing in this
/// crate logs or transmits it (only digests derived from it are sent).
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password. Avoid logging the return value.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

pub struct CredentialStore;

impl CredentialStore {
    /// Store a portal password in the OS keychain
    pub fn store(username: &str, password: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, username)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(password)
            .context("Failed to store password in keychain")?;
        Ok(())
    }

    /// Retrieve the stored password for a username from the OS keychain
    pub fn get_password(username: &str) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, username)
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve password from keychain")
    }

    /// Delete the stored password for a username
    pub fn delete(username: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, username)
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete credential from keychain")?;
        Ok(())
    }

    /// Check if a password is stored for a username
    pub fn has_credentials(username: &str) -> bool {
        if let Ok(entry) = Entry::new(SERVICE_NAME, username) {
            entry.get_password().is_ok()
        } else {
            false
        }
    }
}

//! bbclient - list enrolled courses from a Blackboard learning portal.
//!
//! Performs the portal's challenge login (the password never leaves the
//! machine, only digests derived from it do) and prints the enrolled
//! courses with their instructors.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bbclient::auth::{AuthError, CredentialStore, Credentials, Session};
use bbclient::config::Config;
use bbclient::portal;

// ============================================================================
// Constants
// ============================================================================

/// Exit code for a rejected login, distinct from general failures so callers
/// can re-prompt for credentials.
const EXIT_INVALID_CREDENTIALS: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "bbclient",
    version,
    about = "List enrolled courses from a Blackboard learning portal"
)]
struct Cli {
    /// Portal base URL, e.g. https://campus.example.edu
    /// (falls back to BBCLIENT_BASE_URL, then the saved config)
    #[arg(long)]
    base_url: Option<String>,

    /// Portal username (falls back to BBCLIENT_USERNAME, then a prompt)
    #[arg(long)]
    username: Option<String>,

    /// Print the course listing as JSON
    #[arg(long)]
    json: bool,

    /// Do not store the password in the OS keychain after a successful login
    #[arg(long)]
    no_store: bool,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if matches!(
                err.downcast_ref::<AuthError>(),
                Some(AuthError::InvalidCredentials)
            ) {
                eprintln!("Login rejected: invalid username or password.");
                ExitCode::from(EXIT_INVALID_CREDENTIALS)
            } else {
                eprintln!("Error: {err:#}");
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load().unwrap_or_default();

    let base_url = cli
        .base_url
        .or_else(|| std::env::var("BBCLIENT_BASE_URL").ok())
        .or_else(|| config.base_url.clone())
        .context("No portal base URL. Pass --base-url or set BBCLIENT_BASE_URL")?;

    let username = match cli
        .username
        .or_else(|| std::env::var("BBCLIENT_USERNAME").ok())
    {
        Some(username) => username,
        None => prompt_username(config.last_username.as_deref())?,
    };

    let password = match std::env::var("BBCLIENT_PASSWORD") {
        Ok(password) => password,
        Err(_) => resolve_password(&username)?,
    };

    let credentials = Credentials::new(username.clone(), password);

    info!(portal = %base_url, "Authenticating");
    let session = Session::login(&base_url, &credentials).await?;

    if !cli.no_store {
        if let Err(err) = CredentialStore::store(&username, credentials.password()) {
            warn!(error = %err, "Could not store password in keychain");
        }
    }
    config.base_url = Some(base_url);
    config.last_username = Some(username);
    if let Err(err) = config.save() {
        warn!(error = %err, "Could not save config");
    }

    let mut courses = portal::fetch_courses(&session).await?;
    courses.sort_by(|a, b| a.name.cmp(&b.name));

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&courses)?);
    } else if courses.is_empty() {
        println!("No enrolled courses found.");
    } else {
        for course in &courses {
            println!("Course: {}", course.name);
            println!("Instructor: {}", course.instructors);
        }
    }

    Ok(())
}

/// Prompt for a username, defaulting to the last one used.
fn prompt_username(last_username: Option<&str>) -> Result<String> {
    if let Some(last) = last_username {
        print!("Username [{}]: ", last);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            return Ok(last.to_string());
        }
        return Ok(input.to_string());
    }

    print!("Username: ");
    io::stdout().flush()?;

    let mut username = String::new();
    io::stdin().read_line(&mut username)?;
    Ok(username.trim().to_string())
}

/// Resolve the password from the keychain (with consent) or a masked prompt.
fn resolve_password(username: &str) -> Result<String> {
    if CredentialStore::has_credentials(username) {
        print!("Use stored password? [Y/n]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if input.trim().to_lowercase() != "n" {
            return CredentialStore::get_password(username);
        }
    }

    Ok(rpassword::prompt_password("Password: ")?)
}

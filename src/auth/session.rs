//! Blackboard session establishment via the challenge login.
//!
//! [`Session::login`] runs the full sequence: fetch the one-time token from
//! the login page, derive the challenge digests, submit the login form, and
//! decide the outcome from the final resolved URL. The portal never returns
//! an error status for a rejected login; it simply re-renders the login
//! page, so the redirect (or its absence) is the only authentication signal.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use scraper::{Html, Selector};
use serde::Serialize;
use tracing::{debug, info};

use super::challenge::ChallengeDigests;
use super::credentials::Credentials;
use super::error::AuthError;

// ============================================================================
// Constants
// ============================================================================

/// Login form endpoint, relative to the portal base URL.
const LOGIN_PATH: &str = "/webapps/login/";

/// Landing frameset the portal redirects to after a successful login.
const PORTAL_LANDING_PATH: &str = "/webapps/portal/frameset.jsp";

/// Hidden login-form input carrying the one-time token.
const TOKEN_SELECTOR: &str = r#"input[name="one_time_token"]"#;

/// Localized label of the login submit button; the form handler expects it
/// verbatim.
const SUBMIT_LABEL: &str = "Iniciar sesión";

/// HTTP request timeout in seconds.
/// 30s allows for slow portal responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// An authenticated portal session.
///
/// Holds the cookie store populated during login; every request issued
/// through the session carries those cookies. A `Session` is authenticated
/// exactly once, at construction: a rejected login never produces one, and
/// there is no refresh. Cookies live in memory only and vanish with the
/// value.
pub struct Session {
    base_url: Url,
    client: Client,
    authenticated: bool,
}

impl Session {
    /// Log in to the portal at `base_url` and return an authenticated session.
    ///
    /// Two requests are made: a GET for the login page (to obtain the
    /// one-time token) and the form POST itself. Neither is retried; any
    /// failure is terminal for this attempt and the caller must start a new
    /// one with fresh input.
    pub async fn login(base_url: &str, credentials: &Credentials) -> Result<Self, AuthError> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let login_url = base_url.join(LOGIN_PATH)?;
        let token = fetch_token(&client, &login_url).await?;
        debug!(token_len = token.len(), "Fetched one-time login token");

        let digests = ChallengeDigests::derive(credentials.password(), &token);
        // The `password` field is an intentionally empty placeholder; the
        // password travels only as the two derived digests.
        let form = [
            ("user_id", credentials.username()),
            ("password", ""),
            ("login", SUBMIT_LABEL),
            ("action", "login"),
            ("remote-user", ""),
            ("new_loc", PORTAL_LANDING_PATH),
            ("auth_type", ""),
            ("one_time_token", token.as_str()),
            ("encoded_pw", digests.encoded_pw.as_str()),
            ("encoded_pw_unicode", digests.encoded_pw_unicode.as_str()),
        ];

        let response = client
            .post(login_url.clone())
            .form(&form)
            .send()
            .await?
            .error_for_status()?;

        if *response.url() == login_url {
            return Err(AuthError::InvalidCredentials);
        }

        info!(landed = %response.url().path(), "Login accepted");
        Ok(Self {
            base_url,
            client,
            authenticated: true,
        })
    }

    /// Issue a GET for a path resolved against the portal base URL, with the
    /// session cookies attached.
    pub async fn get(&self, path: &str) -> Result<Response, AuthError> {
        let url = self.base_url.join(path)?;
        Ok(self.client.get(url).send().await?)
    }

    /// Issue a form-encoded POST for a path resolved against the portal base
    /// URL, with the session cookies attached.
    pub async fn post_form<T: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &T,
    ) -> Result<Response, AuthError> {
        let url = self.base_url.join(path)?;
        Ok(self.client.post(url).form(form).send().await?)
    }

    /// The portal base URL all request paths resolve against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

/// Fetch the login page and pull the one-time token out of it.
async fn fetch_token(client: &Client, login_url: &Url) -> Result<String, AuthError> {
    let body = client
        .get(login_url.clone())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    extract_token(&body)
}

/// Extract the one-time token from the login page markup.
///
/// A page without the token field is not a challenge-login form at all and
/// is reported as malformed rather than submitted blind. An empty token
/// value is passed through: the server rejects the resulting submission and
/// that surfaces as `InvalidCredentials` at the outcome check.
fn extract_token(body: &str) -> Result<String, AuthError> {
    let selector = Selector::parse(TOKEN_SELECTOR).expect("static selector");
    let document = Html::parse_document(body);

    document
        .select(&selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(|value| value.trim().to_string())
        .ok_or_else(|| {
            AuthError::MalformedResponse(format!("login page has no {TOKEN_SELECTOR} field"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_from_login_form() {
        let body = r#"<html><body><form>
            <input type="hidden" name="one_time_token" value="tok-123">
            <input type="text" name="user_id">
        </form></body></html>"#;
        assert_eq!(extract_token(body).unwrap(), "tok-123");
    }

    #[test]
    fn test_extract_token_takes_first_match() {
        let body = r#"<form>
            <input name="one_time_token" value="first">
            <input name="one_time_token" value="second">
        </form>"#;
        assert_eq!(extract_token(body).unwrap(), "first");
    }

    #[test]
    fn test_extract_token_trims_whitespace() {
        let body = r#"<input name="one_time_token" value="  tok-123  ">"#;
        assert_eq!(extract_token(body).unwrap(), "tok-123");
    }

    #[test]
    fn test_extract_token_allows_empty_value() {
        let body = r#"<input name="one_time_token" value="">"#;
        assert_eq!(extract_token(body).unwrap(), "");
    }

    #[test]
    fn test_extract_token_missing_field_is_malformed() {
        let body = "<html><body>Scheduled maintenance</body></html>";
        assert!(matches!(
            extract_token(body),
            Err(AuthError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_token_missing_value_attribute_is_malformed() {
        let body = r#"<input name="one_time_token">"#;
        assert!(matches!(
            extract_token(body),
            Err(AuthError::MalformedResponse(_))
        ));
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Malformed portal response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid portal URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

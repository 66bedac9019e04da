use jsonwebtoken::Algorithm;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("Config Error {0}")]
    Config(String),

    #[error("Http Client Error {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Jwks Parsing Error {0}")]
    JwksParsingError(#[from] serde_json::Error),
}

/// Reasons a token is rejected.
///
/// Never leaves the verifier: every variant collapses into a `false` verdict.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Malformed Token {0}")]
    MalformedToken(jsonwebtoken::errors::Error),

    #[error("KeyFetchError {0}")]
    KeyFetch(RefreshError),

    #[error("Key Not Found {0}")]
    KeyNotFound(String),

    #[error("Missing Kid")]
    MissingKid(),

    #[error("InvalidKey {0}")]
    InvalidKey(String),

    #[error("Invalid Key Algorithm {0:?}")]
    InvalidKeyAlg(Algorithm),

    #[error(transparent)]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("during connection: {0}")]
    Connection(reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(StatusCode),
    #[error("during decoding: {error}. body: {body:?}")]
    Decode { error: serde_json::Error, body: String },
    #[error("no valid keys in the jwk set")]
    NoValidKeys,
}

/// The expected audience cannot be produced.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("access denied to secret {0}")]
    AccessDenied(String),

    #[error("secret {0} not found")]
    NotFound(String),

    #[error("secret store error: {0}")]
    Store(String),

    #[error("malformed secret {name}: {reason}")]
    Malformed { name: String, reason: String },
}

/// The inbound event cannot yield a bearer token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("missing authorizationToken")]
    MissingToken,

    #[error("authorization scheme is not Bearer")]
    InvalidScheme,

    #[error("empty bearer token")]
    EmptyToken,

    #[error("missing methodArn")]
    MissingMethodArn,
}

/// Errors surfaced to the host runtime.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("secret unavailable: {0}")]
    SecretUnavailable(#[from] SecretError),
}

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type SignResult<T> = std::result::Result<T, SignError>;
pub type TokenResult<T> = std::result::Result<T, TokenError>;
pub type ProfileResult<T> = std::result::Result<T, ProfileError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("token acquisition failed : {0}")]
    Token(#[from] TokenError),
    #[error("OAuth sign failed : {0}")]
    Sign(#[from] SignError),
    #[error("request failed : {0}")]
    Transport(#[from] reqwest::Error),
    #[error("credential profile unavailable : {0}")]
    Profile(#[from] ProfileError),
}

/// Signing-input failures. Raised before anything touches the network.
#[derive(Error, Debug, Clone)]
pub enum SignError {
    #[error("request URL is missing or could not be parsed, nothing to sign")]
    MissingUrl,
    #[error("signing key was rejected by the digest backend")]
    Key,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token endpoint answered {0}")]
    Status(StatusCode),
    #[error("token response is not a valid token document : {0}")]
    Decode(#[from] serde_json::Error),
    #[error("token response has malformed format: not found {0} in {1}")]
    KeyNotFound(&'static str, String),
}

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("cannot read profile store at {} : {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("profile store is not valid TOML : {0}")]
    Malformed(#[from] toml::de::Error),
    #[error("no credential profile registered for service {0}")]
    UnknownService(String),
    #[error("no user configuration directory on this platform")]
    NoConfigDir,
}

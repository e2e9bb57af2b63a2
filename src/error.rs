use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type SignResult<T> = std::result::Result<T, SignError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("OAuth sign failed : {0}")]
    Signer(#[from] SignError),
    #[error("request failed : {0}")]
    Reqwest(#[from] reqwest::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    #[error("request header Authorization is malformed near {0:?}")]
    MalformedAuthorizationHeader(String),
    #[error("HMAC-SHA1 computation failed : {0}")]
    SigningFailure(String),
    #[error("random source could not produce nonce bytes : {0}")]
    Random(String),
    #[error("system clock is set before the unix epoch")]
    Clock,
    #[error("form parameters could not be serialized : {0}")]
    InvalidForm(String),
    #[error("request target {0:?} is not a valid path and query")]
    InvalidRequestTarget(String),
    #[error("signed Authorization header is not a valid header value : {0}")]
    InvalidHeaderValue(String),
}

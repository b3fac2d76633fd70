use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Fetcher middleware error")]
    Middleware(#[from] reqwest_middleware::Error),
    #[error("Fetcher transport error")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected response status {status}")]
    UnexpectedStatus { status: StatusCode },
    #[error("Response body larger than {limit} bytes")]
    ResponseTooLarge { limit: usize },
}

use reqwest::StatusCode;
use url::Url;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("request to {url} failed: {status} - {body}")]
    Status {
        url: Url,
        status: StatusCode,
        body: String,
    },
    #[error("invalid JSON from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("no control with index {0}")]
    UnknownControl(usize),
    #[error("configuration error: {0}")]
    Config(String),
}

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::ViewerError;
use crate::model::{FileDescriptor, TreeNode};
use crate::source::TreeSource;

pub const DEFAULT_LIST_PATH: &str = "/api/list/files";

const AGENT: &str = concat!("oak-viewer/", env!("CARGO_PKG_VERSION"));

/// Resolves a path from the list endpoint against the server base, the way a
/// page resolves relative links against its own origin.
pub fn resolve(base: &Url, path: &str) -> Result<Url, ViewerError> {
    Ok(base.join(path)?)
}

/// GETs `url` and parses the body as JSON.
///
/// Only a `200 OK` counts as success. Any other status comes back as
/// [`ViewerError::Status`] carrying the response body, and a body that does
/// not parse comes back as [`ViewerError::Parse`].
pub async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: Url,
) -> Result<T, ViewerError> {
    debug!(%url, "fetching json");
    let res = client
        .get(url.clone())
        .header(USER_AGENT, AGENT)
        .send()
        .await?;

    let status = res.status();
    if status != StatusCode::OK {
        let body = res.text().await.unwrap_or_default();
        return Err(ViewerError::Status { url, status, body });
    }

    let text = res.text().await?;
    serde_json::from_str(&text).map_err(|source| ViewerError::Parse {
        url: url.to_string(),
        source,
    })
}

/// Callback form of [`fetch_json`]: exactly one of the two callbacks runs.
pub async fn load_json<T, S, E>(client: &reqwest::Client, url: Url, on_success: S, on_error: E)
where
    T: DeserializeOwned,
    S: FnOnce(T),
    E: FnOnce(ViewerError),
{
    match fetch_json(client, url).await {
        Ok(value) => on_success(value),
        Err(err) => on_error(err),
    }
}

/// Files and trees served over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
    list_path: String,
}

impl HttpSource {
    pub fn new(base: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base, DEFAULT_LIST_PATH)
    }

    pub fn with_client(client: reqwest::Client, base: Url, list_path: &str) -> Self {
        Self {
            client,
            base,
            list_path: list_path.to_string(),
        }
    }
}

#[async_trait]
impl TreeSource for HttpSource {
    async fn list_files(&self) -> Result<Vec<FileDescriptor>, ViewerError> {
        let url = resolve(&self.base, &self.list_path)?;
        // The list endpoint encodes an empty listing as `null`.
        let files: Option<Vec<FileDescriptor>> = fetch_json(&self.client, url).await?;
        Ok(files.unwrap_or_default())
    }

    async fn load_tree(&self, filename: &str) -> Result<TreeNode, ViewerError> {
        let url = resolve(&self.base, filename)?;
        fetch_json(&self.client, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_and_absolute_paths() {
        let base = Url::parse("http://localhost:3000/").unwrap();
        assert_eq!(
            resolve(&base, "tree/a.data.tree.json").unwrap().as_str(),
            "http://localhost:3000/tree/a.data.tree.json"
        );
        assert_eq!(
            resolve(&base, "/api/list/files").unwrap().as_str(),
            "http://localhost:3000/api/list/files"
        );
        assert_eq!(
            resolve(&base, "http://other:8080/x.json").unwrap().as_str(),
            "http://other:8080/x.json"
        );
    }
}

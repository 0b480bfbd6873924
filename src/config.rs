use std::env;
use std::path::PathBuf;

use url::Url;

use crate::api::DEFAULT_LIST_PATH;
use crate::display::DEFAULT_CONTAINER;
use crate::error::ViewerError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/";

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub base_url: Url,
    pub list_path: String,
    pub container: String,
    pub tree_dir: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            list_path: DEFAULT_LIST_PATH.to_string(),
            container: DEFAULT_CONTAINER.to_string(),
            tree_dir: None,
        }
    }
}

impl ViewerConfig {
    /// Reads `OAK_*` variables, after loading a `.env` file if one exists.
    pub fn from_env() -> Result<Self, ViewerError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ViewerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(base) = lookup("OAK_BASE_URL") {
            config.base_url = parse_base_url(&base)?;
        }
        if let Some(path) = lookup("OAK_LIST_PATH") {
            config.list_path = path;
        }
        if let Some(container) = lookup("OAK_CONTAINER") {
            config.container = container;
        }
        config.tree_dir = lookup("OAK_TREE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);
        Ok(config)
    }
}

pub fn parse_base_url(raw: &str) -> Result<Url, ViewerError> {
    Url::parse(raw.trim())
        .map_err(|err| ViewerError::Config(format!("invalid OAK_BASE_URL {raw:?}: {err}")))
}
